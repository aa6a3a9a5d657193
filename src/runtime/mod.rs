pub mod attempt;
pub mod debounce;
pub mod orchestrator;
pub mod session;
