use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};

/// The identity provider as seen by the pipeline: only "is someone signed in".
pub trait SessionGate: Send + Sync + Debug {
    fn is_active(&self) -> bool;
    fn sign_out(&self);
}

/// Session flag owned by the embedding application.
#[derive(Debug)]
pub struct StaticSession {
    active: AtomicBool,
}

impl StaticSession {
    pub fn signed_in() -> Self {
        Self { active: AtomicBool::new(true) }
    }

    pub fn signed_out() -> Self {
        Self { active: AtomicBool::new(false) }
    }

    pub fn sign_in(&self) {
        self.active.store(true, Ordering::SeqCst);
    }
}

impl SessionGate for StaticSession {
    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn sign_out(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}
