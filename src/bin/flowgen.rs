use clap::{Parser, Subcommand};
use flowgen::client::filter_catalog;
use flowgen::client::http::HttpAutomationClient;
use flowgen::config::ConfigArgs;
use flowgen::dsl::loader::load_document;
use flowgen::interpreter::PromptInterpreter;
use flowgen::runtime::attempt::GenerationResult;
use flowgen::runtime::debounce::Debouncer;
use flowgen::runtime::orchestrator::{Notification, Orchestrator};
use flowgen::runtime::session::StaticSession;
use flowgen::share::{decode_share_link, encode_share_link};
use flowgen::viewer::{TextSurface, ViewerShell};
use std::io::stdout;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use anyhow::{Result, anyhow, bail};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a workflow from a prompt and submit it
    Generate {
        /// Natural-language description of the workflow
        prompt: Option<String>,

        /// Share link carrying the prompt instead
        #[arg(long, conflicts_with = "prompt")]
        link: Option<String>,
    },

    /// Treat each stdin line as a prompt edit and generate after a quiet period
    Watch,

    /// List the remote node catalog
    Nodes {
        /// Filter by display name or description
        #[arg(long, short)]
        search: Option<String>,
    },

    /// Render a workflow file (JSON or YAML)
    View {
        file: PathBuf,
    },

    /// Serve the local generation endpoint
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },

    /// Build a share link for a prompt
    Share {
        prompt: String,

        #[arg(long, default_value = "http://localhost:3000/dashboard")]
        base: String,
    },
}

fn build_orchestrator(config: &ConfigArgs) -> Result<Arc<Orchestrator>> {
    let automation = config.automation()?;
    // Missing settings fail here, before the first request.
    automation.validate()?;

    let client = HttpAutomationClient::new(Arc::new(automation))?;
    Ok(Arc::new(Orchestrator::new(
        Arc::new(client),
        Arc::new(PromptInterpreter::with_builtin_rules()),
        Arc::new(StaticSession::signed_in()),
        config.pipeline(),
    )))
}

fn print_notification(notification: &Notification) {
    match notification {
        Notification::Success { attempt, name } => println!("[{}] Workflow generated successfully: {}", attempt, name),
        Notification::Failure { attempt, message, retryable } => {
            if *retryable {
                println!("[{}] {} (you can retry)", attempt, message);
            } else {
                println!("[{}] {}", attempt, message);
            }
        }
        Notification::Rejected { message } => println!("{}", message),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { prompt, link } => {
            let prompt = match (prompt, link) {
                (Some(prompt), _) => prompt,
                (None, Some(link)) => decode_share_link(&link)?,
                (None, None) => bail!("Provide a prompt or --link"),
            };
            let orchestrator = build_orchestrator(&cli.config)?;

            let result = orchestrator.generate(&prompt).await;
            let mut viewer = ViewerShell::new(TextSurface::new(stdout()));
            viewer.present(orchestrator.snapshot().await.payload().as_ref())?;

            if let GenerationResult::Failure { error } = result {
                return Err(anyhow!(error));
            }
        }

        Commands::Watch => {
            let orchestrator = build_orchestrator(&cli.config)?;
            let mut notifications = orchestrator.subscribe();
            let printer = tokio::spawn(async move {
                loop {
                    match notifications.recv().await {
                        Ok(notification) => print_notification(&notification),
                        Err(RecvError::Lagged(skipped)) => warn!(skipped, "Notification printer fell behind"),
                        Err(RecvError::Closed) => break,
                    }
                }
            });

            let debouncer = Debouncer::spawn(orchestrator.clone(), orchestrator.config().debounce);
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            info!("Reading prompt edits from stdin");
            while let Some(line) = lines.next_line().await? {
                debouncer.edit(line).await?;
            }
            debouncer.shutdown().await?;

            let snapshot = orchestrator.snapshot().await;
            // Last handle: closes the notification channel so the printer drains and exits.
            drop(orchestrator);
            printer.await?;

            let mut viewer = ViewerShell::new(TextSurface::new(stdout()));
            viewer.present(snapshot.payload().as_ref())?;
        }

        Commands::Nodes { search } => {
            let orchestrator = build_orchestrator(&cli.config)?;
            let catalog = orchestrator.list_catalog().await?;
            for entry in filter_catalog(&catalog, search.as_deref().unwrap_or("")) {
                println!("{:<40} {}", entry.name, entry.display_name);
                if !entry.description.is_empty() {
                    println!("    {}", entry.description);
                }
            }
        }

        Commands::View { file } => {
            let payload = load_document(&file.to_string_lossy())?;
            let mut viewer = ViewerShell::new(TextSurface::new(stdout()));
            viewer.present(Some(&payload))?;
        }

        Commands::Serve { addr } => {
            let orchestrator = build_orchestrator(&cli.config)?;
            flowgen::server::serve(addr, orchestrator).await?;
        }

        Commands::Share { prompt, base } => {
            println!("{}", encode_share_link(&base, &prompt)?);
        }
    }

    Ok(())
}
