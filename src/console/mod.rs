//! Terminal host for the dashboard controller.
//!
//! Stands in for the browser page: stdout is the painted surface, stdin
//! carries the user's clicks and form submissions.

pub mod command;

use crate::api::HttpDashboardApi;
use crate::config::DashboardConfig;
use crate::dashboard::{BootOutcome, Dashboard, DashboardDeps, HistoryLoad, SubmitOutcome};
use crate::session::{InMemorySessionStore, SessionStore};
use crate::surface::ConsoleSurface;
use anyhow::{Context, Result};
use clap::Parser;
use command::{build_form, parse_command, Command, HELP};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

#[derive(Debug, Parser)]
#[command(name = "casedesk", version, about = "Legal case analysis dashboard")]
pub struct Args {
    /// JSON config file (defaults to <config dir>/casedesk/config.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Page path the dashboard is opened on
    #[arg(long, default_value = "/dashboard")]
    pub path: String,

    /// Store this token before loading, as the login page would
    #[arg(long)]
    pub token: Option<String>,

    /// SQLite file holding the session token
    #[arg(long, conflicts_with = "memory")]
    pub session_db: Option<PathBuf>,

    /// Keep the session token in memory only
    #[arg(long)]
    pub memory: bool,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    runtime.block_on(run_with(args))
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("casedesk_lib=info,casedesk=info"));
    // A subscriber may already be installed by an embedding host.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub async fn run_with(args: Args) -> Result<()> {
    let mut config = DashboardConfig::load(args.config.as_deref())?;
    if let Some(base_url) = args.base_url {
        config = config.with_base_url(base_url);
    }

    let session = open_session_store(&args.session_db, args.memory, &config.token_key)?;
    if let Some(token) = &args.token {
        session.set(token).context("failed to store session token")?;
    }

    let api = Arc::new(HttpDashboardApi::new(&config).context("failed to build HTTP client")?);
    let surface = Arc::new(ConsoleSurface::stdout(args.path.clone()));

    tracing::info!("Opening {} against {}", args.path, config.base_url);
    let deps = DashboardDeps {
        config,
        session,
        api,
        surface: surface.clone(),
    };

    let dashboard = match Dashboard::boot(deps, &args.path) {
        BootOutcome::Ready(dashboard) => Arc::new(dashboard),
        BootOutcome::Redirected { to } => {
            tracing::info!("Not signed in; sign in at {} and pass --token", to);
            return Ok(());
        }
    };

    println!("{}", HELP);
    let mut pending = PendingTasks::default();
    let mut logged_out = false;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        match command {
            Command::Navigate(link_id) => match dashboard.handle_nav_click(&link_id) {
                Some(switch) => {
                    if let Some(history) = switch.history {
                        pending.track_history(history);
                    }
                }
                None => eprintln!("no view bound to {}", link_id),
            },
            Command::Submit(specs) => {
                let form = match build_form(&specs).await {
                    Ok(form) => form,
                    Err(e) => {
                        eprintln!("could not read form file: {}", e);
                        continue;
                    }
                };
                let dashboard = dashboard.clone();
                pending.track_submit(tokio::spawn(async move {
                    if let SubmitOutcome::Ignored = dashboard.submit_case(&form).await {
                        eprintln!("an analysis is already running");
                    }
                }));
            }
            Command::Logout => {
                dashboard.logout();
                logged_out = true;
                break;
            }
            Command::Show => match dashboard.active_view() {
                Some(view) => println!("active view: {}", view),
                None => println!("no active view"),
            },
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
        }
    }

    if logged_out {
        pending.abandon();
    } else {
        pending.settle().await;
    }

    tracing::debug!("Console closed at {}", surface.location());
    Ok(())
}

/// Background work started from the console that must not vanish silently
/// when the runtime shuts down.
#[derive(Default)]
struct PendingTasks {
    submits: Vec<JoinHandle<()>>,
    history: Vec<JoinHandle<HistoryLoad>>,
}

impl PendingTasks {
    fn track_submit(&mut self, handle: JoinHandle<()>) {
        self.submits.retain(|task| !task.is_finished());
        self.submits.push(handle);
    }

    fn track_history(&mut self, handle: JoinHandle<HistoryLoad>) {
        self.history.retain(|task| !task.is_finished());
        self.history.push(handle);
    }

    fn unfinished(&self) -> (usize, usize) {
        (
            self.submits.iter().filter(|task| !task.is_finished()).count(),
            self.history.iter().filter(|task| !task.is_finished()).count(),
        )
    }

    /// Wait for everything still running. Returns how many tasks were awaited.
    async fn settle(self) -> usize {
        let (submits, history) = self.unfinished();
        if submits > 0 {
            tracing::info!("Waiting for {} in-flight analysis request(s)", submits);
        }

        let mut awaited = 0;
        for task in self.submits {
            if let Err(e) = task.await {
                tracing::warn!("Analysis task ended abnormally: {}", e);
            }
            awaited += 1;
        }
        for task in self.history {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    tracing::warn!("History task ended abnormally: {}", e);
                }
            }
            awaited += 1;
        }
        tracing::debug!("Settled {} submit and {} history task(s)", submits, history);
        awaited
    }

    /// Abort everything still running. Returns how many tasks were abandoned.
    fn abandon(self) -> usize {
        let (submits, history) = self.unfinished();
        if submits > 0 {
            tracing::warn!("Abandoning {} in-flight analysis request(s)", submits);
        }
        if history > 0 {
            tracing::debug!("Abandoning {} history load(s)", history);
        }
        for task in self.submits {
            task.abort();
        }
        for task in self.history {
            task.abort();
        }
        submits + history
    }
}

fn open_session_store(
    session_db: &Option<PathBuf>,
    memory: bool,
    token_key: &str,
) -> Result<Arc<dyn SessionStore>> {
    if memory {
        return Ok(Arc::new(InMemorySessionStore::new(token_key)));
    }

    #[cfg(feature = "sqlite-session")]
    {
        use crate::config::default_session_db_path;
        use crate::database::DatabaseManager;
        use crate::session::SqliteSessionStore;

        if let Some(path) = session_db.clone().or_else(default_session_db_path) {
            let db = DatabaseManager::new(&path)
                .with_context(|| format!("failed to open session store {}", path.display()))?;
            return Ok(Arc::new(SqliteSessionStore::new(Arc::new(db), token_key)));
        }
    }

    #[cfg(not(feature = "sqlite-session"))]
    if session_db.is_some() {
        tracing::warn!("Built without sqlite-session; --session-db ignored");
    }

    Ok(Arc::new(InMemorySessionStore::new(token_key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_memory_conflicts_with_session_db() {
        let result = Args::try_parse_from(["casedesk", "--memory", "--session-db", "/tmp/x.db"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["casedesk"]).unwrap();
        assert_eq!(args.path, "/dashboard");
        assert!(args.token.is_none());
        assert!(!args.memory);
    }

    #[tokio::test]
    async fn test_settle_waits_for_running_submit() {
        let (release, gate) = tokio::sync::oneshot::channel::<()>();
        let done = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = done.clone();

        let mut pending = PendingTasks::default();
        pending.track_submit(tokio::spawn(async move {
            let _ = gate.await;
            flag.store(true, std::sync::atomic::Ordering::SeqCst);
        }));
        release.send(()).unwrap();

        assert_eq!(pending.settle().await, 1);
        assert!(done.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_abandon_aborts_running_submit() {
        let (_release, gate) = tokio::sync::oneshot::channel::<()>();
        let mut pending = PendingTasks::default();
        pending.track_submit(tokio::spawn(async move {
            let _ = gate.await;
        }));

        assert_eq!(pending.abandon(), 1);
    }

    #[test]
    fn test_memory_store_selected() {
        let store = open_session_store(&None, true, "token").unwrap();
        assert_eq!(store.get().unwrap(), None);
    }
}
