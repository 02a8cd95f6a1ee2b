use crate::api::DashboardApi;
use crate::config::HistoryPolicy;
use crate::render::{history_listing, HistoryListing};
use crate::session::SessionStore;
use crate::surface::Surface;
use std::sync::{Arc, Mutex};
use tokio::task::{AbortHandle, JoinHandle};

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryLoad {
    Painted(HistoryListing),
    /// A newer activation superseded this fetch; nothing was painted.
    Stale,
}

/// Activation bookkeeping, guarded by one lock so the staleness check and the
/// paint cannot interleave with a newer activation or a cancel.
#[derive(Default)]
struct LoadState {
    generation: u64,
    cancelled_through: u64,
    in_flight: Vec<(u64, AbortHandle)>,
}

impl LoadState {
    fn may_paint(&self, generation: u64, policy: HistoryPolicy) -> bool {
        if generation <= self.cancelled_through {
            return false;
        }
        match policy {
            HistoryPolicy::LatestActivation => generation == self.generation,
            HistoryPolicy::LastResolved => true,
        }
    }
}

/// Fetches the history list and paints it into the history container.
#[derive(Clone)]
pub struct HistoryLoader {
    api: Arc<dyn DashboardApi>,
    session: Arc<dyn SessionStore>,
    surface: Arc<dyn Surface>,
    policy: HistoryPolicy,
    date_format: Arc<str>,
    state: Arc<Mutex<LoadState>>,
}

impl HistoryLoader {
    pub fn new(
        api: Arc<dyn DashboardApi>,
        session: Arc<dyn SessionStore>,
        surface: Arc<dyn Surface>,
        policy: HistoryPolicy,
        date_format: &str,
    ) -> Self {
        Self {
            api,
            session,
            surface,
            policy,
            date_format: Arc::from(date_format),
            state: Arc::new(Mutex::new(LoadState::default())),
        }
    }

    /// Start a detached load for one activation of the History view.
    ///
    /// Returns `None` when called outside a tokio runtime.
    pub fn activate(&self) -> Option<JoinHandle<HistoryLoad>> {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::error!("Cannot load history without a runtime: {}", e);
                return None;
            }
        };

        let generation = {
            let mut state = self.state();
            state.generation += 1;
            state.generation
        };
        let loader = self.clone();
        let handle = runtime.spawn(async move { loader.run(generation).await });

        let mut state = self.state();
        state.in_flight.retain(|(_, task)| !task.is_finished());
        if self.policy == HistoryPolicy::LatestActivation {
            for (_, task) in state.in_flight.drain(..) {
                task.abort();
            }
        }
        state.in_flight.push((generation, handle.abort_handle()));

        Some(handle)
    }

    /// Invalidate and abort every load still in flight.
    pub fn cancel(&self) {
        let mut state = self.state();
        state.cancelled_through = state.generation;
        for (generation, task) in state.in_flight.drain(..) {
            tracing::debug!("Cancelling history load #{}", generation);
            task.abort();
        }
    }

    async fn run(&self, generation: u64) -> HistoryLoad {
        let listing = self.fetch().await;

        let state = self.state();
        if !state.may_paint(generation, self.policy) {
            tracing::debug!("Discarding stale history load #{}", generation);
            return HistoryLoad::Stale;
        }
        self.surface.paint_history(&listing);
        drop(state);

        HistoryLoad::Painted(listing)
    }

    async fn fetch(&self) -> HistoryListing {
        let token = match self.session.get() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!("Could not read session token: {}", e);
                None
            }
        };

        let result = self.api.history(token.as_deref()).await;
        if let Ok(entries) = &result {
            tracing::debug!("Loaded {} history entries", entries.len());
        }
        history_listing(result, &self.date_format)
    }

    fn state(&self) -> std::sync::MutexGuard<'_, LoadState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
