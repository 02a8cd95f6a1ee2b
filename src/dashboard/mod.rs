pub mod history;
pub mod submitter;

pub use history::{HistoryLoad, HistoryLoader};
pub use submitter::{AnalysisSubmitter, SubmitOutcome};

use crate::api::{CaseForm, DashboardApi};
use crate::config::DashboardConfig;
use crate::session::{GateDecision, SessionGate, SessionStore};
use crate::surface::Surface;
use crate::views::{SwitchOutcome, View, ViewController};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Collaborators the dashboard is wired to at page load.
pub struct DashboardDeps {
    pub config: DashboardConfig,
    pub session: Arc<dyn SessionStore>,
    pub api: Arc<dyn DashboardApi>,
    pub surface: Arc<dyn Surface>,
}

pub enum BootOutcome {
    Ready(Dashboard),
    Redirected { to: String },
}

pub struct ViewSwitch {
    pub outcome: SwitchOutcome,
    /// Detached history load; dropping the handle does not cancel it.
    pub history: Option<JoinHandle<HistoryLoad>>,
}

pub struct Dashboard {
    config: DashboardConfig,
    session: Arc<dyn SessionStore>,
    surface: Arc<dyn Surface>,
    views: Mutex<ViewController>,
    submitter: AnalysisSubmitter,
    history: HistoryLoader,
}

impl Dashboard {
    /// Page-load entry point. The session gate runs before anything else; a
    /// redirect leaves every other component unbuilt.
    pub fn boot(deps: DashboardDeps, current_path: &str) -> BootOutcome {
        let DashboardDeps {
            config,
            session,
            api,
            surface,
        } = deps;

        if let GateDecision::Redirect { to } =
            SessionGate::new(&config).check(session.as_ref(), current_path)
        {
            surface.redirect(&to);
            return BootOutcome::Redirected { to };
        }

        let submitter = AnalysisSubmitter::new(
            api.clone(),
            session.clone(),
            surface.clone(),
            config.labels.clone(),
        );
        let history = HistoryLoader::new(
            api,
            session.clone(),
            surface.clone(),
            config.history_policy,
            &config.date_format,
        );

        let initial = surface.visible_view();
        let dashboard = Self {
            views: Mutex::new(ViewController::new(initial)),
            config,
            session,
            surface,
            submitter,
            history,
        };

        if initial.is_none() {
            dashboard.switch_view(dashboard.config.initial_view);
        }

        tracing::info!("Dashboard ready on {} ({:?})", current_path, dashboard.active_view());
        BootOutcome::Ready(dashboard)
    }

    pub fn active_view(&self) -> Option<View> {
        self.views().active()
    }

    pub fn switch_view(&self, target: View) -> ViewSwitch {
        let outcome = self.views().switch_view(self.surface.as_ref(), target);
        let history = if outcome.loads_history {
            self.history.activate()
        } else {
            None
        };
        ViewSwitch { outcome, history }
    }

    /// Navigation click. Links without a bound view are inert.
    pub fn handle_nav_click(&self, link_id: &str) -> Option<ViewSwitch> {
        match View::from_link_id(link_id) {
            Some(view) => Some(self.switch_view(view)),
            None => {
                tracing::debug!("Ignoring click on unbound link {}", link_id);
                None
            }
        }
    }

    pub async fn submit_case(&self, form: &CaseForm) -> SubmitOutcome {
        self.submitter.submit(form).await
    }

    pub fn is_submitting(&self) -> bool {
        self.submitter.is_in_flight()
    }

    pub fn logout(&self) {
        self.history.cancel();
        if let Err(e) = self.session.clear() {
            tracing::error!("Failed to clear session token: {}", e);
        }
        tracing::info!("Logged out, redirecting to {}", self.config.login_path);
        self.surface.redirect(&self.config.login_path);
    }

    fn views(&self) -> std::sync::MutexGuard<'_, ViewController> {
        self.views
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
