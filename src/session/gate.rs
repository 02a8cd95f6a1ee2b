use super::store::SessionStore;
use crate::config::DashboardConfig;

#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// Initialisation may continue. The token is not validated here.
    Proceed { token: Option<String> },
    /// Terminal for this page load.
    Redirect { to: String },
}

pub struct SessionGate<'a> {
    config: &'a DashboardConfig,
}

impl<'a> SessionGate<'a> {
    pub fn new(config: &'a DashboardConfig) -> Self {
        Self { config }
    }

    pub fn check(&self, store: &dyn SessionStore, current_path: &str) -> GateDecision {
        let token = match store.get() {
            Ok(token) => token,
            Err(e) => {
                tracing::error!("Failed to read session token, treating as absent: {}", e);
                None
            }
        };

        if token.is_none() && current_path == self.config.dashboard_path {
            tracing::info!(
                "No session token on {}, redirecting to {}",
                current_path,
                self.config.login_path
            );
            return GateDecision::Redirect {
                to: self.config.login_path.clone(),
            };
        }

        GateDecision::Proceed { token }
    }
}
