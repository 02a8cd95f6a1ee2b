use serde::{Deserialize, Serialize};

/// The two mutually exclusive dashboard panels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum View {
    NewCase,
    History,
}

impl View {
    pub const ALL: [View; 2] = [View::NewCase, View::History];

    /// Id of the navigation link that activates this view.
    pub fn link_id(self) -> &'static str {
        match self {
            View::NewCase => "newCaseLink",
            View::History => "historyLink",
        }
    }

    pub fn from_link_id(link_id: &str) -> Option<View> {
        View::ALL.into_iter().find(|view| view.link_id() == link_id)
    }
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            View::NewCase => write!(f, "new case"),
            View::History => write!(f, "history"),
        }
    }
}
