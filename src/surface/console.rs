use super::{Surface, SubmitControl};
use crate::render::{ClassificationBlock, HistoryListing, InsightsBlock};
use crate::views::View;
use std::collections::BTreeSet;
use std::io::Write;
use std::sync::{Mutex, MutexGuard};

/// Plain-text surface for terminals.
pub struct ConsoleSurface<W: Write + Send> {
    state: Mutex<ConsoleState<W>>,
}

struct ConsoleState<W> {
    out: W,
    visible: BTreeSet<View>,
    active_link: Option<String>,
    location: String,
}

impl ConsoleSurface<std::io::Stdout> {
    pub fn stdout(location: impl Into<String>) -> Self {
        Self::new(std::io::stdout(), location)
    }
}

impl<W: Write + Send> ConsoleSurface<W> {
    pub fn new(out: W, location: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(ConsoleState {
                out,
                visible: BTreeSet::from([View::NewCase]),
                active_link: Some(View::NewCase.link_id().to_string()),
                location: location.into(),
            }),
        }
    }

    pub fn location(&self) -> String {
        self.state().location.clone()
    }

    pub fn into_inner(self) -> W {
        self.state
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .out
    }

    fn state(&self) -> MutexGuard<'_, ConsoleState<W>> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn print(&self, text: &str) {
        let mut state = self.state();
        if let Err(e) = writeln!(state.out, "{}", text).and_then(|_| state.out.flush()) {
            tracing::warn!("Console write failed: {}", e);
        }
    }
}

impl<W: Write + Send> Surface for ConsoleSurface<W> {
    fn visible_view(&self) -> Option<View> {
        self.state().visible.iter().next().copied()
    }

    fn set_view_visible(&self, view: View, visible: bool) {
        let changed = {
            let mut state = self.state();
            if visible {
                state.visible.insert(view)
            } else {
                state.visible.remove(&view);
                false
            }
        };
        if changed {
            self.print(&format!("== {} ==", view.to_string().to_uppercase()));
        }
    }

    fn nav_link_ids(&self) -> Vec<String> {
        View::ALL.iter().map(|v| v.link_id().to_string()).collect()
    }

    fn set_link_active(&self, link_id: &str, active: bool) -> bool {
        if View::from_link_id(link_id).is_none() {
            return false;
        }
        let mut state = self.state();
        if active {
            state.active_link = Some(link_id.to_string());
        } else if state.active_link.as_deref() == Some(link_id) {
            state.active_link = None;
        }
        true
    }

    fn set_submit_control(&self, control: &SubmitControl) {
        if !control.enabled {
            self.print(&format!("[{}]", control.label));
        }
    }

    fn paint_classification(&self, block: &ClassificationBlock) {
        let mut text = format!("Classification: {}\nConfidence: {}", block.primary, block.confidence);
        if let Some(secondary) = &block.secondary {
            text.push_str(&format!("\nSecondary: {}", secondary));
        }
        self.print(&text);
    }

    fn paint_insights(&self, block: &InsightsBlock) {
        let mut text = format!("Legal Opinion\n  {}", block.legal_opinion);
        if block.has_precedents() {
            text.push_str("\nSimilar Precedents");
            for precedent in &block.precedents {
                text.push_str(&format!(
                    "\n  - {} ({})\n    {}",
                    precedent.pdf_name, precedent.relevance, precedent.summary
                ));
            }
        }
        self.print(&text);
    }

    fn paint_history(&self, listing: &HistoryListing) {
        let text = match listing {
            HistoryListing::Entries(panels) => panels
                .iter()
                .map(|p| format!("* {}  {}\n  {}", p.case_type, p.date, p.description))
                .collect::<Vec<_>>()
                .join("\n"),
            other => other.message().unwrap_or_default().to_string(),
        };
        self.print(&text);
    }

    fn alert(&self, message: &str) {
        self.print(&format!("!! {}", message));
    }

    fn redirect(&self, path: &str) {
        self.state().location = path.to_string();
        self.print(&format!("-> redirected to {}", path));
    }
}
