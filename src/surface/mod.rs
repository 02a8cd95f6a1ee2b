pub mod console;
pub mod html;

pub use console::ConsoleSurface;
pub use html::{Document, HtmlSurface};

use crate::render::{ClassificationBlock, HistoryListing, InsightsBlock};
use crate::views::View;
use serde::{Deserialize, Serialize};

/// Display state of the form's submit control.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmitControl {
    pub enabled: bool,
    pub label: String,
}

/// Whatever the dashboard is painted on.
///
/// Every call is synchronous; painting never suspends. Paint calls replace the
/// target container's content wholesale.
pub trait Surface: Send + Sync {
    /// The view shown by the initial document, if any.
    fn visible_view(&self) -> Option<View>;

    fn set_view_visible(&self, view: View, visible: bool);

    /// Ids of every navigation link present in the document.
    fn nav_link_ids(&self) -> Vec<String>;

    /// Returns false when the link does not exist.
    fn set_link_active(&self, link_id: &str, active: bool) -> bool;

    fn set_submit_control(&self, control: &SubmitControl);

    fn paint_classification(&self, block: &ClassificationBlock);

    fn paint_insights(&self, block: &InsightsBlock);

    fn paint_history(&self, listing: &HistoryListing);

    /// Blocking user notification.
    fn alert(&self, message: &str);

    fn redirect(&self, path: &str);
}
