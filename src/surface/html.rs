use super::{Surface, SubmitControl};
use crate::render::html::{
    classification_html, history_html, insights_html, CLASSIFICATION_CONTAINER,
    HISTORY_CONTAINER, INSIGHTS_CONTAINER,
};
use crate::render::{ClassificationBlock, HistoryListing, InsightsBlock};
use crate::views::View;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// In-memory model of the dashboard page: panel visibility, nav links,
/// result containers holding their inner HTML, the submit button, alerts and
/// the current location.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    location: String,
    displayed: BTreeMap<View, bool>,
    links: BTreeMap<String, bool>,
    containers: BTreeMap<String, String>,
    submit: SubmitControl,
    submit_changes: Vec<SubmitControl>,
    alerts: Vec<String>,
}

impl Document {
    /// The dashboard page as served: New Case visible and active.
    pub fn dashboard() -> Self {
        let displayed = View::ALL
            .into_iter()
            .map(|view| (view, view == View::NewCase))
            .collect();
        let links = View::ALL
            .into_iter()
            .map(|view| (view.link_id().to_string(), view == View::NewCase))
            .collect();
        let containers = [CLASSIFICATION_CONTAINER, INSIGHTS_CONTAINER, HISTORY_CONTAINER]
            .into_iter()
            .map(|id| (id.to_string(), String::new()))
            .collect();

        Self {
            location: "/dashboard".to_string(),
            displayed,
            links,
            containers,
            submit: SubmitControl {
                enabled: true,
                label: "Analyze Case".to_string(),
            },
            submit_changes: Vec::new(),
            alerts: Vec::new(),
        }
    }

    pub fn at(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn showing(mut self, view: View) -> Self {
        for (v, shown) in self.displayed.iter_mut() {
            *shown = *v == view;
        }
        self
    }

    pub fn without_link(mut self, link_id: &str) -> Self {
        self.links.remove(link_id);
        self
    }

    pub fn with_link(mut self, link_id: impl Into<String>, active: bool) -> Self {
        self.links.insert(link_id.into(), active);
        self
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn is_displayed(&self, view: View) -> bool {
        self.displayed.get(&view).copied().unwrap_or(false)
    }

    pub fn active_links(&self) -> Vec<String> {
        self.links
            .iter()
            .filter(|(_, active)| **active)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn container(&self, id: &str) -> Option<&str> {
        self.containers.get(id).map(String::as_str)
    }

    pub fn submit(&self) -> &SubmitControl {
        &self.submit
    }

    /// Every state the submit control has been put in, oldest first.
    pub fn submit_changes(&self) -> &[SubmitControl] {
        &self.submit_changes
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    fn set_container(&mut self, id: &str, html: String) {
        self.containers.insert(id.to_string(), html);
    }
}

pub struct HtmlSurface {
    document: Mutex<Document>,
}

impl HtmlSurface {
    pub fn new(document: Document) -> Self {
        Self {
            document: Mutex::new(document),
        }
    }

    pub fn snapshot(&self) -> Document {
        self.document().clone()
    }

    fn document(&self) -> MutexGuard<'_, Document> {
        self.document
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Surface for HtmlSurface {
    fn visible_view(&self) -> Option<View> {
        let doc = self.document();
        View::ALL.into_iter().find(|view| doc.is_displayed(*view))
    }

    fn set_view_visible(&self, view: View, visible: bool) {
        self.document().displayed.insert(view, visible);
    }

    fn nav_link_ids(&self) -> Vec<String> {
        self.document().links.keys().cloned().collect()
    }

    fn set_link_active(&self, link_id: &str, active: bool) -> bool {
        match self.document().links.get_mut(link_id) {
            Some(flag) => {
                *flag = active;
                true
            }
            None => false,
        }
    }

    fn set_submit_control(&self, control: &SubmitControl) {
        let mut doc = self.document();
        doc.submit = control.clone();
        doc.submit_changes.push(control.clone());
    }

    fn paint_classification(&self, block: &ClassificationBlock) {
        self.document()
            .set_container(CLASSIFICATION_CONTAINER, classification_html(block));
    }

    fn paint_insights(&self, block: &InsightsBlock) {
        self.document()
            .set_container(INSIGHTS_CONTAINER, insights_html(block));
    }

    fn paint_history(&self, listing: &HistoryListing) {
        self.document()
            .set_container(HISTORY_CONTAINER, history_html(listing));
    }

    fn alert(&self, message: &str) {
        self.document().alerts.push(message.to_string());
    }

    fn redirect(&self, path: &str) {
        self.document().location = path.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_document_initial_state() {
        let surface = HtmlSurface::new(Document::dashboard());

        assert_eq!(surface.visible_view(), Some(View::NewCase));
        assert_eq!(surface.snapshot().active_links(), vec!["newCaseLink".to_string()]);
        assert_eq!(surface.snapshot().container(HISTORY_CONTAINER), Some(""));
        assert!(surface.snapshot().submit().enabled);
    }

    #[test]
    fn test_paint_replaces_container_wholesale() {
        let surface = HtmlSurface::new(Document::dashboard());

        surface.paint_history(&HistoryListing::Failed);
        surface.paint_history(&HistoryListing::Empty);

        assert_eq!(
            surface.snapshot().container(HISTORY_CONTAINER),
            Some("No history found")
        );
    }

    #[test]
    fn test_unknown_link_reports_missing() {
        let surface = HtmlSurface::new(Document::dashboard());
        assert!(!surface.set_link_active("reportsLink", true));
        assert!(surface.set_link_active("historyLink", true));
    }

    #[test]
    fn test_redirect_moves_location() {
        let surface = HtmlSurface::new(Document::dashboard());
        surface.redirect("/login");
        assert_eq!(surface.snapshot().location(), "/login");
    }
}
