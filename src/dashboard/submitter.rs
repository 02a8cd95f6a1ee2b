use crate::api::{CaseForm, DashboardApi};
use crate::config::SubmitLabels;
use crate::error::FetchError;
use crate::render::{analysis_view, AnalysisView, ANALYSIS_FAILED_MESSAGE};
use crate::session::SessionStore;
use crate::surface::{SubmitControl, Surface};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug)]
pub enum SubmitOutcome {
    Rendered(AnalysisView),
    Failed(FetchError),
    /// The control was disabled; nothing was sent.
    Ignored,
}

pub struct AnalysisSubmitter {
    api: Arc<dyn DashboardApi>,
    session: Arc<dyn SessionStore>,
    surface: Arc<dyn Surface>,
    labels: SubmitLabels,
    in_flight: AtomicBool,
}

/// Re-enables the submit control when dropped, so every exit path of a
/// submission (including a cancelled future) restores it exactly once.
struct ControlGuard<'a> {
    surface: &'a dyn Surface,
    idle_label: &'a str,
    in_flight: &'a AtomicBool,
}

impl Drop for ControlGuard<'_> {
    fn drop(&mut self) {
        self.surface.set_submit_control(&SubmitControl {
            enabled: true,
            label: self.idle_label.to_string(),
        });
        self.in_flight.store(false, Ordering::SeqCst);
    }
}

impl AnalysisSubmitter {
    pub fn new(
        api: Arc<dyn DashboardApi>,
        session: Arc<dyn SessionStore>,
        surface: Arc<dyn Surface>,
        labels: SubmitLabels,
    ) -> Self {
        Self {
            api,
            session,
            surface,
            labels,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub async fn submit(&self, form: &CaseForm) -> SubmitOutcome {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            tracing::debug!("Submit ignored: analysis already in flight");
            return SubmitOutcome::Ignored;
        }

        self.surface.set_submit_control(&SubmitControl {
            enabled: false,
            label: self.labels.busy.clone(),
        });
        let _guard = ControlGuard {
            surface: self.surface.as_ref(),
            idle_label: &self.labels.idle,
            in_flight: &self.in_flight,
        };

        let attempt = Uuid::new_v4();
        tracing::info!(%attempt, fields = form.fields.len(), "Submitting case for analysis");

        let token = match self.session.get() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(%attempt, "Could not read session token: {}", e);
                None
            }
        };

        match self.api.analyze(token.as_deref(), form).await {
            Ok(result) => {
                let view = analysis_view(&result);
                self.surface.paint_classification(&view.classification);
                self.surface.paint_insights(&view.insights);
                tracing::info!(
                    %attempt,
                    primary = %view.classification.primary,
                    precedents = view.insights.precedents.len(),
                    "Analysis rendered"
                );
                SubmitOutcome::Rendered(view)
            }
            Err(e) => {
                tracing::error!(%attempt, kind = e.kind(), "Analysis failed: {}", e);
                self.surface.alert(ANALYSIS_FAILED_MESSAGE);
                SubmitOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::html::{CLASSIFICATION_CONTAINER, INSIGHTS_CONTAINER};
    use crate::session::InMemorySessionStore;
    use crate::surface::{Document, HtmlSurface};
    use crate::test_helpers::mocks::{analysis_result, precedent, MockDashboardApi, MockFailure};

    struct Fixture {
        api: Arc<MockDashboardApi>,
        surface: Arc<HtmlSurface>,
        submitter: Arc<AnalysisSubmitter>,
    }

    fn fixture() -> Fixture {
        let api = Arc::new(MockDashboardApi::new());
        let surface = Arc::new(HtmlSurface::new(Document::dashboard()));
        let session = Arc::new(InMemorySessionStore::with_token("token", "tok-1"));
        let submitter = Arc::new(AnalysisSubmitter::new(
            api.clone(),
            session,
            surface.clone(),
            SubmitLabels::default(),
        ));
        Fixture {
            api,
            surface,
            submitter,
        }
    }

    fn form() -> CaseForm {
        CaseForm::new().text("description", "Cheque dishonoured twice")
    }

    fn enabled_changes(surface: &HtmlSurface) -> usize {
        surface
            .snapshot()
            .submit_changes()
            .iter()
            .filter(|c| c.enabled)
            .count()
    }

    #[tokio::test]
    async fn test_success_renders_and_restores_control() {
        let f = fixture();
        f.api.push_analysis(Ok(analysis_result(
            Some("Fraud"),
            Some(vec![precedent("a.pdf", "High", "one"), precedent("b.pdf", "Low", "two")]),
        )));

        let outcome = f.submitter.submit(&form()).await;

        assert!(matches!(outcome, SubmitOutcome::Rendered(_)));
        let doc = f.surface.snapshot();
        let classification = doc.container(CLASSIFICATION_CONTAINER).unwrap();
        assert!(classification.contains("Cheque Bounce"));
        assert_eq!(classification.matches("Secondary: Fraud").count(), 1);
        let insights = doc.container(INSIGHTS_CONTAINER).unwrap();
        assert_eq!(insights.matches(r#"class="precedent""#).count(), 2);

        assert_eq!(
            doc.submit_changes(),
            &[
                SubmitControl {
                    enabled: false,
                    label: "Analyzing...".into()
                },
                SubmitControl {
                    enabled: true,
                    label: "Analyze Case".into()
                },
            ]
        );
        assert!(doc.alerts().is_empty());
        assert_eq!(f.api.tokens_seen(), vec![Some("tok-1".to_string())]);
    }

    #[tokio::test]
    async fn test_failure_alerts_and_restores_control() {
        let f = fixture();
        f.api.push_analysis(Err(MockFailure::Parse));

        let outcome = f.submitter.submit(&form()).await;

        assert!(matches!(outcome, SubmitOutcome::Failed(FetchError::Parse(_))));
        let doc = f.surface.snapshot();
        assert_eq!(doc.alerts(), &["Analysis failed".to_string()]);
        assert_eq!(doc.container(CLASSIFICATION_CONTAINER), Some(""));
        assert_eq!(enabled_changes(&f.surface), 1);
        assert!(doc.submit().enabled);
        assert_eq!(doc.submit().label, "Analyze Case");
    }

    #[tokio::test]
    async fn test_status_failure_is_treated_the_same() {
        let f = fixture();
        f.api.push_analysis(Err(MockFailure::Status(401)));

        let outcome = f.submitter.submit(&form()).await;

        assert!(matches!(outcome, SubmitOutcome::Failed(FetchError::Status(_))));
        assert_eq!(f.surface.snapshot().alerts().len(), 1);
        assert!(!f.submitter.is_in_flight());
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_ignored() {
        let f = fixture();
        let release = f.api.push_analysis_gated(Ok(analysis_result(None, None)));

        let submitter = f.submitter.clone();
        let first = tokio::spawn(async move { submitter.submit(&form()).await });

        while !f.submitter.is_in_flight() {
            tokio::task::yield_now().await;
        }
        let doc = f.surface.snapshot();
        assert!(!doc.submit().enabled);
        assert_eq!(doc.submit().label, "Analyzing...");

        let second = f.submitter.submit(&form()).await;
        assert!(matches!(second, SubmitOutcome::Ignored));

        release.send(()).unwrap();
        let first = first.await.unwrap();
        assert!(matches!(first, SubmitOutcome::Rendered(_)));

        assert_eq!(f.api.analyze_calls(), 1);
        assert_eq!(enabled_changes(&f.surface), 1);
        assert!(f.surface.snapshot().submit().enabled);
    }

    #[tokio::test]
    async fn test_each_attempt_reenables_once() {
        let f = fixture();
        f.api.push_analysis(Ok(analysis_result(None, None)));
        f.api.push_analysis(Err(MockFailure::Status(502)));
        f.api.push_analysis(Ok(analysis_result(None, None)));

        for _ in 0..3 {
            f.submitter.submit(&form()).await;
        }

        assert_eq!(f.api.analyze_calls(), 3);
        assert_eq!(enabled_changes(&f.surface), 3);
        assert_eq!(f.surface.snapshot().submit_changes().len(), 6);
    }

    #[tokio::test]
    async fn test_cancelled_submit_still_restores_control() {
        let f = fixture();
        let _release = f.api.push_analysis_gated(Ok(analysis_result(None, None)));

        let submitter = f.submitter.clone();
        let task = tokio::spawn(async move { submitter.submit(&form()).await });
        while !f.submitter.is_in_flight() {
            tokio::task::yield_now().await;
        }

        task.abort();
        let _ = task.await;

        assert!(!f.submitter.is_in_flight());
        assert!(f.surface.snapshot().submit().enabled);
    }

    #[tokio::test]
    async fn test_form_is_forwarded_untouched() {
        let f = fixture();
        f.api.push_analysis(Ok(analysis_result(None, None)));
        let form = CaseForm::new()
            .text("description", "x")
            .file("files", "a.pdf", vec![1, 2, 3])
            .text("anything_the_page_adds", "y");

        f.submitter.submit(&form).await;

        assert_eq!(f.api.forms_seen(), vec![form]);
    }
}
