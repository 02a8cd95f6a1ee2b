use super::model::*;

pub const CLASSIFICATION_CONTAINER: &str = "classificationResult";
pub const INSIGHTS_CONTAINER: &str = "insightsResult";
pub const HISTORY_CONTAINER: &str = "historyList";

pub fn classification_html(block: &ClassificationBlock) -> String {
    let mut html = format!(
        r#"<div style="font-size:1.3rem;color:#3b82f6;font-weight:bold;">{}</div><div style="color:#94a3b8;margin-top:4px;">Confidence: {}</div>"#,
        html_escape(&block.primary),
        html_escape(&block.confidence),
    );

    if let Some(secondary) = &block.secondary {
        html.push_str(&format!(
            r#"<div style="margin-top:6px;font-size:0.85rem;color:#facc15;">Secondary: {}</div>"#,
            html_escape(secondary)
        ));
    }

    html
}

pub fn insights_html(block: &InsightsBlock) -> String {
    let mut html = format!(
        r#"<h4 style="margin-bottom:8px;">Legal Opinion</h4><p style="line-height:1.6;">{}</p>"#,
        html_escape(&block.legal_opinion)
    );

    if block.has_precedents() {
        html.push_str(r#"<h4 style="margin-top:16px;">Similar Precedents</h4>"#);

        for precedent in &block.precedents {
            html.push_str(&format!(
                concat!(
                    r#"<div class="precedent" style="margin-top:10px;padding:10px;border:1px solid rgba(255,255,255,0.1);border-radius:6px;">"#,
                    r#"<div style="color:#3b82f6;font-weight:600;">{}</div>"#,
                    r#"<div style="font-size:0.8rem;color:#94a3b8;">{}</div>"#,
                    r#"<div style="margin-top:6px;font-size:0.9rem;">{}</div>"#,
                    "</div>"
                ),
                html_escape(&precedent.pdf_name),
                html_escape(&precedent.relevance),
                html_escape(&precedent.summary),
            ));
        }
    }

    html
}

pub fn history_html(listing: &HistoryListing) -> String {
    match listing {
        HistoryListing::Entries(panels) => panels
            .iter()
            .map(|panel| {
                format!(
                    concat!(
                        r#"<div class="glass-panel" style="padding:1rem;">"#,
                        r#"<div style="color:#3b82f6;font-weight:600;">{}</div>"#,
                        r#"<div style="font-size:0.8rem;color:#94a3b8;">{}</div>"#,
                        r#"<div style="margin-top:6px;">{}</div>"#,
                        "</div>"
                    ),
                    html_escape(&panel.case_type),
                    html_escape(&panel.date),
                    html_escape(&panel.description),
                )
            })
            .collect(),
        other => other.message().unwrap_or_default().to_string(),
    }
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(secondary: Option<&str>) -> ClassificationBlock {
        ClassificationBlock {
            primary: "Cheque Bounce".into(),
            confidence: "87%".into(),
            secondary: secondary.map(Into::into),
        }
    }

    #[test]
    fn test_secondary_line_only_when_present() {
        assert!(!classification_html(&block(None)).contains("Secondary:"));

        let html = classification_html(&block(Some("Fraud")));
        assert_eq!(html.matches("Secondary: Fraud").count(), 1);
        assert!(html.contains("Confidence: 87%"));
    }

    #[test]
    fn test_precedent_panels() {
        let without = InsightsBlock {
            legal_opinion: "Opinion".into(),
            precedents: vec![],
        };
        let html = insights_html(&without);
        assert!(html.contains("Legal Opinion"));
        assert!(!html.contains("Similar Precedents"));

        let with = InsightsBlock {
            legal_opinion: "Opinion".into(),
            precedents: vec![
                PrecedentPanel {
                    pdf_name: "a.pdf".into(),
                    relevance: "High".into(),
                    summary: "first".into(),
                },
                PrecedentPanel {
                    pdf_name: "b.pdf".into(),
                    relevance: "Low".into(),
                    summary: "second".into(),
                },
            ],
        };
        let html = insights_html(&with);
        assert_eq!(html.matches(r#"class="precedent""#).count(), 2);
        assert!(html.find("a.pdf").unwrap() < html.find("b.pdf").unwrap());
    }

    #[test]
    fn test_history_placeholders() {
        assert_eq!(history_html(&HistoryListing::Empty), "No history found");
        assert_eq!(history_html(&HistoryListing::Failed), "Failed to load history");
    }

    #[test]
    fn test_interpolated_text_is_escaped() {
        let html = history_html(&HistoryListing::Entries(vec![HistoryPanel {
            case_type: "<script>alert(1)</script>".into(),
            date: "01/10/2025".into(),
            description: "Tom & Jerry's \"dispute\"".into(),
        }]));

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Tom &amp; Jerry&#39;s &quot;dispute&quot;"));
    }
}
