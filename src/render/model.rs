use super::date::format_date;
use crate::api::{AnalysisResult, HistoryEntry};
use crate::error::FetchError;
use serde::Serialize;

pub const NO_HISTORY_MESSAGE: &str = "No history found";
pub const HISTORY_FAILED_MESSAGE: &str = "Failed to load history";
pub const ANALYSIS_FAILED_MESSAGE: &str = "Analysis failed";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AnalysisView {
    pub classification: ClassificationBlock,
    pub insights: InsightsBlock,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ClassificationBlock {
    pub primary: String,
    pub confidence: String,
    /// Only set when the backend sent a non-empty value.
    pub secondary: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InsightsBlock {
    pub legal_opinion: String,
    /// Empty means the precedents section is left out entirely.
    pub precedents: Vec<PrecedentPanel>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PrecedentPanel {
    pub pdf_name: String,
    pub relevance: String,
    pub summary: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum HistoryListing {
    Empty,
    Failed,
    Entries(Vec<HistoryPanel>),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HistoryPanel {
    pub case_type: String,
    pub date: String,
    pub description: String,
}

impl InsightsBlock {
    pub fn has_precedents(&self) -> bool {
        !self.precedents.is_empty()
    }
}

impl HistoryListing {
    /// Placeholder text for the non-list states.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            HistoryListing::Empty => Some(NO_HISTORY_MESSAGE),
            HistoryListing::Failed => Some(HISTORY_FAILED_MESSAGE),
            HistoryListing::Entries(_) => None,
        }
    }
}

pub fn analysis_view(result: &AnalysisResult) -> AnalysisView {
    let classification = &result.classification;
    let secondary = classification
        .secondary
        .as_ref()
        .filter(|s| !s.is_empty())
        .cloned();

    let precedents = result
        .analysis
        .similar_precedents
        .iter()
        .flatten()
        .map(|p| PrecedentPanel {
            pdf_name: p.pdf_name.clone(),
            relevance: p.relevance.to_string(),
            summary: p.summary.clone(),
        })
        .collect();

    AnalysisView {
        classification: ClassificationBlock {
            primary: classification.primary.clone(),
            confidence: classification.confidence.to_string(),
            secondary,
        },
        insights: InsightsBlock {
            legal_opinion: result.analysis.legal_opinion.clone().unwrap_or_default(),
            precedents,
        },
    }
}

pub fn history_listing(
    result: Result<Vec<HistoryEntry>, FetchError>,
    date_format: &str,
) -> HistoryListing {
    match result {
        Ok(entries) if entries.is_empty() => HistoryListing::Empty,
        Ok(entries) => HistoryListing::Entries(
            entries
                .into_iter()
                .map(|entry| HistoryPanel {
                    date: format_date(&entry.created_at, date_format),
                    case_type: entry.case_type.unwrap_or_default(),
                    description: entry.description.unwrap_or_default(),
                })
                .collect(),
        ),
        Err(e) => {
            tracing::warn!("History load failed ({}): {}", e.kind(), e);
            HistoryListing::Failed
        }
    }
}
