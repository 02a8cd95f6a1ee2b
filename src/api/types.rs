use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar the backend sends as either a string or a number. Shown verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum DisplayValue {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl fmt::Display for DisplayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayValue::Text(text) => f.write_str(text),
            DisplayValue::Number(number) => write!(f, "{}", number),
            DisplayValue::Flag(flag) => write!(f, "{}", flag),
        }
    }
}

impl From<&str> for DisplayValue {
    fn from(value: &str) -> Self {
        DisplayValue::Text(value.to_string())
    }
}

/// Response of `POST /api/analyze`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    #[serde(default)]
    pub id: Option<i64>,
    pub classification: Classification,
    pub analysis: Analysis,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Classification {
    pub primary: String,
    pub confidence: DisplayValue,
    #[serde(default)]
    pub secondary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Analysis {
    #[serde(default)]
    pub legal_opinion: Option<String>,
    #[serde(default)]
    pub similar_precedents: Option<Vec<Precedent>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Precedent {
    pub pdf_name: String,
    pub relevance: DisplayValue,
    pub summary: String,
}

/// One row of `GET /api/history/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    #[serde(default)]
    pub case_type: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// The case form as the page declares it. Field names are opaque here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaseForm {
    pub fields: Vec<FormField>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormField {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        content: Vec<u8>,
        mime: Option<String>,
    },
}

impl FormField {
    pub fn name(&self) -> &str {
        match self {
            FormField::Text { name, .. } | FormField::File { name, .. } => name,
        }
    }
}

impl CaseForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(FormField::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content: Vec<u8>,
    ) -> Self {
        self.fields.push(FormField::File {
            name: name.into(),
            file_name: file_name.into(),
            content,
            mime: None,
        });
        self
    }
}
