use super::types::*;
use crate::config::DashboardConfig;
use crate::error::FetchError;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// The two backend calls the dashboard makes.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    async fn analyze(
        &self,
        token: Option<&str>,
        form: &CaseForm,
    ) -> Result<AnalysisResult, FetchError>;

    async fn history(&self, token: Option<&str>) -> Result<Vec<HistoryEntry>, FetchError>;
}

pub struct HttpDashboardApi {
    client: Client,
    analyze_url: String,
    history_url: String,
}

impl HttpDashboardApi {
    pub fn new(config: &DashboardConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            analyze_url: config.analyze_url(),
            history_url: config.history_url(),
        })
    }

    fn authorize(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn multipart(form: &CaseForm) -> Result<Form, FetchError> {
        let mut multipart = Form::new();
        for field in &form.fields {
            multipart = match field {
                FormField::Text { name, value } => multipart.text(name.clone(), value.clone()),
                FormField::File {
                    name,
                    file_name,
                    content,
                    mime,
                } => {
                    let mut part = Part::bytes(content.clone()).file_name(file_name.clone());
                    if let Some(mime) = mime {
                        part = part
                            .mime_str(mime)
                            .map_err(|e| FetchError::Payload(format!("{}: {}", file_name, e)))?;
                    }
                    multipart.part(name.clone(), part)
                }
            };
        }
        Ok(multipart)
    }

    async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, FetchError> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardApi {
    async fn analyze(
        &self,
        token: Option<&str>,
        form: &CaseForm,
    ) -> Result<AnalysisResult, FetchError> {
        let multipart = Self::multipart(form)?;
        tracing::debug!(
            "POST {} with {} form field(s)",
            self.analyze_url,
            form.fields.len()
        );

        let request = Self::authorize(self.client.post(&self.analyze_url), token);
        Self::send_json(request.multipart(multipart)).await
    }

    async fn history(&self, token: Option<&str>) -> Result<Vec<HistoryEntry>, FetchError> {
        tracing::debug!("GET {}", self.history_url);

        let request = Self::authorize(self.client.get(&self.history_url), token);
        Self::send_json(request).await
    }
}
