use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

use super::types::{AnalysisResult, AskReply, AskRequest, RelevanceResult};
use crate::config::{RequestConfig, ServiceConfig};
use crate::error::{ServiceError, ServiceResult};
use crate::metadata::CaseMetadata;
use crate::staging::StagedDocument;

/// Client for the remote case analysis service
#[derive(Clone)]
pub struct CaseServiceClient {
    client: Client,
    base_url: String,
    analyze_path: String,
    relevance_path: String,
    ask_path: String,
    request_config: RequestConfig,
}

impl CaseServiceClient {
    /// Create a new case service client
    pub fn new(config: &ServiceConfig, request_config: RequestConfig) -> ServiceResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(request_config.timeout_ms))
            .build()
            .map_err(ServiceError::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            analyze_path: config.analyze_path.clone(),
            relevance_path: config.relevance_path.clone(),
            ask_path: config.ask_path.clone(),
            request_config,
        })
    }

    /// Submit documents and case metadata for analysis.
    ///
    /// Sends one multipart request: a `files` part per document followed by
    /// the `metadata` text part.
    pub async fn analyze_case(
        &self,
        documents: &[StagedDocument],
        metadata: &CaseMetadata,
    ) -> ServiceResult<AnalysisResult> {
        let url = self.url(&self.analyze_path);

        let mut form = Form::new();
        for part in file_parts(documents).await? {
            form = form.part("files", part);
        }
        form = form.text("metadata", metadata.to_blob());

        debug!(documents = documents.len(), "Submitting case for analysis");

        let start = Instant::now();
        let response = self.send(self.client.post(&url).multipart(form)).await?;
        let result: AnalysisResult = self.decode(response, "analyze-case").await?;

        info!(
            issues = result.issues.len(),
            latency_ms = start.elapsed().as_millis(),
            "Case analysis response received"
        );

        Ok(result)
    }

    /// Submit documents for five-bucket relevance classification
    pub async fn check_relevance(
        &self,
        criteria: &str,
        metadata: &CaseMetadata,
        documents: &[StagedDocument],
    ) -> ServiceResult<RelevanceResult> {
        let url = self.url(&self.relevance_path);

        let mut form = Form::new()
            .text("criteria", criteria.to_string())
            .text("metadata", metadata.to_blob());
        for part in file_parts(documents).await? {
            form = form.part("files", part);
        }

        debug!(documents = documents.len(), "Submitting documents for relevance check");

        let start = Instant::now();
        let response = self.send(self.client.post(&url).multipart(form)).await?;
        let result: RelevanceResult = self.decode(response, "relevance-check").await?;

        info!(
            classified = result.total(),
            latency_ms = start.elapsed().as_millis(),
            "Relevance response received"
        );

        Ok(result)
    }

    /// Ask a question about the uploaded material
    pub async fn ask(&self, request: &AskRequest) -> ServiceResult<AskReply> {
        let url = self.url(&self.ask_path);

        debug!(history = request.history.len(), "Sending question");

        let start = Instant::now();
        let response = self
            .send(
                self.client
                    .post(&url)
                    .header("Content-Type", "application/json")
                    .json(request),
            )
            .await?;
        let reply: AskReply = self.decode(response, "ask").await?;

        info!(latency_ms = start.elapsed().as_millis(), "Answer received");

        Ok(reply)
    }

    /// Get the base URL (for testing)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> ServiceResult<Response> {
        request.send().await.map_err(|e| {
            error!(error = %e, "Case service request failed");
            if e.is_timeout() {
                ServiceError::Timeout {
                    timeout_ms: self.request_config.timeout_ms,
                }
            } else {
                ServiceError::Http(e)
            }
        })
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        response: Response,
        endpoint: &str,
    ) -> ServiceResult<T> {
        let status = response.status();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(
                endpoint = endpoint,
                status = status.as_u16(),
                body = %error_body,
                "Case service returned an error"
            );
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message: error_body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ServiceError::InvalidResponse {
                message: format!("Failed to parse {} response: {}", endpoint, e),
            })
    }
}

/// Load every document into a multipart file part
async fn file_parts(documents: &[StagedDocument]) -> ServiceResult<Vec<Part>> {
    let mut parts = Vec::with_capacity(documents.len());
    for doc in documents {
        let bytes = doc
            .content
            .read()
            .await
            .map_err(|e| ServiceError::Document {
                name: doc.name.clone(),
                message: e.to_string(),
            })?;
        parts.push(Part::bytes(bytes).file_name(doc.name.clone()));
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let config = ServiceConfig::default();
        let client = CaseServiceClient::new(&config, RequestConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = ServiceConfig::with_base_url("http://localhost:8001/");
        let client = CaseServiceClient::new(&config, RequestConfig::default()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8001");
        assert_eq!(client.url("/api/ask"), "http://localhost:8001/api/ask");
        assert_eq!(client.url("api/ask"), "http://localhost:8001/api/ask");
    }

    #[tokio::test]
    async fn test_file_parts_reports_unreadable_document() {
        let doc = StagedDocument::new(
            "missing.pdf",
            1,
            crate::staging::DocumentContent::File("/nonexistent/missing.pdf".into()),
        );
        let err = file_parts(&[doc]).await.unwrap_err();
        assert!(matches!(err, ServiceError::Document { ref name, .. } if name == "missing.pdf"));
    }
}
