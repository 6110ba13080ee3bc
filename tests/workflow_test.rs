//! Integration tests for the analysis and relevance orchestrators
//!
//! The case service is mocked with wiremock. Validation failures mount a
//! mock with `expect(0)` to prove nothing was sent.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use legal_case_assistant::config::{RequestConfig, ServiceConfig};
use legal_case_assistant::error::WorkflowError;
use legal_case_assistant::expansion::{row_key, section_key};
use legal_case_assistant::metadata::{CaseMetadata, MetadataField};
use legal_case_assistant::service::{AnalysisResult, Bucket, CaseServiceClient};
use legal_case_assistant::staging::{DocumentSource, StagedDocument};
use legal_case_assistant::workflow::{
    AnalysisOrchestrator, CaseInputs, Phase, RelevanceOrchestrator, ANALYSIS_FAILED_MESSAGE,
    CRITERIA_REQUIRED_MESSAGE, NO_DOCUMENTS_FOR_RELEVANCE_MESSAGE, NO_DOCUMENTS_MESSAGE,
    RELEVANCE_FAILED_MESSAGE, SUMMARY_REQUIRED_MESSAGE,
};

fn create_test_client(base_url: &str) -> CaseServiceClient {
    CaseServiceClient::new(
        &ServiceConfig::with_base_url(base_url),
        RequestConfig { timeout_ms: 5000 },
    )
    .expect("Failed to create client")
}

async fn staged_inputs(overview: &str) -> CaseInputs {
    let inputs = CaseInputs::with_metadata(CaseMetadata::new(overview));
    inputs
        .add_documents(
            DocumentSource::Picker,
            vec![
                StagedDocument::from_bytes("a.pdf", b"aaa".to_vec()),
                StagedDocument::from_bytes("b.pdf", b"bbb".to_vec()),
            ],
        )
        .await;
    inputs
}

#[cfg(test)]
mod analysis_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_no_documents_sends_nothing() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let inputs = CaseInputs::with_metadata(CaseMetadata::new("Summary"));
        let orchestrator = AnalysisOrchestrator::new(create_test_client(&mock_server.uri()), inputs);

        let err = orchestrator.submit().await.unwrap_err();
        assert!(matches!(err, WorkflowError::Validation { .. }));
        assert_eq!(err.to_string(), NO_DOCUMENTS_MESSAGE);
        assert_eq!(orchestrator.error().await.as_deref(), Some(NO_DOCUMENTS_MESSAGE));
        assert_eq!(orchestrator.phase().await, Phase::Failed);
    }

    #[tokio::test]
    async fn test_blank_summary_sends_nothing() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let inputs = staged_inputs("   \n\t ").await;
        let orchestrator = AnalysisOrchestrator::new(create_test_client(&mock_server.uri()), inputs);

        let err = orchestrator.submit().await.unwrap_err();
        assert_eq!(err.to_string(), SUMMARY_REQUIRED_MESSAGE);
        assert_eq!(orchestrator.result().await, None);
    }

    #[tokio::test]
    async fn test_success_stores_result_and_keeps_inputs() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/analyze-case"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"analysis": "A", "issues": []})),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let inputs = staged_inputs("Lease dispute").await;
        inputs
            .set_field(MetadataField::NoteworthyTerms, "holdover")
            .await;
        let orchestrator =
            AnalysisOrchestrator::new(create_test_client(&mock_server.uri()), inputs.clone());

        let result = orchestrator.submit().await.unwrap();
        let expected = AnalysisResult {
            analysis: "A".to_string(),
            issues: vec![],
        };
        assert_eq!(result, expected);
        assert_eq!(orchestrator.result().await, Some(expected));
        assert_eq!(orchestrator.phase().await, Phase::Succeeded);
        assert_eq!(orchestrator.error().await, None);

        assert_eq!(inputs.document_count().await, 2);
        assert_eq!(
            inputs.metadata().read().await.get(MetadataField::NoteworthyTerms),
            "holdover"
        );
    }

    #[tokio::test]
    async fn test_server_error_is_status_coded() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/analyze-case"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&mock_server)
            .await;

        let inputs = staged_inputs("Lease dispute").await;
        let orchestrator = AnalysisOrchestrator::new(create_test_client(&mock_server.uri()), inputs);

        let err = orchestrator.submit().await.unwrap_err();
        assert_eq!(err.to_string(), "Error analyzing case (status 502).");
        assert_eq!(orchestrator.phase().await, Phase::Failed);
        assert!(!orchestrator.is_pending().await);
    }

    #[tokio::test]
    async fn test_transport_error_is_generic() {
        let inputs = staged_inputs("Lease dispute").await;
        let orchestrator =
            AnalysisOrchestrator::new(create_test_client("http://127.0.0.1:9"), inputs);

        let err = orchestrator.submit().await.unwrap_err();
        assert_eq!(err.to_string(), ANALYSIS_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_second_submit_while_pending_is_rejected() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/analyze-case"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"analysis": "A", "issues": []}))
                    .set_delay(Duration::from_millis(300)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let inputs = staged_inputs("Lease dispute").await;
        let orchestrator = AnalysisOrchestrator::new(create_test_client(&mock_server.uri()), inputs);

        let first = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.submit().await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(orchestrator.is_pending().await);

        let second = orchestrator.submit().await.unwrap_err();
        assert!(matches!(second, WorkflowError::Busy { .. }));

        assert!(first.await.unwrap().is_ok());
        assert_eq!(orchestrator.phase().await, Phase::Succeeded);
    }
}

#[cfg(test)]
mod relevance_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn relevance_body() -> serde_json::Value {
        json!({
            "highlyRelevant": [{"name": "a.pdf", "summary": "Key lease"}],
            "partiallyRelevant": [],
            "lessRelevant": [],
            "notRelevant": [{"name": "b.pdf", "summary": "Unrelated"}]
        })
    }

    #[tokio::test]
    async fn test_blank_criteria_checked_before_documents() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let orchestrator =
            RelevanceOrchestrator::new(create_test_client(&mock_server.uri()), CaseInputs::new());

        let err = orchestrator.check().await.unwrap_err();
        assert_eq!(err.to_string(), CRITERIA_REQUIRED_MESSAGE);
    }

    #[tokio::test]
    async fn test_no_documents_sends_nothing() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let inputs = CaseInputs::with_metadata(CaseMetadata::new("Lease dispute"));
        let orchestrator = RelevanceOrchestrator::new(create_test_client(&mock_server.uri()), inputs);

        let err = orchestrator.check().await.unwrap_err();
        assert_eq!(err.to_string(), NO_DOCUMENTS_FOR_RELEVANCE_MESSAGE);
        assert_eq!(
            orchestrator.error().await.as_deref(),
            Some(NO_DOCUMENTS_FOR_RELEVANCE_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_missing_failed_bucket_is_empty() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/relevance-check"))
            .respond_with(ResponseTemplate::new(200).set_body_json(relevance_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let inputs = staged_inputs("Lease dispute").await;
        let orchestrator = RelevanceOrchestrator::new(create_test_client(&mock_server.uri()), inputs);

        let result = orchestrator.check().await.unwrap();
        assert!(result.bucket(Bucket::Failed).is_empty());
        assert_eq!(result.bucket(Bucket::HighlyRelevant).len(), 1);
        assert_eq!(orchestrator.phase().await, Phase::Succeeded);
    }

    #[tokio::test]
    async fn test_error_body_is_shown() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/relevance-check"))
            .respond_with(ResponseTemplate::new(422).set_body_string("criteria too vague"))
            .mount(&mock_server)
            .await;

        let inputs = staged_inputs("Lease dispute").await;
        let orchestrator = RelevanceOrchestrator::new(create_test_client(&mock_server.uri()), inputs);

        let err = orchestrator.check().await.unwrap_err();
        assert_eq!(err.to_string(), "criteria too vague");
    }

    #[tokio::test]
    async fn test_empty_error_body_is_status_coded() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/relevance-check"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let inputs = staged_inputs("Lease dispute").await;
        let orchestrator = RelevanceOrchestrator::new(create_test_client(&mock_server.uri()), inputs);

        let err = orchestrator.check().await.unwrap_err();
        assert_eq!(err.to_string(), "Error getting relevance (status 503).");
    }

    #[tokio::test]
    async fn test_transport_error_is_generic() {
        let inputs = staged_inputs("Lease dispute").await;
        let orchestrator =
            RelevanceOrchestrator::new(create_test_client("http://127.0.0.1:9"), inputs);

        let err = orchestrator.check().await.unwrap_err();
        assert_eq!(err.to_string(), RELEVANCE_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn test_new_run_closes_sections() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/relevance-check"))
            .respond_with(ResponseTemplate::new(200).set_body_json(relevance_body()))
            .expect(2)
            .mount(&mock_server)
            .await;

        let inputs = staged_inputs("Lease dispute").await;
        let orchestrator = RelevanceOrchestrator::new(create_test_client(&mock_server.uri()), inputs);

        orchestrator.check().await.unwrap();
        assert!(orchestrator.toggle_bucket(Bucket::HighlyRelevant).await);
        assert_eq!(orchestrator.toggle_row(Bucket::HighlyRelevant, 0).await, Some(true));
        assert_eq!(orchestrator.toggle_row(Bucket::HighlyRelevant, 5).await, None);
        assert!(
            orchestrator
                .is_open(&row_key("Highly Relevant", "a.pdf", 0))
                .await
        );

        orchestrator.check().await.unwrap();
        assert!(!orchestrator.is_open(&section_key("Highly Relevant")).await);
        assert!(orchestrator.expansion().await.is_empty());
    }

    #[tokio::test]
    async fn test_analysis_and_relevance_run_concurrently() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/analyze-case"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"analysis": "A", "issues": []}))
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/relevance-check"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(relevance_body())
                    .set_delay(Duration::from_millis(200)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = create_test_client(&mock_server.uri());
        let inputs = staged_inputs("Lease dispute").await;
        let analysis = AnalysisOrchestrator::new(client.clone(), inputs.clone());
        let relevance = RelevanceOrchestrator::new(client, inputs);

        let (a, r) = tokio::join!(analysis.submit(), relevance.check());
        assert!(a.is_ok());
        assert!(r.is_ok());
        assert_eq!(analysis.phase().await, Phase::Succeeded);
        assert_eq!(relevance.phase().await, Phase::Succeeded);
    }
}
