use std::{env, sync::Arc, time::Duration};

use notes_summarizer::{
    config::{DEFAULT_GEMINI_BASE_URL, DEFAULT_SUMMARY_MODELS},
    summarization::{
        GeminiClient, LengthClass, SummarizationEngine, SummaryRequest, SummaryStyle,
    },
};

fn live_client() -> GeminiClient {
    dotenvy::dotenv().ok();
    let api_key = env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY must be set for live tests");
    let base_url =
        env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string());
    GeminiClient::new(base_url, api_key, Duration::from_secs(60)).expect("client")
}

#[tokio::test]
#[ignore = "Requires a live Gemini API key"]
async fn live_model_catalog_is_not_empty() {
    let engine = SummarizationEngine::new(
        Arc::new(live_client()),
        DEFAULT_SUMMARY_MODELS.into_iter().collect(),
        Duration::from_secs(60),
    );
    let models = engine.list_models().await.expect("model listing");
    assert!(!models.is_empty(), "provider advertised no models");
}

#[tokio::test]
#[ignore = "Requires a live Gemini API key"]
async fn live_summary_uses_a_candidate_model() {
    let engine = SummarizationEngine::new(
        Arc::new(live_client()),
        DEFAULT_SUMMARY_MODELS.into_iter().collect(),
        Duration::from_secs(60),
    );
    let result = engine
        .summarize(&SummaryRequest {
            text: "The team met on Monday to plan the release. Testing finishes Thursday, \
                   documentation is owned by Priya, and the launch is scheduled for the 14th."
                .to_string(),
            style: SummaryStyle::Brief,
            length: LengthClass::Short,
        })
        .await
        .expect("summary from some candidate");
    assert!(!result.summary.trim().is_empty());
    assert!(DEFAULT_SUMMARY_MODELS.contains(&result.used_model.as_str()));
}
