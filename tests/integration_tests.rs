//! Integration tests against a live OpenAI-compatible endpoint.
//! These tests require an API key in the environment to run.

#[cfg(test)]
mod tests {
    use personal_agent::chat::ChatSession;
    use personal_agent::client::API_KEY_ENV;
    use personal_agent::{ChatBackend, OpenAiCompatible, Turn};

    const BASE_ENV: &str = "PERSONAL_AGENT_API_BASE";
    const MODEL_ENV: &str = "PERSONAL_AGENT_MODEL";

    fn live_client() -> Option<OpenAiCompatible> {
        let api_key = std::env::var(API_KEY_ENV).ok()?;
        let model = std::env::var(MODEL_ENV).unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let base = std::env::var(BASE_ENV).ok();
        let client = OpenAiCompatible::with_options(Some(api_key), model, base, None)
            .expect("Failed to create client")
            .with_max_tokens(Some(16));
        Some(client)
    }

    #[tokio::test]
    async fn test_simple_reply() {
        let Some(client) = live_client() else {
            eprintln!("Skipping test: {API_KEY_ENV} not set");
            return;
        };

        let turns = [Turn::user("Say 'test passed'").unwrap()];
        let response = client.reply(&turns).await;
        assert!(
            response.is_ok(),
            "Request should succeed with valid API key: {response:?}"
        );
        assert!(!response.unwrap().trim().is_empty());
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let Some(client) = live_client() else {
            eprintln!("Skipping test: {API_KEY_ENV} not set");
            return;
        };

        let mut session = ChatSession::new(client);
        session.send("Remember the word 'teal'.").await.unwrap();
        session.send("Which word did I ask you to remember?").await.unwrap();
        assert_eq!(session.context().len(), 4);
    }

    #[tokio::test]
    async fn test_invalid_api_key() {
        if std::env::var(API_KEY_ENV).is_err() {
            eprintln!("Skipping test: {API_KEY_ENV} not set");
            return;
        }
        let base = std::env::var(BASE_ENV).ok();
        let client = OpenAiCompatible::with_options(
            Some("invalid-key".to_string()),
            "gpt-4o-mini",
            base,
            None,
        )
        .expect("Failed to create client")
        .with_max_retries(0);

        let turns = [Turn::user("Hello").unwrap()];
        let err = client.reply(&turns).await.unwrap_err();
        assert!(err.is_authentication(), "unexpected error: {err}");
    }
}
