use dramaturg_core::{GenerateRequest, Message};
use dramaturg_error::{DramaturgErrorKind, ModelErrorKind};
use dramaturg_interface::DramaturgDriver;
use dramaturg_models::{ModelConfig, OpenAICompatibleClient};

fn offline_config() -> ModelConfig {
    ModelConfig::default()
        .with_endpoint("http://127.0.0.1:9/v1/chat/completions".to_string())
        .with_api_key_env("DRAMATURG_TEST_KEY_THAT_IS_NEVER_SET".to_string())
        .with_model("local-test".to_string())
}

#[test]
fn client_reports_configured_model() -> anyhow::Result<()> {
    let client = OpenAICompatibleClient::with_api_key(offline_config(), "sk-test")?;
    assert_eq!(client.model_name(), "local-test");
    assert_eq!(client.provider_name(), "openai-compatible");
    Ok(())
}

#[tokio::test]
async fn missing_credential_fails_before_any_request() -> anyhow::Result<()> {
    let client = OpenAICompatibleClient::from_config(offline_config())?;
    let request = GenerateRequest {
        messages: vec![Message::user("Adapt this")],
        ..Default::default()
    };

    let err = client.generate(&request).await.unwrap_err();
    match err.kind() {
        DramaturgErrorKind::Model(model) => {
            assert!(matches!(model.kind, ModelErrorKind::MissingCredential(_)));
        }
        other => panic!("unexpected error kind: {other}"),
    }
    Ok(())
}

#[tokio::test]
async fn unreachable_endpoint_is_an_http_error() -> anyhow::Result<()> {
    let client = OpenAICompatibleClient::with_api_key(offline_config(), "sk-test")?;
    let request = GenerateRequest {
        messages: vec![Message::user("Adapt this")],
        api_key: Some("sk-override".to_string()),
        ..Default::default()
    };

    let err = client.generate(&request).await.unwrap_err();
    assert!(matches!(err.kind(), DramaturgErrorKind::Model(_)));
    Ok(())
}
