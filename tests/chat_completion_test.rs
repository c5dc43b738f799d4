use meladai_registry::credentials::ProviderCredentials;
use meladai_registry::prelude::*;
use meladai_registry::provider::ids;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "created": 1_700_000_000,
        "model": "compound-beta",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 9, "completion_tokens": 3, "total_tokens": 12}
    })
}

#[tokio::test]
async fn groq_handle_posts_to_normalized_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer gsk-test"))
        .and(body_partial_json(serde_json::json!({
            "model": "compound-beta",
            "stream": false,
            "messages": [{"role": "user", "content": "ping"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("pong")))
        .expect(1)
        .mount(&server)
        .await;

    // Trailing "/v1/" on the supplied endpoint must not produce "/v1/v1".
    let registry = RegistryBuilder::with_defaults(StaticCredentials::new())
        .credentials(
            ids::GROQ,
            ProviderCredentials::new(Some("gsk-test"), Some(format!("{}/v1/", server.uri()).as_str())),
        )
        .build();

    let handle = registry.resolve_handle("compound-beta").expect("groq configured");
    let reply = handle.chat(ChatRequest::user("ping")).await.expect("reply");

    assert_eq!(reply.content, "pong");
    assert_eq!(reply.finish_reason.as_deref(), Some("stop"));
    assert_eq!(reply.id.as_deref(), Some("chatcmpl-123"));
    assert_eq!(reply.usage.map(|u| u.total_tokens), Some(12));
}

#[tokio::test]
async fn glhf_sends_sse_headers_from_env_configuration() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer glhf-key"))
        .and(header("accept", "text/event-stream"))
        .and(header("cache-control", "no-cache"))
        .and(body_partial_json(serde_json::json!({
            "model": "hf:mistralai/Mixtral-8x22B-Instruct-v0.1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("hi")))
        .expect(1)
        .mount(&server)
        .await;

    let source = StaticCredentials::new()
        .with("OPENAI_COMPATIBLE_API_KEY_GLHF", "glhf-key")
        .with("OPENAI_COMPATIBLE_API_BASE_URL_GLHF", server.uri());
    let registry = RegistryBuilder::with_defaults(source).build();

    let reply = registry
        .resolve_handle("compatible-glhf-mistral")
        .unwrap()
        .chat(ChatRequest::user("hello").with_system("be brief"))
        .await
        .unwrap();
    assert_eq!(reply.content, "hi");
}

#[tokio::test]
async fn ungated_provider_without_key_sends_no_authorization() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .mount(&server)
        .await;

    // Google keeps its endpoint verbatim.
    let source =
        StaticCredentials::new().with("GOOGLE_GENERATIVE_AI_API_BASE_URL", format!("{}/", server.uri()));
    let registry = RegistryBuilder::with_defaults(source).build();

    let reply = registry
        .resolve_handle("google-gemini-pro")
        .unwrap()
        .chat(ChatRequest::user("hi").with_temperature(0.1).with_max_tokens(8))
        .await
        .unwrap();
    assert_eq!(reply.content, "ok");

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["model"], "models/gemini-2.0-flash-001");
    assert_eq!(body["max_tokens"], 8);
}

#[tokio::test]
async fn rejected_key_maps_to_authentication_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"error": {"message": "Invalid API Key"}})),
        )
        .mount(&server)
        .await;

    let registry = RegistryBuilder::with_defaults(StaticCredentials::new())
        .credentials(
            ids::OPENROUTER,
            ProviderCredentials::new(Some("bad"), Some(server.uri().as_str())),
        )
        .build();

    let err = registry
        .resolve_handle("openrouter-claude-3-opus")
        .unwrap()
        .chat(ChatRequest::user("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::AuthenticationError(_)), "{err:?}");
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn server_error_maps_to_retryable_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(serde_json::json!({"error": "overloaded"})),
        )
        .mount(&server)
        .await;

    let registry = RegistryBuilder::with_defaults(StaticCredentials::new())
        .credentials(
            ids::TOGETHER,
            ProviderCredentials::new(Some("tk"), Some(server.uri().as_str())),
        )
        .build();

    let err = registry
        .resolve_handle("together-llama-3.3-70b-turbo")
        .unwrap()
        .chat(ChatRequest::user("hi"))
        .await
        .unwrap_err();
    match &err {
        LlmError::ApiError { code, details, .. } => {
            assert_eq!(*code, 503);
            assert_eq!(
                details.as_ref().and_then(|d| d.get("error")),
                Some(&serde_json::json!("overloaded"))
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
        .mount(&server)
        .await;

    let registry = RegistryBuilder::with_defaults(StaticCredentials::new())
        .credentials(
            ids::GROQ,
            ProviderCredentials::new(Some("gsk"), Some(server.uri().as_str())),
        )
        .build();

    let err = registry
        .resolve_handle("compound-beta")
        .unwrap()
        .chat(ChatRequest::user("hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::ParseError(_)), "{err:?}");
}
