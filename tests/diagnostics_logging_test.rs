use meladai_registry::prelude::*;
use tracing_test::traced_test;

#[traced_test]
#[test]
fn configuration_records_name_present_and_missing_fields() {
    let source = StaticCredentials::new()
        .with("GROQ_API_KEY", "gsk-secret-value")
        .with("OPENAI_COMPATIBLE_API_KEY_KLUSTER", "kl-secret-value");
    let _registry = RegistryBuilder::with_defaults(source).build();

    assert!(logs_contain("Configuring Groq: API Key SET."));
    assert!(logs_contain("Configuring OpenRouter: API Key MISSING."));
    assert!(logs_contain(
        "Configuring Kluster: API Key SET. Base URL MISSING."
    ));
    assert!(logs_contain("Configuring Cohere: no required credentials"));
    assert!(!logs_contain("gsk-secret-value"));
    assert!(!logs_contain("kl-secret-value"));
}

#[traced_test]
#[test]
fn base_url_is_printed_when_set() {
    let source = StaticCredentials::new()
        .with("REQUESTY_API_KEY", "rq")
        .with("REQUESTY_BASE_URL", "https://router.requesty.ai/v1");
    let _registry = RegistryBuilder::with_defaults(source).build();

    assert!(logs_contain(
        "Configuring Requesty: API Key SET. Base URL SET (https://router.requesty.ai/v1)."
    ));
}

#[traced_test]
#[test]
fn invalid_base_url_is_reported() {
    let source = StaticCredentials::new()
        .with("DEEPSEEK_API_KEY", "ds")
        .with("DEEPSEEK_BASE_URL", "openrouter");
    let _registry = RegistryBuilder::with_defaults(source).build();

    assert!(logs_contain("Ignoring base URL 'openrouter'"));
    assert!(logs_contain("Base URL MISSING."));
}

#[traced_test]
#[test]
fn verify_exists_explains_misses() {
    let registry = RegistryBuilder::with_defaults(StaticCredentials::new()).build();

    assert!(!registry.verify_exists("compound-beta"));
    assert!(logs_contain("provider not configured"));

    assert!(!registry.verify_exists("made-up-model"));
    assert!(logs_contain("Model not found"));

    assert!(registry.verify_exists("melad-default"));
    assert!(logs_contain("Model verified"));
}

#[traced_test]
#[test]
fn handle_construction_failure_is_logged_not_raised() {
    let registry = RegistryBuilder::with_defaults(StaticCredentials::new())
        .bind(ModelBinding::new("melad-broken", "cohere", "command r"))
        .build();

    assert!(!registry.verify_exists("melad-broken"));
    assert!(logs_contain("Failed to construct model handle"));
    assert!(logs_contain("failed to construct handle for 'melad-broken' via cohere"));
    assert!(logs_contain("handle construction failed"));
}

#[traced_test]
#[test]
fn summary_lists_clients_and_identifiers() {
    let registry =
        RegistryBuilder::with_defaults(StaticCredentials::new().with("GROQ_API_KEY", "gsk")).build();
    registry.log_summary();

    assert!(logs_contain("Model registry ready"));
    assert!(logs_contain("Initialized provider clients: cohere, google, groq, mistral"));
    assert!(logs_contain("compound-beta"));
}
