//! LLM provider factory.

use crate::client::LlmClient;
use crate::providers::{OfflineClient, OllamaClient};
use crate::types::GenerationConfig;
use std::sync::Arc;
use urgeease_core::{AppError, AppResult};

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("offline", "ollama")
/// * `endpoint` - Optional custom endpoint URL for HTTP providers
///
/// # Errors
/// Returns `AppError::Llm` if the provider is unknown.
pub fn create_client(provider: &str, endpoint: Option<&str>) -> AppResult<Arc<dyn LlmClient>> {
    match provider.to_lowercase().as_str() {
        "offline" | "fake" => Ok(Arc::new(OfflineClient::new())),
        "ollama" => {
            let client = match endpoint {
                Some(url) => OllamaClient::with_base_url(url),
                None => OllamaClient::new(),
            };
            Ok(Arc::new(client))
        }
        _ => Err(AppError::Llm(format!(
            "Unknown provider: '{}'. Supported providers: offline, ollama",
            provider
        ))),
    }
}

/// Create the client described by a generation config.
pub fn client_from_config(config: &GenerationConfig) -> AppResult<Arc<dyn LlmClient>> {
    create_client(&config.provider, config.endpoint.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_offline_client() {
        let client = create_client("offline", None).unwrap();
        assert_eq!(client.provider_name(), "offline");
    }

    #[test]
    fn test_create_ollama_with_custom_endpoint() {
        let client = create_client("Ollama", Some("http://localhost:8080")).unwrap();
        assert_eq!(client.provider_name(), "ollama");
    }

    #[test]
    fn test_client_from_default_config() {
        let client = client_from_config(&GenerationConfig::default()).unwrap();
        assert_eq!(client.provider_name(), "offline");
    }

    #[test]
    fn test_unknown_provider() {
        match create_client("unknown", None) {
            Err(err) => assert!(err.to_string().contains("Unknown provider")),
            Ok(_) => panic!("Expected error for unknown provider"),
        }
    }
}
