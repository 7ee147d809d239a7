use super::base::ProviderConfig;
use anyhow::Result;

pub const GEMINI_HOST: &str = "https://generativelanguage.googleapis.com";
pub const GEMINI_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Clone)]
pub struct GeminiProviderConfig {
    pub api_key: String,
    pub model: String,
    pub host: String,
}

impl GeminiProviderConfig {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            host: GEMINI_HOST.to_string(),
        }
    }

    pub fn with_host<S: Into<String>>(mut self, host: S) -> Self {
        self.host = host.into();
        self
    }

    /// Like `from_env`, but an explicit key wins over `GEMINI_API_KEY`
    pub fn from_env_with_key(api_key: Option<String>) -> Result<Self> {
        let api_key = match api_key.filter(|key| !key.trim().is_empty()) {
            Some(key) => key,
            None => Self::get_env("GEMINI_API_KEY", true, None)?
                .ok_or_else(|| anyhow::anyhow!("Gemini API key should be present"))?,
        };

        let model = Self::get_env("GEMINI_MODEL", false, Some(GEMINI_MODEL.to_string()))?
            .unwrap_or_else(|| GEMINI_MODEL.to_string());

        let host = Self::get_env("GEMINI_API_HOST", false, Some(GEMINI_HOST.to_string()))?
            .unwrap_or_else(|| GEMINI_HOST.to_string());

        Ok(Self::new(api_key, model).with_host(host))
    }
}

impl ProviderConfig for GeminiProviderConfig {
    fn from_env() -> Result<Self> {
        Self::from_env_with_key(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Env vars are process-wide, so every case lives in one test
    #[test]
    fn test_from_env() {
        std::env::remove_var("GEMINI_API_KEY");
        assert!(GeminiProviderConfig::from_env().is_err());

        std::env::set_var("GEMINI_API_KEY", "test_key");
        std::env::remove_var("GEMINI_MODEL");
        std::env::remove_var("GEMINI_API_HOST");
        let config = GeminiProviderConfig::from_env().unwrap();
        assert_eq!(config.api_key, "test_key");
        assert_eq!(config.model, GEMINI_MODEL);
        assert_eq!(config.host, GEMINI_HOST);

        std::env::set_var("GEMINI_MODEL", "gemini-pro");
        std::env::set_var("GEMINI_API_HOST", "http://localhost:9999");
        let config = GeminiProviderConfig::from_env().unwrap();
        assert_eq!(config.model, "gemini-pro");
        assert_eq!(config.host, "http://localhost:9999");

        // blank values fall back to the defaults
        std::env::set_var("GEMINI_MODEL", " ");
        std::env::set_var("GEMINI_API_HOST", "");
        let config = GeminiProviderConfig::from_env().unwrap();
        assert_eq!(config.model, GEMINI_MODEL);
        assert_eq!(config.host, GEMINI_HOST);

        std::env::remove_var("GEMINI_API_KEY");
        let config =
            GeminiProviderConfig::from_env_with_key(Some("cli_key".to_string())).unwrap();
        assert_eq!(config.api_key, "cli_key");
        assert_eq!(config.host, GEMINI_HOST);
        assert!(GeminiProviderConfig::from_env_with_key(Some("  ".to_string())).is_err());

        std::env::set_var("GEMINI_API_KEY", "env_key");
        let config =
            GeminiProviderConfig::from_env_with_key(Some("cli_key".to_string())).unwrap();
        assert_eq!(config.api_key, "cli_key");

        std::env::remove_var("GEMINI_API_KEY");
        std::env::remove_var("GEMINI_MODEL");
        std::env::remove_var("GEMINI_API_HOST");
    }
}
