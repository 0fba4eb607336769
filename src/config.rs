use std::env;

/// Runtime configuration, read once at startup from the environment.
///
/// `DATABASE_URL` and `OPENAI_API_KEY` are both optional: leaving either
/// unset selects the in-memory store / deterministic offline providers, so
/// the service runs end-to-end on a laptop with no external dependencies.
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub database_url: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub embedding_model: String,
    pub llm_model: String,
    pub mock_embedding_dim: usize,
    pub max_upload_files: usize,
    pub max_chunk_words: usize,
    pub chunk_overlap_words: usize,
    pub top_k: usize,
    pub auth_mock_sub: String,
    pub provider_timeout_secs: u64,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            port: parse_var("PORT", 8000),
            database_url: env::var("DATABASE_URL").ok(),
            openai_api_key: env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            embedding_model: env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "text-embedding-3-small".to_string()),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            mock_embedding_dim: parse_var("MOCK_EMBEDDING_DIM", 256),
            max_upload_files: parse_var("MAX_UPLOAD_FILES", 20),
            max_chunk_words: parse_var("MAX_CHUNK_WORDS", 600),
            chunk_overlap_words: parse_var("CHUNK_OVERLAP_WORDS", 80),
            top_k: parse_var("TOP_K", 5),
            auth_mock_sub: env::var("AUTH_MOCK_SUB").unwrap_or_else(|_| "mock-user".to_string()),
            provider_timeout_secs: parse_var("PROVIDER_TIMEOUT_SECS", 30),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 8000,
            database_url: None,
            openai_api_key: None,
            openai_base_url: "https://api.openai.com/v1".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            llm_model: "gpt-4o-mini".to_string(),
            mock_embedding_dim: 256,
            max_upload_files: 20,
            max_chunk_words: 600,
            chunk_overlap_words: 80,
            top_k: 5,
            auth_mock_sub: "mock-user".to_string(),
            provider_timeout_secs: 30,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
