use std::env;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub db_path: String,
    pub api_key: Option<String>,
    pub models: Vec<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            db_path: "promptlab.db".to_string(),
            api_key: None,
            models: vec![
                "llama-3.1-8b-instant".to_string(),
                "llama-3.3-70b-versatile".to_string(),
                "gemma2-9b-it".to_string(),
            ],
            temperature: 0.7,
            max_tokens: 512,
            timeout_seconds: 30,
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(v) = env::var("PORT") {
            if let Ok(n) = v.parse() {
                cfg.port = n;
            }
        }
        if let Ok(v) = env::var("PROMPTLAB_DB") {
            cfg.db_path = v;
        }
        if let Ok(v) = env::var("GROQ_API_KEY") {
            if !v.is_empty() {
                cfg.api_key = Some(v);
            }
        }
        if let Ok(v) = env::var("PROMPTLAB_MODELS") {
            let models: Vec<String> = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !models.is_empty() {
                cfg.models = models;
            }
        }
        if let Ok(v) = env::var("PROMPTLAB_TEMPERATURE") {
            if let Ok(n) = v.parse() {
                cfg.temperature = n;
            }
        }
        if let Ok(v) = env::var("PROMPTLAB_MAX_TOKENS") {
            if let Ok(n) = v.parse() {
                cfg.max_tokens = n;
            }
        }
        if let Ok(v) = env::var("PROMPTLAB_TIMEOUT_SECONDS") {
            if let Ok(n) = v.parse() {
                cfg.timeout_seconds = n;
            }
        }
        if let Ok(v) = env::var("PROMPTLAB_LOG") {
            cfg.log_level = v;
        }
        cfg
    }
}
