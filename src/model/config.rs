use std::path::PathBuf;

use crate::config::Config;

pub use crate::constants::MAX_SEQ_LEN;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// Directory holding `config.json`, `model.safetensors` and
    /// `tokenizer.json`. `None` selects stub mode.
    pub model_path: Option<PathBuf>,

    pub max_seq_len: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            max_seq_len: MAX_SEQ_LEN,
        }
    }
}

impl ModelConfig {
    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: Some(model_path.into()),
            max_seq_len: MAX_SEQ_LEN,
        }
    }

    pub fn stub() -> Self {
        Self::default()
    }

    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        assert!(
            (1..=MAX_SEQ_LEN).contains(&max_seq_len),
            "max_seq_len must be between 1 and {MAX_SEQ_LEN}"
        );
        self.max_seq_len = max_seq_len;
        self
    }

    pub fn is_stub(&self) -> bool {
        self.model_path.is_none()
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_SEQ_LEN).contains(&self.max_seq_len) {
            return Err(format!(
                "max_seq_len must be between 1 and {}, got {}",
                MAX_SEQ_LEN, self.max_seq_len
            ));
        }

        if let Some(ref path) = self.model_path
            && path.as_os_str().is_empty()
        {
            return Err("model_path cannot be empty when provided".to_string());
        }

        Ok(())
    }

    /// Reads `RERANK_MODEL_PATH` and `RERANK_MAX_SEQ_LEN`; unparsable values
    /// fall back to defaults.
    pub fn from_env() -> Self {
        let model_path = std::env::var("RERANK_MODEL_PATH")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let max_seq_len = std::env::var("RERANK_MAX_SEQ_LEN")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(MAX_SEQ_LEN);

        Self {
            model_path,
            max_seq_len,
        }
    }
}

/// Model settings taken from an already validated server [`Config`].
impl From<&Config> for ModelConfig {
    fn from(config: &Config) -> Self {
        Self {
            model_path: config.model_path.clone(),
            max_seq_len: config.max_seq_len,
        }
    }
}
