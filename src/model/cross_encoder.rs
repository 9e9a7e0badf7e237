use std::sync::Arc;

use candle_core::{Device, Tensor};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

use super::backend::{EncodedBatch, EncodedPair, InferenceBackend};
use super::bert::BertClassifier;
use super::config::ModelConfig;
use super::device::select_device;
use super::error::BackendError;
use super::stub;
use super::utils::load_pair_tokenizer;
use crate::rerank::Pair;

enum EncoderBackend {
    Model {
        model: BertClassifier,
        tokenizer: Arc<Tokenizer>,
    },
    Stub,
}

/// The loaded cross-encoder: an immutable handle shared by all requests.
pub struct CrossEncoder {
    backend: EncoderBackend,
    device: Device,
    config: ModelConfig,
}

impl std::fmt::Debug for CrossEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossEncoder")
            .field("device", &format!("{:?}", self.device))
            .field("config", &self.config)
            .field("model_loaded", &self.is_model_loaded())
            .finish()
    }
}

impl CrossEncoder {
    pub fn load(config: ModelConfig) -> Result<Self, BackendError> {
        config
            .validate()
            .map_err(|reason| BackendError::InvalidConfig { reason })?;

        let device = select_device()?;
        debug!(?device, "Selected compute device for cross-encoder");

        let Some(model_path) = config.model_path.clone() else {
            warn!("No cross-encoder model configured, scoring in stub mode");
            return Ok(Self {
                backend: EncoderBackend::Stub,
                device,
                config,
            });
        };

        if !model_path.exists() {
            return Err(BackendError::ModelNotFound { path: model_path });
        }

        for required in ["config.json", "model.safetensors", "tokenizer.json"] {
            if !model_path.join(required).exists() {
                return Err(BackendError::ModelLoadFailed {
                    reason: format!("missing {} in {}", required, model_path.display()),
                });
            }
        }

        info!(
            model_path = %model_path.display(),
            max_seq_len = config.max_seq_len,
            "Loading cross-encoder model"
        );

        let model = BertClassifier::load(&model_path, &device).map_err(|e| {
            BackendError::ModelLoadFailed {
                reason: format!("failed to load BERT classifier: {}", e),
            }
        })?;

        let tokenizer = load_pair_tokenizer(&model_path, config.max_seq_len).map_err(|e| {
            BackendError::ModelLoadFailed {
                reason: format!("failed to load tokenizer: {}", e),
            }
        })?;

        info!("Cross-encoder model loaded");

        Ok(Self {
            backend: EncoderBackend::Model {
                model,
                tokenizer: Arc::new(tokenizer),
            },
            device,
            config,
        })
    }

    pub fn stub() -> Result<Self, BackendError> {
        Self::load(ModelConfig::stub())
    }

    pub fn is_model_loaded(&self) -> bool {
        matches!(self.backend, EncoderBackend::Model { .. })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    fn tensor(&self, data: &[u32], batch: &EncodedBatch) -> Result<Tensor, BackendError> {
        Ok(Tensor::from_slice(
            data,
            (batch.batch_size(), batch.seq_len()),
            &self.device,
        )?)
    }
}

/// Tokenizes `pairs` as `[CLS] query [SEP] document [SEP]` rows using the
/// tokenizer's own truncation and padding settings.
pub(crate) fn encode_with_tokenizer(
    tokenizer: &Tokenizer,
    pairs: &[Pair<'_>],
) -> Result<Vec<EncodedPair>, BackendError> {
    let inputs: Vec<(&str, &str)> = pairs.iter().map(|p| (p.query, p.document)).collect();

    let encodings = tokenizer
        .encode_batch(inputs, true)
        .map_err(|e| BackendError::TokenizationFailed {
            reason: e.to_string(),
        })?;

    Ok(encodings
        .into_iter()
        .map(|encoding| EncodedPair {
            ids: encoding.get_ids().to_vec(),
            type_ids: encoding.get_type_ids().to_vec(),
            attention_mask: encoding.get_attention_mask().to_vec(),
        })
        .collect())
}

impl InferenceBackend for CrossEncoder {
    fn encode(&self, pairs: &[Pair<'_>]) -> Result<EncodedBatch, BackendError> {
        let rows = match &self.backend {
            EncoderBackend::Model { tokenizer, .. } => encode_with_tokenizer(tokenizer, pairs)?,
            EncoderBackend::Stub => pairs
                .iter()
                .map(|p| stub::encode_pair(p.query, p.document, self.config.max_seq_len))
                .collect(),
        };

        let batch = EncodedBatch::pad(rows);
        debug!(
            batch_size = batch.batch_size(),
            seq_len = batch.seq_len(),
            "Encoded pair batch"
        );
        Ok(batch)
    }

    fn infer(&self, batch: &EncodedBatch) -> Result<Vec<f32>, BackendError> {
        let model = match &self.backend {
            EncoderBackend::Model { model, .. } => model,
            EncoderBackend::Stub => return Ok(stub::logits(batch)),
        };

        if batch.batch_size() == 0 {
            return Ok(Vec::new());
        }

        let input_ids = self.tensor(batch.input_ids(), batch)?;
        let type_ids = self.tensor(batch.type_ids(), batch)?;
        let attention_mask = self.tensor(batch.attention_mask(), batch)?;

        let logits = model
            .forward(&input_ids, &type_ids, &attention_mask)
            .map_err(|e| BackendError::InferenceFailed {
                reason: e.to_string(),
            })?;

        Ok(logits.to_vec1::<f32>()?)
    }

    fn is_stub(&self) -> bool {
        !self.is_model_loaded()
    }
}
