use candle::{DType, Device, Module, Result, Tensor};
use candle_core as candle;
use candle_core::IndexOp;
use candle_nn::{Linear, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};
use std::path::Path;
use std::sync::Arc;

/// `BertForSequenceClassification` with a single relevance logit.
///
/// Checkpoints exported from HuggingFace keep the encoder under `bert.` (or
/// `roberta.`) and, for BERT, a pooler (`dense` + tanh over `[CLS]`) in front
/// of the classifier. Checkpoints without a pooler classify the raw `[CLS]`
/// hidden state.
struct SequenceClassifier {
    encoder: BertModel,
    pooler: Option<Linear>,
    classifier: Linear,
}

impl SequenceClassifier {
    fn load(vb: VarBuilder, config: &Config) -> Result<Self> {
        let prefix = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            Some("bert")
        } else if vb.contains_tensor("roberta.embeddings.word_embeddings.weight") {
            Some("roberta")
        } else {
            None
        };

        let encoder_vb = match prefix {
            Some(p) => vb.pp(p),
            None => vb.clone(),
        };
        let encoder = BertModel::load(encoder_vb.clone(), config)?;

        let hidden = config.hidden_size;
        let pooler = if encoder_vb.contains_tensor("pooler.dense.weight") {
            Some(candle_nn::linear(hidden, hidden, encoder_vb.pp("pooler.dense"))?)
        } else {
            None
        };

        let classifier = candle_nn::linear(hidden, 1, vb.pp("classifier"))?;

        Ok(Self {
            encoder,
            pooler,
            classifier,
        })
    }

    fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        let hidden = self
            .encoder
            .forward(input_ids, token_type_ids, Some(attention_mask))?;
        let cls = hidden.i((.., 0, ..))?;
        let pooled = match &self.pooler {
            Some(dense) => dense.forward(&cls)?.tanh()?,
            None => cls,
        };
        self.classifier.forward(&pooled)
    }
}

/// Shared handle to a loaded cross-encoder. Cloning is cheap; `forward`
/// takes `&self`, so one handle serves concurrent requests.
#[derive(Clone)]
pub struct BertClassifier(Arc<SequenceClassifier>);

impl BertClassifier {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let config_path = model_dir.join("config.json");
        let weights_path = model_dir.join("model.safetensors");

        let raw = std::fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&raw)
            .map_err(|e| candle::Error::Msg(format!("invalid config.json: {}", e)))?;

        // SAFETY: the weights file is opened read-only and must not be
        // modified while the model is loaded.
        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };

        Ok(Self(Arc::new(SequenceClassifier::load(vb, &config)?)))
    }

    /// Returns one logit per row, shape `(batch,)`.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        self.0
            .forward(input_ids, token_type_ids, attention_mask)?
            .squeeze(1)
    }
}
