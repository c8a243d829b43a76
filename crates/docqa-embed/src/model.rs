//! BGE-M3 embedding model loaded from local files through candle.

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::xlm_roberta::{Config as XLMRobertaConfig, XLMRobertaModel};
use tokenizers::Tokenizer;

use docqa_core::traits::Embedder;

use crate::EMBEDDING_DIM;

const MAX_TOKENS: usize = 256;

pub struct EmbeddingModel {
    model: XLMRobertaModel,
    tokenizer: Tokenizer,
    device: Device,
}

impl EmbeddingModel {
    pub fn load() -> Result<Self> {
        let device = select_device();
        let model_dir = resolve_model_dir()?;
        info!(dir = %model_dir.display(), "loading BGE-M3 model");

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;

        let config_path = model_dir.join("config.json");
        let config: XLMRobertaConfig =
            serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;

        let weights_path = model_dir.join("pytorch_model.bin");
        let weights = candle_core::pickle::read_all(&weights_path)?;
        let weights_map: std::collections::HashMap<String, Tensor> =
            weights.into_iter().collect();
        let vb = VarBuilder::from_tensors(weights_map, DType::F32, &device);
        let model = XLMRobertaModel::new(&config, vb)?;
        info!("embedding model loaded");
        Ok(Self { model, tokenizer, device })
    }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let start = Instant::now();
        let enc = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| anyhow!("Tokenization failed: {}", e))?;
        let mut ids = enc.get_ids().to_vec();
        let mut mask = enc.get_attention_mask().to_vec();
        if ids.len() > MAX_TOKENS {
            ids.truncate(MAX_TOKENS);
            mask.truncate(MAX_TOKENS);
        }
        if ids.len() < MAX_TOKENS {
            let pad = MAX_TOKENS - ids.len();
            ids.extend(std::iter::repeat(1).take(pad));
            mask.extend(std::iter::repeat(0).take(pad));
        }
        let input_ids = Tensor::from_iter(ids, &self.device)?.reshape((1, MAX_TOKENS))?;
        let attention_mask = Tensor::from_iter(mask, &self.device)?.reshape((1, MAX_TOKENS))?;
        let token_type_ids = Tensor::zeros((1, MAX_TOKENS), DType::I64, &self.device)?;
        let hidden_states =
            self.model
                .forward(&input_ids, &attention_mask, &token_type_ids, None, None, None)?;

        // Mean-pool over non-padding tokens, then L2-normalize.
        let hidden_dim = hidden_states.dims()[2];
        let mask = attention_mask
            .to_device(hidden_states.device())?
            .to_dtype(hidden_states.dtype())?;
        let mask_3d = mask.unsqueeze(2)?;
        let mask_b = mask_3d
            .broadcast_as(hidden_states.shape())
            .unwrap_or(mask_3d.repeat((1, 1, hidden_dim))?);
        let masked = (&hidden_states * &mask_b)?;
        let sum = masked.sum(1)?;
        let lens = mask.sum(1)?.unsqueeze(1)?.to_dtype(sum.dtype())?;
        let mut emb = sum.broadcast_div(&lens)?;
        let eps_val = match hidden_states.dtype() {
            DType::F16 => 1e-6f32,
            _ => 1e-12f32,
        };
        let eps = Tensor::new(&[eps_val], hidden_states.device())?
            .to_dtype(hidden_states.dtype())?
            .unsqueeze(0)?;
        let norm = emb.sqr()?.sum_keepdim(1)?.sqrt()?.broadcast_add(&eps)?;
        emb = emb.broadcast_div(&norm)?;
        let emb_cpu: Vec<f32> = emb.to_device(&Device::Cpu)?.squeeze(0)?.to_vec1()?;
        if start.elapsed().as_millis() > 100 {
            debug!(elapsed_ms = start.elapsed().as_millis() as u64, "slow embedding");
        }
        Ok(emb_cpu)
    }
}

impl Embedder for EmbeddingModel {
    fn dim(&self) -> usize {
        EMBEDDING_DIM
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed_text(t)).collect()
    }
}

#[cfg(feature = "metal")]
fn select_device() -> Device {
    match Device::new_metal(0) {
        Ok(device) => device,
        Err(e) => {
            warn!(error = %e, "Metal unavailable, using CPU");
            Device::Cpu
        }
    }
}

#[cfg(not(feature = "metal"))]
fn select_device() -> Device {
    Device::Cpu
}

fn resolve_model_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("DOCQA_MODEL_DIR") {
        let p = PathBuf::from(&dir);
        if p.exists() {
            return Ok(p);
        }
        warn!(dir = %p.display(), "DOCQA_MODEL_DIR does not exist");
    }
    let default = Path::new("models/bge-m3");
    if default.exists() {
        return Ok(default.to_path_buf());
    }
    Err(anyhow!("Could not locate BGE-M3 model directory"))
}
