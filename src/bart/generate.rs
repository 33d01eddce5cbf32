//! Greedy summary generation on top of [`BartModel`].
//!
//! Decoding follows the published generation config: no sampling, eos is
//! suppressed until the minimum length, repeated trigrams are banned, bos is
//! forced on the first step and eos on the last one.

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use super::config::BartConfig;
use super::model::BartModel;
use crate::error::{Error, Result};
use crate::hub::ModelAssets;
use crate::summarizer::{LengthPlan, SummaryEngine};

pub struct BartSummarizer {
    model: BartModel,
    tokenizer: Tokenizer,
    device: Device,
}

impl BartSummarizer {
    /// Loads config, tokenizer and weights from already-fetched files. The
    /// weights stay memory-mapped, so the file must not change while the
    /// model is alive.
    pub fn load(assets: &ModelAssets, device: &Device) -> Result<Self> {
        let raw = std::fs::read_to_string(&assets.config)?;
        let config: BartConfig = serde_json::from_str(&raw)?;
        let tokenizer = Tokenizer::from_file(&assets.tokenizer).map_err(|err| {
            Error::tokenizer(format!(
                "failed to load {}: {err}",
                assets.tokenizer.display()
            ))
        })?;
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[assets.weights.as_path()], DType::F32, device)?
        };
        let model = BartModel::load(config, vb)?;
        info!("Model weights loaded from {}", assets.weights.display());
        Ok(Self {
            model,
            tokenizer,
            device: device.clone(),
        })
    }

    fn encode_source(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|err| Error::tokenizer(format!("failed to encode input: {err}")))?;
        let mut ids = encoding.get_ids().to_vec();
        let config = self.model.config();
        truncate_to_window(&mut ids, config.max_position_embeddings, config.eos_token_id);
        Ok(ids)
    }
}

impl SummaryEngine for BartSummarizer {
    fn summarize(&self, text: &str, plan: &LengthPlan) -> Result<String> {
        let source_ids = self.encode_source(text)?;
        debug!(
            input_tokens = source_ids.len(),
            min_tokens = plan.min_tokens,
            max_tokens = plan.max_tokens,
            "Generating summary"
        );
        let summary_ids = greedy_decode(&self.model, &self.device, &source_ids, plan)?;
        let summary = self
            .tokenizer
            .decode(&summary_ids, true)
            .map_err(|err| Error::tokenizer(format!("failed to decode summary: {err}")))?;
        Ok(summary.trim().to_string())
    }
}

/// Cuts token ids down to the encoder's position window, keeping a trailing
/// eos marker on the truncated sequence.
fn truncate_to_window(ids: &mut Vec<u32>, limit: usize, eos: u32) {
    if ids.len() > limit {
        debug!("Truncating input from {} to {limit} tokens", ids.len());
        ids.truncate(limit - 1);
        ids.push(eos);
    }
}

/// Greedy decode of one summary: bos is forced on the first step, eos is
/// unreachable below the plan minimum and forced at its cap.
fn greedy_decode(
    model: &BartModel,
    device: &Device,
    source_ids: &[u32],
    plan: &LengthPlan,
) -> Result<Vec<u32>> {
    let config = model.config();
    let eos = config.eos_token_id;

    let input = Tensor::new(source_ids, device)?.unsqueeze(0)?;
    let encoder_out = model.encode(&input)?;
    let mut cache = model.new_cache();

    let mut output = vec![config.decoder_start_token_id];
    while output.len() < plan.max_tokens {
        let current_len = output.len();
        let last = output[current_len - 1];
        let mut logits = model.decode_step(last, &encoder_out, current_len - 1, &mut cache)?;

        let forced = if current_len == 1 {
            config.forced_bos_token_id
        } else if current_len + 1 == plan.max_tokens {
            config.forced_eos_token_id
        } else {
            None
        };
        let next = match forced {
            Some(token) => token,
            None => {
                if current_len < plan.min_tokens {
                    if let Some(slot) = logits.get_mut(eos as usize) {
                        *slot = f32::NEG_INFINITY;
                    }
                }
                for token in banned_ngram_completions(config.no_repeat_ngram_size, &output) {
                    if let Some(slot) = logits.get_mut(token as usize) {
                        *slot = f32::NEG_INFINITY;
                    }
                }
                argmax(&logits)?
            }
        };
        output.push(next);
        if next == eos {
            break;
        }
    }
    Ok(output)
}

/// Tokens that would complete an ngram already present in `sequence`, given
/// its trailing `ngram - 1` tokens. A zero `ngram` disables the ban.
fn banned_ngram_completions(ngram: usize, sequence: &[u32]) -> Vec<u32> {
    if ngram == 0 || sequence.len() < ngram {
        return Vec::new();
    }
    let prefix = &sequence[sequence.len() + 1 - ngram..];
    sequence
        .windows(ngram)
        .filter(|window| window[..ngram - 1] == *prefix)
        .map(|window| window[ngram - 1])
        .collect()
}

fn argmax(logits: &[f32]) -> Result<u32> {
    let mut best: Option<(usize, f32)> = None;
    for (index, &value) in logits.iter().enumerate() {
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((index, value)),
        }
    }
    best.map(|(index, _)| index as u32)
        .ok_or_else(|| Error::model("cannot pick a token from empty logits"))
}
