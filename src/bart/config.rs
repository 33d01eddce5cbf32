use candle_nn::Activation;
use serde::Deserialize;

/// BART's learned position table reserves two rows that real positions skip.
pub const POSITION_OFFSET: usize = 2;

pub const LAYER_NORM_EPS: f64 = 1e-5;

/// The subset of the published `config.json` that drives inference.
///
/// Token id and generation defaults follow the BART convention so that a
/// stripped-down config file still loads.
#[derive(Debug, Clone, Deserialize)]
pub struct BartConfig {
    pub vocab_size: usize,
    pub d_model: usize,
    pub encoder_layers: usize,
    pub decoder_layers: usize,
    pub encoder_attention_heads: usize,
    pub decoder_attention_heads: usize,
    pub encoder_ffn_dim: usize,
    pub decoder_ffn_dim: usize,
    pub max_position_embeddings: usize,
    #[serde(default = "default_activation")]
    pub activation_function: Activation,
    #[serde(default)]
    pub scale_embedding: bool,
    #[serde(default = "default_pad_token_id")]
    pub pad_token_id: u32,
    #[serde(default = "default_bos_token_id")]
    pub bos_token_id: u32,
    #[serde(default = "default_eos_token_id")]
    pub eos_token_id: u32,
    #[serde(default = "default_eos_token_id")]
    pub decoder_start_token_id: u32,
    #[serde(default)]
    pub forced_bos_token_id: Option<u32>,
    #[serde(default)]
    pub forced_eos_token_id: Option<u32>,
    /// 0 disables the ban, matching the upstream default.
    #[serde(default)]
    pub no_repeat_ngram_size: usize,
}

fn default_activation() -> Activation {
    Activation::Gelu
}

fn default_pad_token_id() -> u32 {
    1
}

fn default_bos_token_id() -> u32 {
    0
}

fn default_eos_token_id() -> u32 {
    2
}

impl BartConfig {
    pub fn head_dim(&self) -> usize {
        self.d_model / self.encoder_attention_heads
    }
}
