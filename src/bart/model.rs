//! Encoder/decoder forward passes for BART on candle.
//!
//! Inference-only and sized for this service's traffic: one request at a
//! time, greedy decoding, so the decoder always advances a single token and
//! no attention masks are needed. Layers are post-norm (`normalize_before`
//! is false in the published config).

use candle_core::{DType, Tensor};
use candle_nn::ops::softmax_last_dim;
use candle_nn::{
    embedding, layer_norm, linear, Activation, Embedding, LayerNorm, Linear, Module, VarBuilder,
};

use super::config::{BartConfig, LAYER_NORM_EPS, POSITION_OFFSET};
use crate::error::{Error, Result};

struct Attention {
    q_proj: Linear,
    k_proj: Linear,
    v_proj: Linear,
    out_proj: Linear,
    num_heads: usize,
    head_dim: usize,
    scale: f64,
}

impl Attention {
    fn load(d_model: usize, num_heads: usize, vb: VarBuilder) -> Result<Self> {
        let q_proj = linear(d_model, d_model, vb.pp("q_proj"))?;
        let k_proj = linear(d_model, d_model, vb.pp("k_proj"))?;
        let v_proj = linear(d_model, d_model, vb.pp("v_proj"))?;
        let out_proj = linear(d_model, d_model, vb.pp("out_proj"))?;
        let head_dim = d_model / num_heads;
        Ok(Self {
            q_proj,
            k_proj,
            v_proj,
            out_proj,
            num_heads,
            head_dim,
            scale: (head_dim as f64).powf(-0.5),
        })
    }

    // (batch, len, d_model) -> (batch, heads, len, head_dim)
    fn split_heads(&self, xs: &Tensor) -> Result<Tensor> {
        let (batch, len, _) = xs.dims3()?;
        let xs = xs
            .reshape((batch, len, self.num_heads, self.head_dim))?
            .permute((0, 2, 1, 3))?
            .contiguous()?;
        Ok(xs)
    }

    fn project_kv(&self, xs: &Tensor) -> Result<(Tensor, Tensor)> {
        let keys = self.split_heads(&self.k_proj.forward(xs)?)?;
        let values = self.split_heads(&self.v_proj.forward(xs)?)?;
        Ok((keys, values))
    }

    fn attend(&self, query_src: &Tensor, keys: &Tensor, values: &Tensor) -> Result<Tensor> {
        let (batch, q_len, _) = query_src.dims3()?;
        let queries = (self.split_heads(&self.q_proj.forward(query_src)?)? * self.scale)?;
        let scores = queries.matmul(&keys.permute((0, 1, 3, 2))?.contiguous()?)?;
        let probs = softmax_last_dim(&scores)?;
        let context = probs
            .matmul(values)?
            .permute((0, 2, 1, 3))?
            .reshape((batch, q_len, self.num_heads * self.head_dim))?;
        Ok(self.out_proj.forward(&context)?)
    }
}

struct FeedForward {
    fc1: Linear,
    fc2: Linear,
    activation: Activation,
}

impl FeedForward {
    fn load(d_model: usize, ffn_dim: usize, activation: Activation, vb: VarBuilder) -> Result<Self> {
        let fc1 = linear(d_model, ffn_dim, vb.pp("fc1"))?;
        let fc2 = linear(ffn_dim, d_model, vb.pp("fc2"))?;
        Ok(Self {
            fc1,
            fc2,
            activation,
        })
    }

    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        Ok(self
            .fc2
            .forward(&self.activation.forward(&self.fc1.forward(xs)?)?)?)
    }
}

struct EncoderLayer {
    self_attn: Attention,
    self_attn_layer_norm: LayerNorm,
    feed_forward: FeedForward,
    final_layer_norm: LayerNorm,
}

impl EncoderLayer {
    fn load(config: &BartConfig, vb: VarBuilder) -> Result<Self> {
        Ok(Self {
            self_attn: Attention::load(
                config.d_model,
                config.encoder_attention_heads,
                vb.pp("self_attn"),
            )?,
            self_attn_layer_norm: layer_norm(
                config.d_model,
                LAYER_NORM_EPS,
                vb.pp("self_attn_layer_norm"),
            )?,
            feed_forward: FeedForward::load(
                config.d_model,
                config.encoder_ffn_dim,
                config.activation_function,
                vb.clone(),
            )?,
            final_layer_norm: layer_norm(
                config.d_model,
                LAYER_NORM_EPS,
                vb.pp("final_layer_norm"),
            )?,
        })
    }

    fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let (keys, values) = self.self_attn.project_kv(xs)?;
        let attn = self.self_attn.attend(xs, &keys, &values)?;
        let xs = self.self_attn_layer_norm.forward(&(xs + attn)?)?;
        let ff = self.feed_forward.forward(&xs)?;
        Ok(self.final_layer_norm.forward(&(&xs + ff)?)?)
    }
}

struct DecoderLayer {
    self_attn: Attention,
    self_attn_layer_norm: LayerNorm,
    encoder_attn: Attention,
    encoder_attn_layer_norm: LayerNorm,
    feed_forward: FeedForward,
    final_layer_norm: LayerNorm,
}

impl DecoderLayer {
    fn load(config: &BartConfig, vb: VarBuilder) -> Result<Self> {
        Ok(Self {
            self_attn: Attention::load(
                config.d_model,
                config.decoder_attention_heads,
                vb.pp("self_attn"),
            )?,
            self_attn_layer_norm: layer_norm(
                config.d_model,
                LAYER_NORM_EPS,
                vb.pp("self_attn_layer_norm"),
            )?,
            encoder_attn: Attention::load(
                config.d_model,
                config.decoder_attention_heads,
                vb.pp("encoder_attn"),
            )?,
            encoder_attn_layer_norm: layer_norm(
                config.d_model,
                LAYER_NORM_EPS,
                vb.pp("encoder_attn_layer_norm"),
            )?,
            feed_forward: FeedForward::load(
                config.d_model,
                config.decoder_ffn_dim,
                config.activation_function,
                vb.clone(),
            )?,
            final_layer_norm: layer_norm(
                config.d_model,
                LAYER_NORM_EPS,
                vb.pp("final_layer_norm"),
            )?,
        })
    }

    fn forward_step(
        &self,
        xs: &Tensor,
        encoder_out: &Tensor,
        cache: &mut LayerCache,
    ) -> Result<Tensor> {
        // Self-attention over everything decoded so far.
        let (new_keys, new_values) = self.self_attn.project_kv(xs)?;
        let (keys, values) = match cache.self_kv.take() {
            Some((keys, values)) => (
                Tensor::cat(&[&keys, &new_keys], 2)?,
                Tensor::cat(&[&values, &new_values], 2)?,
            ),
            None => (new_keys, new_values),
        };
        let attn = self.self_attn.attend(xs, &keys, &values)?;
        cache.self_kv = Some((keys, values));
        let xs = self.self_attn_layer_norm.forward(&(xs + attn)?)?;

        // Cross-attention; the encoder projections never change, so they are
        // computed once per generation.
        let (enc_keys, enc_values) = match cache.cross_kv.take() {
            Some(kv) => kv,
            None => self.encoder_attn.project_kv(encoder_out)?,
        };
        let attn = self.encoder_attn.attend(&xs, &enc_keys, &enc_values)?;
        cache.cross_kv = Some((enc_keys, enc_values));
        let xs = self.encoder_attn_layer_norm.forward(&(&xs + attn)?)?;

        let ff = self.feed_forward.forward(&xs)?;
        Ok(self.final_layer_norm.forward(&(&xs + ff)?)?)
    }
}

#[derive(Default)]
struct LayerCache {
    self_kv: Option<(Tensor, Tensor)>,
    cross_kv: Option<(Tensor, Tensor)>,
}

/// Per-generation decoder state. Create a fresh one for every summary.
pub struct DecoderCache {
    layers: Vec<LayerCache>,
}

impl DecoderCache {
    fn new(num_layers: usize) -> Self {
        Self {
            layers: (0..num_layers).map(|_| LayerCache::default()).collect(),
        }
    }
}

struct Encoder {
    embed_positions: Embedding,
    layernorm_embedding: LayerNorm,
    layers: Vec<EncoderLayer>,
}

impl Encoder {
    fn load(config: &BartConfig, vb: VarBuilder) -> Result<Self> {
        let embed_positions = embedding(
            config.max_position_embeddings + POSITION_OFFSET,
            config.d_model,
            vb.pp("embed_positions"),
        )?;
        let layernorm_embedding = layer_norm(
            config.d_model,
            LAYER_NORM_EPS,
            vb.pp("layernorm_embedding"),
        )?;
        let layers = (0..config.encoder_layers)
            .map(|index| EncoderLayer::load(config, vb.pp(format!("layers.{index}"))))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            embed_positions,
            layernorm_embedding,
            layers,
        })
    }
}

struct Decoder {
    embed_positions: Embedding,
    layernorm_embedding: LayerNorm,
    layers: Vec<DecoderLayer>,
}

impl Decoder {
    fn load(config: &BartConfig, vb: VarBuilder) -> Result<Self> {
        let embed_positions = embedding(
            config.max_position_embeddings + POSITION_OFFSET,
            config.d_model,
            vb.pp("embed_positions"),
        )?;
        let layernorm_embedding = layer_norm(
            config.d_model,
            LAYER_NORM_EPS,
            vb.pp("layernorm_embedding"),
        )?;
        let layers = (0..config.decoder_layers)
            .map(|index| DecoderLayer::load(config, vb.pp(format!("layers.{index}"))))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            embed_positions,
            layernorm_embedding,
            layers,
        })
    }
}

pub struct BartModel {
    shared: Embedding,
    encoder: Encoder,
    decoder: Decoder,
    lm_head: Linear,
    final_logits_bias: Tensor,
    embed_scale: f64,
    config: BartConfig,
}

impl BartModel {
    pub fn load(config: BartConfig, vb: VarBuilder) -> Result<Self> {
        let model_vb = vb.pp("model");
        // Safetensors exports deduplicate the tied embedding; some keep the
        // shared tensor, others only the encoder copy.
        let shared = if model_vb.contains_tensor("shared.weight") {
            embedding(config.vocab_size, config.d_model, model_vb.pp("shared"))?
        } else {
            embedding(
                config.vocab_size,
                config.d_model,
                model_vb.pp("encoder.embed_tokens"),
            )?
        };
        let encoder = Encoder::load(&config, model_vb.pp("encoder"))?;
        let decoder = Decoder::load(&config, model_vb.pp("decoder"))?;
        // The lm head reuses the tied token embedding.
        let lm_head = Linear::new(shared.embeddings().clone(), None);
        let final_logits_bias = if vb.contains_tensor("final_logits_bias") {
            vb.get((1, config.vocab_size), "final_logits_bias")?
        } else {
            Tensor::zeros((1, config.vocab_size), DType::F32, vb.device())?
        };
        let embed_scale = if config.scale_embedding {
            (config.d_model as f64).sqrt()
        } else {
            1.0
        };
        Ok(Self {
            shared,
            encoder,
            decoder,
            lm_head,
            final_logits_bias,
            embed_scale,
            config,
        })
    }

    pub fn config(&self) -> &BartConfig {
        &self.config
    }

    pub fn new_cache(&self) -> DecoderCache {
        DecoderCache::new(self.decoder.layers.len())
    }

    /// Runs the encoder over `(1, seq_len)` token ids, returning the hidden
    /// states the decoder cross-attends to.
    pub fn encode(&self, input_ids: &Tensor) -> Result<Tensor> {
        let (_batch, seq_len) = input_ids.dims2()?;
        if seq_len > self.config.max_position_embeddings {
            return Err(Error::model(format!(
                "input of {seq_len} tokens exceeds the {} position slots",
                self.config.max_position_embeddings
            )));
        }
        let positions = Tensor::arange(
            POSITION_OFFSET as u32,
            (seq_len + POSITION_OFFSET) as u32,
            input_ids.device(),
        )?;
        let xs = (self.shared.forward(input_ids)? * self.embed_scale)?;
        let xs = xs.broadcast_add(&self.encoder.embed_positions.forward(&positions)?)?;
        let mut xs = self.encoder.layernorm_embedding.forward(&xs)?;
        for layer in &self.encoder.layers {
            xs = layer.forward(&xs)?;
        }
        Ok(xs)
    }

    /// Advances the decoder by one token and returns the next-token logits.
    /// `past_len` is the number of tokens already fed through `cache`.
    pub fn decode_step(
        &self,
        token_id: u32,
        encoder_out: &Tensor,
        past_len: usize,
        cache: &mut DecoderCache,
    ) -> Result<Vec<f32>> {
        if past_len >= self.config.max_position_embeddings {
            return Err(Error::model(format!(
                "decoder ran past the {} position slots",
                self.config.max_position_embeddings
            )));
        }
        let device = encoder_out.device();
        let input = Tensor::new(&[token_id], device)?.unsqueeze(0)?;
        let position = Tensor::new(&[(past_len + POSITION_OFFSET) as u32], device)?;
        let xs = (self.shared.forward(&input)? * self.embed_scale)?;
        let xs = xs.broadcast_add(&self.decoder.embed_positions.forward(&position)?)?;
        let mut xs = self.decoder.layernorm_embedding.forward(&xs)?;
        for (layer, layer_cache) in self.decoder.layers.iter().zip(cache.layers.iter_mut()) {
            xs = layer.forward_step(&xs, encoder_out, layer_cache)?;
        }
        let logits = self
            .lm_head
            .forward(&xs)?
            .broadcast_add(&self.final_logits_bias)?
            .squeeze(0)?
            .squeeze(0)?;
        Ok(logits.to_vec1::<f32>()?)
    }
}
