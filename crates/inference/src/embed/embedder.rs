use {
    super::mean_pool,
    crate::*,
    ndarray::Array2,
    ort::{inputs, session::Session, value::TensorRef},
    std::{
        fmt,
        future::Future,
        path::Path,
        sync::{Arc, Mutex},
    },
    tokenizers::{Tokenizer, TruncationParams},
};

const INPUT_IDS: &str = "input_ids";
const ATTENTION_MASK: &str = "attention_mask";
const OUTPUT_NAME: &str = "last_hidden_state";

const MAX_TOKENS: usize = 512;

/// Sentence embeddings from a transformer encoder, mean-pooled over tokens.
pub struct TextEmbedder {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    pad_id: u32,
}

impl fmt::Debug for TextEmbedder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextEmbedder")
            .field("pad_id", &self.pad_id)
            .finish()
    }
}

impl TextEmbedder {
    pub(crate) fn new(session: Session, tokenizer_path: impl AsRef<Path>) -> Result<Self, InferError> {
        let mut tokenizer = Tokenizer::from_file(tokenizer_path.as_ref())
            .map_err(|e| InferError::Tokenizer(e.to_string()))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_TOKENS,
                ..Default::default()
            }))
            .map_err(|e| InferError::Tokenizer(e.to_string()))?;
        let pad_id = ["<pad>", "[PAD]"]
            .iter()
            .find_map(|token| tokenizer.token_to_id(token))
            .unwrap_or(0);
        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            pad_id,
        })
    }

    /// One vector per input text, in input order.
    pub fn embed(
        &self,
        texts: Vec<String>,
    ) -> impl Future<Output = Result<Vec<Vec<f32>>, InferError>> + Send + 'static {
        let session = Arc::clone(&self.session);
        let tokenizer = Arc::clone(&self.tokenizer);
        let pad_id = self.pad_id;
        async move {
            if texts.is_empty() {
                return Ok(Vec::new());
            }
            tokio::task::spawn_blocking(move || {
                let encodings = tokenizer
                    .encode_batch(texts, true)
                    .map_err(|e| InferError::Tokenizer(e.to_string()))?;
                let ids: Vec<Vec<u32>> = encodings.iter().map(|e| e.get_ids().to_vec()).collect();
                let (input_ids, attention_mask) = pad_batch(&ids, pad_id)?;

                let mut session = session
                    .lock()
                    .map_err(|_| InferError::Runtime("embedder session poisoned".to_string()))?;
                let ids_tensor = TensorRef::from_array_view(input_ids.view())?;
                let mask_tensor = TensorRef::from_array_view(attention_mask.view())?;
                let outputs = session.run(inputs![
                    INPUT_IDS => ids_tensor,
                    ATTENTION_MASK => mask_tensor
                ])?;
                let hidden = outputs[OUTPUT_NAME].try_extract_array::<f32>()?;
                let shape = hidden.shape().to_vec();
                let data: Vec<f32> = hidden.iter().copied().collect();
                let mask: Vec<i64> = attention_mask.iter().copied().collect();
                mean_pool(&data, &shape, &mask)
            })
            .await?
        }
    }
}

/// Right-pad token id sequences into `[N, L]` id and mask matrices.
pub(crate) fn pad_batch(ids: &[Vec<u32>], pad_id: u32) -> Result<(Array2<i64>, Array2<i64>), InferError> {
    let n = ids.len();
    let l = ids.iter().map(Vec::len).max().unwrap_or(0).max(1);
    let mut input_ids = Vec::with_capacity(n * l);
    let mut attention_mask = Vec::with_capacity(n * l);
    for sequence in ids {
        for i in 0..l {
            match sequence.get(i) {
                Some(&id) => {
                    input_ids.push(id as i64);
                    attention_mask.push(1);
                }
                None => {
                    input_ids.push(pad_id as i64);
                    attention_mask.push(0);
                }
            }
        }
    }
    Ok((
        Array2::from_shape_vec((n, l), input_ids)?,
        Array2::from_shape_vec((n, l), attention_mask)?,
    ))
}
