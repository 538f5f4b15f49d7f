use {
    base::*,
    inference::{Inference, cosine_similarity},
};

const DEFAULT_MODEL: &str = "data/multilingual-e5-large/onnx/model.onnx";
const DEFAULT_TOKENIZER: &str = "data/multilingual-e5-large/tokenizer.json";

const DEFAULT_TEXTS: [&str; 2] = [
    "query: Today is a beautiful day",
    "query: Today is a great day",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    base::init_stdout_logger();

    // two texts on the command line replace the defaults
    let args: Vec<String> = std::env::args().skip(1).collect();
    let texts: Vec<String> = if args.len() == 2 {
        args
    } else {
        DEFAULT_TEXTS.iter().map(|s| s.to_string()).collect()
    };

    let model_path =
        std::env::var("EMBED_MODEL_PATH").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
    let tokenizer_path =
        std::env::var("EMBED_TOKENIZER_PATH").unwrap_or_else(|_| DEFAULT_TOKENIZER.to_string());
    log_info!("loading embedding model {}", model_path);
    #[cfg(feature = "cuda")]
    let inference = Inference::cuda(0)?;
    #[cfg(not(feature = "cuda"))]
    let inference = Inference::cpu()?;
    let embedder = inference.use_text_embedder(&model_path, &tokenizer_path)?;

    let embeddings = embedder.embed(texts.clone()).await?;
    for (text, embedding) in texts.iter().zip(&embeddings) {
        log_info!("{:?}: {} dimensions", text, embedding.len());
    }
    let [first, second] = embeddings.as_slice() else {
        return Err(format!("expected 2 embeddings, got {}", embeddings.len()).into());
    };
    let similarity = cosine_similarity(first, second)?;
    println!("Cosine Similarity: {}", similarity);
    Ok(())
}
