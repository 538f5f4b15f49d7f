use {
    base::Vec2,
    image::{Image, PixelFormat},
    inference::{InferError, Inference, cosine_similarity},
    std::path::PathBuf,
};

fn model_path(var: &str, default: &str) -> Option<PathBuf> {
    let path = PathBuf::from(std::env::var(var).unwrap_or_else(|_| default.to_string()));
    if path.exists() {
        Some(path)
    } else {
        eprintln!("{} not found, skipping", path.display());
        None
    }
}

#[test]
fn test_onnx_session_nonexistent_file() {
    let inference = Inference::cpu().unwrap();
    match inference.onnx_session("nonexistent.onnx") {
        Err(InferError::Io(msg)) => assert!(msg.contains("not found")),
        other => panic!("expected Io error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_use_depth_estimator_missing_model() {
    let inference = Inference::cpu().unwrap();
    assert!(inference.use_depth_estimator("missing/model.onnx").is_err());
}

#[test]
fn test_use_text_embedder_missing_model() {
    let inference = Inference::cpu().unwrap();
    assert!(
        inference
            .use_text_embedder("missing/model.onnx", "missing/tokenizer.json")
            .is_err()
    );
}

#[tokio::test]
async fn test_depth_matches_input_size() {
    let Some(path) = model_path("DEPTH_MODEL_PATH", "../../data/depth-anything-v2-small/onnx/model.onnx") else {
        return;
    };
    let depth = Inference::cpu().unwrap().use_depth_estimator(path).unwrap();
    let image = Image::filled(Vec2::new(320, 240), PixelFormat::Rgb8, &[90, 120, 150]).unwrap();
    let result = depth.estimate(image).await.unwrap();
    assert_eq!(result.size, Vec2::new(320, 240));
    assert_eq!(result.format, PixelFormat::Gray8);
}

#[tokio::test]
async fn test_pose_returns_17_keypoints() {
    let Some(path) = model_path("POSE_MODEL_PATH", "../../data/vitpose-base-simple/onnx/model.onnx") else {
        return;
    };
    let pose = Inference::cpu().unwrap().use_pose_estimator(path).unwrap();
    let image = Image::filled(Vec2::new(192, 256), PixelFormat::Rgb8, &[128, 128, 128]).unwrap();
    let estimate = pose.estimate(image).await.unwrap();
    assert_eq!(estimate.keypoints.len(), 17);
}

#[tokio::test]
async fn test_embeddings_are_ordered_and_equal_length() {
    let (Some(model), Some(tokenizer)) = (
        model_path("EMBED_MODEL_PATH", "../../data/multilingual-e5-large/onnx/model.onnx"),
        model_path("EMBED_TOKENIZER_PATH", "../../data/multilingual-e5-large/tokenizer.json"),
    ) else {
        return;
    };
    let embedder = Inference::cpu()
        .unwrap()
        .use_text_embedder(model, tokenizer)
        .unwrap();
    let texts = vec![
        "query: Today is a beautiful day".to_string(),
        "query: Today is a great day".to_string(),
        "query: The invoice is overdue".to_string(),
    ];
    let vectors = embedder.embed(texts).await.unwrap();
    assert_eq!(vectors.len(), 3);
    assert!(vectors.iter().all(|v| v.len() == vectors[0].len()));
    let close = cosine_similarity(&vectors[0], &vectors[1]).unwrap();
    let far = cosine_similarity(&vectors[0], &vectors[2]).unwrap();
    assert!(close > far);
}
