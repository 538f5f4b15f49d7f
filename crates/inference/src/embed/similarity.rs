use crate::*;

/// `dot(a, b) / (|a| * |b|)`. A zero vector has similarity 0 with anything.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, InferError> {
    if a.len() != b.len() {
        return Err(InferError::Shape(format!(
            "cannot compare vectors of length {} and {}",
            a.len(),
            b.len()
        )));
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a * norm_b))
}
