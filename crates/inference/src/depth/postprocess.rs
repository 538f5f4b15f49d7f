use {
    crate::*,
    base::{Tensor, Vec2},
    image::{Image, PixelFormat, resize_bilinear_f32},
};

/// Turn a raw `[.., H, W]` depth prediction into an 8-bit map at `size`.
///
/// The prediction is resized bilinearly, then scaled so its maximum maps to 255.
pub fn depth_to_image(prediction: &Tensor<f32>, size: Vec2<usize>) -> Result<Image, InferError> {
    let shape = &prediction.shape;
    if shape.len() < 2 {
        return Err(InferError::Shape(format!(
            "expected [.., H, W] depth output, got {:?}",
            shape
        )));
    }
    let (h, w) = (shape[shape.len() - 2], shape[shape.len() - 1]);
    let batch: usize = shape[..shape.len() - 2].iter().product();
    if batch != 1 {
        return Err(InferError::Shape(format!(
            "expected a single {}x{} depth map, got shape {:?}",
            w, h, shape
        )));
    }

    let from = Vec2::new(w, h);
    let resized = if from == size {
        prediction.data.clone()
    } else {
        resize_bilinear_f32(&prediction.data, 1, from, size)?
    };

    let max = resized.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let scale = if max.is_finite() && max > 0.0 { 255.0 / max } else { 0.0 };
    let data = resized
        .iter()
        .map(|&v| (v * scale).clamp(0.0, 255.0) as u8)
        .collect();
    Ok(Image::new(size, data, PixelFormat::Gray8))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tensor(shape: &[usize], data: Vec<f32>) -> Tensor<f32> {
        Tensor::new(shape.to_vec(), data).unwrap()
    }

    #[test]
    fn maximum_maps_to_255() {
        let image = depth_to_image(&tensor(&[1, 2, 2], vec![0.0, 1.0, 2.0, 4.0]), Vec2::new(2, 2)).unwrap();
        assert_eq!(image.format, PixelFormat::Gray8);
        assert_eq!(image.data, vec![0, 63, 127, 255]);
    }

    #[test]
    fn output_has_requested_size() {
        let prediction = vec![1.0f32; 37 * 49];
        let image = depth_to_image(&tensor(&[1, 1, 37, 49], prediction), Vec2::new(640, 480)).unwrap();
        assert_eq!(image.size, Vec2::new(640, 480));
        assert!(image.data.iter().all(|&v| v == 255));
    }

    #[test]
    fn all_zero_prediction_is_black() {
        let image = depth_to_image(&tensor(&[2, 2], vec![0.0; 4]), Vec2::new(2, 2)).unwrap();
        assert_eq!(image.data, vec![0; 4]);
    }

    #[test]
    fn negative_values_clamp_to_zero() {
        let image = depth_to_image(&tensor(&[1, 2], vec![-1.0, 2.0]), Vec2::new(2, 1)).unwrap();
        assert_eq!(image.data, vec![0, 255]);
    }

    #[test]
    fn rejects_batched_output() {
        let result = depth_to_image(&tensor(&[2, 2, 2], vec![0.0; 8]), Vec2::new(2, 2));
        assert!(matches!(result, Err(InferError::Shape(_))));
    }
}
