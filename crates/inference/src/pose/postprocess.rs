use {
    super::{CropRegion, Keypoint},
    crate::*,
    base::Vec2,
};

/// Decode `[1, K, H, W]` heatmaps into one keypoint per channel.
///
/// Each keypoint is the heatmap argmax, nudged a quarter pixel toward the
/// higher neighbour, then mapped from the heatmap grid onto `region`.
pub fn keypoints_from_heatmaps(
    heatmaps: &[f32],
    shape: &[usize],
    region: &CropRegion,
) -> Result<Vec<Keypoint>, InferError> {
    let &[batch, count, h, w] = shape else {
        return Err(InferError::Shape(format!(
            "expected [1, K, H, W] heatmaps, got {:?}",
            shape
        )));
    };
    if batch != 1 || h == 0 || w == 0 || heatmaps.len() != count * h * w {
        return Err(InferError::Shape(format!(
            "heatmap shape {:?} does not match {} values",
            shape,
            heatmaps.len()
        )));
    }

    let grid = Vec2::new(w, h);
    let keypoints = heatmaps
        .chunks_exact(h * w)
        .map(|heatmap| {
            let (peak, score) = heatmap.iter().copied().enumerate().fold(
                (0usize, f32::NEG_INFINITY),
                |best, (i, v)| if v > best.1 { (i, v) } else { best },
            );
            let (px, py) = (peak % w, peak / w);
            let at = |x: usize, y: usize| heatmap[y * w + x];
            let mut x = px as f32;
            let mut y = py as f32;
            if px > 0 && px + 1 < w {
                x += quarter_step(at(px + 1, py) - at(px - 1, py));
            }
            if py > 0 && py + 1 < h {
                y += quarter_step(at(px, py + 1) - at(px, py - 1));
            }
            Keypoint {
                position: region.to_image(Vec2::new(x, y), grid),
                score,
            }
        })
        .collect();
    Ok(keypoints)
}

fn quarter_step(slope: f32) -> f32 {
    if slope > 0.0 {
        0.25
    } else if slope < 0.0 {
        -0.25
    } else {
        0.0
    }
}
