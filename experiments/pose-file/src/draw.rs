use {
    base::Vec2,
    image::{Color, Image, ImageError, draw_filled_circle, draw_line},
    inference::pose::Keypoint,
};

pub const LINE_WIDTH: u32 = 4;
pub const KEYPOINT_RADIUS: i32 = 6;
pub const KEYPOINT_COLOR: Color = [255, 0, 0, 255];

/// Skeleton edges as pairs of COCO keypoint indices.
pub const VITPOSE_EDGES: [(usize, usize); 18] = [
    (0, 1),
    (0, 2),
    (1, 3),
    (2, 4),
    (0, 5),
    (0, 6),
    (5, 6),
    (5, 7),
    (7, 9),
    (6, 8),
    (8, 10),
    (5, 11),
    (6, 12),
    (11, 12),
    (11, 13),
    (13, 15),
    (12, 14),
    (14, 16),
];

/// One colour per edge, same order as `VITPOSE_EDGES`.
pub const VITPOSE_COLORS: [Color; 18] = [
    [255, 0, 0, 255],
    [255, 85, 0, 255],
    [255, 170, 0, 255],
    [255, 255, 0, 255],
    [170, 255, 0, 255],
    [85, 255, 0, 255],
    [0, 255, 0, 255],
    [0, 255, 85, 255],
    [0, 255, 170, 255],
    [0, 255, 255, 255],
    [0, 170, 255, 255],
    [0, 85, 255, 255],
    [0, 0, 255, 255],
    [85, 0, 255, 255],
    [170, 0, 255, 255],
    [255, 0, 255, 255],
    [255, 0, 170, 255],
    [255, 0, 85, 255],
];

fn pixel(keypoint: &Keypoint) -> Vec2<i32> {
    Vec2::new(
        keypoint.position.x.round() as i32,
        keypoint.position.y.round() as i32,
    )
}

/// Draw the skeleton edges, then every keypoint on top.
///
/// Edges whose endpoints are missing from `keypoints` are skipped.
pub fn draw_pose(image: &mut Image, keypoints: &[Keypoint]) -> Result<(), ImageError> {
    for (&(a, b), &color) in VITPOSE_EDGES.iter().zip(VITPOSE_COLORS.iter()) {
        if let (Some(from), Some(to)) = (keypoints.get(a), keypoints.get(b)) {
            draw_line(image, pixel(from), pixel(to), LINE_WIDTH, color)?;
        }
    }
    for keypoint in keypoints {
        draw_filled_circle(image, pixel(keypoint), KEYPOINT_RADIUS, KEYPOINT_COLOR)?;
    }
    Ok(())
}

/// The pose drawn over `source`, as RGBA.
pub fn pose_overlay(source: &Image, keypoints: &[Keypoint]) -> Result<Image, ImageError> {
    let mut overlay = source.to_rgba()?;
    draw_pose(&mut overlay, keypoints)?;
    Ok(overlay)
}

/// The pose alone on a fully transparent canvas the size of `source`.
pub fn pose_only(source: &Image, keypoints: &[Keypoint]) -> Result<Image, ImageError> {
    let mut canvas = Image::blank(source.size, image::PixelFormat::Rgba8)?;
    draw_pose(&mut canvas, keypoints)?;
    Ok(canvas)
}
