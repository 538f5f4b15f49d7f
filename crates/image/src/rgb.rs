use {crate::*, base::Vec2};

pub fn yuyv_to_rgb(size: Vec2<usize>, data: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(size.area() * 3);
    for chunk in data.chunks_exact(4) {
        let (r0, g0, b0) = yuv_to_rgb(chunk[0], chunk[1], chunk[3]);
        let (r1, g1, b1) = yuv_to_rgb(chunk[2], chunk[1], chunk[3]);
        rgb.extend_from_slice(&[r0, g0, b0, r1, g1, b1]);
    }
    rgb
}

pub fn rgba_to_rgb(data: &[u8]) -> Vec<u8> {
    data.chunks_exact(4).flat_map(|c| [c[0], c[1], c[2]]).collect()
}

pub fn gray_to_rgb(data: &[u8]) -> Vec<u8> {
    data.iter().flat_map(|&v| [v, v, v]).collect()
}

pub fn jpeg_to_rgb(image: &Image) -> Result<Image, ImageError> {
    image.format.ensure_format(PixelFormat::Jpeg)?;
    let decoded = crates_image::load_from_memory(&image.data)
        .map_err(|e| ImageError::Decode(format!("failed to decode JPEG: {}", e)))?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();
    Ok(Image::new(
        Vec2::new(width as usize, height as usize),
        rgb.into_raw(),
        PixelFormat::Rgb8,
    ))
}
