use {crate::*, base::Vec2};

fn packed_channels(image: &Image) -> Result<usize, ImageError> {
    match image.format {
        PixelFormat::Gray8 | PixelFormat::Rgb8 | PixelFormat::Rgba8 => {
            image.validate()?;
            Ok(image.format.bytes_per_pixel().unwrap_or(1))
        }
        _ => Err(ImageError::Format(format!(
            "cannot resize {:?} image, convert to a packed format first",
            image.format
        ))),
    }
}

fn ensure_resizable(from: Vec2<usize>, to: Vec2<usize>) -> Result<(), ImageError> {
    if from.is_empty() || to.is_empty() {
        return Err(ImageError::Format(format!(
            "cannot resize {} to {}",
            from, to
        )));
    }
    Ok(())
}

/// Nearest-neighbour resize.
///
/// Destination pixel `(x, y)` copies source pixel
/// `(floor(x * src_w / dst_w), floor(y * src_h / dst_h))`. Same input and
/// size always produce the same output.
pub fn resize_nearest(image: &Image, size: Vec2<usize>) -> Result<Image, ImageError> {
    let channels = packed_channels(image)?;
    ensure_resizable(image.size, size)?;
    if image.size == size {
        return Ok(image.clone());
    }

    let src = image.size;
    let columns: Vec<usize> = (0..size.x).map(|x| (x * src.x / size.x).min(src.x - 1)).collect();
    let mut data = Vec::with_capacity(size.area() * channels);
    for y in 0..size.y {
        let row = (y * src.y / size.y).min(src.y - 1) * src.x;
        for &column in &columns {
            let offset = (row + column) * channels;
            data.extend_from_slice(&image.data[offset..offset + channels]);
        }
    }
    Ok(Image::new(size, data, image.format))
}

// source coordinate and blend weight for one destination index, pixel centres aligned
fn bilinear_axis(dst: usize, src_len: usize, dst_len: usize) -> (usize, usize, f32) {
    let position = ((dst as f32 + 0.5) * src_len as f32 / dst_len as f32 - 0.5)
        .clamp(0.0, (src_len - 1) as f32);
    let low = position.floor() as usize;
    let high = (low + 1).min(src_len - 1);
    (low, high, position - low as f32)
}

/// Bilinear resize of an interleaved `f32` buffer with `channels` values per pixel.
pub fn resize_bilinear_f32(
    data: &[f32],
    channels: usize,
    from: Vec2<usize>,
    to: Vec2<usize>,
) -> Result<Vec<f32>, ImageError> {
    ensure_resizable(from, to)?;
    let expected = from.area() * channels;
    if data.len() != expected {
        return Err(ImageError::Size {
            expected,
            got: data.len(),
        });
    }

    let columns: Vec<_> = (0..to.x).map(|x| bilinear_axis(x, from.x, to.x)).collect();
    let mut out = Vec::with_capacity(to.area() * channels);
    for y in 0..to.y {
        let (y0, y1, fy) = bilinear_axis(y, from.y, to.y);
        for &(x0, x1, fx) in &columns {
            for c in 0..channels {
                let at = |x: usize, y: usize| data[(y * from.x + x) * channels + c];
                let top = at(x0, y0) * (1.0 - fx) + at(x1, y0) * fx;
                let bottom = at(x0, y1) * (1.0 - fx) + at(x1, y1) * fx;
                out.push(top * (1.0 - fy) + bottom * fy);
            }
        }
    }
    Ok(out)
}

/// Bilinear resize of a packed 8-bit image.
pub fn resize_bilinear(image: &Image, size: Vec2<usize>) -> Result<Image, ImageError> {
    let channels = packed_channels(image)?;
    if image.size == size {
        return Ok(image.clone());
    }
    let source: Vec<f32> = image.data.iter().map(|&v| v as f32).collect();
    let resized = resize_bilinear_f32(&source, channels, image.size, size)?;
    let data = resized
        .into_iter()
        .map(|v| v.round().clamp(0.0, 255.0) as u8)
        .collect();
    Ok(Image::new(size, data, image.format))
}
