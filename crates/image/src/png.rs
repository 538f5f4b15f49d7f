use {
    crate::*,
    base::Vec2,
    crates_image::{
        DynamicImage, ExtendedColorType, GenericImageView, ImageEncoder, codecs::png::PngEncoder,
    },
    std::path::Path,
};

pub(crate) fn decode_image_inner(data: &[u8]) -> Result<Image, ImageError> {
    let decoded = crates_image::load_from_memory(data)?;
    let (width, height) = decoded.dimensions();
    let size = Vec2::new(width as usize, height as usize);
    let image = match decoded {
        DynamicImage::ImageLuma8(buf) => Image::new(size, buf.into_raw(), PixelFormat::Gray8),
        DynamicImage::ImageRgb8(buf) => Image::new(size, buf.into_raw(), PixelFormat::Rgb8),
        DynamicImage::ImageRgba8(buf) => Image::new(size, buf.into_raw(), PixelFormat::Rgba8),
        other if other.color().has_alpha() => {
            Image::new(size, other.to_rgba8().into_raw(), PixelFormat::Rgba8)
        }
        other => Image::new(size, other.to_rgb8().into_raw(), PixelFormat::Rgb8),
    };
    Ok(image)
}

pub(crate) fn encode_png_inner(image: &Image) -> Result<Vec<u8>, ImageError> {
    let (data, color_type) = match image.format {
        PixelFormat::Gray8 => (image.data.clone(), ExtendedColorType::L8),
        PixelFormat::Rgb8 => (image.data.clone(), ExtendedColorType::Rgb8),
        PixelFormat::Rgba8 => (image.data.clone(), ExtendedColorType::Rgba8),
        PixelFormat::Yuyv | PixelFormat::Jpeg => (image.to_rgb()?.data, ExtendedColorType::Rgb8),
    };
    image.validate()?;

    let mut buffer = Vec::new();
    PngEncoder::new(&mut buffer)
        .write_image(&data, image.size.x as u32, image.size.y as u32, color_type)
        .map_err(|e| ImageError::Encode(e.to_string()))?;
    Ok(buffer)
}

/// Decodes an image from encoded bytes (PNG, JPEG or WebP).
///
/// 8-bit grayscale, RGB and RGBA images keep their layout; anything else is
/// converted to `Rgba8` when it has alpha and `Rgb8` otherwise.
///
/// The CPU-bound decoding work runs on tokio's blocking thread pool.
pub async fn decode_image(data: &[u8]) -> Result<Image, ImageError> {
    let owned = data.to_vec();
    tokio::task::spawn_blocking(move || decode_image_inner(&owned))
        .await
        .map_err(|e| ImageError::Decode(e.to_string()))?
}

/// Encodes an `Image` as PNG bytes. Output is deterministic for a given image.
pub async fn encode_png(image: Image) -> Result<Vec<u8>, ImageError> {
    tokio::task::spawn_blocking(move || encode_png_inner(&image))
        .await
        .map_err(|e| ImageError::Encode(e.to_string()))?
}

/// Reads and decodes an image file.
pub async fn read_image(path: impl AsRef<Path>) -> Result<Image, ImageError> {
    let path = path.as_ref().to_path_buf();
    tokio::task::spawn_blocking(move || {
        let data = std::fs::read(&path)?;
        decode_image_inner(&data)
    })
    .await
    .map_err(|e| ImageError::Io(e.to_string()))?
}

/// Encodes `image` as PNG and writes it to `path`.
pub async fn write_png(path: impl AsRef<Path>, image: Image) -> Result<(), ImageError> {
    let path = path.as_ref().to_path_buf();
    tokio::task::spawn_blocking(move || {
        let encoded = encode_png_inner(&image)?;
        std::fs::write(&path, encoded)?;
        Ok(())
    })
    .await
    .map_err(|e| ImageError::Io(e.to_string()))?
}
