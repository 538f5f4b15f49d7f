use crate::*;

fn pack_u32(r: u8, g: u8, b: u8) -> u32 {
    0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
}

/// Convert an image to packed `0xAARRGGBB` pixels for display.
///
/// Alpha in `Rgba8` sources is dropped; the display has no background to
/// blend against.
pub fn image_to_u32(image: &Image) -> Result<Vec<u32>, ImageError> {
    image.validate()?;
    let pixels = match image.format {
        PixelFormat::Gray8 => image.data.iter().map(|&v| pack_u32(v, v, v)).collect(),
        PixelFormat::Rgb8 => image
            .data
            .chunks_exact(3)
            .map(|c| pack_u32(c[0], c[1], c[2]))
            .collect(),
        PixelFormat::Rgba8 => image
            .data
            .chunks_exact(4)
            .map(|c| pack_u32(c[0], c[1], c[2]))
            .collect(),
        PixelFormat::Yuyv | PixelFormat::Jpeg => {
            let rgb = image.to_rgb()?;
            rgb.data
                .chunks_exact(3)
                .map(|c| pack_u32(c[0], c[1], c[2]))
                .collect()
        }
    };
    Ok(pixels)
}
