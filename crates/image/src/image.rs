use {crate::*, base::Vec2};

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub size: Vec2<usize>,
    pub data: Vec<u8>,
    pub format: PixelFormat,
}

impl Image {
    pub fn new(size: Vec2<usize>, data: Vec<u8>, format: PixelFormat) -> Self {
        Self { size, data, format }
    }

    /// An image of the given size with every byte set to zero.
    ///
    /// For `Rgba8` this is a fully transparent canvas.
    pub fn blank(size: Vec2<usize>, format: PixelFormat) -> Result<Self, ImageError> {
        let bpp = format
            .bytes_per_pixel()
            .ok_or_else(|| ImageError::Format(format!("cannot allocate {:?} image", format)))?;
        Ok(Self::new(size, vec![0u8; size.area() * bpp], format))
    }

    /// An image of the given size with every pixel set to `pixel`.
    pub fn filled(size: Vec2<usize>, format: PixelFormat, pixel: &[u8]) -> Result<Self, ImageError> {
        if format.bytes_per_pixel() != Some(pixel.len()) || format == PixelFormat::Yuyv {
            return Err(ImageError::Format(format!(
                "pixel of {} bytes does not fit {:?}",
                pixel.len(),
                format
            )));
        }
        Ok(Self::new(size, pixel.repeat(size.area()), format))
    }

    pub fn width(&self) -> usize {
        self.size.x
    }

    pub fn height(&self) -> usize {
        self.size.y
    }

    /// Check that `data` holds exactly `size` pixels of `format`.
    pub fn validate(&self) -> Result<(), ImageError> {
        if let Some(bpp) = self.format.bytes_per_pixel() {
            let expected = self.size.area() * bpp;
            if self.data.len() != expected {
                return Err(ImageError::Size {
                    expected,
                    got: self.data.len(),
                });
            }
        }
        Ok(())
    }

    /// Convert to packed RGB, decoding compressed formats if needed.
    pub fn to_rgb(&self) -> Result<Image, ImageError> {
        self.validate()?;
        match self.format {
            PixelFormat::Rgb8 => Ok(self.clone()),
            PixelFormat::Rgba8 => Ok(Image::new(
                self.size,
                rgba_to_rgb(&self.data),
                PixelFormat::Rgb8,
            )),
            PixelFormat::Gray8 => Ok(Image::new(
                self.size,
                gray_to_rgb(&self.data),
                PixelFormat::Rgb8,
            )),
            PixelFormat::Yuyv => Ok(Image::new(
                self.size,
                yuyv_to_rgb(self.size, &self.data),
                PixelFormat::Rgb8,
            )),
            PixelFormat::Jpeg => jpeg_to_rgb(self),
        }
    }

    /// Convert to packed RGBA with opaque alpha where the source has none.
    pub fn to_rgba(&self) -> Result<Image, ImageError> {
        if self.format == PixelFormat::Rgba8 {
            self.validate()?;
            return Ok(self.clone());
        }
        let rgb = self.to_rgb()?;
        let data = rgb
            .data
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1], c[2], 0xFF])
            .collect();
        Ok(Image::new(self.size, data, PixelFormat::Rgba8))
    }
}
