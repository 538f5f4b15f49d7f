use {
    crate::*,
    base::Vec2,
    image::{Image, image_to_u32, resize_nearest},
};

/// Widest display surface accepted (8K).
pub const MAX_DISPLAY_WIDTH: usize = 7680;

/// Display size for a width, keeping the surface at 4:3.
pub fn display_size(width: usize) -> Result<Vec2<usize>, PipelineError> {
    if width > MAX_DISPLAY_WIDTH {
        return Err(PipelineError::Config(format!(
            "display width {} exceeds the maximum of {}",
            width, MAX_DISPLAY_WIDTH
        )));
    }
    let height = (width as f64 * 3.0 / 4.0).round() as usize;
    if width == 0 || height == 0 {
        return Err(PipelineError::Config(format!(
            "display width {} gives an empty surface",
            width
        )));
    }
    Ok(Vec2::new(width, height))
}

/// The pixels shown to the user, packed `0xAARRGGBB`.
///
/// Only the scheduler writes to it, either by compositing a result or by
/// an explicit resize.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySurface {
    size: Vec2<usize>,
    pixels: Vec<u32>,
}

impl DisplaySurface {
    /// A black surface.
    pub fn new(size: Vec2<usize>) -> Self {
        Self {
            size,
            pixels: vec![0xFF00_0000; size.area()],
        }
    }

    pub fn size(&self) -> Vec2<usize> {
        self.size
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Change dimensions. The content is cleared.
    pub fn resize(&mut self, size: Vec2<usize>) {
        if size != self.size {
            *self = Self::new(size);
        }
    }

    /// Scale `result` to the surface size with nearest-neighbour sampling and
    /// overwrite every pixel. The surface keeps its size whatever the result size.
    pub fn composite(&mut self, result: &Image) -> Result<(), PipelineError> {
        let scaled = resize_nearest(result, self.size)?;
        let pixels = image_to_u32(&scaled)?;
        if pixels.len() != self.pixels.len() {
            return Err(PipelineError::Image(format!(
                "composited {} pixels onto a surface of {}",
                pixels.len(),
                self.pixels.len()
            )));
        }
        self.pixels = pixels;
        Ok(())
    }
}
