use {
    crate::*,
    base::Vec2,
    image::Image,
    ndarray::Array4,
};

// margin around the person box, as in top-down pose training
const PADDING_FACTOR: f32 = 1.25;

/// Region of the source image that the model input covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRegion {
    pub origin: Vec2<f32>,
    pub size: Vec2<f32>,
}

impl CropRegion {
    /// Grow `size` around its centre to the model aspect ratio, then pad it.
    pub fn around_box(origin: Vec2<f32>, size: Vec2<f32>, input: Vec2<usize>) -> Self {
        let aspect = input.x as f32 / input.y as f32;
        let center = Vec2::new(origin.x + size.x * 0.5, origin.y + size.y * 0.5);
        let (mut w, mut h) = (size.x, size.y);
        if w > aspect * h {
            h = w / aspect;
        } else if w < aspect * h {
            w = h * aspect;
        }
        w *= PADDING_FACTOR;
        h *= PADDING_FACTOR;
        Self {
            origin: Vec2::new(center.x - w * 0.5, center.y - h * 0.5),
            size: Vec2::new(w, h),
        }
    }

    /// Map a point in a `grid`-sized lattice over this region to image pixels.
    pub fn to_image(&self, point: Vec2<f32>, grid: Vec2<usize>) -> Vec2<f32> {
        Vec2::new(
            self.origin.x + point.x * self.size.x / grid.x as f32,
            self.origin.y + point.y * self.size.y / grid.y as f32,
        )
    }
}

/// Crop the whole image (as the person box) into the model input.
pub(crate) fn preprocess(
    image: &Image,
    config: &PreprocessorConfig,
) -> Result<(Array4<f32>, CropRegion), InferError> {
    if image.size.is_empty() {
        return Err(InferError::Shape(format!(
            "image dimensions must be non-zero, got {}",
            image.size
        )));
    }
    let rgb = image.to_rgb()?;
    let input = Vec2::new(config.size.width, config.size.height);
    let region = CropRegion::around_box(
        Vec2::new(0.0, 0.0),
        Vec2::new(rgb.size.x as f32, rgb.size.y as f32),
        input,
    );
    let samples = crop_bilinear(&rgb, &region, input);
    let chw = config.to_chw(&samples, input);
    let tensor = Array4::from_shape_vec((1, 3, input.y, input.x), chw)?;
    Ok((tensor, region))
}

/// Bilinear crop of an RGB image; pixels outside the image read as black.
fn crop_bilinear(rgb: &Image, region: &CropRegion, out: Vec2<usize>) -> Vec<f32> {
    let (w, h) = (rgb.size.x as isize, rgb.size.y as isize);
    let texel = |x: isize, y: isize, c: usize| -> f32 {
        if x < 0 || y < 0 || x >= w || y >= h {
            0.0
        } else {
            rgb.data[((y * w + x) as usize) * 3 + c] as f32
        }
    };

    let mut samples = Vec::with_capacity(out.area() * 3);
    for oy in 0..out.y {
        let sy = region.origin.y + (oy as f32 + 0.5) * region.size.y / out.y as f32 - 0.5;
        let y0 = sy.floor();
        let fy = sy - y0;
        for ox in 0..out.x {
            let sx = region.origin.x + (ox as f32 + 0.5) * region.size.x / out.x as f32 - 0.5;
            let x0 = sx.floor();
            let fx = sx - x0;
            let (x0, y0) = (x0 as isize, y0 as isize);
            for c in 0..3 {
                let top = texel(x0, y0, c) * (1.0 - fx) + texel(x0 + 1, y0, c) * fx;
                let bottom = texel(x0, y0 + 1, c) * (1.0 - fx) + texel(x0 + 1, y0 + 1, c) * fx;
                samples.push(top * (1.0 - fy) + bottom * fy);
            }
        }
    }
    samples
}

#[cfg(test)]
mod tests {
    use {super::*, image::PixelFormat};

    #[test]
    fn tall_box_widens_to_aspect() {
        let region = CropRegion::around_box(
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 400.0),
            Vec2::new(192, 256),
        );
        // 400 tall -> 300 wide at 3:4, then padded by 1.25
        assert!((region.size.x - 375.0).abs() < 1e-3);
        assert!((region.size.y - 500.0).abs() < 1e-3);
        assert!((region.origin.x - (50.0 - 187.5)).abs() < 1e-3);
        assert!((region.origin.y - (200.0 - 250.0)).abs() < 1e-3);
    }

    #[test]
    fn grid_maps_back_to_image() {
        let region = CropRegion {
            origin: Vec2::new(-10.0, 20.0),
            size: Vec2::new(96.0, 128.0),
        };
        let point = region.to_image(Vec2::new(24.0, 32.0), Vec2::new(48, 64));
        assert_eq!(point, Vec2::new(38.0, 84.0));
    }

    #[test]
    fn preprocess_uses_model_input_size() {
        let image = Image::filled(Vec2::new(640, 480), PixelFormat::Rgb8, &[10, 20, 30]).unwrap();
        let (tensor, region) = preprocess(&image, &PreprocessorConfig::vitpose()).unwrap();
        assert_eq!(tensor.shape(), &[1, 3, 256, 192]);
        assert!(region.size.x >= 640.0);
        assert!(region.size.y >= 480.0);
    }

    #[test]
    fn padding_outside_image_is_black() {
        let image = Image::filled(Vec2::new(4, 4), PixelFormat::Rgb8, &[255, 255, 255]).unwrap();
        let region = CropRegion {
            origin: Vec2::new(-8.0, 0.0),
            size: Vec2::new(4.0, 4.0),
        };
        let samples = crop_bilinear(&image.to_rgb().unwrap(), &region, Vec2::new(2, 2));
        assert!(samples.iter().all(|&v| v == 0.0));
    }
}
