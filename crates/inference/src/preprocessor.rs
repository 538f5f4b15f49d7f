use {
    crate::*,
    base::Vec2,
    serde::Deserialize,
    std::path::{Path, PathBuf},
};

pub const PREPROCESSOR_CONFIG_FILE: &str = "preprocessor_config.json";

const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

fn default_true() -> bool {
    true
}

fn default_rescale_factor() -> f32 {
    1.0 / 255.0
}

fn default_mean() -> [f32; 3] {
    IMAGENET_MEAN
}

fn default_std() -> [f32; 3] {
    IMAGENET_STD
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ModelInputSize {
    pub height: usize,
    pub width: usize,
}

/// The subset of a Hugging Face `preprocessor_config.json` the image models use.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PreprocessorConfig {
    #[serde(default = "default_true")]
    pub do_rescale: bool,
    #[serde(default = "default_rescale_factor")]
    pub rescale_factor: f32,
    #[serde(default = "default_true")]
    pub do_normalize: bool,
    #[serde(default = "default_mean")]
    pub image_mean: [f32; 3],
    #[serde(default = "default_std")]
    pub image_std: [f32; 3],
    pub size: ModelInputSize,
    #[serde(default)]
    pub keep_aspect_ratio: bool,
    #[serde(default)]
    pub ensure_multiple_of: Option<usize>,
}

impl PreprocessorConfig {
    pub fn depth_anything() -> Self {
        Self {
            do_rescale: true,
            rescale_factor: default_rescale_factor(),
            do_normalize: true,
            image_mean: IMAGENET_MEAN,
            image_std: IMAGENET_STD,
            size: ModelInputSize {
                height: 518,
                width: 518,
            },
            keep_aspect_ratio: true,
            ensure_multiple_of: Some(14),
        }
    }

    pub fn vitpose() -> Self {
        Self {
            do_rescale: true,
            rescale_factor: default_rescale_factor(),
            do_normalize: true,
            image_mean: IMAGENET_MEAN,
            image_std: IMAGENET_STD,
            size: ModelInputSize {
                height: 256,
                width: 192,
            },
            keep_aspect_ratio: false,
            ensure_multiple_of: None,
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, InferError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, InferError> {
        let config: Self = serde_json::from_str(text)?;
        if config.size.width == 0 || config.size.height == 0 {
            return Err(InferError::Config("model input size must be non-zero".to_string()));
        }
        if config.image_std.iter().any(|&s| s == 0.0) {
            return Err(InferError::Config("image_std must be non-zero".to_string()));
        }
        Ok(config)
    }

    /// Look for a config file beside the model, or one directory up
    /// (`repo/onnx/model.onnx` layouts).
    pub fn find(model_path: &Path) -> Result<Option<Self>, InferError> {
        let mut candidates: Vec<PathBuf> = Vec::new();
        if let Some(dir) = model_path.parent() {
            candidates.push(dir.join(PREPROCESSOR_CONFIG_FILE));
            if let Some(up) = dir.parent() {
                candidates.push(up.join(PREPROCESSOR_CONFIG_FILE));
            }
        }
        for candidate in candidates {
            if candidate.is_file() {
                base::log_debug!("using {}", candidate.display());
                return Ok(Some(Self::from_file(candidate)?));
            }
        }
        Ok(None)
    }

    /// Input size for an image, honouring `keep_aspect_ratio` and `ensure_multiple_of`.
    pub fn input_size(&self, image_size: Vec2<usize>) -> Vec2<usize> {
        let multiple = self.ensure_multiple_of.unwrap_or(1).max(1);
        let mut scale_w = self.size.width as f32 / image_size.x as f32;
        let mut scale_h = self.size.height as f32 / image_size.y as f32;
        if self.keep_aspect_ratio {
            // scale as little as possible
            if (1.0 - scale_w).abs() < (1.0 - scale_h).abs() {
                scale_h = scale_w;
            } else {
                scale_w = scale_h;
            }
        }
        Vec2::new(
            round_to_multiple(image_size.x as f32 * scale_w, multiple),
            round_to_multiple(image_size.y as f32 * scale_h, multiple),
        )
    }

    /// Rescale and normalize interleaved RGB samples (0..=255) into planar CHW.
    pub fn to_chw(&self, rgb: &[f32], size: Vec2<usize>) -> Vec<f32> {
        let plane = size.area();
        let mut chw = vec![0.0f32; plane * 3];
        for (i, pixel) in rgb.chunks_exact(3).take(plane).enumerate() {
            for c in 0..3 {
                let mut value = pixel[c];
                if self.do_rescale {
                    value *= self.rescale_factor;
                }
                if self.do_normalize {
                    value = (value - self.image_mean[c]) / self.image_std[c];
                }
                chw[c * plane + i] = value;
            }
        }
        chw
    }
}

fn round_to_multiple(value: f32, multiple: usize) -> usize {
    let rounded = (value / multiple as f32).round() as usize * multiple;
    rounded.max(multiple)
}
