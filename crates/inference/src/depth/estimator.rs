use {
    super::depth_to_image,
    crate::*,
    base::Tensor,
    image::{Image, resize_bilinear_f32},
    ndarray::Array4,
    ort::{inputs, session::Session, value::TensorRef},
    std::{
        fmt,
        future::Future,
        sync::{Arc, Mutex},
    },
};

const INPUT_NAME: &str = "pixel_values";
const OUTPUT_NAME: &str = "predicted_depth";

/// Relative depth estimation (Depth Anything style).
///
/// `estimate` takes any decodable image and returns a `Gray8` depth map at the
/// same resolution, brighter meaning closer.
pub struct DepthEstimator {
    session: Arc<Mutex<Session>>,
    config: Arc<PreprocessorConfig>,
}

impl fmt::Debug for DepthEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DepthEstimator")
            .field("config", &self.config)
            .finish()
    }
}

impl DepthEstimator {
    pub(crate) fn new(session: Session, config: PreprocessorConfig) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &PreprocessorConfig {
        &self.config
    }

    /// Run the model on a blocking thread. The returned future owns everything
    /// it needs, so it can outlive `self`.
    pub fn estimate(
        &self,
        image: Image,
    ) -> impl Future<Output = Result<Image, InferError>> + Send + 'static {
        let session = Arc::clone(&self.session);
        let config = Arc::clone(&self.config);
        async move {
            tokio::task::spawn_blocking(move || {
                let input = preprocess(&image, &config)?;
                let prediction = {
                    let mut session = session
                        .lock()
                        .map_err(|_| InferError::Runtime("depth session poisoned".to_string()))?;
                    let tensor = TensorRef::from_array_view(input.view())?;
                    let outputs = session.run(inputs![INPUT_NAME => tensor])?;
                    let output = outputs[OUTPUT_NAME].try_extract_array::<f32>()?;
                    Tensor::new(output.shape().to_vec(), output.iter().copied().collect())?
                };
                depth_to_image(&prediction, image.size)
            })
            .await?
        }
    }
}

/// Image -> NCHW tensor at the model's input size.
pub(crate) fn preprocess(image: &Image, config: &PreprocessorConfig) -> Result<Array4<f32>, InferError> {
    if image.size.is_empty() {
        return Err(InferError::Shape(format!(
            "image dimensions must be non-zero, got {}",
            image.size
        )));
    }
    let rgb = image.to_rgb()?;
    let size = config.input_size(rgb.size);
    let samples: Vec<f32> = rgb.data.iter().map(|&v| v as f32).collect();
    let resized = if size == rgb.size {
        samples
    } else {
        resize_bilinear_f32(&samples, 3, rgb.size, size)?
    };
    let chw = config.to_chw(&resized, size);
    Ok(Array4::from_shape_vec((1, 3, size.y, size.x), chw)?)
}
