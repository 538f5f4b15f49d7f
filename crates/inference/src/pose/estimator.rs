use {
    super::{PoseEstimate, keypoints_from_heatmaps, preprocess::preprocess},
    crate::*,
    image::Image,
    ort::{inputs, session::Session, value::TensorRef},
    std::{
        fmt,
        future::Future,
        sync::{Arc, Mutex},
    },
};

const INPUT_NAME: &str = "pixel_values";
const OUTPUT_NAME: &str = "heatmaps";

/// Single-person top-down pose estimation (ViTPose style).
///
/// The whole image is treated as the person box; keypoints come back in
/// source image pixels.
pub struct PoseEstimator {
    session: Arc<Mutex<Session>>,
    config: Arc<PreprocessorConfig>,
}

impl fmt::Debug for PoseEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoseEstimator")
            .field("config", &self.config)
            .finish()
    }
}

impl PoseEstimator {
    pub(crate) fn new(session: Session, config: PreprocessorConfig) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            config: Arc::new(config),
        }
    }

    pub fn estimate(
        &self,
        image: Image,
    ) -> impl Future<Output = Result<PoseEstimate, InferError>> + Send + 'static {
        let session = Arc::clone(&self.session);
        let config = Arc::clone(&self.config);
        async move {
            tokio::task::spawn_blocking(move || {
                let (input, region) = preprocess(&image, &config)?;
                let mut session = session
                    .lock()
                    .map_err(|_| InferError::Runtime("pose session poisoned".to_string()))?;
                let tensor = TensorRef::from_array_view(input.view())?;
                let outputs = session.run(inputs![INPUT_NAME => tensor])?;
                let heatmaps = outputs[OUTPUT_NAME].try_extract_array::<f32>()?;
                let shape = heatmaps.shape().to_vec();
                let data: Vec<f32> = heatmaps.iter().copied().collect();
                let keypoints = keypoints_from_heatmaps(&data, &shape, &region)?;
                Ok(PoseEstimate { keypoints })
            })
            .await?
        }
    }
}
