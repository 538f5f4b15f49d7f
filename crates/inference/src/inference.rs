use {
    crate::*,
    ort::session::Session,
    std::path::Path,
};

#[derive(Debug, Clone, Copy)]
enum OnnxDevice {
    Cpu,
    #[allow(dead_code)]
    Cuda(usize),
}

/// Entry point for loading models onto a device.
#[derive(Debug)]
pub struct Inference {
    onnx_device: OnnxDevice,
}

impl Inference {
    pub fn cpu() -> Result<Self, InferError> {
        base::log_info!("Inference device: CPU");
        Ok(Self {
            onnx_device: OnnxDevice::Cpu,
        })
    }

    #[cfg(feature = "cuda")]
    pub fn cuda(ordinal: usize) -> Result<Self, InferError> {
        base::log_info!("Inference device: CUDA (ordinal {})", ordinal);
        Ok(Self {
            onnx_device: OnnxDevice::Cuda(ordinal),
        })
    }

    pub fn onnx_session(&self, model_path: impl AsRef<Path>) -> Result<Session, InferError> {
        let path = model_path.as_ref();
        if !path.exists() {
            return Err(InferError::Io(format!(
                "model not found: {}",
                path.display()
            )));
        }
        let mut builder = Session::builder()?;
        let session = match self.onnx_device {
            OnnxDevice::Cpu => builder
                .commit_from_file(path)
                .map_err(|e| InferError::Onnx(format!("failed to load {}: {e}", path.display())))?,
            #[cfg(feature = "cuda")]
            OnnxDevice::Cuda(ordinal) => {
                use ort::execution_providers::CUDAExecutionProvider;
                builder
                    .with_execution_providers([CUDAExecutionProvider::default()
                        .with_device_id(ordinal as i32)
                        .build()])
                    .map_err(|e| InferError::Onnx(e.to_string()))?
                    .commit_from_file(path)
                    .map_err(|e| {
                        InferError::Onnx(format!("failed to load {}: {e}", path.display()))
                    })?
            }
            #[cfg(not(feature = "cuda"))]
            OnnxDevice::Cuda(_) => {
                return Err(InferError::Runtime("CUDA feature not enabled".to_string()));
            }
        };
        base::log_info!("loaded model {}", path.display());
        Ok(session)
    }

    /// Load a monocular depth model. Preprocessing parameters come from a
    /// `preprocessor_config.json` next to the model when one exists.
    pub fn use_depth_estimator(
        &self,
        model_path: impl AsRef<Path>,
    ) -> Result<DepthEstimator, InferError> {
        let config = PreprocessorConfig::find(model_path.as_ref())?
            .unwrap_or_else(PreprocessorConfig::depth_anything);
        let session = self.onnx_session(model_path)?;
        Ok(DepthEstimator::new(session, config))
    }

    /// Load a top-down heatmap pose model.
    pub fn use_pose_estimator(
        &self,
        model_path: impl AsRef<Path>,
    ) -> Result<PoseEstimator, InferError> {
        let config = PreprocessorConfig::find(model_path.as_ref())?
            .unwrap_or_else(PreprocessorConfig::vitpose);
        let session = self.onnx_session(model_path)?;
        Ok(PoseEstimator::new(session, config))
    }

    /// Load a sentence embedding encoder and its tokenizer.
    pub fn use_text_embedder(
        &self,
        model_path: impl AsRef<Path>,
        tokenizer_path: impl AsRef<Path>,
    ) -> Result<TextEmbedder, InferError> {
        let session = self.onnx_session(model_path)?;
        TextEmbedder::new(session, tokenizer_path)
    }
}
