use {
    crate::*,
    base::Vec2,
    futures_util::{FutureExt, future::BoxFuture},
    image::{Image, PixelFormat, resize_bilinear},
    std::time::Instant,
    video::VideoFrame,
};

/// A scaled copy of a captured frame, handed to the inference call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessingRequest {
    pub image: Image,
    pub captured_at: Instant,
}

impl ProcessingRequest {
    /// Convert `frame` to RGB and resample it bilinearly to `size`.
    pub fn from_frame(frame: &VideoFrame, size: Vec2<usize>) -> Result<Self, PipelineError> {
        let rgb = frame.image.to_rgb()?;
        let image = if rgb.size == size {
            rgb
        } else {
            resize_bilinear(&rgb, size)?
        };
        Ok(Self {
            image,
            captured_at: frame.timestamp,
        })
    }

    pub fn size(&self) -> Vec2<usize> {
        self.image.size
    }
}

/// Processing size for a capture size: each side `max(1, round(side * scale))`.
pub fn processing_size(capture: Vec2<usize>, scale: f32) -> Vec2<usize> {
    let side = |dim: usize| ((dim as f64 * scale as f64).round() as usize).max(1);
    Vec2::new(side(capture.x), side(capture.y))
}

/// Opaque, single-shot asynchronous inference. The result is a dense pixel
/// buffer at the resolution of the request.
pub trait InferenceCall: Send + Sync {
    fn infer(&self, request: ProcessingRequest) -> BoxFuture<'static, Result<Image, PipelineError>>;
}

/// Adapts a plain function or closure into an `InferenceCall`.
pub struct InferFn<F>(pub F);

impl<F> InferenceCall for InferFn<F>
where
    F: Fn(ProcessingRequest) -> BoxFuture<'static, Result<Image, PipelineError>> + Send + Sync,
{
    fn infer(&self, request: ProcessingRequest) -> BoxFuture<'static, Result<Image, PipelineError>> {
        (self.0)(request)
    }
}

impl InferenceCall for inference::DepthEstimator {
    fn infer(&self, request: ProcessingRequest) -> BoxFuture<'static, Result<Image, PipelineError>> {
        self.estimate(request.image)
            .map(|result| {
                let depth = result?;
                if depth.format != PixelFormat::Gray8 {
                    return Err(PipelineError::Inference(format!(
                        "expected a Gray8 depth map, got {:?}",
                        depth.format
                    )));
                }
                Ok(depth)
            })
            .boxed()
    }
}
