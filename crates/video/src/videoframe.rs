use {image::Image, std::time::Instant};

/// One captured frame, as delivered by the device, stamped on arrival.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub image: Image,
    pub timestamp: Instant,
}

impl VideoFrame {
    pub fn new(image: Image) -> Self {
        Self {
            image,
            timestamp: Instant::now(),
        }
    }
}

/// Capture state as seen by a consumer, queryable without waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Playing,
    Paused,
    Ended,
}
