use {
    base::Vec2,
    video::{CaptureState, VideoFrame},
};

/// Anything that yields live frames and can say, without waiting, whether
/// it is still running.
pub trait CaptureSource {
    fn state(&self) -> CaptureState;

    /// The freshest frame available right now, if any. Older queued frames
    /// are skipped.
    fn latest_frame(&mut self) -> Option<VideoFrame>;

    /// Native frame size.
    fn size(&self) -> Vec2<usize>;
}

impl CaptureSource for video::VideoIn {
    fn state(&self) -> CaptureState {
        video::VideoIn::state(self)
    }

    fn latest_frame(&mut self) -> Option<VideoFrame> {
        self.latest()
    }

    fn size(&self) -> Vec2<usize> {
        video::VideoIn::size(self)
    }
}
