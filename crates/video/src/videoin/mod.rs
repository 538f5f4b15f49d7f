use {
    crate::*,
    base::Vec2,
    image::{Image, PixelFormat},
    std::{
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        time::{Duration, Instant},
    },
    tokio::{
        sync::mpsc,
        task::{JoinHandle, spawn_blocking},
    },
};

#[cfg(feature = "v4l2")]
pub mod v4l2;

// capacity of the video input channel
const CHANNEL_CAPACITY: usize = 4;

// delay before reconnecting after failure
const WAIT_BEFORE_RECONNECT_MS: u64 = 100;

// poll interval of a paused worker
const PAUSED_POLL_MS: u64 = 10;

/// Format actually negotiated with a device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    pub size: Vec2<usize>,
    pub format: PixelFormat,
    pub frame_rate: f32,
}

/// A blocking capture backend driven by the `VideoIn` worker thread.
pub trait VideoInDevice: Send {
    /// Open the device and return the format that was actually set.
    fn open(&mut self) -> Result<VideoInfo, VideoError>;
    /// Close the device, if open.
    fn close(&mut self);
    /// Block until the next frame is available.
    fn blocking_capture(&mut self) -> Result<Image, VideoError>;
}

pub struct VideoIn {
    receiver: mpsc::Receiver<VideoFrame>,
    cancel: Arc<AtomicBool>,
    paused: Arc<AtomicBool>,
    resumed_at: Option<Instant>,
    info: VideoInfo,
    join_handle: Option<JoinHandle<()>>,
}

impl VideoIn {
    /// Open the default V4L2 camera, or the one described by `config`.
    #[cfg(feature = "v4l2")]
    pub async fn open(config: Option<v4l2::V4l2Config>) -> Result<Self, VideoError> {
        let config = config.unwrap_or_default();
        log::info!("opening camera {:?}", config.path);
        Self::with_device(Box::new(v4l2::V4l2::new(config))).await
    }

    /// Start capturing from an arbitrary device.
    pub async fn with_device(device: Box<dyn VideoInDevice>) -> Result<Self, VideoError> {
        let (sender, receiver) = mpsc::channel::<VideoFrame>(CHANNEL_CAPACITY);
        let cancel = Arc::new(AtomicBool::new(false));
        let paused = Arc::new(AtomicBool::new(false));
        let (join_handle, info) =
            Self::spawn_worker(device, sender, Arc::clone(&cancel), Arc::clone(&paused)).await?;
        log::info!(
            "video input ready: {} {:?} @ {} fps",
            info.size,
            info.format,
            info.frame_rate
        );
        Ok(Self {
            receiver,
            cancel,
            paused,
            resumed_at: None,
            info,
            join_handle: Some(join_handle),
        })
    }

    async fn spawn_worker(
        mut device: Box<dyn VideoInDevice>,
        sender: mpsc::Sender<VideoFrame>,
        cancel: Arc<AtomicBool>,
        paused: Arc<AtomicBool>,
    ) -> Result<(JoinHandle<()>, VideoInfo), VideoError> {
        // device.open() must run on the same OS thread as blocking_capture(),
        // so the negotiated format comes back over a oneshot
        let (init_tx, init_rx) = tokio::sync::oneshot::channel::<Result<VideoInfo, VideoError>>();

        let join_handle = spawn_blocking(move || {
            match device.open() {
                Ok(info) => {
                    let _ = init_tx.send(Ok(info));
                }
                Err(e) => {
                    let _ = init_tx.send(Err(e));
                    return;
                }
            }

            while !cancel.load(Ordering::Relaxed) {
                log::info!("video worker: starting capture loop");
                while !cancel.load(Ordering::Relaxed) {
                    if paused.load(Ordering::Relaxed) {
                        std::thread::sleep(Duration::from_millis(PAUSED_POLL_MS));
                        continue;
                    }
                    match device.blocking_capture() {
                        Ok(image) => {
                            if sender.blocking_send(VideoFrame::new(image)).is_err() {
                                // receiver dropped, nobody wants frames anymore
                                device.close();
                                return;
                            }
                        }
                        Err(e) => {
                            log::error!("video worker: capture failed: {}", e);
                            break;
                        }
                    }
                }

                // close, wait, and reopen the device
                while !cancel.load(Ordering::Relaxed) {
                    log::info!("video worker: reconnecting...");
                    device.close();
                    std::thread::sleep(Duration::from_millis(WAIT_BEFORE_RECONNECT_MS));
                    match device.open() {
                        Ok(_) => break,
                        Err(e) => log::error!("video worker: reopen failed: {}", e),
                    }
                }
            }
            device.close();
        });

        let info = init_rx
            .await
            .map_err(|_| VideoError::Device("worker thread died during init".to_string()))??;

        Ok((join_handle, info))
    }

    pub fn size(&self) -> Vec2<usize> {
        self.info.size
    }

    pub fn format(&self) -> PixelFormat {
        self.info.format
    }

    pub fn frame_rate(&self) -> f32 {
        self.info.frame_rate
    }

    /// Stop delivering frames until `resume()`.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Relaxed);
    }

    /// Continue capturing. Frames captured before this call are skipped.
    pub fn resume(&mut self) {
        self.resumed_at = Some(Instant::now());
        self.paused.store(false, Ordering::Relaxed);
    }

    fn is_stale(&self, frame: &VideoFrame) -> bool {
        self.resumed_at.is_some_and(|at| frame.timestamp < at)
    }

    /// End capturing for good. The worker closes the device and exits.
    pub fn stop(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn state(&self) -> CaptureState {
        let finished = self
            .join_handle
            .as_ref()
            .map(|handle| handle.is_finished())
            .unwrap_or(true);
        if self.cancel.load(Ordering::Relaxed) || finished {
            CaptureState::Ended
        } else if self.paused.load(Ordering::Relaxed) {
            CaptureState::Paused
        } else {
            CaptureState::Playing
        }
    }

    /// Wait for the next frame.
    pub async fn capture(&mut self) -> Result<VideoFrame, VideoError> {
        loop {
            match self.receiver.recv().await {
                Some(frame) if self.is_stale(&frame) => continue,
                Some(frame) => return Ok(frame),
                None => return Err(VideoError::Stream("video input channel closed".to_string())),
            }
        }
    }

    /// Drain everything queued and return only the freshest frame, without waiting.
    pub fn latest(&mut self) -> Option<VideoFrame> {
        let mut latest = None;
        while let Ok(frame) = self.receiver.try_recv() {
            if !self.is_stale(&frame) {
                latest = Some(frame);
            }
        }
        latest
    }
}

impl Drop for VideoIn {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        if let Some(handle) = self.join_handle.take() {
            handle.abort();
        }
    }
}
