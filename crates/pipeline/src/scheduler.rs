use {
    crate::*,
    base::{Epoch, Vec2},
    futures_util::{FutureExt, future::BoxFuture},
    image::Image,
    std::{fmt, ops::ControlFlow, sync::Arc},
    tokio::time::MissedTickBehavior,
    video::CaptureState,
};

/// What one call to `on_tick` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// The source is paused or ended; nothing was admitted.
    Stopped,
    /// A request is in flight; the current frame was dropped.
    Dropped,
    /// Idle, but the source had no new frame.
    NoFrame,
    /// A frame was admitted at this processing size.
    Admitted(Vec2<usize>),
}

/// How an in-flight request ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// The result was drawn onto the display surface.
    Composited(Vec2<usize>),
    /// The inference call failed or timed out. The pipeline carries on.
    Failed(PipelineError),
    /// The source stopped while the request was in flight; the result was thrown away.
    Discarded,
}

/// Everything that happened during one iteration of `run`.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub completion: Option<Completion>,
    pub tick: Result<Tick, PipelineError>,
    pub rate: Option<f32>,
}

struct Inflight {
    epoch: u64,
    size: Vec2<usize>,
    future: BoxFuture<'static, Result<Image, PipelineError>>,
}

/// Admits at most one frame at a time into inference and composites the
/// results onto a display surface.
///
/// While a request is in flight every tick drops the current frame instead
/// of queueing it, so the display never lags behind by more than one
/// inference call.
pub struct FrameScheduler<I: InferenceCall> {
    inference: Arc<I>,
    config: PipelineConfig,
    scale: f32,
    display: DisplaySurface,
    inflight: Option<Inflight>,
    epoch: Epoch,
    rate: RateReporter,
    completed: u64,
    failed: u64,
    dropped: u64,
}

impl<I: InferenceCall> fmt::Debug for FrameScheduler<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("scale", &self.scale)
            .field("display", &self.display.size())
            .field("inflight", &self.inflight.as_ref().map(|i| i.size))
            .field("completed", &self.completed)
            .field("failed", &self.failed)
            .field("dropped", &self.dropped)
            .finish()
    }
}

impl<I: InferenceCall + 'static> FrameScheduler<I> {
    pub fn new(inference: Arc<I>, config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let display = DisplaySurface::new(display_size(config.display_width())?);
        Ok(Self {
            inference,
            scale: config.scale(),
            display,
            inflight: None,
            epoch: Epoch::new(),
            rate: RateReporter::new(config.report_interval()),
            completed: 0,
            failed: 0,
            dropped: 0,
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Use `scale` from the next admission on. A request already in flight
    /// keeps its size. Invalid values are rejected and the old scale stays.
    pub fn set_scale(&mut self, scale: f32) -> Result<(), PipelineError> {
        if let Err(e) = validate_scale(scale) {
            base::log_warn!("{}", e);
            return Err(e);
        }
        self.scale = scale;
        Ok(())
    }

    /// Resize the display surface to `width` x `width * 3 / 4`.
    pub fn resize_display(&mut self, width: usize) -> Result<(), PipelineError> {
        match display_size(width) {
            Ok(size) => {
                self.display.resize(size);
                Ok(())
            }
            Err(e) => {
                base::log_warn!("{}", e);
                Err(e)
            }
        }
    }

    pub fn display(&self) -> &DisplaySurface {
        &self.display
    }

    pub fn is_busy(&self) -> bool {
        self.inflight.is_some()
    }

    /// Processing size of the request in flight, if any.
    pub fn inflight_size(&self) -> Option<Vec2<usize>> {
        self.inflight.as_ref().map(|i| i.size)
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn failed(&self) -> u64 {
        self.failed
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Most recently published frames-per-second figure.
    pub fn rate(&self) -> Option<f32> {
        self.rate.last_rate()
    }

    /// Forget the request in flight, if any. Its result will be discarded.
    pub fn cancel(&mut self) {
        if self.inflight.as_ref().is_some_and(|i| self.epoch.is_current(i.epoch)) {
            self.epoch.advance();
            base::log_debug!("in-flight request cancelled");
        }
    }

    /// Decide whether to admit the source's current frame.
    pub fn on_tick<S: CaptureSource + ?Sized>(&mut self, source: &mut S) -> Result<Tick, PipelineError> {
        if source.state() != CaptureState::Playing {
            self.cancel();
            return Ok(Tick::Stopped);
        }

        if self.is_busy() {
            if source.latest_frame().is_some() {
                self.dropped += 1;
                base::log_debug!("busy, frame dropped");
            }
            return Ok(Tick::Dropped);
        }

        let Some(frame) = source.latest_frame() else {
            return Ok(Tick::NoFrame);
        };

        // scale is read once here, the request keeps this size until it completes
        let size = processing_size(frame.image.size, self.scale);
        let request = match ProcessingRequest::from_frame(&frame, size) {
            Ok(request) => request,
            Err(e) => {
                self.failed += 1;
                base::log_warn!("could not prepare frame: {}", e);
                return Err(e);
            }
        };

        let future = self.inference.infer(request);
        let future = match self.config.inference_timeout() {
            Some(limit) => async move {
                match tokio::time::timeout(limit, future).await {
                    Ok(result) => result,
                    Err(_) => Err(PipelineError::Timeout(limit)),
                }
            }
            .boxed(),
            None => future,
        };

        base::log_debug!("admitted {} frame at {}", frame.image.size, size);
        self.inflight = Some(Inflight {
            epoch: self.epoch.current(),
            size,
            future,
        });
        Ok(Tick::Admitted(size))
    }

    /// Wait for the request in flight. Returns `None` when idle.
    ///
    /// Dropping the returned future before it finishes leaves the request in
    /// flight.
    pub async fn complete(&mut self) -> Option<Completion> {
        let result = match self.inflight.as_mut() {
            Some(inflight) => (&mut inflight.future).await,
            None => return None,
        };
        let inflight = self.inflight.take()?;
        Some(self.finish(inflight.epoch, inflight.size, result))
    }

    /// `complete` without waiting: `None` if idle or still running.
    pub fn try_complete(&mut self) -> Option<Completion> {
        self.complete().now_or_never().flatten()
    }

    fn finish(
        &mut self,
        epoch: u64,
        size: Vec2<usize>,
        result: Result<Image, PipelineError>,
    ) -> Completion {
        if !self.epoch.is_current(epoch) {
            base::log_debug!("stale result discarded");
            return Completion::Discarded;
        }
        match result.and_then(|image| self.display.composite(&image)) {
            Ok(()) => {
                self.completed += 1;
                self.rate.record();
                Completion::Composited(size)
            }
            Err(e) => {
                self.failed += 1;
                base::log_warn!("frame failed: {}", e);
                Completion::Failed(e)
            }
        }
    }

    /// Publish the frame rate once per report interval.
    pub fn poll_rate(&mut self) -> Option<f32> {
        let rate = self.rate.poll()?;
        base::log_info!("{:.1} frames/s", rate);
        Some(rate)
    }

    /// Drive the pipeline from a fixed-rate tick until the source stops and
    /// nothing is in flight, or until `on_tick` breaks.
    ///
    /// Each iteration collects a finished request (if any), then offers the
    /// current frame for admission, then calls `on_tick` with what happened.
    pub async fn run<S, F>(&mut self, source: &mut S, mut on_tick: F)
    where
        S: CaptureSource + ?Sized,
        F: FnMut(&mut Self, &TickReport) -> ControlFlow<()>,
    {
        let mut interval = tokio::time::interval(self.config.tick_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            interval.tick().await;
            let completion = self.try_complete();
            let tick = self.on_tick(source);
            let rate = self.poll_rate();
            let stopped = matches!(tick, Ok(Tick::Stopped));
            let report = TickReport {
                completion,
                tick,
                rate,
            };
            if on_tick(self, &report).is_break() {
                break;
            }
            if stopped && !self.is_busy() {
                base::log_info!("capture stopped, pipeline idle");
                break;
            }
        }
    }
}
