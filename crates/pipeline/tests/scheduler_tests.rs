use {
    base::Vec2,
    futures_util::{FutureExt, future::BoxFuture},
    image::{Image, PixelFormat},
    pipeline::*,
    std::{
        ops::ControlFlow,
        sync::{
            Arc, Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::Duration,
    },
    video::{CaptureState, VideoFrame},
};

struct TestSource {
    frame: Option<Image>,
    state: CaptureState,
}

impl TestSource {
    fn playing(size: Vec2<usize>) -> Self {
        Self {
            frame: Some(Image::filled(size, PixelFormat::Rgb8, &[40, 80, 120]).unwrap()),
            state: CaptureState::Playing,
        }
    }
}

impl CaptureSource for TestSource {
    fn state(&self) -> CaptureState {
        self.state
    }

    fn latest_frame(&mut self) -> Option<VideoFrame> {
        self.frame.clone().map(VideoFrame::new)
    }

    fn size(&self) -> Vec2<usize> {
        self.frame.as_ref().map(|f| f.size).unwrap_or(Vec2::new(0, 0))
    }
}

/// Sleeps, then answers with a flat gray image at the request size.
/// Tracks how many calls overlap and which sizes were requested.
#[derive(Default)]
struct StubDepth {
    delay: Duration,
    fail: bool,
    active: Arc<AtomicUsize>,
    max_active: Arc<AtomicUsize>,
    sizes: Arc<Mutex<Vec<Vec2<usize>>>>,
}

impl StubDepth {
    fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Default::default()
        }
    }

    fn sizes(&self) -> Vec<Vec2<usize>> {
        self.sizes.lock().unwrap().clone()
    }
}

impl InferenceCall for StubDepth {
    fn infer(&self, request: ProcessingRequest) -> BoxFuture<'static, Result<Image, PipelineError>> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
        self.sizes.lock().unwrap().push(request.size());
        let active = Arc::clone(&self.active);
        let delay = self.delay;
        let fail = self.fail;
        let size = request.size();
        async move {
            tokio::time::sleep(delay).await;
            active.fetch_sub(1, Ordering::SeqCst);
            if fail {
                Err(PipelineError::Inference("simulated failure".to_string()))
            } else {
                Ok(Image::filled(size, PixelFormat::Gray8, &[128]).unwrap())
            }
        }
        .boxed()
    }
}

fn scheduler(stub: StubDepth, config: PipelineConfig) -> (FrameScheduler<StubDepth>, Arc<StubDepth>) {
    let stub = Arc::new(stub);
    (FrameScheduler::new(Arc::clone(&stub), config).unwrap(), stub)
}

#[tokio::test(start_paused = true)]
async fn busy_ticks_drop_frames_instead_of_queueing() {
    let (mut scheduler, stub) = scheduler(
        StubDepth::with_delay(Duration::from_millis(100)),
        PipelineConfig::default(),
    );
    let mut source = TestSource::playing(Vec2::new(640, 480));

    assert_eq!(scheduler.on_tick(&mut source), Ok(Tick::Admitted(Vec2::new(320, 240))));
    assert!(scheduler.is_busy());
    for _ in 0..3 {
        assert_eq!(scheduler.on_tick(&mut source), Ok(Tick::Dropped));
    }
    assert_eq!(scheduler.dropped(), 3);
    assert_eq!(stub.sizes().len(), 1);

    assert_eq!(
        scheduler.complete().await,
        Some(Completion::Composited(Vec2::new(320, 240)))
    );
    assert!(!scheduler.is_busy());
    assert_eq!(scheduler.completed(), 1);
    assert!(matches!(scheduler.on_tick(&mut source), Ok(Tick::Admitted(_))));
    assert_eq!(stub.max_active.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn run_never_has_two_requests_in_flight() {
    let (mut scheduler, stub) = scheduler(
        StubDepth::with_delay(Duration::from_millis(50)),
        PipelineConfig::default().with_tick_interval(Duration::from_millis(16)),
    );
    let mut source = TestSource::playing(Vec2::new(64, 48));

    scheduler
        .run(&mut source, |scheduler, _report| {
            if scheduler.completed() >= 5 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .await;

    assert_eq!(scheduler.completed(), 5);
    assert!(scheduler.dropped() > 0);
    assert_eq!(stub.max_active.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn scale_change_waits_for_next_admission() {
    let (mut scheduler, stub) = scheduler(
        StubDepth::with_delay(Duration::from_millis(30)),
        PipelineConfig::default().with_scale(0.5),
    );
    let mut source = TestSource::playing(Vec2::new(640, 480));

    assert_eq!(scheduler.on_tick(&mut source), Ok(Tick::Admitted(Vec2::new(320, 240))));
    scheduler.set_scale(0.25).unwrap();
    assert_eq!(scheduler.inflight_size(), Some(Vec2::new(320, 240)));
    assert_eq!(
        scheduler.complete().await,
        Some(Completion::Composited(Vec2::new(320, 240)))
    );

    assert_eq!(scheduler.on_tick(&mut source), Ok(Tick::Admitted(Vec2::new(160, 120))));
    assert_eq!(stub.sizes(), vec![Vec2::new(320, 240), Vec2::new(160, 120)]);
}

#[tokio::test]
async fn end_to_end_half_scale_upscaled_to_display() {
    // left half dark, right half bright, at whatever size is requested
    let inference = Arc::new(InferFn(
        |request: ProcessingRequest| -> BoxFuture<'static, Result<Image, PipelineError>> {
            let size = request.size();
            async move {
                let data = (0..size.area())
                    .map(|i| if i % size.x < size.x / 2 { 0 } else { 255 })
                    .collect();
                Ok(Image::new(size, data, PixelFormat::Gray8))
            }
            .boxed()
        },
    ));
    let config = PipelineConfig::default().with_scale(0.5).with_display_width(800);
    let mut scheduler = FrameScheduler::new(inference, config).unwrap();
    let mut source = TestSource::playing(Vec2::new(640, 480));

    assert_eq!(scheduler.on_tick(&mut source), Ok(Tick::Admitted(Vec2::new(320, 240))));
    assert_eq!(
        scheduler.complete().await,
        Some(Completion::Composited(Vec2::new(320, 240)))
    );

    let display = scheduler.display();
    assert_eq!(display.size(), Vec2::new(800, 600));
    for y in [0, 299, 599] {
        let row = &display.pixels()[y * 800..(y + 1) * 800];
        assert!(row[..400].iter().all(|&p| p == 0xFF00_0000));
        assert!(row[400..].iter().all(|&p| p == 0xFFFF_FFFF));
    }
}

#[tokio::test(start_paused = true)]
async fn display_resize_while_in_flight_composites_at_new_size() {
    let (mut scheduler, _stub) = scheduler(
        StubDepth::with_delay(Duration::from_millis(40)),
        PipelineConfig::default(),
    );
    let mut source = TestSource::playing(Vec2::new(640, 480));

    assert_eq!(scheduler.on_tick(&mut source), Ok(Tick::Admitted(Vec2::new(320, 240))));
    scheduler.resize_display(1000).unwrap();
    assert_eq!(scheduler.inflight_size(), Some(Vec2::new(320, 240)));
    assert_eq!(
        scheduler.complete().await,
        Some(Completion::Composited(Vec2::new(320, 240)))
    );
    assert_eq!(scheduler.display().size(), Vec2::new(1000, 750));
    assert_eq!(scheduler.display().pixels().len(), 750_000);
}

#[tokio::test(start_paused = true)]
async fn failure_resets_busy_and_next_tick_admits() {
    let (mut scheduler, _stub) = scheduler(
        StubDepth {
            delay: Duration::from_millis(10),
            fail: true,
            ..Default::default()
        },
        PipelineConfig::default(),
    );
    let mut source = TestSource::playing(Vec2::new(64, 48));

    assert!(matches!(scheduler.on_tick(&mut source), Ok(Tick::Admitted(_))));
    assert!(matches!(
        scheduler.complete().await,
        Some(Completion::Failed(PipelineError::Inference(_)))
    ));
    assert!(!scheduler.is_busy());
    assert_eq!(scheduler.failed(), 1);
    assert_eq!(scheduler.completed(), 0);
    assert!(matches!(scheduler.on_tick(&mut source), Ok(Tick::Admitted(_))));
}

#[tokio::test(start_paused = true)]
async fn slow_inference_times_out() {
    let (mut scheduler, _stub) = scheduler(
        StubDepth::with_delay(Duration::from_secs(10)),
        PipelineConfig::default().with_inference_timeout(Some(Duration::from_millis(100))),
    );
    let mut source = TestSource::playing(Vec2::new(64, 48));

    assert!(matches!(scheduler.on_tick(&mut source), Ok(Tick::Admitted(_))));
    assert_eq!(
        scheduler.complete().await,
        Some(Completion::Failed(PipelineError::Timeout(Duration::from_millis(100))))
    );
    assert!(!scheduler.is_busy());
    assert!(matches!(scheduler.on_tick(&mut source), Ok(Tick::Admitted(_))));
}

#[tokio::test(start_paused = true)]
async fn stopping_source_discards_inflight_result() {
    let (mut scheduler, _stub) = scheduler(
        StubDepth::with_delay(Duration::from_millis(50)),
        PipelineConfig::default(),
    );
    let mut source = TestSource::playing(Vec2::new(64, 48));
    let blank = scheduler.display().clone();

    assert!(matches!(scheduler.on_tick(&mut source), Ok(Tick::Admitted(_))));
    source.state = CaptureState::Ended;
    assert_eq!(scheduler.on_tick(&mut source), Ok(Tick::Stopped));
    assert_eq!(scheduler.on_tick(&mut source), Ok(Tick::Stopped));

    assert_eq!(scheduler.complete().await, Some(Completion::Discarded));
    assert!(!scheduler.is_busy());
    assert_eq!(scheduler.completed(), 0);
    assert_eq!(scheduler.display(), &blank);
}

#[tokio::test(start_paused = true)]
async fn run_returns_once_stopped_and_idle() {
    let (mut scheduler, _stub) = scheduler(
        StubDepth::with_delay(Duration::from_millis(50)),
        PipelineConfig::default(),
    );
    let mut source = TestSource::playing(Vec2::new(64, 48));
    assert!(matches!(scheduler.on_tick(&mut source), Ok(Tick::Admitted(_))));
    source.state = CaptureState::Paused;

    let mut reports = Vec::new();
    scheduler
        .run(&mut source, |_, report| {
            reports.push(report.clone());
            ControlFlow::Continue(())
        })
        .await;

    assert!(!scheduler.is_busy());
    assert!(reports.iter().all(|r| r.tick == Ok(Tick::Stopped)));
    assert_eq!(
        reports.last().and_then(|r| r.completion.clone()),
        Some(Completion::Discarded)
    );
}

#[tokio::test(start_paused = true)]
async fn paused_source_resumes_admitting() {
    let (mut scheduler, _stub) = scheduler(StubDepth::default(), PipelineConfig::default());
    let mut source = TestSource::playing(Vec2::new(64, 48));
    source.state = CaptureState::Paused;
    assert_eq!(scheduler.on_tick(&mut source), Ok(Tick::Stopped));
    source.state = CaptureState::Playing;
    assert_eq!(scheduler.on_tick(&mut source), Ok(Tick::Admitted(Vec2::new(32, 24))));
}

#[test]
fn tick_without_frame_is_no_frame() {
    let (mut scheduler, _stub) = scheduler(StubDepth::default(), PipelineConfig::default());
    let mut source = TestSource {
        frame: None,
        state: CaptureState::Playing,
    };
    assert_eq!(scheduler.on_tick(&mut source), Ok(Tick::NoFrame));
    assert!(!scheduler.is_busy());
}

#[test]
fn invalid_controls_are_rejected_without_side_effects() {
    let (mut scheduler, _stub) = scheduler(StubDepth::default(), PipelineConfig::default());
    for scale in [0.0, -1.0, 1.01, f32::NAN] {
        assert!(matches!(scheduler.set_scale(scale), Err(PipelineError::Config(_))));
    }
    assert_eq!(scheduler.scale(), 0.5);

    for width in [0, MAX_DISPLAY_WIDTH + 1, usize::MAX] {
        assert!(matches!(scheduler.resize_display(width), Err(PipelineError::Config(_))));
    }
    assert_eq!(scheduler.display().size(), Vec2::new(640, 480));
    assert_eq!(scheduler.display().pixels().len(), 640 * 480);
    assert!(FrameScheduler::new(
        Arc::new(StubDepth::default()),
        PipelineConfig::default().with_display_width(usize::MAX),
    )
    .is_err());
    scheduler.resize_display(1024).unwrap();
    assert_eq!(scheduler.display().size(), Vec2::new(1024, 768));
}

#[test]
fn tiny_scale_still_admits_one_pixel() {
    let (mut scheduler, _stub) = scheduler(StubDepth::default(), PipelineConfig::default());
    scheduler.set_scale(1e-6).unwrap();
    let mut source = TestSource::playing(Vec2::new(640, 480));
    assert_eq!(scheduler.on_tick(&mut source), Ok(Tick::Admitted(Vec2::new(1, 1))));
}

#[test]
fn corrupt_frame_counts_as_failure() {
    let (mut scheduler, _stub) = scheduler(StubDepth::default(), PipelineConfig::default());
    let mut source = TestSource {
        frame: Some(Image::new(Vec2::new(4, 4), vec![1, 2, 3], PixelFormat::Jpeg)),
        state: CaptureState::Playing,
    };
    assert!(scheduler.on_tick(&mut source).is_err());
    assert_eq!(scheduler.failed(), 1);
    assert!(!scheduler.is_busy());
}
