mod controls;

use {
    base::*,
    controls::{step_scale, step_width},
    inference::Inference,
    minifb::{Key, KeyRepeat, ScaleMode, Window, WindowOptions},
    pipeline::{Completion, FrameScheduler, PipelineConfig},
    std::{ops::ControlFlow, sync::Arc},
    video::{VideoIn, v4l2::V4l2Config},
};

const DEFAULT_MODEL: &str = "data/depth-anything-v2-small/onnx/model.onnx";
const CAPTURE_WIDTH: usize = 640;
const CAPTURE_HEIGHT: usize = 480;

fn key_steps(window: &Window, up: Key, down: Key) -> i32 {
    let mut steps = 0;
    if window.is_key_pressed(up, KeyRepeat::Yes) {
        steps += 1;
    }
    if window.is_key_pressed(down, KeyRepeat::Yes) {
        steps -= 1;
    }
    steps
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    base::init_stdout_logger();

    let model_path =
        std::env::var("DEPTH_MODEL_PATH").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

    println!("Depth Webcam");
    println!("Model: {}", model_path);
    println!("Controls: Up/Down scale, Left/Right display width, ESC to exit");
    println!();

    #[cfg(feature = "cuda")]
    let inference = Inference::cuda(0)?;
    #[cfg(not(feature = "cuda"))]
    let inference = Inference::cpu()?;
    let depth = Arc::new(inference.use_depth_estimator(&model_path)?);

    let mut camera = VideoIn::open(Some(
        V4l2Config::default().with_size(Vec2::new(CAPTURE_WIDTH, CAPTURE_HEIGHT)),
    ))
    .await?;
    log_info!("camera: {} {:?}", camera.size(), camera.format());

    let mut scheduler = FrameScheduler::new(depth, PipelineConfig::default())?;
    let size = scheduler.display().size();
    let mut window = Window::new(
        "Depth Webcam - ESC to exit",
        size.x,
        size.y,
        WindowOptions {
            resize: true,
            scale_mode: ScaleMode::AspectRatioStretch,
            ..WindowOptions::default()
        },
    )?;

    scheduler
        .run(&mut camera, |scheduler, report| {
            if !window.is_open() || window.is_key_down(Key::Escape) {
                return ControlFlow::Break(());
            }

            let scale_steps = key_steps(&window, Key::Up, Key::Down);
            if scale_steps != 0 {
                let scale = step_scale(scheduler.scale(), scale_steps);
                if scheduler.set_scale(scale).is_ok() {
                    log_info!("scale {:.2}", scale);
                }
            }
            let width_steps = key_steps(&window, Key::Right, Key::Left);
            if width_steps != 0 {
                let width = step_width(scheduler.display().size().x, width_steps);
                if scheduler.resize_display(width).is_ok() {
                    log_info!("display {}", scheduler.display().size());
                }
            }

            if let Some(rate) = report.rate {
                window.set_title(&format!(
                    "Depth Webcam - {:.1} fps @ scale {:.2}",
                    rate,
                    scheduler.scale()
                ));
            }

            let updated = match report.completion {
                Some(Completion::Composited(_)) => {
                    let display = scheduler.display();
                    window.update_with_buffer(
                        display.pixels(),
                        display.size().x,
                        display.size().y,
                    )
                }
                _ => {
                    window.update();
                    Ok(())
                }
            };
            if let Err(e) = updated {
                log_error!("window update failed: {}", e);
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        })
        .await;

    camera.stop();
    println!(
        "Exiting: {} composited, {} failed, {} dropped",
        scheduler.completed(),
        scheduler.failed(),
        scheduler.dropped()
    );
    Ok(())
}
