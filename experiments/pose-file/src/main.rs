mod draw;

use {
    base::*,
    draw::{pose_only, pose_overlay},
    image::{read_image, write_png},
    inference::{Inference, pose::KeypointIndex},
    std::path::Path,
};

const DEFAULT_MODEL: &str = "data/vitpose-base-simple/onnx/model.onnx";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    base::init_stdout_logger();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <input image>", args[0]);
        std::process::exit(1);
    }
    let input = Path::new(&args[1]);

    let model_path =
        std::env::var("POSE_MODEL_PATH").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
    log_info!("loading pose model {}", model_path);
    #[cfg(feature = "cuda")]
    let inference = Inference::cuda(0)?;
    #[cfg(not(feature = "cuda"))]
    let inference = Inference::cpu()?;
    let estimator = inference.use_pose_estimator(&model_path)?;

    let image = read_image(input).await?;
    let estimate = estimator.estimate(image.clone()).await?;

    for (index, keypoint) in KeypointIndex::ALL.iter().zip(&estimate.keypoints) {
        println!(
            "{:?}: ({:.1}, {:.1}) score {:.3}",
            index, keypoint.position.x, keypoint.position.y, keypoint.score
        );
    }

    let overlay_path = input.with_file_name("pose_overlay.png");
    write_png(&overlay_path, pose_overlay(&image, &estimate.keypoints)?).await?;
    println!("Overlay PNG created: {}", overlay_path.display());

    let only_path = input.with_file_name("pose_only.png");
    write_png(&only_path, pose_only(&image, &estimate.keypoints)?).await?;
    println!("Transparent pose PNG created: {}", only_path.display());
    Ok(())
}
