use {base::*, inference::Inference, pipeline::process_still};

const DEFAULT_MODEL: &str = "data/depth-anything-v2-small/onnx/model.onnx";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    base::init_stdout_logger();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <input image>", args[0]);
        std::process::exit(1);
    }
    let input = &args[1];

    let model_path =
        std::env::var("DEPTH_MODEL_PATH").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
    log_info!("loading depth model {}", model_path);
    #[cfg(feature = "cuda")]
    let inference = Inference::cuda(0)?;
    #[cfg(not(feature = "cuda"))]
    let inference = Inference::cpu()?;
    let depth = inference.use_depth_estimator(&model_path)?;

    let output = process_still(input, &depth).await?;
    println!("Depth map saved as {}", output.display());
    Ok(())
}
