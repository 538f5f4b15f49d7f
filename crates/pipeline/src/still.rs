use {
    crate::*,
    image::{read_image, resize_nearest, write_png},
    std::{
        path::{Path, PathBuf},
        time::Instant,
    },
};

pub const STILL_OUTPUT_NAME: &str = "output.png";

/// `output.png` in the same directory as `input`.
pub fn still_output_path(input: &Path) -> PathBuf {
    input.with_file_name(STILL_OUTPUT_NAME)
}

/// Run one inference on an image file and write the result as PNG beside it.
pub async fn process_still<I: InferenceCall + ?Sized>(
    input: impl AsRef<Path>,
    inference: &I,
) -> Result<PathBuf, PipelineError> {
    let output = still_output_path(input.as_ref());
    process_still_to(input, &output, inference).await?;
    Ok(output)
}

/// Like `process_still`, with an explicit output path.
///
/// The image goes to inference at full size. A result of a different size
/// is resampled nearest-neighbour back to the input size before encoding.
pub async fn process_still_to<I: InferenceCall + ?Sized>(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    inference: &I,
) -> Result<(), PipelineError> {
    let input = input.as_ref();
    let image = read_image(input)
        .await
        .map_err(|e| PipelineError::Io(format!("{}: {}", input.display(), e)))?;
    let size = image.size;
    base::log_info!("{}: {} {:?}", input.display(), size, image.format);

    let request = ProcessingRequest {
        image: image.to_rgb()?,
        captured_at: Instant::now(),
    };
    let mut result = inference.infer(request).await?;
    if result.size != size {
        result = resize_nearest(&result, size)?;
    }

    let output = output.as_ref();
    write_png(output, result).await?;
    base::log_info!("wrote {}", output.display());
    Ok(())
}
