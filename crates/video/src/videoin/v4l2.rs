use {
    crate::*,
    base::Vec2,
    image::{Image, PixelFormat},
    std::path::PathBuf,
    v4l::{
        Device, Format, FourCC, buffer::Type, io::mmap::Stream as MmapStream,
        io::traits::CaptureStream, video::Capture,
    },
};

/// V4L2 capture settings. Unset fields keep whatever the device reports.
#[derive(Debug, Clone, Default)]
pub struct V4l2Config {
    pub path: Option<PathBuf>,
    pub size: Option<Vec2<usize>>,
    pub format: Option<PixelFormat>,
    pub frame_rate: Option<f32>,
}

impl V4l2Config {
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_size(mut self, size: Vec2<usize>) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_format(mut self, format: PixelFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_frame_rate(mut self, frame_rate: f32) -> Self {
        self.frame_rate = Some(frame_rate);
        self
    }
}

pub(crate) struct V4l2 {
    config: V4l2Config,
    stream: Option<MmapStream<'static>>,
    size: Vec2<usize>,
    format: PixelFormat,
}

impl V4l2 {
    pub fn new(config: V4l2Config) -> Self {
        Self {
            config,
            stream: None,
            size: Vec2::new(0, 0),
            format: PixelFormat::Yuyv,
        }
    }
}

fn fourcc_for(format: PixelFormat) -> Result<FourCC, VideoError> {
    match format {
        PixelFormat::Yuyv => Ok(FourCC::new(b"YUYV")),
        PixelFormat::Jpeg => Ok(FourCC::new(b"MJPG")),
        other => Err(VideoError::Device(format!(
            "V4L2 capture does not support {:?}",
            other
        ))),
    }
}

impl VideoInDevice for V4l2 {
    fn open(&mut self) -> Result<VideoInfo, VideoError> {
        self.stream.take();

        let device = match &self.config.path {
            Some(path) => Device::with_path(path)?,
            None => Device::new(0)?,
        };
        let device_format = Capture::format(&device)?;

        let desired_size = self.config.size.unwrap_or(Vec2::new(
            device_format.width as usize,
            device_format.height as usize,
        ));
        let desired_fourcc = match self.config.format {
            Some(format) => fourcc_for(format)?,
            None => device_format.fourcc,
        };

        // set the format and read back what the driver accepted
        let actual_format = Capture::set_format(
            &device,
            &Format::new(desired_size.x as u32, desired_size.y as u32, desired_fourcc),
        )?;
        self.size = Vec2::new(actual_format.width as usize, actual_format.height as usize);
        self.format = match &actual_format.fourcc.repr {
            b"YUYV" => PixelFormat::Yuyv,
            b"MJPG" => PixelFormat::Jpeg,
            _ => {
                return Err(VideoError::Device(format!(
                    "unsupported pixel format: {}",
                    actual_format.fourcc
                )));
            }
        };

        let desired_frame_rate = match self.config.frame_rate {
            Some(frame_rate) => frame_rate,
            None => {
                let params = Capture::params(&device)?;
                params.interval.denominator as f32 / params.interval.numerator as f32
            }
        };
        let actual_params = Capture::set_params(
            &device,
            &v4l::video::capture::Parameters::with_fps(desired_frame_rate as u32),
        )?;
        let frame_rate =
            actual_params.interval.denominator as f32 / actual_params.interval.numerator as f32;

        self.stream = Some(
            MmapStream::with_buffers(&device, Type::VideoCapture, 4)
                .map_err(|e| VideoError::Stream(e.to_string()))?,
        );

        Ok(VideoInfo {
            size: self.size,
            format: self.format,
            frame_rate,
        })
    }

    fn close(&mut self) {
        self.stream.take();
    }

    fn blocking_capture(&mut self) -> Result<Image, VideoError> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| VideoError::Stream("no stream".to_string()))?;
        let (frame_data, _metadata) =
            CaptureStream::next(stream).map_err(|e| VideoError::Stream(e.to_string()))?;
        Ok(Image::new(self.size, frame_data.to_vec(), self.format))
    }
}
