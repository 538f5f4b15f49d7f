use {crate::*, std::time::Duration};

pub const DEFAULT_SCALE: f32 = 0.5;
pub const DEFAULT_DISPLAY_WIDTH: usize = 640;
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(16);
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_millis(1000);

/// Settings for a `FrameScheduler`.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    scale: f32,
    display_width: usize,
    tick_interval: Duration,
    inference_timeout: Option<Duration>,
    report_interval: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            display_width: DEFAULT_DISPLAY_WIDTH,
            tick_interval: DEFAULT_TICK_INTERVAL,
            inference_timeout: None,
            report_interval: DEFAULT_REPORT_INTERVAL,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of the capture size sent to inference, in (0, 1].
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Display surface width; the height follows at 4:3.
    pub fn with_display_width(mut self, width: usize) -> Self {
        self.display_width = width;
        self
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn with_inference_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.inference_timeout = timeout;
        self
    }

    pub fn with_report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn display_width(&self) -> usize {
        self.display_width
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn inference_timeout(&self) -> Option<Duration> {
        self.inference_timeout
    }

    pub fn report_interval(&self) -> Duration {
        self.report_interval
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        validate_scale(self.scale)?;
        display_size(self.display_width)?;
        if self.tick_interval.is_zero() {
            return Err(PipelineError::Config("tick interval must be non-zero".to_string()));
        }
        if self.report_interval.is_zero() {
            return Err(PipelineError::Config("report interval must be non-zero".to_string()));
        }
        if self.inference_timeout.is_some_and(|t| t.is_zero()) {
            return Err(PipelineError::Config("inference timeout must be non-zero".to_string()));
        }
        Ok(())
    }
}

pub fn validate_scale(scale: f32) -> Result<(), PipelineError> {
    if !scale.is_finite() || scale <= 0.0 || scale > 1.0 {
        return Err(PipelineError::Config(format!(
            "scale must be in (0, 1], got {}",
            scale
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.scale(), 0.5);
        assert_eq!(config.display_width(), 640);
        assert_eq!(config.tick_interval(), Duration::from_millis(16));
        assert_eq!(config.inference_timeout(), None);
        assert_eq!(config.report_interval(), Duration::from_millis(1000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn oversized_display_width_is_invalid() {
        let config = PipelineConfig::default().with_display_width(1 << 20);
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn builder_sets_fields() {
        let config = PipelineConfig::new()
            .with_scale(0.25)
            .with_display_width(800)
            .with_tick_interval(Duration::from_millis(33))
            .with_inference_timeout(Some(Duration::from_secs(2)))
            .with_report_interval(Duration::from_millis(500));
        assert_eq!(config.scale(), 0.25);
        assert_eq!(config.display_width(), 800);
        assert_eq!(config.tick_interval(), Duration::from_millis(33));
        assert_eq!(config.inference_timeout(), Some(Duration::from_secs(2)));
        assert_eq!(config.report_interval(), Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_scale() {
        for scale in [0.0, -0.5, 1.5, f32::NAN, f32::INFINITY] {
            let config = PipelineConfig::new().with_scale(scale);
            assert!(matches!(config.validate(), Err(PipelineError::Config(_))), "{scale}");
        }
        assert!(PipelineConfig::new().with_scale(1.0).validate().is_ok());
    }

    #[test]
    fn rejects_zero_sizes_and_intervals() {
        assert!(PipelineConfig::new().with_display_width(0).validate().is_err());
        assert!(PipelineConfig::new().with_display_width(1).validate().is_ok());
        assert!(PipelineConfig::new().with_tick_interval(Duration::ZERO).validate().is_err());
        assert!(
            PipelineConfig::new()
                .with_inference_timeout(Some(Duration::ZERO))
                .validate()
                .is_err()
        );
    }
}
