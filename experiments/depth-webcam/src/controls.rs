// keyboard steps for the live controls
pub const SCALE_STEP: f32 = 0.05;
pub const MIN_SCALE: f32 = 0.05;
pub const MAX_SCALE: f32 = 1.0;
pub const WIDTH_STEP: usize = 80;
pub const MIN_WIDTH: usize = 160;
pub const MAX_WIDTH: usize = 1920;

/// Scale after `steps` key presses (negative is down), kept in range.
pub fn step_scale(scale: f32, steps: i32) -> f32 {
    let stepped = scale + steps as f32 * SCALE_STEP;
    // snap to the step grid so repeated presses do not drift
    ((stepped / SCALE_STEP).round() * SCALE_STEP).clamp(MIN_SCALE, MAX_SCALE)
}

/// Display width after `steps` key presses, kept in range.
pub fn step_width(width: usize, steps: i32) -> usize {
    let stepped = width as i64 + steps as i64 * WIDTH_STEP as i64;
    stepped.clamp(MIN_WIDTH as i64, MAX_WIDTH as i64) as usize
}
