use {crate::*, base::Vec2};

/// RGBA colour used by the drawing helpers. Alpha is ignored on `Rgb8` images.
pub type Color = [u8; 4];

fn set_pixel(image: &mut Image, x: i32, y: i32, color: Color) {
    if x < 0 || y < 0 || x as usize >= image.size.x || y as usize >= image.size.y {
        return;
    }
    let index = y as usize * image.size.x + x as usize;
    match image.format {
        PixelFormat::Rgb8 => image.data[index * 3..index * 3 + 3].copy_from_slice(&color[..3]),
        PixelFormat::Rgba8 => image.data[index * 4..index * 4 + 4].copy_from_slice(&color),
        PixelFormat::Gray8 => {
            let [r, g, b, _] = color;
            image.data[index] = ((r as u32 * 77 + g as u32 * 150 + b as u32 * 29) >> 8) as u8;
        }
        _ => {}
    }
}

fn ensure_drawable(image: &Image) -> Result<(), ImageError> {
    match image.format {
        PixelFormat::Gray8 | PixelFormat::Rgb8 | PixelFormat::Rgba8 => image.validate(),
        other => Err(ImageError::Format(format!("cannot draw on {:?} image", other))),
    }
}

/// Draw a filled circle, clipped to the image.
pub fn draw_filled_circle(
    image: &mut Image,
    center: Vec2<i32>,
    radius: i32,
    color: Color,
) -> Result<(), ImageError> {
    ensure_drawable(image)?;
    fill_disc(image, center, radius, color);
    Ok(())
}

fn fill_disc(image: &mut Image, center: Vec2<i32>, radius: i32, color: Color) {
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                set_pixel(image, center.x + dx, center.y + dy, color);
            }
        }
    }
}

/// Draw a line `width` pixels wide using Bresenham's algorithm.
///
/// The line is clipped (Cohen-Sutherland) to the image grown by the pen
/// radius, so endpoints far outside the image cost nothing.
pub fn draw_line(
    image: &mut Image,
    from: Vec2<i32>,
    to: Vec2<i32>,
    width: u32,
    color: Color,
) -> Result<(), ImageError> {
    ensure_drawable(image)?;
    let radius = (width / 2) as i32;
    let bounds = Bounds {
        min: Vec2::new(-radius, -radius),
        max: Vec2::new(
            image.size.x as i32 - 1 + radius,
            image.size.y as i32 - 1 + radius,
        ),
    };
    let Some((mut p0, p1)) = bounds.clip(from, to) else {
        return Ok(());
    };

    let dx = (p1.x - p0.x).abs();
    let dy = (p1.y - p0.y).abs();
    let sx = if p0.x < p1.x { 1 } else { -1 };
    let sy = if p0.y < p1.y { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        if radius == 0 {
            set_pixel(image, p0.x, p0.y, color);
        } else {
            fill_disc(image, p0, radius, color);
        }
        if p0 == p1 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            p0.x += sx;
        }
        if e2 < dx {
            err += dx;
            p0.y += sy;
        }
    }
    Ok(())
}

// Cohen-Sutherland outcodes
const INSIDE: u8 = 0;
const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const BOTTOM: u8 = 4;
const TOP: u8 = 8;

struct Bounds {
    min: Vec2<i32>,
    max: Vec2<i32>,
}

impl Bounds {
    fn outcode(&self, p: Vec2<i32>) -> u8 {
        let mut code = INSIDE;
        if p.x < self.min.x {
            code |= LEFT;
        } else if p.x > self.max.x {
            code |= RIGHT;
        }
        if p.y < self.min.y {
            code |= TOP;
        } else if p.y > self.max.y {
            code |= BOTTOM;
        }
        code
    }

    fn clip(&self, mut p0: Vec2<i32>, mut p1: Vec2<i32>) -> Option<(Vec2<i32>, Vec2<i32>)> {
        loop {
            let code0 = self.outcode(p0);
            let code1 = self.outcode(p1);
            if code0 | code1 == 0 {
                return Some((p0, p1));
            }
            if code0 & code1 != 0 {
                return None;
            }
            let code = if code0 != 0 { code0 } else { code1 };
            let d = p1 - p0;
            let clipped = if code & TOP != 0 {
                Vec2::new(p0.x + d.x * (self.min.y - p0.y) / d.y, self.min.y)
            } else if code & BOTTOM != 0 {
                Vec2::new(p0.x + d.x * (self.max.y - p0.y) / d.y, self.max.y)
            } else if code & LEFT != 0 {
                Vec2::new(self.min.x, p0.y + d.y * (self.min.x - p0.x) / d.x)
            } else {
                Vec2::new(self.max.x, p0.y + d.y * (self.max.x - p0.x) / d.x)
            };
            if code == code0 {
                p0 = clipped;
            } else {
                p1 = clipped;
            }
        }
    }
}
