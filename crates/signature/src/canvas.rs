use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::encode::encode_png_data_uri;
use crate::error::SignatureError;
use crate::pad::Point;

pub const DEFAULT_WIDTH: u32 = 600;
pub const DEFAULT_HEIGHT: u32 = 160;

/// Largest accepted side, in pixels.
pub const MAX_SIDE: u32 = 4096;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Black pen, 2 px wide. Caps and joins are always round.
const PEN_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);
const PEN_WIDTH: f32 = 2.0;

/// An opaque raster drawing surface.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// A blank white surface.
    pub fn new(width: u32, height: u32) -> Result<Self, SignatureError> {
        if width == 0 || height == 0 || width > MAX_SIDE || height > MAX_SIDE {
            return Err(SignatureError::InvalidSurface {
                width,
                height,
                max: MAX_SIDE,
            });
        }
        Ok(Self {
            image: RgbaImage::from_pixel(width, height, BACKGROUND),
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Repaint the whole surface with the background.
    pub fn clear(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = BACKGROUND;
        }
    }

    /// True when no pixel differs from the background.
    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|p| *p == BACKGROUND)
    }

    /// Draw a round-capped line from `from` to `to`.
    ///
    /// Each pixel is shaded by its distance to the segment, so consecutive
    /// segments meet with round joins. Points outside the surface are
    /// clipped.
    pub fn stroke_segment(&mut self, from: Point, to: Point) {
        let radius = PEN_WIDTH / 2.0;
        let reach = radius + 1.0;

        let min_x = (from.x.min(to.x) - reach).floor().max(0.0) as u32;
        let min_y = (from.y.min(to.y) - reach).floor().max(0.0) as u32;
        let max_x = (from.x.max(to.x) + reach).ceil();
        let max_y = (from.y.max(to.y) + reach).ceil();
        if max_x < 0.0 || max_y < 0.0 {
            return;
        }
        let max_x = (max_x as u32).min(self.width().saturating_sub(1));
        let max_y = (max_y as u32).min(self.height().saturating_sub(1));

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                let distance = distance_to_segment(center, from, to);
                let coverage = (radius + 0.5 - distance).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, coverage);
                }
            }
        }
    }

    fn blend(&mut self, x: u32, y: u32, coverage: f32) {
        let color = PEN_COLOR;
        let alpha = coverage * (color.0[3] as f32 / 255.0);
        let pixel = self.image.get_pixel_mut(x, y);
        for c in 0..3 {
            let under = pixel.0[c] as f32;
            let over = color.0[c] as f32;
            pixel.0[c] = (under + (over - under) * alpha).round() as u8;
        }
        pixel.0[3] = 255;
    }

    /// Encode the surface as PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>, SignatureError> {
        let mut buf = Cursor::new(Vec::new());
        self.image.write_to(&mut buf, ImageFormat::Png)?;
        Ok(buf.into_inner())
    }

    /// Encode the surface as a `data:image/png;base64,...` string.
    pub fn to_data_uri(&self) -> Result<String, SignatureError> {
        Ok(encode_png_data_uri(&self.encode_png()?))
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}
