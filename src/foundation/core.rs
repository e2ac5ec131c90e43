use crate::foundation::error::{MorphclipError, MorphclipResult};

pub use kurbo::{Affine, Point, Vec2};

/// Drawing-surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// The product output surface: 1080×1920 (9:16), sized for phone-screen
    /// recording.
    pub const OUTPUT: Canvas = Canvas {
        width: 1080,
        height: 1920,
    };

    /// Create a validated canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> MorphclipResult<Self> {
        if width == 0 || height == 0 {
            return Err(MorphclipError::validation(
                "canvas dimensions must be non-zero",
            ));
        }
        Ok(Self { width, height })
    }

    /// Number of pixels on the surface.
    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Byte length of a tightly packed RGBA8 buffer for this canvas.
    pub fn byte_len(self) -> usize {
        self.pixel_count() * 4
    }
}

/// Display refresh cadence represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> MorphclipResult<Self> {
        if den == 0 {
            return Err(MorphclipError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(MorphclipError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }
}
