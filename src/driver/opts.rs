use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{MorphclipError, MorphclipResult};

/// Construction-time configuration for a [`Player`](crate::driver::Player).
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct PlayerOpts {
    /// Drawing surface size. Defaults to the 1080×1920 output surface.
    #[serde(default = "default_canvas")]
    pub canvas: Canvas,
    /// Tick cadence for real-time playback.
    #[serde(default = "default_fps")]
    pub fps: Fps,
    /// Default run duration in seconds. The practical range is 1–10.
    #[serde(default = "default_duration")]
    pub duration_secs: f64,
    /// Default effect intensity in `[0, 1]`.
    #[serde(default = "default_intensity")]
    pub intensity: f64,
}

fn default_canvas() -> Canvas {
    Canvas::OUTPUT
}

fn default_fps() -> Fps {
    Fps { num: 60, den: 1 }
}

fn default_duration() -> f64 {
    2.0
}

fn default_intensity() -> f64 {
    0.5
}

impl Default for PlayerOpts {
    fn default() -> Self {
        Self {
            canvas: default_canvas(),
            fps: default_fps(),
            duration_secs: default_duration(),
            intensity: default_intensity(),
        }
    }
}

impl PlayerOpts {
    pub fn validate(&self) -> MorphclipResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(MorphclipError::validation(
                "canvas dimensions must be non-zero",
            ));
        }
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(MorphclipError::validation("fps must be a positive rational"));
        }
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(MorphclipError::validation(
                "duration_secs must be finite and > 0",
            ));
        }
        if !self.intensity.is_finite() || !(0.0..=1.0).contains(&self.intensity) {
            return Err(MorphclipError::validation("intensity must be in [0, 1]"));
        }
        Ok(())
    }

    /// Parse options from a JSON object. Missing fields take their defaults.
    pub fn from_json(json: &str) -> MorphclipResult<Self> {
        let opts: Self = serde_json::from_str(json)
            .map_err(|e| MorphclipError::validation(format!("parse player options: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }
}
