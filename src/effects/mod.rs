//! The effect library: ~50 independent, stateless transition renderers.
//!
//! Every effect is a pure mapping from (inputs, progress) to one fully
//! repainted frame. Dispatch is a closed enum so the set of transitions is
//! checked exhaustively at compile time.

mod ease;
mod fade;
mod grid;
mod motion;
mod overlay;
mod pixel;
mod shape;
mod slide;
mod wipe;

pub use ease::Ease;

use crate::assets::CanvasImage;
use crate::foundation::error::{MorphclipError, MorphclipResult};
use crate::render::Frame;

/// The ambient inputs every effect reads, passed explicitly so effects stay
/// pure and independently testable.
#[derive(Clone, Copy, Debug)]
pub struct EffectInputs<'a> {
    /// The outgoing image, if loaded.
    pub before: Option<&'a CanvasImage>,
    /// The incoming image, if loaded.
    pub after: Option<&'a CanvasImage>,
    /// Visual magnitude scalar in `[0, 1]` (zoom amount, particle count,
    /// soft-edge width, ...).
    pub intensity: f64,
}

impl<'a> EffectInputs<'a> {
    pub fn new(
        before: Option<&'a CanvasImage>,
        after: Option<&'a CanvasImage>,
        intensity: f64,
    ) -> Self {
        Self {
            before,
            after,
            intensity,
        }
    }

    fn resolved(&self) -> Option<(&'a CanvasImage, &'a CanvasImage)> {
        Some((self.before?, self.after?))
    }
}

/// The closed set of named transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EffectKind {
    // Fades
    Crossfade,
    FadeBlack,
    FadeWhite,
    FlashCut,
    GlowFade,
    // Wipes
    WipeRight,
    WipeLeft,
    WipeDown,
    WipeUp,
    WipeDiagDown,
    WipeDiagUp,
    BarnDoors,
    Letterbox,
    // Shaped reveals
    IrisOpen,
    IrisClose,
    DiamondOpen,
    ClockSweep,
    RippleRings,
    Pinwheel,
    // Grid reveals
    BlindsHorizontal,
    BlindsVertical,
    Checkerboard,
    GridShuffle,
    RippleGrid,
    // Slides and pushes
    SlideLeft,
    SlideRight,
    SlideUp,
    SlideDown,
    PushLeft,
    PushUp,
    // Transform motion
    ZoomIn,
    ZoomOut,
    ZoomPunch,
    RotateCw,
    RotateCcw,
    SpinZoom,
    Swing,
    ElasticDrop,
    WhipPan,
    HeartbeatZoom,
    // Pixel-level
    Pixelate,
    Dissolve,
    GrainFade,
    GlitchSlices,
    Scanlines,
    ChromaSplit,
    // Procedural overlays
    Embers,
    SparkleVeil,
    LightSweep,
    MotionStreaks,
    BurnReveal,
}

impl EffectKind {
    /// Every transition, in picker order.
    pub const ALL: &'static [EffectKind] = &[
        Self::Crossfade,
        Self::FadeBlack,
        Self::FadeWhite,
        Self::FlashCut,
        Self::GlowFade,
        Self::WipeRight,
        Self::WipeLeft,
        Self::WipeDown,
        Self::WipeUp,
        Self::WipeDiagDown,
        Self::WipeDiagUp,
        Self::BarnDoors,
        Self::Letterbox,
        Self::IrisOpen,
        Self::IrisClose,
        Self::DiamondOpen,
        Self::ClockSweep,
        Self::RippleRings,
        Self::Pinwheel,
        Self::BlindsHorizontal,
        Self::BlindsVertical,
        Self::Checkerboard,
        Self::GridShuffle,
        Self::RippleGrid,
        Self::SlideLeft,
        Self::SlideRight,
        Self::SlideUp,
        Self::SlideDown,
        Self::PushLeft,
        Self::PushUp,
        Self::ZoomIn,
        Self::ZoomOut,
        Self::ZoomPunch,
        Self::RotateCw,
        Self::RotateCcw,
        Self::SpinZoom,
        Self::Swing,
        Self::ElasticDrop,
        Self::WhipPan,
        Self::HeartbeatZoom,
        Self::Pixelate,
        Self::Dissolve,
        Self::GrainFade,
        Self::GlitchSlices,
        Self::Scanlines,
        Self::ChromaSplit,
        Self::Embers,
        Self::SparkleVeil,
        Self::LightSweep,
        Self::MotionStreaks,
        Self::BurnReveal,
    ];

    /// Stable wire name, as shown in the effect picker.
    pub fn name(self) -> &'static str {
        match self {
            Self::Crossfade => "fadeCross",
            Self::FadeBlack => "fadeBlack",
            Self::FadeWhite => "fadeWhite",
            Self::FlashCut => "flashCut",
            Self::GlowFade => "glowFade",
            Self::WipeRight => "wipeRight",
            Self::WipeLeft => "wipeLeft",
            Self::WipeDown => "wipeDown",
            Self::WipeUp => "wipeUp",
            Self::WipeDiagDown => "wipeDiagDown",
            Self::WipeDiagUp => "wipeDiagUp",
            Self::BarnDoors => "barnDoors",
            Self::Letterbox => "letterbox",
            Self::IrisOpen => "irisOpen",
            Self::IrisClose => "irisClose",
            Self::DiamondOpen => "diamondOpen",
            Self::ClockSweep => "clockSweep",
            Self::RippleRings => "rippleRings",
            Self::Pinwheel => "pinwheel",
            Self::BlindsHorizontal => "blindsH",
            Self::BlindsVertical => "blindsV",
            Self::Checkerboard => "checkerboard",
            Self::GridShuffle => "gridShuffle",
            Self::RippleGrid => "rippleGrid",
            Self::SlideLeft => "slideLeft",
            Self::SlideRight => "slideRight",
            Self::SlideUp => "slideUp",
            Self::SlideDown => "slideDown",
            Self::PushLeft => "pushLeft",
            Self::PushUp => "pushUp",
            Self::ZoomIn => "zoomIn",
            Self::ZoomOut => "zoomOut",
            Self::ZoomPunch => "zoomPunch",
            Self::RotateCw => "rotateCW",
            Self::RotateCcw => "rotateCCW",
            Self::SpinZoom => "spinZoom",
            Self::Swing => "swing",
            Self::ElasticDrop => "elasticDrop",
            Self::WhipPan => "whipPan",
            Self::HeartbeatZoom => "heartbeatZoom",
            Self::Pixelate => "pixelate",
            Self::Dissolve => "dissolve",
            Self::GrainFade => "grainFade",
            Self::GlitchSlices => "glitchSlices",
            Self::Scanlines => "scanlines",
            Self::ChromaSplit => "chromaSplit",
            Self::Embers => "embers",
            Self::SparkleVeil => "sparkleVeil",
            Self::LightSweep => "lightSweep",
            Self::MotionStreaks => "motionStreaks",
            Self::BurnReveal => "burnReveal",
        }
    }

    /// Parse a picker name. Case-insensitive; `-`/`_` separators and a few
    /// historical aliases are accepted.
    pub fn parse(name: &str) -> MorphclipResult<Self> {
        let folded: String = name
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        if folded.is_empty() {
            return Err(MorphclipError::validation("effect name must be non-empty"));
        }

        for kind in Self::ALL {
            if kind.name().to_ascii_lowercase() == folded {
                return Ok(*kind);
            }
        }

        match folded.as_str() {
            "crossfade" | "fade" => Ok(Self::Crossfade),
            "diptoblack" => Ok(Self::FadeBlack),
            "diptowhite" => Ok(Self::FadeWhite),
            "blinds" => Ok(Self::BlindsHorizontal),
            "checker" => Ok(Self::Checkerboard),
            "iris" => Ok(Self::IrisOpen),
            "clock" | "radialsweep" => Ok(Self::ClockSweep),
            "glitch" => Ok(Self::GlitchSlices),
            "sparks" => Ok(Self::Embers),
            _ => Err(MorphclipError::validation(format!(
                "unknown effect '{}'",
                name.trim()
            ))),
        }
    }

    /// True for the effects that place cosmetic elements with fresh
    /// randomness every frame (ember sparks, glitch offsets, grain). All
    /// other effects reproduce identical bytes for identical inputs.
    pub fn is_frame_random(self) -> bool {
        matches!(
            self,
            Self::Embers | Self::BurnReveal | Self::GlitchSlices | Self::GrainFade
        )
    }

    /// Render one frame of this transition at `progress` into `frame`.
    ///
    /// With either bitmap absent this is a no-op returning `Ok` — the driver
    /// refuses to start a run in that state, but the contract holds here too.
    pub fn render(
        self,
        frame: &mut Frame,
        inputs: &EffectInputs<'_>,
        progress: f64,
    ) -> MorphclipResult<()> {
        let Some((before, after)) = inputs.resolved() else {
            return Ok(());
        };
        if before.canvas() != frame.canvas() || after.canvas() != frame.canvas() {
            return Err(MorphclipError::render(
                "effect inputs must match the frame canvas",
            ));
        }

        let t = progress.clamp(0.0, 1.0) as f32;
        let k = inputs.intensity.clamp(0.0, 1.0) as f32;

        match self {
            Self::Crossfade => fade::crossfade(frame, before, after, t, k),
            Self::FadeBlack => fade::fade_through(frame, before, after, t, k, [0, 0, 0, 255]),
            Self::FadeWhite => {
                fade::fade_through(frame, before, after, t, k, [255, 255, 255, 255])
            }
            Self::FlashCut => fade::flash_cut(frame, before, after, t, k),
            Self::GlowFade => fade::glow_fade(frame, before, after, t, k),
            Self::WipeRight => wipe::edge(frame, before, after, t, k, wipe::WipeDir::LeftToRight),
            Self::WipeLeft => wipe::edge(frame, before, after, t, k, wipe::WipeDir::RightToLeft),
            Self::WipeDown => wipe::edge(frame, before, after, t, k, wipe::WipeDir::TopToBottom),
            Self::WipeUp => wipe::edge(frame, before, after, t, k, wipe::WipeDir::BottomToTop),
            Self::WipeDiagDown => wipe::diagonal(frame, before, after, t, k, false),
            Self::WipeDiagUp => wipe::diagonal(frame, before, after, t, k, true),
            Self::BarnDoors => wipe::barn_doors(frame, before, after, t, k),
            Self::Letterbox => wipe::letterbox(frame, before, after, t, k),
            Self::IrisOpen => shape::iris_open(frame, before, after, t, k),
            Self::IrisClose => shape::iris_close(frame, before, after, t, k),
            Self::DiamondOpen => shape::diamond_open(frame, before, after, t, k),
            Self::ClockSweep => shape::clock_sweep(frame, before, after, t, k),
            Self::RippleRings => shape::ripple_rings(frame, before, after, t, k),
            Self::Pinwheel => shape::pinwheel(frame, before, after, t, k),
            Self::BlindsHorizontal => grid::blinds(frame, before, after, t, k, grid::Axis::Rows),
            Self::BlindsVertical => grid::blinds(frame, before, after, t, k, grid::Axis::Cols),
            Self::Checkerboard => grid::checkerboard(frame, before, after, t, k),
            Self::GridShuffle => grid::grid_shuffle(frame, before, after, t, k),
            Self::RippleGrid => grid::ripple_grid(frame, before, after, t, k),
            Self::SlideLeft => slide::slide(frame, before, after, t, k, slide::SlideDir::Left),
            Self::SlideRight => slide::slide(frame, before, after, t, k, slide::SlideDir::Right),
            Self::SlideUp => slide::slide(frame, before, after, t, k, slide::SlideDir::Up),
            Self::SlideDown => slide::slide(frame, before, after, t, k, slide::SlideDir::Down),
            Self::PushLeft => slide::push(frame, before, after, t, k, slide::SlideDir::Left),
            Self::PushUp => slide::push(frame, before, after, t, k, slide::SlideDir::Up),
            Self::ZoomIn => motion::zoom_in(frame, before, after, t, k),
            Self::ZoomOut => motion::zoom_out(frame, before, after, t, k),
            Self::ZoomPunch => motion::zoom_punch(frame, before, after, t, k),
            Self::RotateCw => motion::rotate_away(frame, before, after, t, k, 1.0),
            Self::RotateCcw => motion::rotate_away(frame, before, after, t, k, -1.0),
            Self::SpinZoom => motion::spin_zoom(frame, before, after, t, k),
            Self::Swing => motion::swing(frame, before, after, t, k),
            Self::ElasticDrop => motion::elastic_drop(frame, before, after, t, k),
            Self::WhipPan => motion::whip_pan(frame, before, after, t, k),
            Self::HeartbeatZoom => motion::heartbeat_zoom(frame, before, after, t, k),
            Self::Pixelate => pixel::pixelate(frame, before, after, t, k),
            Self::Dissolve => pixel::dissolve(frame, before, after, t, k),
            Self::GrainFade => pixel::grain_fade(frame, before, after, t, k),
            Self::GlitchSlices => pixel::glitch_slices(frame, before, after, t, k),
            Self::Scanlines => pixel::scanlines(frame, before, after, t, k),
            Self::ChromaSplit => pixel::chroma_split(frame, before, after, t, k),
            Self::Embers => overlay::embers(frame, before, after, t, k),
            Self::SparkleVeil => overlay::sparkle_veil(frame, before, after, t, k),
            Self::LightSweep => overlay::light_sweep(frame, before, after, t, k),
            Self::MotionStreaks => overlay::motion_streaks(frame, before, after, t, k),
            Self::BurnReveal => overlay::burn_reveal(frame, before, after, t, k),
        }
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
