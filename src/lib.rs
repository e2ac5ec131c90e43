//! Morphclip renders animated transition effects between a "before" and an
//! "after" image onto a fixed 1080×1920 drawing surface, one complete frame
//! per tick, for screen-recorded social-media clips.
//!
//! The crate is a thin, single-layer system:
//!
//! - Load the two bitmaps ([`decode_image`] / [`PendingImage`])
//! - Pick a transition from the closed [`EffectKind`] catalog
//! - Drive a [`Player`] run, tick by tick or in real time into a [`FrameSink`]
//!
//! Capture is the operating system's screen recorder's job; nothing here
//! encodes or persists video.
#![forbid(unsafe_code)]

pub mod assets;
pub mod driver;
pub mod effects;
pub mod foundation;
pub mod render;

pub use assets::{
    CanvasImage, ImageSlot, PendingImage, PreparedImage, SlotPair, decode_image, decode_image_file,
};
pub use driver::{DriverState, PlaybackStats, Player, PlayerOpts, StopHandle, TickOutcome};
pub use effects::{Ease, EffectInputs, EffectKind};
pub use foundation::core::{Canvas, Fps};
pub use foundation::error::{MorphclipError, MorphclipResult};
pub use render::{Frame, FrameSink, InMemorySink, SinkConfig};
