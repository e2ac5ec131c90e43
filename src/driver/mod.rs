mod opts;
mod player;

pub use opts::PlayerOpts;
pub use player::{DriverState, PlaybackStats, Player, StopHandle, TickOutcome};
