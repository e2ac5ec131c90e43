use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::assets::{CanvasImage, ImageSlot, PreparedImage, SlotPair};
use crate::driver::opts::PlayerOpts;
use crate::effects::{EffectInputs, EffectKind};
use crate::foundation::error::{MorphclipError, MorphclipResult};
use crate::render::{Frame, FrameSink, SinkConfig};

/// Externally observable driver state.
///
/// A run is terminal: Running returns to Idle on completion or stop, and a
/// new run restarts from progress 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
}

/// Result of driving one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    /// The driver is Idle; nothing was rendered.
    Idle,
    /// A frame was rendered at `progress`. When `finished` is set the driver
    /// has transitioned back to Idle and this is the run's last frame.
    Rendered {
        tick: u64,
        progress: f64,
        finished: bool,
    },
}

/// Shared cancellation token for [`Player::play_blocking`].
///
/// Cloning hands the same token to another thread; requesting a stop is
/// sticky for the run being played.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Summary of a completed (or stopped) real-time playback.
#[derive(Clone, Copy, Debug)]
pub struct PlaybackStats {
    /// Frames pushed to the sink.
    pub frames: u64,
    /// Wall-clock time spent in the loop.
    pub wall: Duration,
    /// False when the run was cut short by a stop request.
    pub completed: bool,
}

struct RunState {
    started: Instant,
    last_progress: f64,
    ticks: u64,
}

/// The animation driver: owns the two image slots, the active effect
/// selection, playback settings, and the frame being rendered into.
///
/// Effect, duration, and intensity edits while Running take effect on the
/// next tick — each tick snapshots the settings exactly once, so a mid-run
/// change can produce a visible discontinuity but never a torn read.
pub struct Player {
    opts: PlayerOpts,
    slots: SlotPair,
    effect: EffectKind,
    duration_secs: f64,
    intensity: f64,
    state: DriverState,
    run: Option<RunState>,
    progress: f64,
    frame: Frame,
}

impl Player {
    pub fn new(opts: PlayerOpts) -> MorphclipResult<Self> {
        opts.validate()?;
        Ok(Self {
            opts,
            slots: SlotPair::new(),
            effect: EffectKind::Crossfade,
            duration_secs: opts.duration_secs,
            intensity: opts.intensity,
            state: DriverState::Idle,
            run: None,
            progress: 0.0,
            frame: Frame::new(opts.canvas),
        })
    }

    /// Fit a decoded bitmap to the canvas and install it in `slot`.
    pub fn set_image(&mut self, slot: ImageSlot, img: &PreparedImage) -> MorphclipResult<()> {
        let fitted = CanvasImage::from_prepared(img, self.opts.canvas)?;
        self.slots.set(slot, fitted);
        tracing::debug!(%slot, "image slot updated");
        Ok(())
    }

    /// Install an already canvas-sized image in `slot`.
    pub fn set_canvas_image(&mut self, slot: ImageSlot, img: CanvasImage) -> MorphclipResult<()> {
        if img.canvas() != self.opts.canvas {
            return Err(MorphclipError::validation(
                "canvas image does not match the player canvas",
            ));
        }
        self.slots.set(slot, img);
        Ok(())
    }

    pub fn clear_image(&mut self, slot: ImageSlot) {
        self.slots.clear(slot);
    }

    pub fn select_effect(&mut self, effect: EffectKind) {
        self.effect = effect;
    }

    pub fn effect(&self) -> EffectKind {
        self.effect
    }

    pub fn set_duration_secs(&mut self, secs: f64) -> MorphclipResult<()> {
        if !secs.is_finite() || secs <= 0.0 {
            return Err(MorphclipError::validation(
                "duration_secs must be finite and > 0",
            ));
        }
        self.duration_secs = secs;
        Ok(())
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// Set the intensity scalar, clamped into `[0, 1]`.
    pub fn set_intensity(&mut self, intensity: f64) {
        self.intensity = if intensity.is_finite() {
            intensity.clamp(0.0, 1.0)
        } else {
            0.0
        };
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Progress of the current (or last finished) run, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// The most recently rendered frame.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// Begin a run at `now`.
    ///
    /// Requires both images; otherwise returns the user-facing missing-input
    /// notice and leaves every piece of state untouched.
    pub fn start(&mut self, now: Instant) -> MorphclipResult<()> {
        if self.state == DriverState::Running {
            return Err(MorphclipError::validation("playback is already running"));
        }
        self.slots.require_both()?;

        self.progress = 0.0;
        self.run = Some(RunState {
            started: now,
            last_progress: 0.0,
            ticks: 0,
        });
        self.state = DriverState::Running;
        tracing::debug!(effect = %self.effect, duration_secs = self.duration_secs, "run started");
        Ok(())
    }

    /// Stop immediately: cancels the pending tick and returns to Idle,
    /// discarding in-flight progress. Idempotent.
    pub fn stop(&mut self) {
        if self.state == DriverState::Running {
            tracing::debug!(progress = self.progress, "run stopped");
        }
        self.state = DriverState::Idle;
        self.run = None;
    }

    /// Drive one tick at wall-clock time `now`.
    ///
    /// Computes clamped, monotonically non-decreasing progress from elapsed
    /// time, renders the active effect into the frame, and transitions back
    /// to Idle once progress reaches 1.
    #[tracing::instrument(skip(self, now), level = "trace")]
    pub fn tick(&mut self, now: Instant) -> MorphclipResult<TickOutcome> {
        let Some(run) = self.run.as_mut() else {
            return Ok(TickOutcome::Idle);
        };

        let elapsed = now.saturating_duration_since(run.started).as_secs_f64();
        let raw = elapsed / self.duration_secs;
        let progress = raw.clamp(0.0, 1.0).max(run.last_progress);
        run.last_progress = progress;
        let tick = run.ticks;
        run.ticks += 1;

        self.progress = progress;
        let inputs = EffectInputs::new(
            self.slots.get(ImageSlot::Before),
            self.slots.get(ImageSlot::After),
            self.intensity,
        );
        self.effect.render(&mut self.frame, &inputs, progress)?;

        let finished = progress >= 1.0;
        if finished {
            tracing::debug!(ticks = tick + 1, "run finished");
            self.state = DriverState::Idle;
            self.run = None;
        }

        Ok(TickOutcome::Rendered {
            tick,
            progress,
            finished,
        })
    }

    /// Run a whole playback in real time, pushing every frame to `sink`.
    ///
    /// The loop polls `stop` before each tick; a stop request cancels the
    /// pending tick, so no frame is produced after it. Returns stats for the
    /// run.
    pub fn play_blocking(
        &mut self,
        sink: &mut dyn FrameSink,
        stop: &StopHandle,
    ) -> MorphclipResult<PlaybackStats> {
        stop.reset();
        let started = Instant::now();
        self.start(started)?;
        sink.begin(SinkConfig {
            width: self.opts.canvas.width,
            height: self.opts.canvas.height,
            fps: self.opts.fps,
        })?;

        let tick_dur = Duration::from_secs_f64(self.opts.fps.frame_duration_secs());
        let mut frames = 0u64;
        let mut completed = false;

        loop {
            if stop.is_stop_requested() {
                self.stop();
                break;
            }

            match self.tick(Instant::now())? {
                TickOutcome::Idle => break,
                TickOutcome::Rendered {
                    tick,
                    progress,
                    finished,
                } => {
                    sink.push_frame(tick, progress, &self.frame)?;
                    frames += 1;
                    if finished {
                        completed = true;
                        break;
                    }
                }
            }

            let next = started + tick_dur * u32::try_from(frames).unwrap_or(u32::MAX);
            let now = Instant::now();
            if next > now {
                std::thread::sleep(next - now);
            }
        }

        sink.end()?;
        Ok(PlaybackStats {
            frames,
            wall: started.elapsed(),
            completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::{Canvas, Fps};

    fn test_opts() -> PlayerOpts {
        PlayerOpts {
            canvas: Canvas::new(8, 12).unwrap(),
            fps: Fps::new(120, 1).unwrap(),
            duration_secs: 1.0,
            intensity: 0.5,
        }
    }

    fn loaded_player() -> Player {
        let mut player = Player::new(test_opts()).unwrap();
        let canvas = test_opts().canvas;
        player
            .set_canvas_image(ImageSlot::Before, CanvasImage::solid(canvas, 200, 0, 0, 255))
            .unwrap();
        player
            .set_canvas_image(ImageSlot::After, CanvasImage::solid(canvas, 0, 0, 200, 255))
            .unwrap();
        player
    }

    #[test]
    fn start_without_images_is_rejected_and_state_unchanged() {
        let mut player = Player::new(test_opts()).unwrap();
        let err = player.start(Instant::now()).unwrap_err();
        assert!(matches!(err, MorphclipError::MissingInput(_)));
        assert!(err.is_user_notice());
        assert_eq!(player.state(), DriverState::Idle);
        assert_eq!(player.progress(), 0.0);

        // Only one image: still rejected.
        let canvas = test_opts().canvas;
        player
            .set_canvas_image(ImageSlot::Before, CanvasImage::solid(canvas, 1, 1, 1, 255))
            .unwrap();
        assert!(player.start(Instant::now()).is_err());
        assert_eq!(player.state(), DriverState::Idle);
    }

    #[test]
    fn tick_while_idle_renders_nothing() {
        let mut player = loaded_player();
        assert_eq!(player.tick(Instant::now()).unwrap(), TickOutcome::Idle);
    }

    #[test]
    fn progress_is_monotonic_and_clamped() {
        let mut player = loaded_player();
        let t0 = Instant::now();
        player.start(t0).unwrap();

        let mut last = 0.0f64;
        for ms in [0u64, 250, 500, 400, 750, 5000] {
            let outcome = player.tick(t0 + Duration::from_millis(ms)).unwrap();
            let TickOutcome::Rendered { progress, .. } = outcome else {
                panic!("expected a frame");
            };
            assert!(progress >= last, "progress went backwards");
            assert!((0.0..=1.0).contains(&progress));
            last = progress;
            if player.state() == DriverState::Idle {
                break;
            }
        }
        assert_eq!(last, 1.0);
        assert_eq!(player.state(), DriverState::Idle);
    }

    #[test]
    fn run_finishes_exactly_once_and_is_restartable() {
        let mut player = loaded_player();
        let t0 = Instant::now();
        player.start(t0).unwrap();
        let TickOutcome::Rendered {
            finished, progress, ..
        } = player.tick(t0 + Duration::from_secs(2)).unwrap()
        else {
            panic!("expected a frame");
        };
        assert!(finished);
        assert_eq!(progress, 1.0);
        assert_eq!(player.state(), DriverState::Idle);

        // Re-run resets progress to 0.
        let t1 = Instant::now();
        player.start(t1).unwrap();
        assert_eq!(player.progress(), 0.0);
        let TickOutcome::Rendered { progress, tick, .. } = player.tick(t1).unwrap() else {
            panic!("expected a frame");
        };
        assert_eq!(progress, 0.0);
        assert_eq!(tick, 0);
    }

    #[test]
    fn stop_cancels_pending_tick() {
        let mut player = loaded_player();
        let t0 = Instant::now();
        player.start(t0).unwrap();
        player.tick(t0).unwrap();
        player.stop();
        assert_eq!(player.state(), DriverState::Idle);
        assert_eq!(player.tick(t0 + Duration::from_millis(10)).unwrap(), TickOutcome::Idle);
    }

    #[test]
    fn start_while_running_is_rejected() {
        let mut player = loaded_player();
        let t0 = Instant::now();
        player.start(t0).unwrap();
        assert!(player.start(t0).is_err());
        assert_eq!(player.state(), DriverState::Running);
    }

    #[test]
    fn midpoint_crossfade_blends_halves() {
        let mut player = loaded_player();
        let t0 = Instant::now();
        player.start(t0).unwrap();
        player.tick(t0 + Duration::from_millis(500)).unwrap();
        // duration 1s → progress 0.5: 50% red under 50% blue.
        let px = &player.frame().data[..4];
        assert!((95..=105).contains(&px[0]));
        assert!((95..=105).contains(&px[2]));
    }

    #[test]
    fn settings_changes_apply_on_next_tick() {
        let mut player = loaded_player();
        let t0 = Instant::now();
        player.start(t0).unwrap();
        player.tick(t0 + Duration::from_millis(100)).unwrap();

        // Halving the duration mid-run doubles the derived progress on the
        // next tick.
        player.set_duration_secs(0.5).unwrap();
        player.select_effect(EffectKind::WipeRight);
        let TickOutcome::Rendered { progress, .. } =
            player.tick(t0 + Duration::from_millis(250)).unwrap()
        else {
            panic!("expected a frame");
        };
        assert!((progress - 0.5).abs() < 0.05);
    }

    #[test]
    fn clearing_an_image_mid_run_makes_ticks_no_ops() {
        let mut player = loaded_player();
        let t0 = Instant::now();
        player.start(t0).unwrap();
        player.tick(t0 + Duration::from_millis(100)).unwrap();
        let snapshot = player.frame().data.clone();

        player.clear_image(ImageSlot::After);
        player.tick(t0 + Duration::from_millis(500)).unwrap();
        assert_eq!(player.frame().data, snapshot, "absent bitmap must no-op");
    }

    #[test]
    fn set_intensity_clamps() {
        let mut player = loaded_player();
        player.set_intensity(3.0);
        assert_eq!(player.intensity(), 1.0);
        player.set_intensity(-1.0);
        assert_eq!(player.intensity(), 0.0);
        player.set_intensity(f64::NAN);
        assert_eq!(player.intensity(), 0.0);
    }
}
