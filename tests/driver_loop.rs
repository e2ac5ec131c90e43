use std::time::{Duration, Instant};

use morphclip::{
    Canvas, CanvasImage, DriverState, EffectKind, Fps, ImageSlot, InMemorySink, MorphclipError,
    Player, PlayerOpts, StopHandle, TickOutcome,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn small_opts() -> PlayerOpts {
    PlayerOpts {
        canvas: Canvas::new(9, 16).unwrap(),
        fps: Fps::new(240, 1).unwrap(),
        duration_secs: 0.05,
        intensity: 0.8,
    }
}

fn loaded_player(opts: PlayerOpts) -> Player {
    let mut player = Player::new(opts).unwrap();
    player
        .set_canvas_image(
            ImageSlot::Before,
            CanvasImage::solid(opts.canvas, 220, 30, 10, 255),
        )
        .unwrap();
    player
        .set_canvas_image(
            ImageSlot::After,
            CanvasImage::solid(opts.canvas, 10, 30, 220, 255),
        )
        .unwrap();
    player
}

#[test]
fn play_blocking_completes_and_pushes_ordered_frames() {
    init_tracing();
    let mut player = loaded_player(small_opts());
    let mut sink = InMemorySink::new();
    let stop = StopHandle::new();

    let stats = player.play_blocking(&mut sink, &stop).unwrap();
    assert!(stats.completed);
    assert!(stats.frames >= 2, "a 50ms run at 240fps has several frames");
    assert_eq!(stats.frames as usize, sink.frames().len());

    let mut last_tick = None;
    let mut last_progress = -1.0f64;
    for (tick, progress, frame) in sink.frames() {
        if let Some(prev) = last_tick {
            assert_eq!(*tick, prev + 1, "ticks are strictly increasing");
        }
        last_tick = Some(*tick);
        assert!(*progress >= last_progress, "progress is non-decreasing");
        last_progress = *progress;
        assert_eq!(frame.width, 9);
        assert_eq!(frame.height, 16);
    }
    assert_eq!(last_progress, 1.0, "final frame lands exactly on progress 1");
    assert_eq!(player.state(), DriverState::Idle);
}

#[test]
fn stop_from_another_thread_halts_frame_production() {
    init_tracing();
    let mut player = loaded_player(PlayerOpts {
        duration_secs: 10.0,
        ..small_opts()
    });
    let mut sink = InMemorySink::new();
    let stop = StopHandle::new();

    let canceller = stop.clone();
    let handle = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(30));
        canceller.request_stop();
    });

    let stats = player.play_blocking(&mut sink, &stop).unwrap();
    handle.join().unwrap();

    assert!(!stats.completed, "stop request must cut the run short");
    assert!(stats.wall < Duration::from_secs(5));
    assert_eq!(player.state(), DriverState::Idle);
    // No frame was pushed after the stop: every captured progress is < 1.
    assert!(sink.frames().iter().all(|(_, p, _)| *p < 1.0));
}

#[test]
fn missing_after_image_leaves_playback_idle_with_notice() {
    init_tracing();
    let opts = small_opts();
    let mut player = Player::new(opts).unwrap();
    player
        .set_canvas_image(
            ImageSlot::Before,
            CanvasImage::solid(opts.canvas, 1, 2, 3, 255),
        )
        .unwrap();

    let mut sink = InMemorySink::new();
    let stop = StopHandle::new();
    let err = player.play_blocking(&mut sink, &stop).unwrap_err();
    assert!(matches!(err, MorphclipError::MissingInput(_)));
    assert!(err.is_user_notice());
    assert_eq!(player.state(), DriverState::Idle);
    assert_eq!(player.progress(), 0.0);
    assert!(sink.frames().is_empty());
}

#[test]
fn rerun_reproduces_identical_frames_for_deterministic_effects() {
    init_tracing();
    let opts = small_opts();
    let mut player = loaded_player(opts);
    player.select_effect(EffectKind::WipeRight);

    // Drive two runs with identical synthetic tick times.
    let ticks_ms = [0u64, 10, 20, 30, 40, 60];
    let mut runs: Vec<Vec<Vec<u8>>> = Vec::new();
    for _ in 0..2 {
        let t0 = Instant::now();
        player.start(t0).unwrap();
        let mut frames = Vec::new();
        for ms in ticks_ms {
            match player.tick(t0 + Duration::from_millis(ms)).unwrap() {
                TickOutcome::Rendered { .. } => frames.push(player.frame().data.clone()),
                TickOutcome::Idle => break,
            }
            if player.state() == DriverState::Idle {
                break;
            }
        }
        runs.push(frames);
    }
    assert_eq!(runs[0], runs[1], "same settings replay the same frames");
}

#[test]
fn effect_switch_mid_run_takes_effect_on_next_tick() {
    init_tracing();
    let opts = PlayerOpts {
        duration_secs: 1.0,
        ..small_opts()
    };
    let mut player = loaded_player(opts);
    player.select_effect(EffectKind::Crossfade);

    let t0 = Instant::now();
    player.start(t0).unwrap();
    player.tick(t0 + Duration::from_millis(500)).unwrap();
    let crossfaded = player.frame().data.clone();

    player.select_effect(EffectKind::WipeRight);
    player.tick(t0 + Duration::from_millis(501)).unwrap();
    let wiped = player.frame().data.clone();
    assert_ne!(crossfaded, wiped, "new effect renders from the next tick");
}
