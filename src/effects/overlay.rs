use rand::Rng;
use smallvec::SmallVec;

use crate::assets::CanvasImage;
use crate::foundation::error::MorphclipResult;
use crate::foundation::math::hash_unit;
use crate::render::Frame;
use crate::render::composite::{self, masked_merge, premul_color};
use crate::render::raster;

const SPARKLE_SEED: u64 = 0x7370_6172_6b6c;

/// Crossfade under rising ember sparks. Placement is rolled fresh every frame
/// on purpose — embers should flicker, and nothing downstream depends on
/// where an individual spark lands.
pub(super) fn embers(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    composite::crossfade_in_place(&mut frame.data, a.data(), b.data(), t)?;

    let envelope = (std::f32::consts::PI * t).sin().max(0.0);
    let count = (envelope * (30.0 + 120.0 * k)) as u32;
    if count == 0 {
        return Ok(());
    }

    let width = frame.width as f32;
    let height = frame.height as f32;
    let mut rng = rand::rng();
    for _ in 0..count {
        let x = rng.random_range(0.0..width);
        // Embers rise: concentrate toward the bottom early, drift up with t.
        let band = rng.random_range(0.0f32..1.0);
        let y = height * (1.0 - 0.8 * t * band - 0.2 * band);
        let radius = rng.random_range(1.0..3.5) * (0.5 + k);
        let heat = rng.random_range(0.0f32..1.0);
        let color = if heat > 0.6 {
            premul_color(255, 220, 120, 255)
        } else {
            premul_color(255, 120, 40, 255)
        };
        let alpha = rng.random_range(0.3..1.0) * envelope;
        raster::draw_spark(frame, x, y, radius, color, alpha);
    }
    Ok(())
}

/// Crossfade under a veil of twinkling sparkles. Unlike embers, sparkle
/// positions and phases are hashed so the veil holds still between frames and
/// only the twinkle animates.
pub(super) fn sparkle_veil(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    composite::crossfade_in_place(&mut frame.data, a.data(), b.data(), t)?;

    let envelope = (std::f32::consts::PI * t).sin().max(0.0);
    if envelope <= 0.0 {
        return Ok(());
    }

    let width = frame.width as f32;
    let height = frame.height as f32;
    let sites = (40.0 + 110.0 * k) as u32;
    let color = premul_color(255, 250, 235, 255);
    for i in 0..sites {
        let i = u64::from(i);
        let x = hash_unit(SPARKLE_SEED, i, 0) * width;
        let y = hash_unit(SPARKLE_SEED, i, 1) * height;
        let phase = hash_unit(SPARKLE_SEED, i, 2);
        let twinkle = ((t * 3.0 + phase) * std::f32::consts::TAU).sin().max(0.0);
        let alpha = twinkle * twinkle * twinkle * envelope * (0.4 + 0.6 * k);
        let radius = 1.0 + 2.0 * hash_unit(SPARKLE_SEED, i, 3);
        raster::draw_spark(frame, x, y, radius, color, alpha);
    }
    Ok(())
}

/// Crossfade with a diagonal sheen sweeping across the surface.
pub(super) fn light_sweep(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    composite::crossfade_in_place(&mut frame.data, a.data(), b.data(), t)?;

    let envelope = (std::f32::consts::PI * t).sin().max(0.0);
    if envelope <= 0.0 {
        return Ok(());
    }

    // 60° off vertical, sweeping from the top-left corner to bottom-right.
    let (nx, ny) = (0.866f32, 0.5f32);
    let extent = nx * frame.width as f32 + ny * frame.height as f32;
    raster::overlay_band(
        frame,
        nx,
        ny,
        t * extent,
        frame.width as f32 * (0.12 + 0.1 * k),
        premul_color(255, 255, 255, 255),
        (0.2 + 0.4 * k) * envelope,
    );
    Ok(())
}

/// Crossfade under horizontal speed lines that sweep with progress. Streak
/// rows are hashed, not rolled, so the lines stay put across frames.
pub(super) fn motion_streaks(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    composite::crossfade_in_place(&mut frame.data, a.data(), b.data(), t)?;

    let envelope = (std::f32::consts::PI * t).sin().max(0.0);
    if envelope <= 0.0 {
        return Ok(());
    }

    let width = frame.width as f32;
    let height = frame.height as f32;
    let count = (8.0 + 22.0 * k) as u32;
    let color = premul_color(255, 255, 255, 255);
    for i in 0..count {
        let i = u64::from(i);
        let cy = hash_unit(SPARKLE_SEED ^ 0x73, i, 0) * height;
        let len = (0.15 + 0.45 * hash_unit(SPARKLE_SEED ^ 0x73, i, 1)) * width;
        let lag = hash_unit(SPARKLE_SEED ^ 0x73, i, 2) * 0.3;
        // Each line sweeps left to right, staggered by its lag.
        let u = (t * 1.3 - lag).clamp(0.0, 1.0);
        let x0 = u * (width + len) - len;
        raster::draw_streak(
            frame,
            x0,
            x0 + len,
            cy,
            1.0 + 1.5 * k,
            color,
            0.3 * envelope,
        );
    }
    Ok(())
}

/// Upward burn: a noisy scorch front reveals the incoming image from the
/// bottom, with a glowing edge and random sparks along the front.
pub(super) fn burn_reveal(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    let (width, height) = (frame.width, frame.height);
    let soft = 0.02 + 0.04 * k;

    masked_merge(
        &mut frame.data,
        a.data(),
        b.data(),
        width,
        height,
        |x, y| {
            let wobble = hash_unit(SPARKLE_SEED ^ 0x6275726e, u64::from(x / 8), 0) * 0.08 * k;
            let pos = ((height - 1 - y) as f32 / height as f32 + wobble).clamp(0.0, 1.0);
            crate::effects::wipe::front_weight(pos, 1.0, t, soft)
        },
    )?;

    let envelope = (std::f32::consts::PI * t).sin().max(0.0);
    if envelope <= 0.0 {
        return Ok(());
    }

    // Glow along the burn front.
    let front_y = height as f32 * (1.0 - t);
    raster::overlay_band(
        frame,
        0.0,
        1.0,
        front_y,
        height as f32 * 0.03 * (1.0 + k),
        premul_color(255, 140, 30, 255),
        0.55 * envelope,
    );

    // Sparks scattered on the front, frame-local by design.
    let mut rng = rand::rng();
    let count = (envelope * (10.0 + 50.0 * k)) as u32;
    let mut sparks: SmallVec<[(f32, f32, f32); 64]> = SmallVec::new();
    for _ in 0..count {
        sparks.push((
            rng.random_range(0.0..width as f32),
            front_y + rng.random_range(-8.0..8.0),
            rng.random_range(0.8..2.8),
        ));
    }
    for (x, y, radius) in sparks {
        raster::draw_spark(
            frame,
            x,
            y,
            radius,
            premul_color(255, 200, 90, 255),
            0.8 * envelope,
        );
    }
    Ok(())
}
