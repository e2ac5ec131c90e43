use rand::Rng;

use crate::assets::CanvasImage;
use crate::effects::ease::Ease;
use crate::foundation::error::MorphclipResult;
use crate::foundation::math::{hash_unit, smoothstep};
use crate::render::Frame;
use crate::render::composite::{self, masked_merge};
use crate::render::raster;
use smallvec::SmallVec;

const DISSOLVE_SEED: u64 = 0x6469_7373;

/// Mosaic blur that intentionally samples its own previous frame.
///
/// This is the one effect that does not fully repaint before drawing: the
/// frame's existing contents are downsampled into growing blocks and the
/// current crossfade target is composited over them at reduced opacity, so
/// successive ticks leave a smeared, motion-blurred trail. From a cleared
/// surface (a single still render) the endpoints are exact.
pub(super) fn pixelate(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    let envelope = (std::f32::consts::PI * t).sin().max(0.0);
    let block = 1 + (envelope * (8.0 + 40.0 * k)) as u32;
    raster::pixelate_in_place(frame, block);

    let mix = Ease::InOutQuad.apply(f64::from(t)) as f32;
    let mut incoming = vec![0u8; frame.data.len()];
    composite::crossfade_in_place(&mut incoming, a.data(), b.data(), mix)?;

    let opacity = 1.0 - 0.65 * k * envelope;
    composite::over_in_place(&mut frame.data, &incoming, opacity)
}

/// Per-pixel threshold dissolve. The threshold field is hashed, so the grain
/// pattern holds still while the front moves through it.
pub(super) fn dissolve(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    let (width, height) = (frame.width, frame.height);
    let soft = 0.01 + 0.06 * k;

    masked_merge(
        &mut frame.data,
        a.data(),
        b.data(),
        width,
        height,
        |x, y| {
            let threshold = hash_unit(DISSOLVE_SEED, u64::from(x), u64::from(y));
            // Remap so even threshold 0 / 1 pixels are clean at the endpoints.
            let edge = t * (1.0 + 2.0 * soft) - soft;
            smoothstep(threshold - soft, threshold + soft, edge)
        },
    )
}

/// Crossfade under animated film grain. The grain is frame-local by design —
/// it must shimmer, not hold still.
pub(super) fn grain_fade(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    composite::crossfade_in_place(&mut frame.data, a.data(), b.data(), t)?;

    let envelope = (std::f32::consts::PI * t).sin().max(0.0);
    let amount = 0.18 * k * envelope;
    let mut rng = rand::rng();
    raster::add_grain(frame, amount, || rng.random_range(-1.0..1.0));
    Ok(())
}

/// Crossfade broken by horizontally displaced slices. Slice choice and
/// offsets are rolled fresh every frame.
pub(super) fn glitch_slices(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    composite::crossfade_in_place(&mut frame.data, a.data(), b.data(), t)?;

    let envelope = (std::f32::consts::PI * t).sin().max(0.0);
    let strength = envelope * k;
    if strength <= 0.0 {
        return Ok(());
    }

    let slice_h = (frame.height / 24).max(1);
    let snapshot = frame.data.clone();
    let mut rng = rand::rng();
    let mut offsets: SmallVec<[(u32, i32); 32]> = SmallVec::new();
    let mut y = 0u32;
    while y < frame.height {
        if rng.random_range(0.0..1.0) < f64::from(strength) * 0.6 {
            let max_off = (frame.width as f32 * 0.25 * strength).max(1.0) as i32;
            offsets.push((y, rng.random_range(-max_off..=max_off)));
        }
        y += slice_h;
    }
    for (y0, off) in offsets {
        raster::shift_rows_from(frame, &snapshot, y0, y0 + slice_h, off)?;
    }
    Ok(())
}

/// Crossfade behind darkened scanline bands and a brighter refresh bar that
/// rolls down the surface.
pub(super) fn scanlines(
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
    let period = (frame.height / 180).max(2);
    raster::darken_row_bands(frame, period, 0, 0.45 * k * envelope);

    let bar_y = t * frame.height as f32;
    raster::overlay_band(
        frame,
        0.0,
        1.0,
        bar_y,
        frame.height as f32 * 0.05,
        composite::premul_color(255, 255, 255, 255),
        0.25 * k * envelope,
    );
    Ok(())
}

/// Crossfade with the red and blue channels drifting apart and re-converging.
/// The drift is a pure function of progress, so it replays identically.
pub(super) fn chroma_split(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    composite::crossfade_in_place(&mut frame.data, a.data(), b.data(), t)?;

    let envelope = (std::f32::consts::PI * t).sin().max(0.0);
    let dx = (envelope * (0.002 + 0.024 * k) * frame.width as f32).ceil() as u32;
    raster::channel_split_in_place(frame, dx);
    Ok(())
}
