use crate::assets::CanvasImage;
use crate::effects::ease::Ease;
use crate::foundation::error::MorphclipResult;
use crate::render::Frame;
use crate::render::composite::{self, PremulRgba8};
use crate::render::raster;

pub(super) fn crossfade(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    _k: f32,
) -> MorphclipResult<()> {
    composite::crossfade_in_place(&mut frame.data, a.data(), b.data(), t)
}

/// Fade out through a flat color in the first half, fade the incoming image
/// in from it in the second. Intensity deepens how long the dip holds.
pub(super) fn fade_through(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
    dip: PremulRgba8,
) -> MorphclipResult<()> {
    let hold = 0.1 + 0.25 * k;
    let (src, dip_alpha) = if t < 0.5 {
        let seg = (t / (0.5 - hold * 0.5).max(1e-6)).min(1.0);
        (a, Ease::InOutQuad.apply(seg as f64) as f32)
    } else {
        let seg = ((1.0 - t) / (0.5 - hold * 0.5).max(1e-6)).min(1.0);
        (b, Ease::InOutQuad.apply(seg as f64) as f32)
    };
    composite::copy_in_place(&mut frame.data, src.data())?;
    composite::tint_in_place(&mut frame.data, dip, dip_alpha)
}

/// Hard cut at the midpoint masked by a white flash that peaks right on the
/// cut and is gone at both endpoints.
pub(super) fn flash_cut(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    let src = if t < 0.5 { a } else { b };
    composite::copy_in_place(&mut frame.data, src.data())?;

    let envelope = 1.0 - (2.0 * t - 1.0).abs();
    let alpha = (0.4 + 0.6 * k) * envelope * envelope;
    composite::tint_in_place(&mut frame.data, [255, 255, 255, 255], alpha)
}

/// Crossfade with a warm radial glow blooming over the midpoint.
pub(super) fn glow_fade(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    composite::crossfade_in_place(&mut frame.data, a.data(), b.data(), t)?;

    let envelope = (std::f32::consts::PI * t).sin();
    if envelope <= 0.0 {
        return Ok(());
    }
    let cx = frame.width as f32 * 0.5;
    let cy = frame.height as f32 * 0.45;
    let radius = frame.width.max(frame.height) as f32 * (0.35 + 0.4 * k);
    raster::overlay_radial_glow(
        frame,
        cx,
        cy,
        radius,
        composite::premul_color(255, 236, 190, 255),
        (0.25 + 0.45 * k) * envelope,
    );
    Ok(())
}
