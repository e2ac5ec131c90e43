use kurbo::Affine;

use crate::assets::CanvasImage;
use crate::effects::ease::Ease;
use crate::foundation::error::MorphclipResult;
use crate::render::Frame;
use crate::render::composite::{self, premul_color};
use crate::render::raster::{draw_affine_over, draw_streak, transform_about};

fn center_of(frame: &Frame) -> (f64, f64) {
    (f64::from(frame.width) * 0.5, f64::from(frame.height) * 0.5)
}

/// The outgoing image grows toward the viewer and fades, uncovering the
/// incoming one beneath.
pub(super) fn zoom_in(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    let te = Ease::InOutCubic.apply(f64::from(t));
    let (cx, cy) = center_of(frame);
    let scale = 1.0 + te * (0.8 + 1.6 * f64::from(k));

    composite::copy_in_place(&mut frame.data, b.data())?;
    draw_affine_over(
        frame,
        a,
        transform_about(cx, cy, scale, scale, 0.0, 0.0, 0.0),
        (1.0 - te) as f32,
    )
}

/// The incoming image grows from small to full size over the outgoing one.
pub(super) fn zoom_out(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    let te = Ease::OutCubic.apply(f64::from(t));
    let (cx, cy) = center_of(frame);
    let start = 0.7 - 0.4 * f64::from(k);
    let scale = start + (1.0 - start) * te;

    composite::copy_in_place(&mut frame.data, a.data())?;
    draw_affine_over(
        frame,
        b,
        transform_about(cx, cy, scale, scale, 0.0, 0.0, 0.0),
        te as f32,
    )
}

/// The incoming image punches in with an overshoot and settles at full size.
pub(super) fn zoom_punch(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    let te = Ease::OutBack.apply(f64::from(t));
    let (cx, cy) = center_of(frame);
    let start = 0.5 - 0.2 * f64::from(k);
    let scale = start + (1.0 - start) * te;

    composite::copy_in_place(&mut frame.data, a.data())?;
    draw_affine_over(
        frame,
        b,
        transform_about(cx, cy, scale, scale, 0.0, 0.0, 0.0),
        (f64::from(t) * 4.0).min(1.0) as f32,
    )
}

/// The outgoing image rotates away and shrinks, fading over the incoming one.
/// `sign` picks the turn direction.
pub(super) fn rotate_away(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
    sign: f64,
) -> MorphclipResult<()> {
    let te = Ease::InOutQuad.apply(f64::from(t));
    let (cx, cy) = center_of(frame);
    let theta = sign * te * std::f64::consts::FRAC_PI_2 * (0.5 + f64::from(k));
    let scale = 1.0 - 0.6 * te;

    composite::copy_in_place(&mut frame.data, b.data())?;
    draw_affine_over(
        frame,
        a,
        transform_about(cx, cy, scale, scale, theta, 0.0, 0.0),
        (1.0 - te) as f32,
    )
}

/// The incoming image spins in while scaling up to fill the surface.
pub(super) fn spin_zoom(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    let te = Ease::OutCubic.apply(f64::from(t));
    let (cx, cy) = center_of(frame);
    let theta = (1.0 - te) * std::f64::consts::PI * (1.0 + f64::from(k));
    let scale = (0.05 + 0.95 * te).max(1e-3);

    composite::copy_in_place(&mut frame.data, a.data())?;
    draw_affine_over(
        frame,
        b,
        transform_about(cx, cy, scale, scale, theta, 0.0, 0.0),
        te as f32,
    )
}

/// The incoming image swings from a top-center pivot, settling with a damped
/// oscillation.
pub(super) fn swing(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    let settle = Ease::OutElastic.apply(f64::from(t));
    let theta0 = 0.4 * (0.4 + 0.6 * f64::from(k));
    let theta = theta0 * (1.0 - settle);
    let pivot_x = f64::from(frame.width) * 0.5;

    composite::copy_in_place(&mut frame.data, a.data())?;
    draw_affine_over(
        frame,
        b,
        Affine::translate((pivot_x, 0.0))
            * Affine::rotate(theta)
            * Affine::translate((-pivot_x, 0.0)),
        (f64::from(t) * 5.0).min(1.0) as f32,
    )
}

/// The incoming image drops from above and lands with an elastic bounce.
pub(super) fn elastic_drop(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    _k: f32,
) -> MorphclipResult<()> {
    let settle = Ease::OutElastic.apply(f64::from(t));
    let dy = -(1.0 - settle) * f64::from(frame.height);

    composite::copy_in_place(&mut frame.data, a.data())?;
    draw_affine_over(frame, b, Affine::translate((0.0, dy)), 1.0)
}

/// Fast horizontal pan with speed-line streaks over the motion.
pub(super) fn whip_pan(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    let te = Ease::InOutCubic.apply(f64::from(t));
    let w = f64::from(frame.width);

    frame.clear();
    draw_affine_over(frame, a, Affine::translate((-w * te, 0.0)), 1.0)?;
    draw_affine_over(frame, b, Affine::translate((w - w * te, 0.0)), 1.0)?;

    let envelope = (std::f32::consts::PI * t).sin();
    if envelope > 0.0 {
        let streaks = (4.0 + 14.0 * k) as u32;
        let height = frame.height as f32;
        let width = frame.width as f32;
        let color = premul_color(255, 255, 255, 255);
        for i in 0..streaks {
            let u = crate::foundation::math::hash_unit(0x7768_6970, u64::from(i), 0);
            let v = crate::foundation::math::hash_unit(0x7768_6970, u64::from(i), 1);
            let cy = u * height;
            let len = (0.25 + 0.5 * v) * width;
            let x0 = (1.0 - te as f32) * width - len * 0.5;
            draw_streak(
                frame,
                x0,
                x0 + len,
                cy,
                1.0 + 2.0 * k,
                color,
                0.35 * envelope,
            );
        }
    }
    Ok(())
}

/// Triangular zoom pulse on the outgoing image, cutting to the incoming one
/// at the peak.
pub(super) fn heartbeat_zoom(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    let pulse = Ease::Triangle.apply(f64::from(t));
    let (cx, cy) = center_of(frame);
    let scale = 1.0 + (0.06 + 0.18 * f64::from(k)) * pulse;
    let src = if t < 0.5 { a } else { b };

    frame.clear();
    draw_affine_over(
        frame,
        src,
        transform_about(cx, cy, scale, scale, 0.0, 0.0, 0.0),
        1.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Canvas;

    type MotionFn = fn(&mut Frame, &CanvasImage, &CanvasImage, f32, f32) -> MorphclipResult<()>;

    fn fixtures() -> (Frame, CanvasImage, CanvasImage) {
        let canvas = Canvas::new(10, 16).unwrap();
        (
            Frame::new(canvas),
            CanvasImage::solid(canvas, 200, 0, 0, 255),
            CanvasImage::solid(canvas, 0, 0, 200, 255),
        )
    }

    fn center_px(frame: &Frame) -> [u8; 4] {
        let i = ((frame.height / 2) as usize * frame.width as usize + (frame.width / 2) as usize)
            * 4;
        [
            frame.data[i],
            frame.data[i + 1],
            frame.data[i + 2],
            frame.data[i + 3],
        ]
    }

    #[test]
    fn every_motion_effect_lands_on_the_after_image() {
        let cases: &[MotionFn] = &[
            zoom_in,
            zoom_out,
            zoom_punch,
            spin_zoom,
            swing,
            elastic_drop,
            whip_pan,
            heartbeat_zoom,
        ];
        let (mut frame, a, b) = fixtures();
        for (i, f) in cases.iter().enumerate() {
            f(&mut frame, &a, &b, 1.0, 0.7).unwrap();
            assert_eq!(center_px(&frame), [0, 0, 200, 255], "case {i} at t=1");
        }
    }

    #[test]
    fn every_motion_effect_starts_on_the_before_image() {
        let cases: &[MotionFn] = &[
            zoom_in,
            zoom_out,
            zoom_punch,
            spin_zoom,
            swing,
            elastic_drop,
            whip_pan,
            heartbeat_zoom,
        ];
        let (mut frame, a, b) = fixtures();
        for (i, f) in cases.iter().enumerate() {
            f(&mut frame, &a, &b, 0.0, 0.7).unwrap();
            assert_eq!(center_px(&frame), [200, 0, 0, 255], "case {i} at t=0");
        }
    }

    #[test]
    fn rotate_away_both_directions_share_endpoints() {
        let (mut frame, a, b) = fixtures();
        for sign in [1.0, -1.0] {
            rotate_away(&mut frame, &a, &b, 0.0, 0.5, sign).unwrap();
            assert_eq!(center_px(&frame), [200, 0, 0, 255]);
            rotate_away(&mut frame, &a, &b, 1.0, 0.5, sign).unwrap();
            assert_eq!(center_px(&frame), [0, 0, 200, 255]);
        }
    }

    #[test]
    fn zoom_in_midway_blends_toward_after_at_low_opacity() {
        let (mut frame, a, b) = fixtures();
        zoom_in(&mut frame, &a, &b, 0.5, 1.0).unwrap();
        let px = center_px(&frame);
        // Half-faded outgoing image over the incoming one.
        assert!(px[0] > 50 && px[0] < 160);
        assert!(px[2] > 50 && px[2] < 160);
    }
}
