use crate::assets::CanvasImage;
use crate::effects::wipe::front_weight;
use crate::foundation::error::MorphclipResult;
use crate::foundation::math::smoothstep;
use crate::render::Frame;
use crate::render::composite::masked_merge;

fn center(frame: &Frame) -> (f32, f32) {
    (frame.width as f32 * 0.5, frame.height as f32 * 0.5)
}

/// Distance from the center to the farthest corner; the radius at which any
/// centered reveal has covered the whole surface.
fn corner_radius(frame: &Frame) -> f32 {
    let (cx, cy) = center(frame);
    (cx * cx + cy * cy).sqrt()
}

/// Circle of the incoming image growing from the center.
pub(super) fn iris_open(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    let (width, height) = (frame.width, frame.height);
    let (cx, cy) = center(frame);
    let max_r = corner_radius(frame);
    let soft = 0.02 + 0.1 * k;

    masked_merge(
        &mut frame.data,
        a.data(),
        b.data(),
        width,
        height,
        |x, y| {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let pos = (dx * dx + dy * dy).sqrt();
            front_weight(pos, max_r, t, soft)
        },
    )
}

/// Circle of the outgoing image shrinking into the center.
pub(super) fn iris_close(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    let (width, height) = (frame.width, frame.height);
    let (cx, cy) = center(frame);
    let max_r = corner_radius(frame);
    let soft = 0.02 + 0.1 * k;

    masked_merge(
        &mut frame.data,
        a.data(),
        b.data(),
        width,
        height,
        |x, y| {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let pos = (dx * dx + dy * dy).sqrt();
            // The before-circle keeps the region the front has not yet passed,
            // so the weight is the front mirrored in time and sense.
            1.0 - front_weight(pos, max_r, 1.0 - t, soft)
        },
    )
}

/// Diamond (Manhattan-metric circle) growing from the center.
pub(super) fn diamond_open(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    let (width, height) = (frame.width, frame.height);
    let (cx, cy) = center(frame);
    let max_r = cx + cy;
    let soft = 0.02 + 0.1 * k;

    masked_merge(
        &mut frame.data,
        a.data(),
        b.data(),
        width,
        height,
        |x, y| {
            let pos = (x as f32 + 0.5 - cx).abs() + (y as f32 + 0.5 - cy).abs();
            front_weight(pos, max_r, t, soft)
        },
    )
}

/// Clock-hand sweep from 12 o'clock, clockwise.
pub(super) fn clock_sweep(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    let (width, height) = (frame.width, frame.height);
    let (cx, cy) = center(frame);
    let soft = 0.01 + 0.05 * k;

    masked_merge(
        &mut frame.data,
        a.data(),
        b.data(),
        width,
        height,
        |x, y| {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            // Angle from 12 o'clock, clockwise, normalized to [0, 1).
            let pos = (dx.atan2(-dy) / std::f32::consts::TAU).rem_euclid(1.0);
            front_weight(pos, 1.0, t, soft)
        },
    )
}

/// Iris front with concentric ripple perturbation that dies at the endpoints.
pub(super) fn ripple_rings(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    let (width, height) = (frame.width, frame.height);
    let (cx, cy) = center(frame);
    let max_r = corner_radius(frame);
    let soft = 0.02 + 0.06 * k;
    let amp = 0.06 * k * (std::f32::consts::PI * t).sin();
    let rings = 9.0;

    masked_merge(
        &mut frame.data,
        a.data(),
        b.data(),
        width,
        height,
        |x, y| {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let r = (dx * dx + dy * dy).sqrt() / max_r;
            let pos = r + amp * (r * rings * std::f32::consts::TAU).sin();
            front_weight(pos.clamp(0.0, 1.0), 1.0, t, soft)
        },
    )
}

/// Rotating wedge reveal: every wedge sweeps open simultaneously, giving a
/// pinwheel of polygonal clips.
pub(super) fn pinwheel(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    let (width, height) = (frame.width, frame.height);
    let (cx, cy) = center(frame);
    let wedges = 4.0 + (k * 8.0).round();
    let soft = 0.04;

    masked_merge(
        &mut frame.data,
        a.data(),
        b.data(),
        width,
        height,
        |x, y| {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let angle = (dx.atan2(-dy) / std::f32::consts::TAU).rem_euclid(1.0);
            let pos = (angle * wedges).fract();
            // Soften in wedge-local units so blade edges stay crisp but not
            // aliased.
            let edge = t * (1.0 + 2.0 * soft) - soft;
            1.0 - smoothstep(edge - soft, edge + soft, pos)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Canvas;

    fn fixtures() -> (Frame, CanvasImage, CanvasImage) {
        let canvas = Canvas::new(12, 20).unwrap();
        (
            Frame::new(canvas),
            CanvasImage::solid(canvas, 200, 0, 0, 255),
            CanvasImage::solid(canvas, 0, 0, 200, 255),
        )
    }

    #[test]
    fn all_shape_reveals_have_exact_endpoints() {
        type ShapeFn =
            fn(&mut Frame, &CanvasImage, &CanvasImage, f32, f32) -> MorphclipResult<()>;
        let (mut frame, a, b) = fixtures();
        let cases: &[ShapeFn] = &[
            iris_open,
            iris_close,
            diamond_open,
            clock_sweep,
            ripple_rings,
            pinwheel,
        ];
        for (i, f) in cases.iter().enumerate() {
            f(&mut frame, &a, &b, 0.0, 0.8).unwrap();
            assert_eq!(frame.data, a.data(), "case {i} at t=0");
            f(&mut frame, &a, &b, 1.0, 0.8).unwrap();
            assert_eq!(frame.data, b.data(), "case {i} at t=1");
        }
    }

    #[test]
    fn iris_open_reveals_center_first() {
        let (mut frame, a, b) = fixtures();
        iris_open(&mut frame, &a, &b, 0.3, 0.0).unwrap();
        let center = (10 * 12 + 6) * 4;
        let corner = 0;
        assert_eq!(&frame.data[center..center + 4], &[0, 0, 200, 255]);
        assert_eq!(&frame.data[corner..corner + 4], &[200, 0, 0, 255]);
    }

    #[test]
    fn iris_close_keeps_center_before_longest() {
        let (mut frame, a, b) = fixtures();
        iris_close(&mut frame, &a, &b, 0.7, 0.0).unwrap();
        let center = (10 * 12 + 6) * 4;
        let corner = 0;
        assert_eq!(&frame.data[center..center + 4], &[200, 0, 0, 255]);
        assert_eq!(&frame.data[corner..corner + 4], &[0, 0, 200, 255]);
    }

    #[test]
    fn clock_sweep_half_reveals_right_half() {
        let (mut frame, a, b) = fixtures();
        clock_sweep(&mut frame, &a, &b, 0.5, 0.0).unwrap();
        // Just right of 12 o'clock: swept first.
        let right_of_top = (12 + 8) * 4;
        // Just left of 12 o'clock: swept last.
        let left_of_top = (12 + 3) * 4;
        assert_eq!(&frame.data[right_of_top..right_of_top + 4], &[0, 0, 200, 255]);
        assert_eq!(&frame.data[left_of_top..left_of_top + 4], &[200, 0, 0, 255]);
    }
}
