use crate::assets::CanvasImage;
use crate::foundation::error::MorphclipResult;
use crate::foundation::math::{hash_unit, smoothstep};
use crate::render::Frame;
use crate::render::composite::masked_merge;

/// Seed for all deterministic cell stagger. A fixed value keeps the stagger
/// pattern identical across frames and across runs.
const STAGGER_SEED: u64 = 0x6d6f_7270_6863_6c70;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Axis {
    Rows,
    Cols,
}

/// Per-cell local progress for a staggered reveal: cell delays fill
/// `[0, 1 - window]`, each cell then reveals over `window`.
fn staggered_local(t: f32, delay: f32, window: f32) -> f32 {
    ((t - delay * (1.0 - window)) / window).clamp(0.0, 1.0)
}

/// Venetian blinds: parallel strips, each a miniature wipe. All strips run in
/// phase; intensity fattens the soft edge.
pub(super) fn blinds(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
    axis: Axis,
) -> MorphclipResult<()> {
    let (width, height) = (frame.width, frame.height);
    let strips = 12u32;
    let strip_len = match axis {
        Axis::Rows => (height as f32 / strips as f32).max(1.0),
        Axis::Cols => (width as f32 / strips as f32).max(1.0),
    };
    let soft = (0.05 + 0.3 * k) * strip_len;

    masked_merge(
        &mut frame.data,
        a.data(),
        b.data(),
        width,
        height,
        |x, y| {
            let pos = match axis {
                Axis::Rows => (y as f32 + 0.5) % strip_len,
                Axis::Cols => (x as f32 + 0.5) % strip_len,
            };
            let edge = t * (strip_len + 2.0 * soft) - soft;
            1.0 - smoothstep(edge - soft, edge + soft, pos)
        },
    )
}

/// Checkerboard: cells flip in two overlapping phases by parity.
pub(super) fn checkerboard(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    _k: f32,
) -> MorphclipResult<()> {
    let (width, height) = (frame.width, frame.height);
    let (cols, rows) = (9u32, 16u32);
    let cell_w = (width as f32 / cols as f32).max(1.0);
    let cell_h = (height as f32 / rows as f32).max(1.0);

    masked_merge(
        &mut frame.data,
        a.data(),
        b.data(),
        width,
        height,
        |x, y| {
            let cx = (x as f32 / cell_w) as u32;
            let cy = (y as f32 / cell_h) as u32;
            let delay = if (cx + cy) % 2 == 0 { 0.0 } else { 1.0 };
            staggered_local(t, delay, 0.6)
        },
    )
}

/// Every cell fades in after a hash-staggered delay. The hash keeps the
/// shuffle pattern stable from frame to frame.
pub(super) fn grid_shuffle(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    let (width, height) = (frame.width, frame.height);
    let cols = 6 + (k * 6.0).round() as u32;
    let rows = (cols * 16).div_ceil(9);
    let cell_w = (width as f32 / cols as f32).max(1.0);
    let cell_h = (height as f32 / rows as f32).max(1.0);

    masked_merge(
        &mut frame.data,
        a.data(),
        b.data(),
        width,
        height,
        |x, y| {
            let cx = (x as f32 / cell_w) as u32;
            let cy = (y as f32 / cell_h) as u32;
            let delay = hash_unit(STAGGER_SEED, u64::from(cx), u64::from(cy));
            staggered_local(t, delay, 0.3)
        },
    )
}

/// Cells reveal outward from the center, with a touch of hash jitter so the
/// wave front is not perfectly smooth.
pub(super) fn ripple_grid(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    let (width, height) = (frame.width, frame.height);
    let (cols, rows) = (9u32, 16u32);
    let cell_w = (width as f32 / cols as f32).max(1.0);
    let cell_h = (height as f32 / rows as f32).max(1.0);
    let center_x = cols as f32 * 0.5;
    let center_y = rows as f32 * 0.5;
    let max_d = (center_x * center_x + center_y * center_y).sqrt();

    masked_merge(
        &mut frame.data,
        a.data(),
        b.data(),
        width,
        height,
        |x, y| {
            let cx = (x as f32 / cell_w) as u32;
            let cy = (y as f32 / cell_h) as u32;
            let dx = cx as f32 + 0.5 - center_x;
            let dy = cy as f32 + 0.5 - center_y;
            let radial = (dx * dx + dy * dy).sqrt() / max_d;
            let jitter = hash_unit(STAGGER_SEED, u64::from(cx), u64::from(cy)) * 0.15 * k;
            let delay = (radial * (1.0 - 0.15 * k) + jitter).clamp(0.0, 1.0);
            staggered_local(t, delay, 0.35)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Canvas;

    fn fixtures() -> (Frame, CanvasImage, CanvasImage) {
        let canvas = Canvas::new(18, 32).unwrap();
        (
            Frame::new(canvas),
            CanvasImage::solid(canvas, 200, 0, 0, 255),
            CanvasImage::solid(canvas, 0, 0, 200, 255),
        )
    }

    #[test]
    fn staggered_local_covers_full_range() {
        assert_eq!(staggered_local(0.0, 0.0, 0.3), 0.0);
        assert_eq!(staggered_local(1.0, 0.0, 0.3), 1.0);
        assert_eq!(staggered_local(0.0, 1.0, 0.3), 0.0);
        assert_eq!(staggered_local(1.0, 1.0, 0.3), 1.0);
        assert_eq!(staggered_local(0.5, 1.0, 0.3), 0.0);
    }

    #[test]
    fn all_grid_reveals_have_exact_endpoints() {
        let (mut frame, a, b) = fixtures();

        for t_and_expected in [(0.0f32, a.data()), (1.0f32, b.data())] {
            let (t, want) = t_and_expected;
            blinds(&mut frame, &a, &b, t, 0.6, Axis::Rows).unwrap();
            assert_eq!(frame.data, want, "blinds rows at {t}");
            blinds(&mut frame, &a, &b, t, 0.6, Axis::Cols).unwrap();
            assert_eq!(frame.data, want, "blinds cols at {t}");
            checkerboard(&mut frame, &a, &b, t, 0.6).unwrap();
            assert_eq!(frame.data, want, "checkerboard at {t}");
            grid_shuffle(&mut frame, &a, &b, t, 0.6).unwrap();
            assert_eq!(frame.data, want, "grid shuffle at {t}");
            ripple_grid(&mut frame, &a, &b, t, 0.6).unwrap();
            assert_eq!(frame.data, want, "ripple grid at {t}");
        }
    }

    #[test]
    fn checkerboard_half_time_separates_parities() {
        let (mut frame, a, b) = fixtures();
        checkerboard(&mut frame, &a, &b, 0.5, 0.5).unwrap();
        // Cell (0,0) has delay 0: local = 0.5/0.6 ≈ 0.83 toward after.
        assert!(frame.data[2] > frame.data[0]);
        // Cell (1,0) has delay 1: local = (0.5-0.4)/0.6 ≈ 0.17 toward before.
        let cell_w = 18 / 9;
        let i = cell_w * 4;
        assert!(frame.data[i] > frame.data[i + 2]);
    }

    #[test]
    fn grid_shuffle_is_reproducible_across_invocations() {
        let (mut frame, a, b) = fixtures();
        grid_shuffle(&mut frame, &a, &b, 0.37, 0.8).unwrap();
        let first = frame.data.clone();
        frame.clear();
        grid_shuffle(&mut frame, &a, &b, 0.37, 0.8).unwrap();
        assert_eq!(frame.data, first);
    }
}
