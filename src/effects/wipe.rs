use crate::assets::CanvasImage;
use crate::foundation::error::MorphclipResult;
use crate::foundation::math::smoothstep;
use crate::render::Frame;
use crate::render::composite::masked_merge;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum WipeDir {
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
}

/// Soft-edge weight for a straight wipe front: `pos` along the wipe axis,
/// `axis_len` the full travel, both in the same units. The front starts one
/// soft-width before the surface and ends one past it so endpoints are exact.
pub(super) fn front_weight(pos: f32, axis_len: f32, t: f32, soft: f32) -> f32 {
    let soft_px = soft * axis_len;
    let edge = t * (axis_len + 2.0 * soft_px) - soft_px;
    if soft_px <= 0.0 {
        if pos < edge { 1.0 } else { 0.0 }
    } else {
        1.0 - smoothstep(edge - soft_px, edge + soft_px, pos)
    }
}

pub(super) fn edge(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
    dir: WipeDir,
) -> MorphclipResult<()> {
    let (width, height) = (frame.width, frame.height);
    let axis_len = match dir {
        WipeDir::LeftToRight | WipeDir::RightToLeft => width as f32,
        WipeDir::TopToBottom | WipeDir::BottomToTop => height as f32,
    };
    let soft = 0.02 + 0.13 * k;

    masked_merge(
        &mut frame.data,
        a.data(),
        b.data(),
        width,
        height,
        |x, y| {
            let pos = match dir {
                WipeDir::LeftToRight => x as f32,
                WipeDir::RightToLeft => (width - 1 - x) as f32,
                WipeDir::TopToBottom => y as f32,
                WipeDir::BottomToTop => (height - 1 - y) as f32,
            };
            front_weight(pos, axis_len, t, soft)
        },
    )
}

/// Diagonal halfplane reveal. `reverse` flips the travel from the
/// bottom-right corner instead of the top-left.
pub(super) fn diagonal(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
    reverse: bool,
) -> MorphclipResult<()> {
    let (width, height) = (frame.width, frame.height);
    let axis_len = (width + height) as f32;
    let soft = 0.02 + 0.1 * k;

    masked_merge(
        &mut frame.data,
        a.data(),
        b.data(),
        width,
        height,
        |x, y| {
            let pos = if reverse {
                ((width - 1 - x) + (height - 1 - y)) as f32
            } else {
                (x + y) as f32
            };
            front_weight(pos, axis_len, t, soft)
        },
    )
}

/// Two vertical doors opening outward from the center.
pub(super) fn barn_doors(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    let (width, height) = (frame.width, frame.height);
    let cx = width as f32 * 0.5;
    let soft = 0.02 + 0.13 * k;

    masked_merge(
        &mut frame.data,
        a.data(),
        b.data(),
        width,
        height,
        |x, _| {
            let pos = (x as f32 + 0.5 - cx).abs();
            front_weight(pos, cx, t, soft)
        },
    )
}

/// Horizontal split opening outward from the center line.
pub(super) fn letterbox(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
) -> MorphclipResult<()> {
    let (width, height) = (frame.width, frame.height);
    let cy = height as f32 * 0.5;
    let soft = 0.02 + 0.13 * k;

    masked_merge(
        &mut frame.data,
        a.data(),
        b.data(),
        width,
        height,
        |_, y| {
            let pos = (y as f32 + 0.5 - cy).abs();
            front_weight(pos, cy, t, soft)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Canvas;

    fn fixtures() -> (Frame, CanvasImage, CanvasImage) {
        let canvas = Canvas::new(10, 20).unwrap();
        (
            Frame::new(canvas),
            CanvasImage::solid(canvas, 200, 0, 0, 255),
            CanvasImage::solid(canvas, 0, 0, 200, 255),
        )
    }

    #[test]
    fn front_weight_endpoints_cover_nothing_then_everything() {
        for pos in 0..10 {
            assert_eq!(front_weight(pos as f32, 10.0, 0.0, 0.1), 0.0);
            assert_eq!(front_weight(pos as f32, 10.0, 1.0, 0.1), 1.0);
        }
    }

    #[test]
    fn wipe_right_at_half_splits_the_frame() {
        let (mut frame, a, b) = fixtures();
        edge(&mut frame, &a, &b, 0.5, 0.0, WipeDir::LeftToRight).unwrap();
        // Hard edge at x≈5: left side incoming, right side outgoing.
        assert_eq!(&frame.data[..4], &[0, 0, 200, 255]);
        let right = 9 * 4;
        assert_eq!(&frame.data[right..right + 4], &[200, 0, 0, 255]);
    }

    #[test]
    fn wipe_endpoints_reproduce_inputs_exactly() {
        let (mut frame, a, b) = fixtures();
        for dir in [
            WipeDir::LeftToRight,
            WipeDir::RightToLeft,
            WipeDir::TopToBottom,
            WipeDir::BottomToTop,
        ] {
            edge(&mut frame, &a, &b, 0.0, 1.0, dir).unwrap();
            assert_eq!(frame.data, a.data(), "{dir:?} at 0");
            edge(&mut frame, &a, &b, 1.0, 1.0, dir).unwrap();
            assert_eq!(frame.data, b.data(), "{dir:?} at 1");
        }
    }

    #[test]
    fn barn_doors_open_from_the_center() {
        let (mut frame, a, b) = fixtures();
        barn_doors(&mut frame, &a, &b, 0.4, 0.0).unwrap();
        let center = 5 * 4;
        let edge_px = 0;
        assert_eq!(&frame.data[center..center + 4], &[0, 0, 200, 255]);
        assert_eq!(&frame.data[edge_px..edge_px + 4], &[200, 0, 0, 255]);
    }

    #[test]
    fn diagonal_and_letterbox_endpoints_are_exact() {
        let (mut frame, a, b) = fixtures();
        diagonal(&mut frame, &a, &b, 0.0, 0.7, false).unwrap();
        assert_eq!(frame.data, a.data());
        diagonal(&mut frame, &a, &b, 1.0, 0.7, true).unwrap();
        assert_eq!(frame.data, b.data());
        letterbox(&mut frame, &a, &b, 0.0, 0.7).unwrap();
        assert_eq!(frame.data, a.data());
        letterbox(&mut frame, &a, &b, 1.0, 0.7).unwrap();
        assert_eq!(frame.data, b.data());
    }
}
