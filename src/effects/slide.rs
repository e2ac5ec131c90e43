use kurbo::Affine;

use crate::assets::CanvasImage;
use crate::effects::ease::Ease;
use crate::foundation::error::MorphclipResult;
use crate::render::Frame;
use crate::render::composite;
use crate::render::raster::draw_affine_over;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum SlideDir {
    Left,
    Right,
    Up,
    Down,
}

impl SlideDir {
    /// Unit travel vector for the incoming image, in canvas units.
    fn vector(self, width: f64, height: f64) -> (f64, f64) {
        match self {
            Self::Left => (-width, 0.0),
            Self::Right => (width, 0.0),
            Self::Up => (0.0, -height),
            Self::Down => (0.0, height),
        }
    }
}

/// The incoming image slides in over the outgoing one. Intensity speeds the
/// settle by sharpening the ease.
pub(super) fn slide(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
    dir: SlideDir,
) -> MorphclipResult<()> {
    let ease = if k < 0.5 { Ease::OutQuad } else { Ease::OutCubic };
    let te = ease.apply(f64::from(t));
    let (vx, vy) = dir.vector(f64::from(frame.width), f64::from(frame.height));

    composite::copy_in_place(&mut frame.data, a.data())?;
    // b starts fully offscreen opposite its travel direction.
    let offset = 1.0 - te;
    draw_affine_over(
        frame,
        b,
        Affine::translate((-vx * offset, -vy * offset)),
        1.0,
    )
}

/// Both images move together: the outgoing one is pushed out as the incoming
/// one pushes in.
pub(super) fn push(
    frame: &mut Frame,
    a: &CanvasImage,
    b: &CanvasImage,
    t: f32,
    k: f32,
    dir: SlideDir,
) -> MorphclipResult<()> {
    let ease = if k < 0.5 { Ease::InOutQuad } else { Ease::InOutCubic };
    let te = ease.apply(f64::from(t));
    let (vx, vy) = dir.vector(f64::from(frame.width), f64::from(frame.height));

    frame.clear();
    draw_affine_over(frame, a, Affine::translate((vx * te, vy * te)), 1.0)?;
    draw_affine_over(
        frame,
        b,
        Affine::translate((vx * te - vx, vy * te - vy)),
        1.0,
    )
}
