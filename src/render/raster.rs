use kurbo::Affine;
use rayon::prelude::*;

use crate::assets::CanvasImage;
use crate::foundation::error::{MorphclipError, MorphclipResult};
use crate::render::composite::{PremulRgba8, over};
use crate::render::frame::Frame;

/// Bilinear sample of a premultiplied RGBA8 buffer at pixel-center
/// coordinates. Out-of-bounds taps contribute transparent black, so
/// transformed draws get clean edges for free.
pub(crate) fn sample_bilinear(data: &[u8], width: u32, height: u32, x: f32, y: f32) -> PremulRgba8 {
    let fx = x - 0.5;
    let fy = y - 0.5;
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;

    let tap = |ix: i64, iy: i64| -> [f32; 4] {
        if ix < 0 || iy < 0 || ix >= i64::from(width) || iy >= i64::from(height) {
            return [0.0; 4];
        }
        let i = (iy as usize * width as usize + ix as usize) * 4;
        [
            data[i] as f32,
            data[i + 1] as f32,
            data[i + 2] as f32,
            data[i + 3] as f32,
        ]
    };

    let x0i = x0 as i64;
    let y0i = y0 as i64;
    let p00 = tap(x0i, y0i);
    let p10 = tap(x0i + 1, y0i);
    let p01 = tap(x0i, y0i + 1);
    let p11 = tap(x0i + 1, y0i + 1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = p00[c] + (p10[c] - p00[c]) * tx;
        let bot = p01[c] + (p11[c] - p01[c]) * tx;
        let v = top + (bot - top) * ty;
        out[c] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Draw `src` over the frame through an affine transform (canvas space to
/// canvas space), using inverse mapping with bilinear sampling.
///
/// A singular transform degenerates to a no-op rather than an error; a
/// zero-scale draw has nothing visible to contribute.
pub(crate) fn draw_affine_over(
    frame: &mut Frame,
    src: &CanvasImage,
    transform: Affine,
    opacity: f32,
) -> MorphclipResult<()> {
    if src.data().len() != frame.data.len() {
        return Err(MorphclipError::render(
            "draw_affine_over expects a canvas-sized source",
        ));
    }
    if opacity <= 0.0 {
        return Ok(());
    }
    if transform.determinant().abs() < 1e-9 {
        return Ok(());
    }
    let inv = transform.inverse();

    let width = frame.width;
    let height = frame.height;
    let row_bytes = frame.row_bytes();
    let data = src.data();

    frame
        .data
        .par_chunks_exact_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                let p = inv * kurbo::Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let sp = sample_bilinear(data, width, height, p.x as f32, p.y as f32);
                if sp[3] == 0 {
                    continue;
                }
                let i = x as usize * 4;
                let d = [row[i], row[i + 1], row[i + 2], row[i + 3]];
                row[i..i + 4].copy_from_slice(&over(d, sp, opacity));
            }
        });
    Ok(())
}

/// An affine that scales by (`sx`, `sy`) and rotates by `theta` around the
/// canvas point (`cx`, `cy`), then translates by (`dx`, `dy`).
pub(crate) fn transform_about(
    cx: f64,
    cy: f64,
    sx: f64,
    sy: f64,
    theta: f64,
    dx: f64,
    dy: f64,
) -> Affine {
    Affine::translate((cx + dx, cy + dy))
        * Affine::rotate(theta)
        * Affine::scale_non_uniform(sx, sy)
        * Affine::translate((-cx, -cy))
}

/// Composite a radial glow centered at (`cx`, `cy`): full `max_alpha` at the
/// center, smoothly fading to nothing at `radius`.
pub(crate) fn overlay_radial_glow(
    frame: &mut Frame,
    cx: f32,
    cy: f32,
    radius: f32,
    color: PremulRgba8,
    max_alpha: f32,
) {
    if max_alpha <= 0.0 || radius <= 0.0 {
        return;
    }
    let width = frame.width;
    let row_bytes = frame.row_bytes();
    frame
        .data
        .par_chunks_exact_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            let dy = y as f32 + 0.5 - cy;
            for x in 0..width {
                let dx = x as f32 + 0.5 - cx;
                let d = (dx * dx + dy * dy).sqrt() / radius;
                if d >= 1.0 {
                    continue;
                }
                let fall = 1.0 - d * d * (3.0 - 2.0 * d);
                let i = x as usize * 4;
                let dst = [row[i], row[i + 1], row[i + 2], row[i + 3]];
                row[i..i + 4].copy_from_slice(&over(dst, color, max_alpha * fall));
            }
        });
}

/// Composite a soft band of color across the frame.
///
/// (`nx`, `ny`) is the band's travel direction (unit vector); `center` is the
/// band center as a dot product in pixels; alpha falls off linearly to zero at
/// `half_width` from the center line.
pub(crate) fn overlay_band(
    frame: &mut Frame,
    nx: f32,
    ny: f32,
    center: f32,
    half_width: f32,
    color: PremulRgba8,
    max_alpha: f32,
) {
    if max_alpha <= 0.0 || half_width <= 0.0 {
        return;
    }
    let width = frame.width;
    let row_bytes = frame.row_bytes();
    frame
        .data
        .par_chunks_exact_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..width {
                let pos = (x as f32 + 0.5) * nx + (y as f32 + 0.5) * ny;
                let dist = (pos - center).abs();
                if dist >= half_width {
                    continue;
                }
                let fall = 1.0 - dist / half_width;
                let i = x as usize * 4;
                let dst = [row[i], row[i + 1], row[i + 2], row[i + 3]];
                row[i..i + 4].copy_from_slice(&over(dst, color, max_alpha * fall));
            }
        });
}

/// Per-pixel luminance jitter. `amount` is the maximum deviation as a
/// fraction of full scale; the jitter source is whatever `next` yields in
/// `[-1, 1]`, so callers choose deterministic or frame-local noise.
pub(crate) fn add_grain<F>(frame: &mut Frame, amount: f32, mut next: F)
where
    F: FnMut() -> f32,
{
    if amount <= 0.0 {
        return;
    }
    let scale = amount * 255.0;
    for px in frame.data.chunks_exact_mut(4) {
        let alpha = i16::from(px[3]);
        if alpha == 0 {
            continue;
        }
        let n = (next().clamp(-1.0, 1.0) * scale) as i16;
        for c in px.iter_mut().take(3) {
            // Premultiplied invariant: channels never exceed alpha.
            *c = (*c as i16 + n).clamp(0, alpha) as u8;
        }
    }
}

/// Downsample the frame's *own current contents* into `block`-sized cells.
///
/// This is the one primitive that intentionally reads the surface it writes:
/// the pixelate effect composites against whatever the previous tick left on
/// the frame instead of repainting from the inputs.
pub(crate) fn pixelate_in_place(frame: &mut Frame, block: u32) {
    if block <= 1 {
        return;
    }
    let width = frame.width as usize;
    let height = frame.height as usize;
    let block = block as usize;

    for by in (0..height).step_by(block) {
        for bx in (0..width).step_by(block) {
            let bw = block.min(width - bx);
            let bh = block.min(height - by);

            let mut acc = [0u32; 4];
            for y in by..by + bh {
                for x in bx..bx + bw {
                    let i = (y * width + x) * 4;
                    for c in 0..4 {
                        acc[c] += u32::from(frame.data[i + c]);
                    }
                }
            }
            let n = (bw * bh) as u32;
            let avg = [
                ((acc[0] + n / 2) / n) as u8,
                ((acc[1] + n / 2) / n) as u8,
                ((acc[2] + n / 2) / n) as u8,
                ((acc[3] + n / 2) / n) as u8,
            ];
            for y in by..by + bh {
                for x in bx..bx + bw {
                    let i = (y * width + x) * 4;
                    frame.data[i..i + 4].copy_from_slice(&avg);
                }
            }
        }
    }
}

/// Rewrite a horizontal row band from `src` with a wrapping x offset.
pub(crate) fn shift_rows_from(
    frame: &mut Frame,
    src: &[u8],
    y0: u32,
    y1: u32,
    offset: i32,
) -> MorphclipResult<()> {
    if src.len() != frame.data.len() {
        return Err(MorphclipError::render(
            "shift_rows_from expects a frame-sized source",
        ));
    }
    let width = frame.width as i64;
    let y1 = y1.min(frame.height);
    for y in y0..y1 {
        let row_start = y as usize * frame.row_bytes();
        for x in 0..frame.width {
            let sx = (i64::from(x) - i64::from(offset)).rem_euclid(width) as usize;
            let si = row_start + sx * 4;
            let di = row_start + x as usize * 4;
            let px = [src[si], src[si + 1], src[si + 2], src[si + 3]];
            frame.data[di..di + 4].copy_from_slice(&px);
        }
    }
    Ok(())
}

/// Offset the red channel left and the blue channel right by `dx` pixels,
/// sampling from a snapshot of the frame.
pub(crate) fn channel_split_in_place(frame: &mut Frame, dx: u32) {
    if dx == 0 {
        return;
    }
    let snapshot = frame.data.clone();
    let width = frame.width as i64;
    let row_bytes = frame.row_bytes();
    let dx = i64::from(dx);

    frame
        .data
        .par_chunks_exact_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            let row_start = y * row_bytes;
            for x in 0..width {
                let rx = (x - dx).clamp(0, width - 1) as usize;
                let bx = (x + dx).clamp(0, width - 1) as usize;
                let i = x as usize * 4;
                row[i] = snapshot[row_start + rx * 4];
                row[i + 2] = snapshot[row_start + bx * 4 + 2];
            }
        });
}

/// Darken every second band of `period` rows, with a phase offset in rows.
pub(crate) fn darken_row_bands(frame: &mut Frame, period: u32, phase: u32, strength: f32) {
    if strength <= 0.0 || period == 0 {
        return;
    }
    let keep = 1.0 - strength.clamp(0.0, 1.0);
    let row_bytes = frame.row_bytes();
    frame
        .data
        .par_chunks_exact_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            let band = (y as u32 + phase) / period;
            if band % 2 == 0 {
                return;
            }
            for px in row.chunks_exact_mut(4) {
                for c in px.iter_mut().take(3) {
                    *c = (*c as f32 * keep) as u8;
                }
            }
        });
}

/// Soft circular splat, for spark and ember particles.
pub(crate) fn draw_spark(
    frame: &mut Frame,
    cx: f32,
    cy: f32,
    radius: f32,
    color: PremulRgba8,
    alpha: f32,
) {
    if alpha <= 0.0 || radius <= 0.0 {
        return;
    }
    let x0 = ((cx - radius).floor().max(0.0)) as u32;
    let y0 = ((cy - radius).floor().max(0.0)) as u32;
    let x1 = ((cx + radius).ceil() as u32).min(frame.width);
    let y1 = ((cy + radius).ceil() as u32).min(frame.height);

    for y in y0..y1 {
        for x in x0..x1 {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let d = (dx * dx + dy * dy).sqrt() / radius;
            if d >= 1.0 {
                continue;
            }
            let fall = (1.0 - d) * (1.0 - d);
            let i = (y as usize * frame.width as usize + x as usize) * 4;
            let dst = [
                frame.data[i],
                frame.data[i + 1],
                frame.data[i + 2],
                frame.data[i + 3],
            ];
            frame.data[i..i + 4].copy_from_slice(&over(dst, color, alpha * fall));
        }
    }
}

/// Horizontal motion-line streak with soft ends and soft vertical falloff.
pub(crate) fn draw_streak(
    frame: &mut Frame,
    x0: f32,
    x1: f32,
    cy: f32,
    half_h: f32,
    color: PremulRgba8,
    alpha: f32,
) {
    if alpha <= 0.0 || half_h <= 0.0 || x1 <= x0 {
        return;
    }
    let len = x1 - x0;
    let xa = (x0.floor().max(0.0)) as u32;
    let xb = ((x1.ceil()) as u32).min(frame.width);
    let ya = ((cy - half_h).floor().max(0.0)) as u32;
    let yb = (((cy + half_h).ceil()) as u32).min(frame.height);

    for y in ya..yb {
        let fy = 1.0 - ((y as f32 + 0.5 - cy).abs() / half_h).min(1.0);
        for x in xa..xb {
            let u = (x as f32 + 0.5 - x0) / len;
            if !(0.0..=1.0).contains(&u) {
                continue;
            }
            // Taper toward both ends of the line.
            let fx = (1.0 - (2.0 * u - 1.0).abs()).min(1.0);
            let i = (y as usize * frame.width as usize + x as usize) * 4;
            let dst = [
                frame.data[i],
                frame.data[i + 1],
                frame.data[i + 2],
                frame.data[i + 3],
            ];
            frame.data[i..i + 4].copy_from_slice(&over(dst, color, alpha * fx * fy));
        }
    }
}
