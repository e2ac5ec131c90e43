use rayon::prelude::*;

use crate::foundation::error::{MorphclipError, MorphclipResult};
use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

pub fn crossfade(a: PremulRgba8, b: PremulRgba8, t: f32) -> PremulRgba8 {
    let t = t.clamp(0.0, 1.0);
    let tt = ((t * 255.0).round() as i32).clamp(0, 255) as u16;
    let it = 255u16 - tt;

    let mut out = [0u8; 4];
    for i in 0..4 {
        let av = mul_div255(u16::from(a[i]), it);
        let bv = mul_div255(u16::from(b[i]), tt);
        out[i] = add_sat_u8(av, bv);
    }
    out
}

/// Premultiply a straight-alpha color so it can feed [`over`].
pub fn premul_color(r: u8, g: u8, b: u8, a: u8) -> PremulRgba8 {
    [
        mul_div255(u16::from(r), u16::from(a)),
        mul_div255(u16::from(g), u16::from(a)),
        mul_div255(u16::from(b), u16::from(a)),
        a,
    ]
}

pub fn copy_in_place(dst: &mut [u8], src: &[u8]) -> MorphclipResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(MorphclipError::render(
            "copy_in_place expects equal-length rgba8 buffers",
        ));
    }
    dst.copy_from_slice(src);
    Ok(())
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> MorphclipResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(MorphclipError::render(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite one flat color over the whole buffer (fade dips, flashes).
pub fn tint_in_place(dst: &mut [u8], color: PremulRgba8, opacity: f32) -> MorphclipResult<()> {
    if !dst.len().is_multiple_of(4) {
        return Err(MorphclipError::render(
            "tint_in_place expects an rgba8 buffer",
        ));
    }
    if opacity <= 0.0 {
        return Ok(());
    }
    for d in dst.chunks_exact_mut(4) {
        let out = over([d[0], d[1], d[2], d[3]], color, opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

pub fn crossfade_in_place(dst: &mut [u8], a: &[u8], b: &[u8], t: f32) -> MorphclipResult<()> {
    if dst.len() != a.len() || dst.len() != b.len() || !dst.len().is_multiple_of(4) {
        return Err(MorphclipError::render(
            "crossfade_in_place expects equal-length rgba8 buffers",
        ));
    }
    for ((d, a), b) in dst
        .chunks_exact_mut(4)
        .zip(a.chunks_exact(4))
        .zip(b.chunks_exact(4))
    {
        let out = crossfade([a[0], a[1], a[2], a[3]], [b[0], b[1], b[2], b[3]], t);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Merge `a` and `b` into `dst` through a per-pixel coverage mask.
///
/// The mask returns the weight of `b` (the incoming image) in `[0, 1]`; rows
/// are processed in parallel. Every clipped-reveal effect is built on this.
pub fn masked_merge<M>(
    dst: &mut [u8],
    a: &[u8],
    b: &[u8],
    width: u32,
    height: u32,
    mask: M,
) -> MorphclipResult<()>
where
    M: Fn(u32, u32) -> f32 + Sync,
{
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| MorphclipError::render("masked merge buffer size overflow"))?;
    if dst.len() != expected_len || a.len() != expected_len || b.len() != expected_len {
        return Err(MorphclipError::render(
            "masked_merge expects buffers matching width*height*4",
        ));
    }

    let row_bytes = width as usize * 4;
    dst.par_chunks_exact_mut(row_bytes)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let y = y as u32;
            let row_start = y as usize * row_bytes;
            let a_row = &a[row_start..row_start + row_bytes];
            let b_row = &b[row_start..row_start + row_bytes];
            for x in 0..width {
                let m = mask(x, y).clamp(0.0, 1.0);
                let i = x as usize * 4;
                let ap = [a_row[i], a_row[i + 1], a_row[i + 2], a_row[i + 3]];
                let bp = [b_row[i], b_row[i + 1], b_row[i + 2], b_row[i + 3]];
                let out = crossfade(ap, bp, m);
                dst_row[i..i + 4].copy_from_slice(&out);
            }
        });

    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u8 {
    mul_div255_u8(x, y)
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}
