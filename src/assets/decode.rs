use std::path::Path;
use std::sync::Arc;

use crate::assets::slot::PreparedImage;
use crate::foundation::error::{MorphclipError, MorphclipResult};

/// Decode an image file's bytes into a premultiplied RGBA8 bitmap.
///
/// Any format the `image` crate recognizes is accepted; no further validation
/// is applied. A failed decode is recoverable — the caller's slot stays unset.
pub fn decode_image(bytes: &[u8]) -> MorphclipResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| MorphclipError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// Read and decode an image file from disk.
pub fn decode_image_file(path: &Path) -> MorphclipResult<PreparedImage> {
    let bytes = std::fs::read(path)
        .map_err(|e| MorphclipError::decode(format!("read '{}': {e}", path.display())))?;
    decode_image(&bytes)
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}
