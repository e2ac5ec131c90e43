use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc;

use crate::assets::decode::decode_image_file;
use crate::foundation::core::Canvas;
use crate::foundation::error::{MorphclipError, MorphclipResult};

/// Decoded bitmap in row-major premultiplied RGBA8 form, at source resolution.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// A bitmap cover-fitted to a canvas: scaled to fill and center-cropped.
///
/// Effects only ever consume canvas-sized inputs, so the fit happens once per
/// upload rather than once per frame.
#[derive(Clone, Debug)]
pub struct CanvasImage {
    canvas: Canvas,
    data: Arc<Vec<u8>>,
}

impl CanvasImage {
    /// Scale `img` so it fully covers `canvas` and center-crop the overflow.
    ///
    /// Resampling runs on premultiplied data, which keeps edges free of
    /// transparent-fringe halos.
    pub fn from_prepared(img: &PreparedImage, canvas: Canvas) -> MorphclipResult<Self> {
        if img.width == 0 || img.height == 0 {
            return Err(MorphclipError::validation(
                "source image dimensions must be non-zero",
            ));
        }

        let src = image::RgbaImage::from_raw(img.width, img.height, img.rgba8_premul.to_vec())
            .ok_or_else(|| {
                MorphclipError::validation("prepared image buffer does not match its dimensions")
            })?;

        let scale = f64::max(
            f64::from(canvas.width) / f64::from(img.width),
            f64::from(canvas.height) / f64::from(img.height),
        );
        let scaled_w = ((f64::from(img.width) * scale).ceil() as u32).max(canvas.width);
        let scaled_h = ((f64::from(img.height) * scale).ceil() as u32).max(canvas.height);

        let resized = image::imageops::resize(
            &src,
            scaled_w,
            scaled_h,
            image::imageops::FilterType::CatmullRom,
        );
        let x0 = (scaled_w - canvas.width) / 2;
        let y0 = (scaled_h - canvas.height) / 2;
        let cropped =
            image::imageops::crop_imm(&resized, x0, y0, canvas.width, canvas.height).to_image();

        Ok(Self {
            canvas,
            data: Arc::new(cropped.into_raw()),
        })
    }

    /// Canvas-sized image filled with one straight-alpha color. Handy for
    /// tests and for rendering before any real upload.
    pub fn solid(canvas: Canvas, r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            ((u16::from(c) * u16::from(a) + 127) / 255) as u8
        }
        let px = [premul(r, a), premul(g, a), premul(b, a), a];
        let mut data = Vec::with_capacity(canvas.byte_len());
        for _ in 0..canvas.pixel_count() {
            data.extend_from_slice(&px);
        }
        Self {
            canvas,
            data: Arc::new(data),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_raw_for_tests(canvas: Canvas, data: Vec<u8>) -> Self {
        assert_eq!(data.len(), canvas.byte_len());
        Self {
            canvas,
            data: Arc::new(data),
        }
    }

    /// The canvas this image was fitted to.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Borrow the premultiplied RGBA8 pixel bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// The two image inputs a transition runs between.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ImageSlot {
    Before,
    After,
}

impl std::fmt::Display for ImageSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Before => f.write_str("before"),
            Self::After => f.write_str("after"),
        }
    }
}

/// Holder for the before/after pair. Slots are replaced wholesale on
/// re-upload; there is no versioning.
#[derive(Clone, Debug, Default)]
pub struct SlotPair {
    before: Option<CanvasImage>,
    after: Option<CanvasImage>,
}

impl SlotPair {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, slot: ImageSlot, img: CanvasImage) {
        match slot {
            ImageSlot::Before => self.before = Some(img),
            ImageSlot::After => self.after = Some(img),
        }
    }

    pub fn clear(&mut self, slot: ImageSlot) {
        match slot {
            ImageSlot::Before => self.before = None,
            ImageSlot::After => self.after = None,
        }
    }

    pub fn get(&self, slot: ImageSlot) -> Option<&CanvasImage> {
        match slot {
            ImageSlot::Before => self.before.as_ref(),
            ImageSlot::After => self.after.as_ref(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.before.is_some() && self.after.is_some()
    }

    /// Both images, or a user-facing missing-input error naming the first
    /// empty slot.
    pub fn require_both(&self) -> MorphclipResult<(&CanvasImage, &CanvasImage)> {
        let before = self.before.as_ref().ok_or_else(|| {
            MorphclipError::missing_input("the before image is not loaded yet")
        })?;
        let after = self
            .after
            .as_ref()
            .ok_or_else(|| MorphclipError::missing_input("the after image is not loaded yet"))?;
        Ok((before, after))
    }
}

/// An image decode running on a worker thread.
///
/// The driver never blocks on this: poll with [`try_resolve`] from the UI
/// glue, or [`wait`] where blocking is fine. There is no timeout — a stalled
/// decode simply leaves the slot unset and the driver Idle.
///
/// [`try_resolve`]: PendingImage::try_resolve
/// [`wait`]: PendingImage::wait
#[derive(Debug)]
pub struct PendingImage {
    slot: ImageSlot,
    rx: mpsc::Receiver<MorphclipResult<PreparedImage>>,
}

impl PendingImage {
    /// Spawn a worker thread that reads and decodes `path`.
    pub fn spawn_decode(slot: ImageSlot, path: PathBuf) -> Self {
        let (tx, rx) = mpsc::sync_channel(1);
        std::thread::spawn(move || {
            tracing::debug!(path = %path.display(), "decoding image on worker thread");
            // Receiver may be gone if the user already re-picked a file.
            let _ = tx.send(decode_image_file(&path));
        });
        Self { slot, rx }
    }

    /// The slot this decode is destined for.
    pub fn slot(&self) -> ImageSlot {
        self.slot
    }

    /// Non-blocking poll. `None` while the worker is still decoding.
    pub fn try_resolve(&mut self) -> Option<MorphclipResult<PreparedImage>> {
        match self.rx.try_recv() {
            Ok(res) => Some(res),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(Err(MorphclipError::decode(
                "image decode worker exited without a result",
            ))),
        }
    }

    /// Block until the decode finishes.
    pub fn wait(self) -> MorphclipResult<PreparedImage> {
        match self.rx.recv() {
            Ok(res) => res,
            Err(_) => Err(MorphclipError::decode(
                "image decode worker exited without a result",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas::new(8, 16).unwrap()
    }

    #[test]
    fn cover_fit_produces_canvas_sized_buffer() {
        let src = PreparedImage {
            width: 100,
            height: 40,
            rgba8_premul: Arc::new(vec![255u8; 100 * 40 * 4]),
        };
        let fitted = CanvasImage::from_prepared(&src, canvas()).unwrap();
        assert_eq!(fitted.canvas(), canvas());
        assert_eq!(fitted.data().len(), canvas().byte_len());
    }

    #[test]
    fn cover_fit_of_solid_color_stays_solid() {
        let src = PreparedImage {
            width: 30,
            height: 30,
            rgba8_premul: Arc::new(
                std::iter::repeat([10u8, 20, 30, 255])
                    .take(30 * 30)
                    .flatten()
                    .collect(),
            ),
        };
        let fitted = CanvasImage::from_prepared(&src, canvas()).unwrap();
        for px in fitted.data().chunks_exact(4) {
            assert_eq!(px, &[10, 20, 30, 255]);
        }
    }

    #[test]
    fn require_both_names_the_empty_slot() {
        let mut pair = SlotPair::new();
        let err = pair.require_both().unwrap_err();
        assert!(err.to_string().contains("before"));

        pair.set(ImageSlot::Before, CanvasImage::solid(canvas(), 1, 2, 3, 255));
        let err = pair.require_both().unwrap_err();
        assert!(err.to_string().contains("after"));

        pair.set(ImageSlot::After, CanvasImage::solid(canvas(), 4, 5, 6, 255));
        assert!(pair.require_both().is_ok());
        assert!(pair.is_complete());
    }

    #[test]
    fn clearing_a_slot_makes_the_pair_incomplete() {
        let mut pair = SlotPair::new();
        pair.set(ImageSlot::Before, CanvasImage::solid(canvas(), 0, 0, 0, 255));
        pair.set(ImageSlot::After, CanvasImage::solid(canvas(), 0, 0, 0, 255));
        pair.clear(ImageSlot::After);
        assert!(!pair.is_complete());
        assert!(pair.get(ImageSlot::After).is_none());
        assert!(pair.get(ImageSlot::Before).is_some());
    }

    #[test]
    fn pending_decode_reports_failure_for_missing_file() {
        let pending = PendingImage::spawn_decode(
            ImageSlot::Before,
            PathBuf::from("/definitely/not/here.png"),
        );
        let res = pending.wait();
        assert!(matches!(res, Err(MorphclipError::Decode(_))));
    }
}
