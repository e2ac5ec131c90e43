use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{MorphclipError, MorphclipResult};

/// A rendered frame as RGBA8 pixels.
///
/// Frames are **premultiplied alpha** by default. The `premultiplied` flag is
/// included to make this explicit at API boundaries.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl Frame {
    /// Allocate a transparent frame sized to `canvas`.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0u8; canvas.byte_len()],
            premultiplied: true,
        }
    }

    /// The canvas this frame is sized for.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Replace the frame's contents with `src`, which must match in length.
    pub fn copy_from(&mut self, src: &[u8]) -> MorphclipResult<()> {
        if src.len() != self.data.len() {
            return Err(MorphclipError::render(
                "frame copy expects a buffer matching width*height*4",
            ));
        }
        self.data.copy_from_slice(src);
        Ok(())
    }

    pub(crate) fn row_bytes(&self) -> usize {
        self.width as usize * 4
    }
}

/// Configuration provided to a [`FrameSink`] at the start of a run.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Tick cadence of the run.
    pub fps: Fps,
}

/// Sink contract for consuming rendered frames in tick order.
///
/// Ordering contract: `push_frame` is called with strictly increasing `tick`
/// and non-decreasing `progress` within one run.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> MorphclipResult<()>;
    /// Push one frame together with the progress it was rendered at.
    fn push_frame(&mut self, tick: u64, progress: f64, frame: &Frame) -> MorphclipResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> MorphclipResult<()>;
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(u64, f64, Frame)>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg.clone()
    }

    /// Borrow the captured `(tick, progress, frame)` tuples.
    pub fn frames(&self) -> &[(u64, f64, Frame)] {
        &self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> MorphclipResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, tick: u64, progress: f64, frame: &Frame) -> MorphclipResult<()> {
        self.frames.push((tick, progress, frame.clone()));
        Ok(())
    }

    fn end(&mut self) -> MorphclipResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_frame_is_transparent_and_sized() {
        let frame = Frame::new(Canvas::new(3, 2).unwrap());
        assert_eq!(frame.data.len(), 3 * 2 * 4);
        assert!(frame.data.iter().all(|&b| b == 0));
        assert!(frame.premultiplied);
    }

    #[test]
    fn copy_from_rejects_mismatched_len() {
        let mut frame = Frame::new(Canvas::new(2, 2).unwrap());
        assert!(frame.copy_from(&[0u8; 4]).is_err());
        assert!(frame.copy_from(&[7u8; 16]).is_ok());
        assert_eq!(frame.data[0], 7);
    }

    #[test]
    fn in_memory_sink_records_run() {
        let mut sink = InMemorySink::new();
        sink.begin(SinkConfig {
            width: 2,
            height: 2,
            fps: Fps::new(30, 1).unwrap(),
        })
        .unwrap();
        let frame = Frame::new(Canvas::new(2, 2).unwrap());
        sink.push_frame(0, 0.0, &frame).unwrap();
        sink.push_frame(1, 0.5, &frame).unwrap();
        sink.end().unwrap();
        assert_eq!(sink.frames().len(), 2);
        assert_eq!(sink.config().unwrap().width, 2);
    }
}
