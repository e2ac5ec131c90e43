mod decode;
mod slot;

pub use decode::{decode_image, decode_image_file};
pub use slot::{CanvasImage, ImageSlot, PendingImage, PreparedImage, SlotPair};
