pub mod composite;
mod frame;
pub(crate) mod raster;

pub use frame::{Frame, FrameSink, InMemorySink, SinkConfig};
