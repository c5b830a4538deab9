pub mod config;
pub mod status;

pub use config::{DivisorRounding, PipelineConfig};
pub use status::Status;

/// Width of one payload word in bits. Frames always carry exactly one byte.
pub const DATA_BITS: u8 = 8;

/// Line bits per frame: one start bit, the payload, one stop bit.
pub const FRAME_BITS: u8 = DATA_BITS + 2;
