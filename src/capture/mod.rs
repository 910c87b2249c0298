pub mod backend;
pub mod codec;
pub mod error;
pub mod probe;
pub mod wav;

pub use backend::{CaptureDevice, CaptureKind, Chunk, DeviceStream, Modality};
pub use codec::CodecNegotiator;
pub use error::CaptureError;
pub use wav::WavFileDevice;
