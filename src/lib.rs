pub mod capture;
pub mod config;
pub mod coordinator;
pub mod events;
pub mod http;
pub mod recording;
pub mod session;

pub use capture::{
    CaptureDevice, CaptureError, CaptureKind, Chunk, CodecNegotiator, DeviceStream, Modality,
    WavFileDevice,
};
pub use config::Config;
pub use coordinator::{
    Coordinator, CoordinatorConfig, CoordinatorHandle, CoordinatorStatus, ExclusionPolicy,
    QuestionStatus,
};
pub use events::{Command, EventBus, QuestionState, RecordingEvent};
pub use http::{create_router, AppState};
pub use recording::{
    Attachment, ExportManifest, MediaBlob, Recording, RecordingRegistry, SourceKind, UploadedFile,
};
pub use session::{CaptureSession, ElapsedTimer, SessionConfig};
