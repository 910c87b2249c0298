//! Typed signal channel between the coordinator and its collaborators
//!
//! Inbound: `Command` values (`questionRecording:start`, `questionRecording:stop`, ...)
//! Outbound: `RecordingEvent` values broadcast on an `EventBus`

pub mod bus;
pub mod messages;

pub use bus::EventBus;
pub use messages::{Command, QuestionState, RecordingEvent};
