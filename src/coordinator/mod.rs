//! Recording coordinator
//!
//! Owns every capture session and the recording registry of one modality,
//! enforces the mutual-exclusion policy and publishes lifecycle signals.
//! `Coordinator::spawn` turns it into an actor driven by a
//! `CoordinatorHandle`.

mod config;
mod coordinator;
mod handle;

pub use config::{CoordinatorConfig, ExclusionPolicy};
pub use coordinator::{Coordinator, CoordinatorStatus, QuestionStatus};
pub use handle::CoordinatorHandle;
