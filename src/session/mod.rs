//! Capture session management
//!
//! This module provides the `CaptureSession` abstraction that manages:
//! - The device stream and recorder of one question
//! - Chunk buffering in arrival order and assembly into a blob
//! - The elapsed-time timer bound to the session's lifetime

mod chunk;
mod config;
mod session;
mod timer;

pub use chunk::{collect_chunks, ChunkBuffer};
pub use config::SessionConfig;
pub use session::CaptureSession;
pub use timer::{format_elapsed, ElapsedTimer};
