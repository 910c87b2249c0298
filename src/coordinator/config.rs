use serde::{Deserialize, Serialize};

use crate::capture::{CodecNegotiator, Modality};
use crate::session::SessionConfig;

/// How concurrent starts on different questions are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionPolicy {
    /// One live session per coordinator; starting another finalizes the
    /// current one first
    SingleFlight,
    /// Sessions on different questions run independently
    PerQuestion,
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        Self::SingleFlight
    }
}

/// Everything a coordinator needs besides its device and event bus
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub modality: Modality,
    /// Number of questions a complete set covers
    pub question_count: usize,
    pub exclusion: ExclusionPolicy,
    pub codecs: CodecNegotiator,
    pub session: SessionConfig,
}

impl CoordinatorConfig {
    pub fn new(modality: Modality, question_count: usize) -> Self {
        Self {
            modality,
            question_count,
            exclusion: ExclusionPolicy::default(),
            codecs: CodecNegotiator::for_modality(modality),
            session: SessionConfig::default(),
        }
    }

    pub fn with_exclusion(mut self, exclusion: ExclusionPolicy) -> Self {
        self.exclusion = exclusion;
        self
    }

    pub fn with_codecs(mut self, codecs: CodecNegotiator) -> Self {
        self.codecs = codecs;
        self
    }

    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.session = session;
        self
    }
}
