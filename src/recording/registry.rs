use std::collections::{BTreeMap, HashMap};

use super::recording::Recording;

/// Finalized recordings keyed by question index
///
/// Writes are last-write-wins per index: a later recording fully replaces
/// the earlier one. Only the coordinator's event loop mutates it.
#[derive(Debug, Default, Clone)]
pub struct RecordingRegistry {
    recordings: HashMap<usize, Recording>,
}

impl RecordingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, question_index: usize) -> Option<&Recording> {
        self.recordings.get(&question_index)
    }

    /// Store `recording` under its question index, returning what it replaced
    pub fn put(&mut self, recording: Recording) -> Option<Recording> {
        self.recordings.insert(recording.question_index, recording)
    }

    pub fn remove(&mut self, question_index: usize) -> Option<Recording> {
        self.recordings.remove(&question_index)
    }

    pub fn contains(&self, question_index: usize) -> bool {
        self.recordings.contains_key(&question_index)
    }

    /// True iff exactly `expected_count` distinct indices hold a recording
    ///
    /// Which indices they are does not matter, and re-recording an index
    /// never counts twice.
    pub fn has_all(&self, expected_count: usize) -> bool {
        self.recordings.len() == expected_count
    }

    /// Indices in `0..expected_count` that still lack a recording
    pub fn missing(&self, expected_count: usize) -> Vec<usize> {
        (0..expected_count)
            .filter(|index| !self.recordings.contains_key(index))
            .collect()
    }

    /// Every recording, ordered by question index
    pub fn all_recordings(&self) -> BTreeMap<usize, &Recording> {
        self.recordings
            .iter()
            .map(|(index, recording)| (*index, recording))
            .collect()
    }

    pub fn indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.recordings.keys().copied().collect();
        indices.sort_unstable();
        indices
    }

    pub fn len(&self) -> usize {
        self.recordings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recordings.is_empty()
    }

    /// Drop every recording, returning how many were discarded
    pub fn clear(&mut self) -> usize {
        let discarded = self.recordings.len();
        self.recordings.clear();
        discarded
    }
}
