//! Single-writer queue sizing.

use serde::{Deserialize, Serialize};

const fn default_queue_capacity() -> usize {
    1024
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WriterConfig {
    /// Entries that may wait for the writer before `create_entry` applies
    /// backpressure.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
        }
    }
}
