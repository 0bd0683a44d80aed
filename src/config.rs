//! Configuration for huff-tree

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// Trace every code assignment while compressing.
    pub debug: bool,
    pub io_buffer_size: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            debug: false,
            io_buffer_size: 64 * 1024, // 64 KiB
        }
    }
}
