//! Worker and filter configuration.
//!
//! Every field has a default, so an empty JSON object (or no configuration
//! at all) yields behavior identical to the original tool:
//!
//! ```json
//! {
//!   "thread_name": "pixelpanels-worker",
//!   "queue_capacity": 16,
//!   "filters": { "edges": "transparent", "crop_bounds": "strict" }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::filters::{CropBounds, EdgePolicy};

/// Options that change how individual filters treat edge cases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Border handling for 3x3 convolutions.
    pub edges: EdgePolicy,
    /// Bound check for crop.
    pub crop_bounds: CropBounds,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Name given to the background thread.
    pub thread_name: String,
    /// Requests that may wait in the queue before `submit` blocks.
    pub queue_capacity: usize,
    pub filters: FilterOptions,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            thread_name: "pixelpanels-worker".to_string(),
            queue_capacity: 16,
            filters: FilterOptions::default(),
        }
    }
}

impl WorkerConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
