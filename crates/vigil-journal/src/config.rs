use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Path of the JSON-lines journal file. Parent directories are created
    /// on open.
    pub path: String,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            path: "data/readings.jsonl".to_string(),
        }
    }
}
