use serde::{Deserialize, Serialize};

/// Progress notifications sent from upload workers to the checkpoint writer
#[derive(Debug, Clone)]
pub enum UploadEvent {
    Uploaded {
        entry_id: String,
        file_name: String,
    },
    Skipped {
        entry_id: String,
    },
    Failed {
        entry_id: String,
        reason: String,
    },
}

impl UploadEvent {
    pub fn entry_id(&self) -> &str {
        match self {
            UploadEvent::Uploaded { entry_id, .. }
            | UploadEvent::Skipped { entry_id }
            | UploadEvent::Failed { entry_id, .. } => entry_id,
        }
    }
}

/// One row of the `vocabulary` collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabRecord {
    pub simplified: String,
    pub mandarin: String,
    pub cantonese: String,
}

/// Where generated sentences end up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    Tsv,
    Firestore,
}
