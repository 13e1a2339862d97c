use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Struct to track reported questions to avoid re-exporting them
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ReportManifest {
    pub reported: Vec<ReportedQuestion>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReportedQuestion {
    pub question_id: i64,
    pub timestamp: String,
    pub action: String, // "exported" or "skipped"
}

impl ReportManifest {
    /// Load the manifest from file
    pub fn load(file_path: &str) -> Self {
        if Path::new(file_path).exists() {
            match fs::read_to_string(file_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(manifest) => manifest,
                    Err(e) => {
                        eprintln!("Error parsing report manifest: {}", e);
                        Self::default()
                    }
                },
                Err(e) => {
                    eprintln!("Error reading report manifest: {}", e);
                    Self::default()
                }
            }
        } else {
            Self::default()
        }
    }

    /// Save the manifest to file
    pub fn save(&self, file_path: &str) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(&self).expect("Failed to serialize report manifest");
        fs::write(file_path, json)
    }

    /// Record a question as handled
    pub fn add(&mut self, question_id: i64, timestamp: String, action: String) {
        let entry = ReportedQuestion {
            question_id,
            timestamp,
            action,
        };

        if !self.reported.contains(&entry) {
            self.reported.push(entry);
        }
    }

    /// Check whether a question has already been reported
    pub fn is_reported(&self, question_id: i64) -> bool {
        self.reported.iter().any(|r| r.question_id == question_id)
    }
}
