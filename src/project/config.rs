// src/project/config.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    Trim,
    Speed,
    Crop,
    Resize,
    Rotate,
    ColorGrade,
    Filter,
    Overlay,
    AudioEffect,
    AudioMix,
    Concatenate,
}

/// One recorded edit with its free-form parameter object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditOperation {
    #[serde(rename = "type")]
    pub operation_type: OperationType,
    pub params: serde_json::Value,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl EditOperation {
    pub fn new(operation_type: OperationType, params: serde_json::Value) -> Self {
        Self {
            operation_type,
            params,
            timestamp: Utc::now(),
        }
    }
}

fn default_version() -> String {
    "1.0".to_string()
}

/// The savable unit of editing work: source media plus the ordered list of
/// operations applied to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub modified_at: DateTime<Utc>,
    #[serde(default)]
    pub source_files: Vec<PathBuf>,
    #[serde(default)]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub operations: Vec<EditOperation>,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ProjectConfig {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            version: default_version(),
            created_at: now,
            modified_at: now,
            source_files: Vec::new(),
            output_dir: PathBuf::from("."),
            operations: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    pub fn add_operation(&mut self, op: EditOperation) {
        self.operations.push(op);
        self.modified_at = Utc::now();
    }
}
