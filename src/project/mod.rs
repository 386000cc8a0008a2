// src/project/mod.rs

mod config;
mod history;
mod manager;

pub use config::{EditOperation, OperationType, ProjectConfig};
pub use history::{EditHistory, HistoryEntry};
pub use manager::ProjectManager;
