// tests/project_history_test.rs

use serde_json::json;
use tempfile::tempdir;
use ytgrab::project::{EditOperation, OperationType, ProjectManager};

fn trimmed_project() -> ProjectManager {
    let mut manager = ProjectManager::default();
    manager.new_project("clip", vec!["input.mp4".into()]);
    manager
        .project_mut()
        .add_operation(EditOperation::new(OperationType::Trim, json!({"start": 1.5, "end": 9.0})));
    manager.checkpoint("trim intro");
    manager
}

#[test]
fn test_edit_undo_redo_session() {
    let mut manager = trimmed_project();
    manager
        .project_mut()
        .add_operation(EditOperation::new(OperationType::Rotate, json!({"degrees": 90})));
    manager.checkpoint("rotate");

    assert_eq!(manager.project().operations.len(), 2);
    assert_eq!(manager.history().get_undo_description(), Some("rotate"));

    manager.undo().unwrap();
    assert_eq!(manager.project().operations.len(), 1);

    // a new edit after undo forks the timeline and drops the redo branch
    manager
        .project_mut()
        .add_operation(EditOperation::new(OperationType::Speed, json!({"rate": 0.5})));
    manager.checkpoint("slow motion");
    assert!(manager.redo().is_none());
    assert_eq!(
        manager.project().operations[1].operation_type,
        OperationType::Speed
    );
}

#[test]
fn test_save_load_across_both_formats() {
    let dir = tempdir().unwrap();
    let manager = trimmed_project();

    for name in ["clip.json", "clip.yaml"] {
        let path = dir.path().join(name);
        manager.save(&path).unwrap();

        let mut fresh = ProjectManager::default();
        let loaded = fresh.load(&path).unwrap();
        assert_eq!(loaded.name, "clip");
        assert_eq!(loaded.operations.len(), 1);
        assert_eq!(loaded.operations[0].operation_type, OperationType::Trim);
        assert_eq!(loaded.source_files, vec![std::path::PathBuf::from("input.mp4")]);
    }

    let listed = ProjectManager::list_projects(dir.path()).unwrap();
    assert_eq!(listed.len(), 2);
}
