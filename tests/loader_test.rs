use flowgen::dsl::loader;
use serde_json::json;
use std::fs;

#[test]
fn test_load_yaml_document() {
    let yaml_content = r#"
name: "YAML Test Workflow"
nodes:
  - name: "Start"
    type: "n8n-nodes-base.start"
    typeVersion: 1
    parameters: {}
    position: [100, 300]
connections: {}
"#;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("workflow.yaml");
    fs::write(&file_path, yaml_content).expect("Failed to write temp file");

    let payload = loader::load_document(&file_path.to_string_lossy())
        .expect("Failed to load document from YAML");

    assert_eq!(payload["name"], json!("YAML Test Workflow"));
    assert_eq!(payload["nodes"][0]["position"], json!([100, 300]));

    temp_dir.close().expect("Failed to close temp dir");
}

#[test]
fn test_load_json_keeps_malformed_shape() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("broken.json");
    fs::write(&file_path, r#"{ "error": 42 }"#).expect("Failed to write temp file");

    let payload = loader::load_document(&file_path.to_string_lossy()).unwrap();
    assert_eq!(payload, json!({ "error": 42 }));
}

#[test]
fn test_load_missing_file_fails() {
    let err = loader::load_document("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("Failed to read workflow file"));
}
