use std::collections::HashMap;

use upload_gateway::config::{API_URL_ENV, TIMEOUT_ENV};
use upload_gateway::*;
use viewer_types::FeatureId;

// ── Extension checks ─────────────────────────────────────────────────────

#[test]
fn step_and_stp_files_are_accepted() {
    assert!(validate_file_name("bracket.step").is_ok());
    assert!(validate_file_name("bracket.stp").is_ok());
    assert!(validate_file_name("BRACKET.STEP").is_ok());
    assert!(validate_file_name("v2.final.Stp").is_ok());
}

#[test]
fn other_files_are_rejected_before_upload() {
    for name in ["bracket.stl", "bracket", "step", "bracket.step.zip", ".gitignore"] {
        assert_eq!(
            validate_file_name(name),
            Err(UploadError::InvalidExtension {
                file_name: name.to_string()
            }),
            "{name} should be rejected"
        );
    }
}

#[test]
fn upload_file_checks_extension() {
    assert!(UploadFile::new("part.step", b"ISO-10303-21;".to_vec()).is_ok());
    assert!(matches!(
        UploadFile::new("part.obj", Vec::new()),
        Err(UploadError::InvalidExtension { .. })
    ));
}

#[test]
fn upload_file_reads_from_disk() {
    let path = std::env::temp_dir().join(format!("upload-gateway-{}.stp", std::process::id()));
    std::fs::write(&path, b"ISO-10303-21;").unwrap();
    let file = UploadFile::from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(file.file_name.ends_with(".stp"));
    assert_eq!(file.bytes, b"ISO-10303-21;".to_vec());
}

#[test]
fn missing_file_is_an_io_error() {
    let path = std::env::temp_dir().join("upload-gateway-does-not-exist.step");
    assert!(matches!(
        UploadFile::from_path(&path),
        Err(UploadError::Io { .. })
    ));
}

// ── Response decoding ────────────────────────────────────────────────────

#[test]
fn absolute_and_data_mesh_urls_are_kept() {
    let body = r#"{"mesh_url": "data:model/gltf-binary;base64,Z2xURg==", "features": []}"#;
    let response = decode_upload_response(body, "http://localhost:8000").unwrap();
    assert_eq!(response.mesh_url, "data:model/gltf-binary;base64,Z2xURg==");

    let body = r#"{"mesh_url": "https://cdn.test/a.glb", "features": []}"#;
    let response = decode_upload_response(body, "http://localhost:8000").unwrap();
    assert_eq!(response.mesh_url, "https://cdn.test/a.glb");
}

#[test]
fn relative_mesh_urls_resolve_against_the_api() {
    let body = r#"{"mesh_url": "static/a.glb", "features": []}"#;
    let response = decode_upload_response(body, "http://localhost:8000/").unwrap();
    assert_eq!(response.mesh_url, "http://localhost:8000/static/a.glb");

    let body = r#"{"mesh_url": "/static/a.glb", "features": []}"#;
    let response = decode_upload_response(body, "http://api.test/v1").unwrap();
    assert_eq!(response.mesh_url, "http://api.test/static/a.glb");
}

#[test]
fn decode_keeps_features_in_order() {
    let body = r#"{
        "status": "success",
        "mesh_url": "https://cdn.test/a.glb",
        "features": [
            {"id": "feature_hole_0", "name": "Hole 1", "face_ids": [3], "type": "Hole"},
            {"id": "feature_hole_1", "name": "Hole 2", "face_ids": [7], "type": "Hole"}
        ]
    }"#;
    let response = decode_upload_response(body, "http://localhost:8000").unwrap();
    let names: Vec<&str> = response.features.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Hole 1", "Hole 2"]);
    assert!(response.features.contains(&FeatureId::from("feature_hole_1")));
}

#[test]
fn malformed_bodies_are_decode_errors() {
    for body in ["", "{}", r#"{"mesh_url": "  "}"#, r#"{"mesh_url": 3}"#] {
        assert!(
            matches!(
                decode_upload_response(body, "http://localhost:8000"),
                Err(UploadError::Decode { .. })
            ),
            "{body:?} should fail to decode"
        );
    }
}

#[test]
fn error_detail_prefers_service_detail_field() {
    assert_eq!(
        error_detail(r#"{"detail": "Invalid file type. Only .step or .stp files are allowed."}"#),
        "Invalid file type. Only .step or .stp files are allowed."
    );
    assert_eq!(error_detail("Bad Gateway"), "Bad Gateway");
    assert_eq!(error_detail(""), "no response body");
    assert!(error_detail(r#"{"detail": [{"msg": "field required"}]}"#).contains("field required"));
}

// ── Configuration ────────────────────────────────────────────────────────

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn config_defaults_to_local_service() {
    let config = GatewayConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(config, GatewayConfig::default());
    assert_eq!(config.upload_url(), "http://localhost:8000/upload");
}

#[test]
fn config_reads_environment_overrides() {
    let config = GatewayConfig::from_lookup(lookup(&[
        (API_URL_ENV, "https://api.test/"),
        (TIMEOUT_ENV, "30"),
    ]))
    .unwrap();
    assert_eq!(config.upload_url(), "https://api.test/upload");
    assert_eq!(config.timeout().as_secs(), 30);
}

#[test]
fn config_rejects_non_numeric_timeout() {
    let err = GatewayConfig::from_lookup(lookup(&[(TIMEOUT_ENV, "soon")])).unwrap_err();
    assert!(matches!(err, UploadError::Config { .. }));
}

// ── Mock gateway ─────────────────────────────────────────────────────────

#[test]
fn mock_gateway_replays_queue_then_falls_back_to_sample() {
    let mut gateway = MockGateway::new();
    gateway.push_failure(UploadError::Status {
        status: 500,
        detail: "boom".to_string(),
    });
    let file = UploadFile::new("part.step", Vec::new()).unwrap();

    assert!(matches!(
        gateway.upload(&file),
        Err(UploadError::Status { status: 500, .. })
    ));
    let response = gateway.upload(&file).unwrap();
    assert_eq!(response, sample_response());
    assert_eq!(response.features.len(), 2);
    assert_eq!(gateway.uploads(), ["part.step", "part.step"]);
}
