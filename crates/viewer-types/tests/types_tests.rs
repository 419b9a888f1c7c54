use viewer_types::*;

fn hole() -> Feature {
    Feature::new("feat_1", "Hole 1", "Hole")
}

fn top_face() -> Feature {
    Feature::new("feat_2", "Top Face", "Plane")
}

// ── Catalog ──────────────────────────────────────────────────────────────

#[test]
fn catalog_lookup_finds_feature_by_id() {
    let catalog = FeatureCatalog::new(vec![hole(), top_face()]).unwrap();
    let found = catalog.lookup(&FeatureId::from("feat_2")).unwrap();
    assert_eq!(found.name, "Top Face");
    assert!(catalog.lookup(&FeatureId::from("feat_3")).is_none());
}

#[test]
fn catalog_preserves_display_order() {
    let catalog = FeatureCatalog::new(vec![top_face(), hole()]).unwrap();
    let ids: Vec<&str> = catalog.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["feat_2", "feat_1"]);
}

#[test]
fn catalog_rejects_duplicate_ids() {
    let err = FeatureCatalog::new(vec![hole(), hole()]).unwrap_err();
    assert_eq!(
        err,
        CatalogError::DuplicateId {
            id: FeatureId::from("feat_1")
        }
    );
}

#[test]
fn empty_catalog_has_no_features() {
    let catalog = FeatureCatalog::empty();
    assert!(catalog.is_empty());
    assert_eq!(catalog.len(), 0);
    assert!(!catalog.contains(&FeatureId::from("feat_1")));
}

#[test]
fn feature_label_combines_name_and_type() {
    assert_eq!(hole().label(), "Hole 1 (Hole)");
}

// ── Wire format ──────────────────────────────────────────────────────────

#[test]
fn upload_response_parses_service_payload() {
    let json = r#"{
        "status": "mock_success",
        "message": "CAD library not found or error, returning mock data.",
        "features": [
            {"id": "feat_1", "name": "Hole 1", "face_ids": [4, 5], "type": "Hole"},
            {"id": "feat_2", "name": "Top Face", "face_ids": [1], "type": "Plane"}
        ],
        "mesh_url": "https://example.com/Box.gltf"
    }"#;
    let response: UploadResponse = serde_json::from_str(json).unwrap();
    assert_eq!(response.mesh_url, "https://example.com/Box.gltf");
    assert_eq!(response.features.len(), 2);
    assert_eq!(response.status.as_deref(), Some("mock_success"));
    let hole = response.features.lookup(&FeatureId::from("feat_1")).unwrap();
    assert_eq!(hole.kind, "Hole");
    assert_eq!(hole.face_ids, vec![4, 5]);
}

#[test]
fn upload_response_without_features_yields_empty_catalog() {
    let response: UploadResponse = serde_json::from_str(r#"{"mesh_url": "a.glb"}"#).unwrap();
    assert!(response.features.is_empty());
    assert!(response.message.is_none());
}

#[test]
fn numeric_feature_ids_are_normalized_to_strings() {
    let json = r#"[{"id": 1, "name": "Hole", "type": "hole"}]"#;
    let catalog: FeatureCatalog = serde_json::from_str(json).unwrap();
    assert!(catalog.contains(&FeatureId::from("1")));
}

#[test]
fn duplicate_ids_on_the_wire_fail_to_parse() {
    let json = r#"{"mesh_url": "a.glb", "features": [
        {"id": "a", "name": "Hole1", "type": "hole"},
        {"id": "a", "name": "Hole2", "type": "hole"}
    ]}"#;
    let err = serde_json::from_str::<UploadResponse>(json).unwrap_err();
    assert!(err.to_string().contains("duplicate feature id"));
}

#[test]
fn feature_serializes_type_field_name() {
    let json = serde_json::to_string(&hole()).unwrap();
    assert!(json.contains("\"type\":\"Hole\""));
    assert!(!json.contains("face_ids"));
}
