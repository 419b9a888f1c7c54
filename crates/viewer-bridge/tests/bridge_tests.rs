use highlight_engine::{LoadTicket, ViewportStatus};
use scene_graph::{GltfLoader, MockLoader, SchemeSource};
use viewer_bridge::messages::*;
use viewer_bridge::*;
use viewer_types::{Feature, FeatureCatalog, FeatureId, UploadResponse};

// ── Helper functions ─────────────────────────────────────────────────────

const URL_X: &str = "https://assets.test/x.glb";
const URL_Y: &str = "https://assets.test/y.glb";
const GREY: &str = "#d3d3d3";
const ORANGE: &str = "#ffa500";

fn id(s: &str) -> FeatureId {
    FeatureId::from(s)
}

fn two_features() -> FeatureCatalog {
    FeatureCatalog::new(vec![
        Feature::new("a", "Hole 1", "Hole"),
        Feature::new("b", "Top Face", "Plane"),
    ])
    .unwrap()
}

fn upload(url: &str) -> UiToViewer {
    UiToViewer::UploadSucceeded {
        response: UploadResponse::new(url, two_features()),
    }
}

fn expect_view(response: ViewerToUi) -> ViewSnapshot {
    match response {
        ViewerToUi::ViewUpdated { view } => view,
        other => panic!("expected ViewUpdated, got {other:?}"),
    }
}

fn expect_ticket(response: ViewerToUi) -> (LoadTicket, ViewSnapshot) {
    match response {
        ViewerToUi::LoadRequested { ticket, view } => (ticket, view),
        other => panic!("expected LoadRequested, got {other:?}"),
    }
}

fn colors(view: &ViewSnapshot) -> Vec<&str> {
    view.meshes.iter().map(|m| m.color.as_str()).collect()
}

/// Upload `url` and complete its load, returning the resulting view.
fn upload_and_load(state: &mut BridgeState, loader: &mut MockLoader, url: &str) -> ViewSnapshot {
    let (ticket, _) = expect_ticket(dispatch(state, upload(url), loader));
    expect_view(dispatch(state, UiToViewer::CompleteLoad { ticket }, loader))
}

const BOX_URL: &str = "https://host/Box/glTF/Box.gltf";
const BOX_BIN_URL: &str = "https://host/Box/glTF/Box0.bin";

/// One-triangle glTF whose vertex buffer lives in `Box0.bin`.
fn box_gltf() -> Vec<u8> {
    r#"{
        "asset": {"version": "2.0"},
        "scenes": [{"nodes": [0]}],
        "nodes": [{"name": "Box", "mesh": 0}],
        "meshes": [{"primitives": [{"attributes": {"POSITION": 0}}]}],
        "buffers": [{"byteLength": 36, "uri": "Box0.bin"}],
        "bufferViews": [{"buffer": 0, "byteOffset": 0, "byteLength": 36}],
        "accessors": [{
            "bufferView": 0,
            "componentType": 5126,
            "count": 3,
            "type": "VEC3",
            "min": [0.0, 0.0, 0.0],
            "max": [1.0, 1.0, 0.0]
        }]
    }"#
    .as_bytes()
    .to_vec()
}

fn box_bin() -> Vec<u8> {
    [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
        .iter()
        .flat_map(|v| v.to_le_bytes())
        .collect()
}

fn expect_bytes_request(response: ViewerToUi) -> (LoadTicket, String) {
    match response {
        ViewerToUi::BytesRequested { ticket, url, view } => {
            assert_eq!(view.status, ViewportStatus::Loading);
            (ticket, url)
        }
        other => panic!("expected BytesRequested, got {other:?}"),
    }
}

// ── Message serialization ────────────────────────────────────────────────

#[test]
fn ui_messages_are_tagged_by_type() {
    let msg: UiToViewer =
        serde_json::from_str(r#"{"type":"HoverEnter","feature_id":"feat_1"}"#).unwrap();
    assert!(matches!(msg, UiToViewer::HoverEnter { feature_id } if feature_id == id("feat_1")));

    let msg: UiToViewer = serde_json::from_str(r#"{"type":"GetView"}"#).unwrap();
    assert!(matches!(msg, UiToViewer::GetView));
}

#[test]
fn numeric_feature_ids_are_accepted() {
    let msg: UiToViewer = serde_json::from_str(r#"{"type":"HoverLeave","feature_id":7}"#).unwrap();
    assert!(matches!(msg, UiToViewer::HoverLeave { feature_id } if feature_id == id("7")));
}

#[test]
fn set_highlight_without_id_clears() {
    let msg: UiToViewer = serde_json::from_str(r#"{"type":"SetHighlight"}"#).unwrap();
    assert!(matches!(msg, UiToViewer::SetHighlight { feature_id: None }));
}

#[test]
fn upload_message_carries_service_payload() {
    let json = r#"{
        "type": "UploadSucceeded",
        "response": {
            "status": "success",
            "mesh_url": "https://assets.test/x.glb",
            "features": [{"id": "feat_1", "name": "Hole 1", "type": "Hole", "face_ids": [4, 5]}]
        }
    }"#;
    let msg: UiToViewer = serde_json::from_str(json).unwrap();
    let UiToViewer::UploadSucceeded { response } = msg else {
        panic!("expected UploadSucceeded");
    };
    assert_eq!(response.features.len(), 1);
}

#[test]
fn responses_serialize_with_type_tag() {
    let mut state = BridgeState::default();
    let mut loader = MockLoader::new();
    let response = dispatch(&mut state, upload(URL_X), &mut loader);
    let json = dispatch::encode(&response).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["type"], "LoadRequested");
    assert_eq!(value["ticket"]["url"], URL_X);
    assert_eq!(value["view"]["status"], "loading");
}

#[test]
fn malformed_json_becomes_error_response() {
    let mut state = BridgeState::default();
    let mut loader = MockLoader::new();
    let json = dispatch_json(&mut state, "{not json", &mut loader);
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["type"], "Error");
    assert!(value["message"].as_str().unwrap().contains("Failed to parse message"));
}

// ── Upload and load ──────────────────────────────────────────────────────

#[test]
fn upload_requests_load_then_renders_default_colors() {
    let mut state = BridgeState::default();
    let mut loader = MockLoader::with_meshes(3);

    let (ticket, view) = expect_ticket(dispatch(&mut state, upload(URL_X), &mut loader));
    assert_eq!(ticket.url, URL_X);
    assert_eq!(view.status, ViewportStatus::Loading);
    assert_eq!(view.rows.len(), 2);
    assert!(view.meshes.is_empty());
    assert_eq!(loader.total_loads(), 0);

    let view = expect_view(dispatch(&mut state, UiToViewer::CompleteLoad { ticket }, &mut loader));
    assert_eq!(view.status, ViewportStatus::Ready);
    assert_eq!(colors(&view), vec![GREY; 3]);
    assert_eq!(loader.load_count(URL_X), 1);
}

#[test]
fn rows_are_labelled_in_catalog_order() {
    let mut state = BridgeState::default();
    let mut loader = MockLoader::new();
    let view = upload_and_load(&mut state, &mut loader, URL_X);
    let labels: Vec<&str> = view.rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(labels, vec!["Hole 1 (Hole)", "Top Face (Plane)"]);
    assert!(view.rows.iter().all(|r| !r.active));
}

#[test]
fn cached_asset_attaches_without_a_ticket() {
    let mut state = BridgeState::default();
    let mut loader = MockLoader::new();
    upload_and_load(&mut state, &mut loader, URL_X);

    let view = expect_view(dispatch(&mut state, upload(URL_X), &mut loader));
    assert_eq!(view.status, ViewportStatus::Ready);
    assert_eq!(loader.load_count(URL_X), 1);
}

#[test]
fn unknown_ticket_is_an_error() {
    let mut state = BridgeState::default();
    let mut loader = MockLoader::new();
    let ticket = LoadTicket {
        id: uuid::Uuid::new_v4(),
        url: URL_X.to_string(),
    };
    let response = dispatch(&mut state, UiToViewer::CompleteLoad { ticket }, &mut loader);
    assert!(matches!(response, ViewerToUi::Error { .. }));
    assert_eq!(loader.total_loads(), 0);
}

#[test]
fn ticket_cannot_be_completed_twice() {
    let mut state = BridgeState::default();
    let mut loader = MockLoader::new();
    let (ticket, _) = expect_ticket(dispatch(&mut state, upload(URL_X), &mut loader));

    expect_view(dispatch(
        &mut state,
        UiToViewer::CompleteLoad {
            ticket: ticket.clone(),
        },
        &mut loader,
    ));
    let again = dispatch(&mut state, UiToViewer::CompleteLoad { ticket }, &mut loader);
    assert!(matches!(again, ViewerToUi::Error { .. }));
    assert_eq!(loader.load_count(URL_X), 1);
}

#[test]
fn superseded_load_is_discarded_but_cached() {
    let mut state = BridgeState::default();
    let mut loader = MockLoader::new();
    let (first, _) = expect_ticket(dispatch(&mut state, upload(URL_X), &mut loader));
    let (second, _) = expect_ticket(dispatch(&mut state, upload(URL_Y), &mut loader));

    let response = dispatch(&mut state, UiToViewer::CompleteLoad { ticket: first }, &mut loader);
    assert!(matches!(response, ViewerToUi::LoadDiscarded { url } if url == URL_X));
    assert!(state.cache.contains(URL_X));

    let view = expect_view(dispatch(&mut state, UiToViewer::CompleteLoad { ticket: second }, &mut loader));
    assert_eq!(view.asset_url.as_deref(), Some(URL_Y));
    assert_eq!(view.status, ViewportStatus::Ready);
}

#[test]
fn failed_upload_leaves_view_unchanged() {
    let mut state = BridgeState::default();
    let mut loader = MockLoader::new();
    let before = upload_and_load(&mut state, &mut loader, URL_X);

    let response = dispatch(
        &mut state,
        UiToViewer::UploadFailed {
            message: "Invalid file type".to_string(),
        },
        &mut loader,
    );
    match response {
        ViewerToUi::UploadRejected { message, view } => {
            assert_eq!(message, "Invalid file type");
            assert_eq!(view, before);
        }
        other => panic!("expected UploadRejected, got {other:?}"),
    }
}

#[test]
fn server_message_is_shown_in_view() {
    let mut state = BridgeState::default();
    let mut loader = MockLoader::new();
    let mut response = UploadResponse::new(URL_X, two_features());
    response.message = Some("Mock response".to_string());

    let (_, view) = expect_ticket(dispatch(&mut state, UiToViewer::UploadSucceeded { response }, &mut loader));
    assert_eq!(view.message.as_deref(), Some("Mock response"));
}

#[test]
fn abandoned_ticket_does_not_block_returning_to_its_url() {
    let mut state = BridgeState::default();
    let mut loader = MockLoader::new();
    let (abandoned, _) = expect_ticket(dispatch(&mut state, upload(URL_X), &mut loader));
    let (ticket_y, _) = expect_ticket(dispatch(&mut state, upload(URL_Y), &mut loader));
    expect_view(dispatch(&mut state, UiToViewer::CompleteLoad { ticket: ticket_y }, &mut loader));

    let (fresh, view) = expect_ticket(dispatch(&mut state, upload(URL_X), &mut loader));
    assert_ne!(fresh.id, abandoned.id);
    assert_eq!(view.status, ViewportStatus::Loading);
    assert_eq!(state.pending.len(), 1);

    let view = expect_view(dispatch(&mut state, UiToViewer::CompleteLoad { ticket: fresh }, &mut loader));
    assert_eq!(view.asset_url.as_deref(), Some(URL_X));
    assert_eq!(view.status, ViewportStatus::Ready);
    assert!(state.pending.is_empty());
}

#[test]
fn remount_after_abandoned_load_issues_a_ticket() {
    let mut state = BridgeState::default();
    let mut loader = MockLoader::new();
    expect_ticket(dispatch(&mut state, upload(URL_X), &mut loader));
    let (ticket_y, _) = expect_ticket(dispatch(&mut state, upload(URL_Y), &mut loader));
    expect_view(dispatch(&mut state, UiToViewer::CompleteLoad { ticket: ticket_y }, &mut loader));
    expect_ticket(dispatch(&mut state, upload(URL_X), &mut loader));
    dispatch(&mut state, UiToViewer::Unmount, &mut loader);

    // The load for X is still outstanding, so remount waits for it.
    let view = expect_view(dispatch(&mut state, UiToViewer::Remount, &mut loader));
    assert_eq!(view.status, ViewportStatus::Loading);
    assert_eq!(state.pending.len(), 1);
}

// ── Host-supplied bytes ──────────────────────────────────────────────────

#[test]
fn external_buffer_is_requested_from_the_host() {
    let mut state = BridgeState::default();
    let mut loader = GltfLoader::new(SchemeSource::new());

    let (ticket, _) = expect_ticket(dispatch(&mut state, upload(BOX_URL), &mut loader));

    let (ticket, url) = expect_bytes_request(dispatch(&mut state, UiToViewer::CompleteLoad { ticket }, &mut loader));
    assert_eq!(url, BOX_URL);
    loader.source_mut().prefetched.insert(BOX_URL, box_gltf());

    let (ticket, url) = expect_bytes_request(dispatch(&mut state, UiToViewer::CompleteLoad { ticket }, &mut loader));
    assert_eq!(url, BOX_BIN_URL);
    loader.source_mut().prefetched.insert(BOX_BIN_URL, box_bin());

    let view = expect_view(dispatch(&mut state, UiToViewer::CompleteLoad { ticket }, &mut loader));
    assert_eq!(view.status, ViewportStatus::Ready);
    assert_eq!(colors(&view), vec![GREY]);
    assert!(state.pending.is_empty());
}

#[test]
fn bytes_request_serializes_with_url() {
    let mut state = BridgeState::default();
    let mut loader = GltfLoader::new(SchemeSource::new());
    let (ticket, _) = expect_ticket(dispatch(&mut state, upload(BOX_URL), &mut loader));

    let response = dispatch(&mut state, UiToViewer::CompleteLoad { ticket }, &mut loader);
    let value: serde_json::Value = serde_json::from_str(&dispatch::encode(&response).unwrap()).unwrap();
    assert_eq!(value["type"], "BytesRequested");
    assert_eq!(value["url"], BOX_URL);
}

#[test]
fn missing_bytes_for_superseded_load_is_discarded() {
    let mut state = BridgeState::default();
    let mut loader = GltfLoader::new(SchemeSource::new());
    let (stale, _) = expect_ticket(dispatch(&mut state, upload(BOX_URL), &mut loader));
    expect_ticket(dispatch(&mut state, upload(URL_Y), &mut loader));

    let response = dispatch(&mut state, UiToViewer::CompleteLoad { ticket: stale }, &mut loader);
    assert!(matches!(response, ViewerToUi::LoadDiscarded { url } if url == BOX_URL));
}

// ── Failure and remount ──────────────────────────────────────────────────

#[test]
fn failed_load_is_reported_and_retried_on_remount() {
    let mut state = BridgeState::default();
    let mut loader = MockLoader::new();
    loader.fail_url(URL_X);

    let view = upload_and_load(&mut state, &mut loader, URL_X);
    assert_eq!(view.status, ViewportStatus::Failed);
    assert!(view.error.as_deref().unwrap().contains(URL_X));
    assert_eq!(view.rows.len(), 2);

    loader.heal_url(URL_X);
    let (ticket, _) = expect_ticket(dispatch(&mut state, UiToViewer::Remount, &mut loader));
    let view = expect_view(dispatch(&mut state, UiToViewer::CompleteLoad { ticket }, &mut loader));
    assert_eq!(view.status, ViewportStatus::Ready);
    assert_eq!(loader.load_count(URL_X), 2);
}

#[test]
fn unmount_keeps_selection_and_remount_restores_it() {
    let mut state = BridgeState::default();
    let mut loader = MockLoader::with_meshes(2);
    upload_and_load(&mut state, &mut loader, URL_X);
    dispatch(&mut state, UiToViewer::HoverEnter { feature_id: id("a") }, &mut loader);

    let view = expect_view(dispatch(&mut state, UiToViewer::Unmount, &mut loader));
    assert_eq!(view.status, ViewportStatus::Empty);
    assert!(view.meshes.is_empty());
    assert_eq!(view.active_feature, Some(id("a")));

    let view = expect_view(dispatch(&mut state, UiToViewer::Remount, &mut loader));
    assert_eq!(colors(&view), vec![ORANGE; 2]);
    assert_eq!(loader.load_count(URL_X), 1);
}

#[test]
fn remount_without_upload_is_an_error() {
    let mut state = BridgeState::default();
    let mut loader = MockLoader::new();
    let response = dispatch(&mut state, UiToViewer::Remount, &mut loader);
    assert!(matches!(response, ViewerToUi::Error { .. }));
}

// ── Hover ────────────────────────────────────────────────────────────────

#[test]
fn hover_enter_and_leave_round_trip() {
    let mut state = BridgeState::default();
    let mut loader = MockLoader::with_meshes(2);
    upload_and_load(&mut state, &mut loader, URL_X);

    let view = expect_view(dispatch(&mut state, UiToViewer::HoverEnter { feature_id: id("a") }, &mut loader));
    assert_eq!(colors(&view), vec![ORANGE; 2]);
    assert!(view.rows[0].active);
    assert!(!view.rows[1].active);

    let view = expect_view(dispatch(&mut state, UiToViewer::HoverLeave { feature_id: id("a") }, &mut loader));
    assert_eq!(colors(&view), vec![GREY; 2]);
    assert_eq!(view.active_feature, None);
}

#[test]
fn late_leave_of_previous_row_does_not_clear() {
    let mut state = BridgeState::default();
    let mut loader = MockLoader::new();
    upload_and_load(&mut state, &mut loader, URL_X);

    dispatch(&mut state, UiToViewer::HoverEnter { feature_id: id("a") }, &mut loader);
    dispatch(&mut state, UiToViewer::HoverEnter { feature_id: id("b") }, &mut loader);
    let view = expect_view(dispatch(&mut state, UiToViewer::HoverLeave { feature_id: id("a") }, &mut loader));

    assert_eq!(view.active_feature, Some(id("b")));
    assert_eq!(colors(&view), vec![ORANGE]);
}

#[test]
fn unknown_id_renders_default() {
    let mut state = BridgeState::default();
    let mut loader = MockLoader::new();
    upload_and_load(&mut state, &mut loader, URL_X);

    let view = expect_view(dispatch(
        &mut state,
        UiToViewer::SetHighlight {
            feature_id: Some(id("zzz")),
        },
        &mut loader,
    ));
    assert_eq!(colors(&view), vec![GREY]);
    assert!(view.rows.iter().all(|r| !r.active));
}

#[test]
fn highlight_set_while_loading_applies_on_attach() {
    let mut state = BridgeState::default();
    let mut loader = MockLoader::new();
    let (ticket, _) = expect_ticket(dispatch(&mut state, upload(URL_X), &mut loader));
    dispatch(&mut state, UiToViewer::HoverEnter { feature_id: id("b") }, &mut loader);

    let view = expect_view(dispatch(&mut state, UiToViewer::CompleteLoad { ticket }, &mut loader));
    assert_eq!(colors(&view), vec![ORANGE]);
}

#[test]
fn new_upload_clears_highlight() {
    let mut state = BridgeState::default();
    let mut loader = MockLoader::new();
    upload_and_load(&mut state, &mut loader, URL_X);
    dispatch(&mut state, UiToViewer::HoverEnter { feature_id: id("a") }, &mut loader);

    let view = upload_and_load(&mut state, &mut loader, URL_Y);
    assert_eq!(view.active_feature, None);
    assert_eq!(colors(&view), vec![GREY]);
}

// ── Sidebar ──────────────────────────────────────────────────────────────

#[test]
fn highlight_request_rules() {
    let a = id("a");
    let b = id("b");
    assert_eq!(highlight_request(&HoverEvent::Enter(a.clone()), None), Some(Some(a.clone())));
    assert_eq!(highlight_request(&HoverEvent::Leave(a.clone()), Some(&a)), Some(None));
    assert_eq!(highlight_request(&HoverEvent::Leave(a.clone()), Some(&b)), None);
    assert_eq!(highlight_request(&HoverEvent::Leave(a), None), None);
}

#[test]
fn sidebar_rows_mark_only_the_active_feature() {
    let catalog = two_features();
    let rows = sidebar_rows(&catalog, Some(&id("b")));
    assert_eq!(rows.iter().filter(|r| r.active).count(), 1);
    assert_eq!(rows[1].id, id("b"));
    assert!(sidebar_rows(&FeatureCatalog::empty(), None).is_empty());
}
