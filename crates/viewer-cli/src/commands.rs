use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use highlight_engine::{HighlightController, MaterialPalette, PaletteConfig, ViewportStatus};
use scene_graph::{AssetLoader, GltfLoader, HttpSource, SchemeSource};
use tracing::{info, warn};
use upload_gateway::{
    GatewayConfig, HttpUploadGateway, MockGateway, UploadFile, UploadGateway,
};
use viewer_bridge::{dispatch, BridgeState, UiToViewer, ViewSnapshot, ViewerToUi};
use viewer_types::{FeatureCatalog, FeatureId, UploadResponse};

use crate::cli::{InspectArgs, PreviewArgs, UploadArgs};

pub fn run_upload(args: &UploadArgs) -> Result<()> {
    let mut config = GatewayConfig::from_env()?;
    if let Some(url) = &args.api_url {
        config.api_url = url.clone();
    }
    if let Some(secs) = args.timeout_secs {
        config.timeout_secs = secs;
    }
    let timeout = config.timeout();

    let file = UploadFile::from_path(&args.file)?;
    let mut gateway: Box<dyn UploadGateway> = if args.mock {
        Box::new(MockGateway::new())
    } else {
        Box::new(HttpUploadGateway::new(config)?)
    };

    let mut state = BridgeState::new(controller(&args.preview)?);
    let mut loader = native_loader(timeout)?;
    let response = gateway
        .upload(&file)
        .with_context(|| format!("uploading {}", args.file.display()))?;
    info!(mesh_url = %response.mesh_url, features = response.features.len(), "upload accepted");
    let view = preview(&mut state, response, &args.preview, &mut loader)?;
    print_view(&view, args.preview.json)
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let catalog = match &args.features {
        Some(path) => read_catalog(path)?,
        None => FeatureCatalog::empty(),
    };
    let mut state = BridgeState::new(controller(&args.preview)?);
    let mut loader = native_loader(Duration::from_secs(args.timeout_secs))?;
    let view = preview(
        &mut state,
        UploadResponse::new(args.mesh.clone(), catalog),
        &args.preview,
        &mut loader,
    )?;
    print_view(&view, args.preview.json)
}

/// Feed an upload response through the bridge, load the mesh unless
/// disabled, then apply the requested highlight.
pub fn preview(
    state: &mut BridgeState,
    response: UploadResponse,
    args: &PreviewArgs,
    loader: &mut dyn AssetLoader,
) -> Result<ViewSnapshot> {
    let mut reply = dispatch(state, UiToViewer::UploadSucceeded { response }, loader);
    if let ViewerToUi::LoadRequested { ticket, .. } = &reply {
        if !args.no_load {
            let ticket = ticket.clone();
            reply = dispatch(state, UiToViewer::CompleteLoad { ticket }, loader);
        }
    }
    let mut view = view_of(reply)?;
    if view.status == ViewportStatus::Failed {
        warn!(error = view.error.as_deref().unwrap_or_default(), "mesh did not load");
    }

    if let Some(raw) = &args.highlight {
        let id = FeatureId::new(raw.clone());
        if !state.session.catalog().contains(&id) {
            warn!(feature = %id, "feature id not in catalog; nothing will be highlighted");
        }
        let reply = dispatch(
            state,
            UiToViewer::SetHighlight {
                feature_id: Some(id),
            },
            loader,
        );
        view = view_of(reply)?;
    }
    Ok(view)
}

/// Plain-text rendering of a view.
pub fn render_view(view: &ViewSnapshot) -> String {
    let mut out = String::new();
    let status = match view.status {
        ViewportStatus::Empty => "empty",
        ViewportStatus::Loading => "not loaded",
        ViewportStatus::Ready => "ready",
        ViewportStatus::Failed => "failed",
    };
    let url = view.asset_url.as_deref().unwrap_or("-");
    let _ = writeln!(out, "model: {url} ({status})");
    if let Some(error) = &view.error {
        let _ = writeln!(out, "error: {error}");
    }
    if let Some(message) = &view.message {
        let _ = writeln!(out, "message: {message}");
    }

    if view.rows.is_empty() {
        let _ = writeln!(out, "features: none");
    } else {
        let _ = writeln!(out, "features:");
        for row in &view.rows {
            let marker = if row.active { '*' } else { ' ' };
            let _ = writeln!(out, "  {marker} {} [{}]", row.label, row.id);
        }
    }

    if !view.meshes.is_empty() {
        let _ = writeln!(out, "meshes:");
        for mesh in &view.meshes {
            let name = mesh.name.as_deref().unwrap_or("(unnamed)");
            let _ = writeln!(out, "  #{:<3} {name:<24} {}", mesh.node, mesh.color);
        }
    }
    out
}

fn print_view(view: &ViewSnapshot, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        print!("{}", render_view(view));
    }
    Ok(())
}

fn view_of(reply: ViewerToUi) -> Result<ViewSnapshot> {
    match reply {
        ViewerToUi::ViewUpdated { view }
        | ViewerToUi::LoadRequested { view, .. }
        | ViewerToUi::UploadRejected { view, .. } => Ok(view),
        ViewerToUi::BytesRequested { url, view, .. } => {
            warn!(%url, "no source could provide the bytes; mesh left unloaded");
            Ok(view)
        }
        ViewerToUi::LoadDiscarded { url } => bail!("load of {url} was superseded"),
        ViewerToUi::Error { message } => bail!(message),
    }
}

fn controller(args: &PreviewArgs) -> Result<HighlightController> {
    let mut config = PaletteConfig::default();
    if let Some(color) = &args.default_color {
        config.default_color = color.clone();
    }
    if let Some(color) = &args.highlight_color {
        config.highlight_color = color.clone();
    }
    let palette = MaterialPalette::from_config(&config).context("invalid colour settings")?;
    Ok(HighlightController::new(palette))
}

fn read_catalog(path: &Path) -> Result<FeatureCatalog> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing features from {}", path.display()))
}

fn native_loader(timeout: Duration) -> Result<GltfLoader<SchemeSource>> {
    let http = HttpSource::new(timeout)?;
    Ok(GltfLoader::new(SchemeSource::new().with_http(http)))
}
