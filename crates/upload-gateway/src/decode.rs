use scene_graph::{resolve_relative, url_scheme};
use serde::Deserialize;
use viewer_types::UploadResponse;

use crate::errors::UploadError;

/// File extensions the analysis service accepts.
pub const ACCEPTED_EXTENSIONS: [&str; 2] = ["step", "stp"];

/// Reject anything that is not a `.step` / `.stp` file, case-insensitively.
pub fn validate_file_name(file_name: &str) -> Result<(), UploadError> {
    let accepted = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ACCEPTED_EXTENSIONS.iter().any(|a| ext.eq_ignore_ascii_case(a)))
        .unwrap_or(false);
    if accepted {
        Ok(())
    } else {
        Err(UploadError::InvalidExtension {
            file_name: file_name.to_string(),
        })
    }
}

/// Parse a success body from the service.
///
/// A relative `mesh_url` is resolved against `base_url` so the result is
/// always loadable on its own.
pub fn decode_upload_response(body: &str, base_url: &str) -> Result<UploadResponse, UploadError> {
    let mut response: UploadResponse =
        serde_json::from_str(body).map_err(|e| UploadError::Decode {
            reason: e.to_string(),
        })?;

    if response.mesh_url.trim().is_empty() {
        return Err(UploadError::Decode {
            reason: "mesh_url is empty".to_string(),
        });
    }
    if url_scheme(&response.mesh_url).is_none() {
        let base = format!("{}/", base_url.trim_end_matches('/'));
        response.mesh_url = resolve_relative(&base, &response.mesh_url);
    }
    Ok(response)
}

/// Human-readable reason from an error body: the service's `detail`
/// field when present, otherwise the raw text.
pub fn error_detail(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: serde_json::Value,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
