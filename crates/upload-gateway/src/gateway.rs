use std::path::Path;

use viewer_types::UploadResponse;

use crate::decode::validate_file_name;
use crate::errors::UploadError;

/// A CAD file ready to be sent to the analysis service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    /// Wrap in-memory bytes, checking the file name's extension.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, UploadError> {
        let file_name = file_name.into();
        validate_file_name(&file_name)?;
        Ok(Self { file_name, bytes })
    }

    /// Read a file from disk. The extension is checked before reading.
    pub fn from_path(path: &Path) -> Result<Self, UploadError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        validate_file_name(&file_name)?;
        let bytes = std::fs::read(path).map_err(|e| UploadError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { file_name, bytes })
    }
}

/// Sends a CAD file for analysis and returns the mesh URL and feature list.
/// Implemented by HttpUploadGateway (real service) and MockGateway (test double).
pub trait UploadGateway {
    fn upload(&mut self, file: &UploadFile) -> Result<UploadResponse, UploadError>;
}

#[cfg(not(target_arch = "wasm32"))]
pub use http::HttpUploadGateway;

#[cfg(not(target_arch = "wasm32"))]
mod http {
    use reqwest::blocking::multipart::{Form, Part};
    use reqwest::blocking::Client;
    use tracing::{debug, info, instrument, warn};
    use viewer_types::UploadResponse;

    use super::{UploadFile, UploadGateway};
    use crate::config::GatewayConfig;
    use crate::decode::{decode_upload_response, error_detail};
    use crate::errors::UploadError;

    /// Multipart upload to `POST {api_url}/upload`.
    pub struct HttpUploadGateway {
        client: Client,
        config: GatewayConfig,
    }

    impl HttpUploadGateway {
        pub fn new(config: GatewayConfig) -> Result<Self, UploadError> {
            let client = Client::builder()
                .timeout(config.timeout())
                .build()
                .map_err(|e| UploadError::Config {
                    reason: e.to_string(),
                })?;
            Ok(Self { client, config })
        }

        pub fn config(&self) -> &GatewayConfig {
            &self.config
        }
    }

    impl UploadGateway for HttpUploadGateway {
        #[instrument(skip(self, file), fields(file = %file.file_name, bytes = file.bytes.len()))]
        fn upload(&mut self, file: &UploadFile) -> Result<UploadResponse, UploadError> {
            let part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
            let form = Form::new().part("file", part);
            let url = self.config.upload_url();
            debug!(%url, "sending upload");

            let response = self
                .client
                .post(&url)
                .multipart(form)
                .send()
                .map_err(|e| UploadError::Transport {
                    reason: e.to_string(),
                })?;
            let status = response.status();
            let body = response.text().map_err(|e| UploadError::Transport {
                reason: e.to_string(),
            })?;

            if !status.is_success() {
                let detail = error_detail(&body);
                warn!(status = status.as_u16(), %detail, "upload rejected");
                return Err(UploadError::Status {
                    status: status.as_u16(),
                    detail,
                });
            }

            let decoded = decode_upload_response(&body, self.config.base_url())?;
            info!(
                mesh_url = %decoded.mesh_url,
                features = decoded.features.len(),
                "upload processed"
            );
            Ok(decoded)
        }
    }
}
