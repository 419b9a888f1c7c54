pub mod config;
pub mod decode;
pub mod errors;
pub mod gateway;
pub mod mock_gateway;

pub use config::GatewayConfig;
pub use decode::{decode_upload_response, error_detail, validate_file_name};
pub use errors::UploadError;
#[cfg(not(target_arch = "wasm32"))]
pub use gateway::HttpUploadGateway;
pub use gateway::{UploadFile, UploadGateway};
pub use mock_gateway::{sample_response, MockGateway};
