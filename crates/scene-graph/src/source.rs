//! Byte sources for scene assets, selected by URL scheme.

use std::collections::HashMap;
use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use tracing::debug;

use crate::traits::AssetSource;
use crate::types::LoadCause;

/// Split `url` into `(scheme, rest)` when it carries a URL scheme.
/// Single-letter prefixes are treated as Windows drive letters, not schemes.
pub fn url_scheme(url: &str) -> Option<(&str, &str)> {
    let (scheme, rest) = url.split_once(':')?;
    let valid = scheme.len() > 1
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some((scheme, rest))
}

/// Resolve `reference` against the directory of `base`.
///
/// Absolute references (with a scheme, or starting with `/` on a URL with an
/// authority) are returned as-is or joined to the origin.
pub fn resolve_relative(base: &str, reference: &str) -> String {
    if url_scheme(reference).is_some() {
        return reference.to_string();
    }
    if let Some(path) = reference.strip_prefix('/') {
        if let Some(origin) = origin_of(base) {
            return format!("{origin}/{path}");
        }
        return reference.to_string();
    }
    match base.rfind('/') {
        Some(pos) => format!("{}/{}", &base[..pos], reference),
        None => reference.to_string(),
    }
}

/// `scheme://authority` part of a hierarchical URL.
fn origin_of(url: &str) -> Option<&str> {
    let (scheme, rest) = url_scheme(url)?;
    let after = rest.strip_prefix("//")?;
    let authority_len = after.find('/').unwrap_or(after.len());
    Some(&url[..scheme.len() + 3 + authority_len])
}

/// Decode an RFC 2397 `data:` URI into bytes.
pub fn decode_data_uri(url: &str) -> Result<Vec<u8>, LoadCause> {
    let body = url
        .strip_prefix("data:")
        .ok_or_else(|| LoadCause::InvalidDataUri {
            reason: "missing data: prefix".to_string(),
        })?;
    let (header, payload) = body
        .split_once(',')
        .ok_or_else(|| LoadCause::InvalidDataUri {
            reason: "missing ',' separator".to_string(),
        })?;
    if header.split(';').any(|param| param == "base64") {
        STANDARD
            .decode(payload.trim())
            .map_err(|e| LoadCause::InvalidDataUri {
                reason: e.to_string(),
            })
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}

/// Reads `file://` URLs and bare paths from the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    /// Directory that relative paths are resolved against.
    pub root: Option<PathBuf>,
}

impl AssetSource for FileSource {
    fn fetch(&mut self, url: &str) -> Result<Vec<u8>, LoadCause> {
        let raw = url.strip_prefix("file://").unwrap_or(url);
        let mut path = PathBuf::from(raw);
        if path.is_relative() {
            if let Some(root) = &self.root {
                path = root.join(path);
            }
        }
        debug!(path = %path.display(), "reading asset file");
        std::fs::read(&path).map_err(|e| LoadCause::Fetch {
            reason: format!("{}: {e}", path.display()),
        })
    }
}

/// Fetches `http(s)://` URLs with a blocking client.
#[cfg(not(target_arch = "wasm32"))]
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

#[cfg(not(target_arch = "wasm32"))]
impl HttpSource {
    pub fn new(timeout: std::time::Duration) -> Result<Self, LoadCause> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LoadCause::Fetch {
                reason: e.to_string(),
            })?;
        Ok(Self { client })
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl AssetSource for HttpSource {
    fn fetch(&mut self, url: &str) -> Result<Vec<u8>, LoadCause> {
        debug!(url, "downloading asset");
        let response = self.client.get(url).send().map_err(|e| LoadCause::Fetch {
            reason: e.to_string(),
        })?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadCause::Fetch {
                reason: format!("HTTP {status}"),
            });
        }
        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| LoadCause::Fetch {
                reason: e.to_string(),
            })
    }
}

/// Bytes handed over by a host that performs its own network I/O.
/// Entries stay until removed or cleared, so a load can be retried after
/// the host supplies a further dependency.
#[derive(Debug, Clone, Default)]
pub struct PrefetchedSource {
    entries: HashMap<String, Vec<u8>>,
}

impl PrefetchedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(url.into(), bytes);
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.contains_key(url)
    }

    pub fn remove(&mut self, url: &str) -> Option<Vec<u8>> {
        self.entries.remove(url)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AssetSource for PrefetchedSource {
    fn fetch(&mut self, url: &str) -> Result<Vec<u8>, LoadCause> {
        self.entries
            .get(url)
            .cloned()
            .ok_or_else(|| LoadCause::MissingBytes {
                url: url.to_string(),
            })
    }
}

/// Routes a URL to the matching source: prefetched bytes first, then
/// `data:`, `http(s):` and `file:`/bare paths. Without an HTTP client
/// (always the case on wasm) remote URLs fail with
/// [`LoadCause::MissingBytes`] so the host can supply them.
#[derive(Default)]
pub struct SchemeSource {
    pub prefetched: PrefetchedSource,
    pub file: FileSource,
    #[cfg(not(target_arch = "wasm32"))]
    pub http: Option<HttpSource>,
}

impl SchemeSource {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_http(mut self, http: HttpSource) -> Self {
        self.http = Some(http);
        self
    }

    pub fn with_file_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.file.root = Some(root.into());
        self
    }
}

impl AssetSource for SchemeSource {
    fn fetch(&mut self, url: &str) -> Result<Vec<u8>, LoadCause> {
        if self.prefetched.contains(url) {
            return self.prefetched.fetch(url);
        }
        match url_scheme(url).map(|(scheme, _)| scheme.to_ascii_lowercase()) {
            Some(scheme) if scheme == "data" => decode_data_uri(url),
            Some(scheme) if scheme == "file" => self.file.fetch(url),
            Some(scheme) if scheme == "http" || scheme == "https" => self.fetch_remote(url),
            Some(scheme) => Err(LoadCause::UnsupportedScheme { scheme }),
            None => self.file.fetch(url),
        }
    }
}

impl SchemeSource {
    #[cfg(not(target_arch = "wasm32"))]
    fn fetch_remote(&mut self, url: &str) -> Result<Vec<u8>, LoadCause> {
        match self.http.as_mut() {
            Some(http) => http.fetch(url),
            None => Err(missing(url)),
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn fetch_remote(&mut self, url: &str) -> Result<Vec<u8>, LoadCause> {
        Err(missing(url))
    }
}

fn missing(url: &str) -> LoadCause {
    debug!(url, "remote bytes not provided");
    LoadCause::MissingBytes {
        url: url.to_string(),
    }
}
