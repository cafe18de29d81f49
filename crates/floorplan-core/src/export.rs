//! Export delivery.
//!
//! The core produces bytes and a filename; an [`ExportSink`] decides how they
//! reach the user. [`DirectDownload`] writes a file, [`HostBridge`] hands the
//! bytes to an embedding host as base64. The sink is chosen once at startup
//! with [`select_sink`].

use crate::domain::{DOMAIN_FILENAME, DomainDocument};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

/// Host method that saves a base64 payload to a file.
pub const HOST_SAVE_METHOD: &str = "exWNSaveBase64File";

pub const JSON_MIME: &str = "application/json";

/// Export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Host bridge rejected {0}")]
    BridgeRejected(String),
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Raster snapshot formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Png,
    Pdf,
}

impl RasterFormat {
    pub fn filename(self) -> &'static str {
        match self {
            RasterFormat::Png => "floorplan.png",
            RasterFormat::Pdf => "floorplan.pdf",
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            RasterFormat::Png => "image/png",
            RasterFormat::Pdf => "application/pdf",
        }
    }
}

/// Bytes ready to be delivered under a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ExportPayload {
    pub fn new(filename: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Pretty-printed domain JSON named `floorplan.domain.json`.
    pub fn domain(document: &DomainDocument) -> ExportResult<Self> {
        let json = serde_json::to_string_pretty(document)
            .map_err(|e| ExportError::Serialization(e.to_string()))?;
        Ok(Self::new(DOMAIN_FILENAME, JSON_MIME, json.into_bytes()))
    }

    /// An already rendered raster snapshot.
    pub fn raster(format: RasterFormat, bytes: Vec<u8>) -> Self {
        Self::new(format.filename(), format.mime(), bytes)
    }
}

/// Capability that delivers exported files to the user.
pub trait ExportSink {
    fn deliver(&self, payload: &ExportPayload) -> ExportResult<()>;

    /// Short name for logging.
    fn name(&self) -> &'static str;
}

/// Writes exports as files into a directory.
#[derive(Debug, Clone)]
pub struct DirectDownload {
    dir: PathBuf,
}

impl DirectDownload {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Use the platform download directory, falling back to the home directory.
    pub fn default_location() -> ExportResult<Self> {
        let dir = dirs::download_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| ExportError::Io("Could not determine download directory".to_string()))?;
        Ok(Self::new(dir))
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

impl ExportSink for DirectDownload {
    fn deliver(&self, payload: &ExportPayload) -> ExportResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            ExportError::Io(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;
        let path = self.dir.join(&payload.filename);
        fs::write(&path, &payload.bytes)
            .map_err(|e| ExportError::Io(format!("Failed to write {}: {}", path.display(), e)))?;
        log::info!("Exported {} ({} bytes)", path.display(), payload.bytes.len());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "direct-download"
    }
}

/// An embedding host that can run named methods.
pub trait HostExecutor {
    /// Call `method` with string arguments. `None` or an empty string means
    /// the host did not handle the call.
    fn execute(&self, method: &str, args: &[&str]) -> Option<String>;
}

impl<F> HostExecutor for F
where
    F: Fn(&str, &[&str]) -> Option<String>,
{
    fn execute(&self, method: &str, args: &[&str]) -> Option<String> {
        self(method, args)
    }
}

/// Delivers exports through a host bridge as base64.
pub struct HostBridge<E> {
    executor: E,
}

impl<E: HostExecutor> HostBridge<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }
}

impl<E: HostExecutor> ExportSink for HostBridge<E> {
    fn deliver(&self, payload: &ExportPayload) -> ExportResult<()> {
        let encoded = STANDARD.encode(&payload.bytes);
        let result = self.executor.execute(
            HOST_SAVE_METHOD,
            &[encoded.as_str(), payload.filename.as_str(), payload.mime.as_str()],
        );
        match result {
            Some(r) if !r.is_empty() => {
                log::info!("Host saved {} ({} bytes)", payload.filename, payload.bytes.len());
                Ok(())
            }
            _ => Err(ExportError::BridgeRejected(payload.filename.clone())),
        }
    }

    fn name(&self) -> &'static str {
        "host-bridge"
    }
}

/// Check whether a user agent belongs to an embedded Android WebView host.
pub fn is_embedded_webview(user_agent: &str) -> bool {
    let ua = user_agent.to_ascii_lowercase();
    if ua.contains("morpheus") {
        return true;
    }
    if !ua.contains("android") {
        return false;
    }
    let has_wv_token = ua
        .split(|c: char| !c.is_ascii_alphanumeric())
        .any(|token| token == "wv");
    has_wv_token || has_version_then_chrome(&ua)
}

/// Matches `version/<d>.<d>` followed somewhere later by `chrome/<d>`.
fn has_version_then_chrome(ua: &str) -> bool {
    let mut rest = ua;
    while let Some(pos) = rest.find("version/") {
        let after = &rest[pos + "version/".len()..];
        if let Some(len) = dotted_version_len(after) {
            let tail = &after[len..];
            if let Some(chrome) = tail.find("chrome/") {
                let digits = &tail[chrome + "chrome/".len()..];
                if digits.starts_with(|c: char| c.is_ascii_digit()) {
                    return true;
                }
            }
        }
        rest = after;
    }
    false
}

/// Length of a leading `<digits>.<digits>` prefix, if present.
fn dotted_version_len(s: &str) -> Option<usize> {
    let major = s.bytes().take_while(u8::is_ascii_digit).count();
    if major == 0 || s.as_bytes().get(major) != Some(&b'.') {
        return None;
    }
    let minor = s[major + 1..].bytes().take_while(u8::is_ascii_digit).count();
    (minor > 0).then_some(major + 1 + minor)
}

/// Pick the export sink for this platform.
///
/// Embedded WebView hosts with a bridge get a [`HostBridge`]; everything else
/// downloads directly into `download_dir`.
pub fn select_sink<E>(user_agent: &str, download_dir: PathBuf, executor: Option<E>) -> Box<dyn ExportSink>
where
    E: HostExecutor + 'static,
{
    match executor {
        Some(executor) if is_embedded_webview(user_agent) => {
            log::info!("Using host bridge for exports");
            Box::new(HostBridge::new(executor))
        }
        _ => Box::new(DirectDownload::new(download_dir)),
    }
}
