//! Route payload file loading
//!
//! A path is either one payload file or a directory of them. Files are read
//! and parsed independently: a file that cannot be read or is not a JSON
//! object becomes an unreadable [`PayloadInput`] and the importer reports it
//! without touching the others.

use std::path::{Path, PathBuf};

use application::PayloadInput;
use domain::RawRoutePayload;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Failure to enumerate the input itself
#[derive(Debug, Error)]
pub enum PayloadLoadError {
    #[error("Import path does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Load one file, or every `*.{extension}` file in a directory sorted by name
#[instrument(skip_all, fields(path = %path.display()))]
pub async fn load_payloads(
    path: &Path,
    extension: &str,
) -> Result<Vec<PayloadInput>, PayloadLoadError> {
    let metadata = tokio::fs::metadata(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PayloadLoadError::NotFound(path.to_path_buf())
        } else {
            PayloadLoadError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let files = if metadata.is_dir() {
        list_payload_files(path, extension).await?
    } else {
        vec![path.to_path_buf()]
    };

    let mut inputs = Vec::with_capacity(files.len());
    for file in files {
        inputs.push(load_file(&file).await);
    }

    info!(files = inputs.len(), "Payload files loaded");
    Ok(inputs)
}

async fn list_payload_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, PayloadLoadError> {
    let io_err = |source| PayloadLoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(dir).await.map_err(io_err)?;
    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
        let path = entry.path();
        let is_file = entry.file_type().await.map_err(io_err)?.is_file();
        if is_file && has_extension(&path, extension) {
            files.push(path);
        } else {
            debug!(path = %path.display(), "Skipping non-payload entry");
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    let wanted = extension.trim_start_matches('.');
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
}

async fn load_file(path: &Path) -> PayloadInput {
    let source = path.display().to_string();

    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) => return PayloadInput::unreadable(source, format!("cannot read file: {e}")),
    };

    match parse_payload(&text) {
        Ok(payload) => PayloadInput::parsed(source, payload),
        Err(reason) => PayloadInput::unreadable(source, reason),
    }
}

/// Parse one payload document
pub fn parse_payload(text: &str) -> Result<RawRoutePayload, String> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| format!("invalid JSON: {e}"))?;
    RawRoutePayload::from_json(&value).map_err(|e| e.to_string())
}
