use crate::error::{PrepError, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// Public mirror of the gzipped Fashion-MNIST IDX files
pub const DEFAULT_MIRROR: &str = "https://storage.googleapis.com/tensorflow/tf-keras-datasets";

/// Return the path of a cached dataset file, downloading it first if needed.
/// `<dir>/<name>.gz` is preferred over an already decompressed `<dir>/<name>`
pub fn ensure_cached(dir: &Path, name: &str, mirror: &str, offline: bool) -> Result<PathBuf> {
    let gz_path = dir.join(format!("{}.gz", name));
    if gz_path.is_file() {
        return Ok(gz_path);
    }

    let raw_path = dir.join(name);
    if raw_path.is_file() {
        return Ok(raw_path);
    }

    if offline {
        return Err(PrepError::DatasetUnavailable { path: gz_path });
    }

    let url = format!("{}/{}.gz", mirror.trim_end_matches('/'), name);
    download(&url, &gz_path)?;

    Ok(gz_path)
}

/// Fetch `url` into `dest` via a temporary `.part` sibling
fn download(url: &str, dest: &Path) -> Result<()> {
    info!("Downloading {}", url);

    let to_download_error = |source: reqwest::Error| PrepError::Download {
        url: url.to_string(),
        source,
    };
    let body = reqwest::blocking::get(url)
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.bytes())
        .map_err(to_download_error)?;

    write_via_partial(dest, &body)?;

    info!("Saved {} bytes to {:?}", body.len(), dest);

    Ok(())
}

fn write_via_partial(dest: &Path, body: &[u8]) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    let partial = dest.with_extension("part");
    fs::write(&partial, body)?;
    fs::rename(&partial, dest)?;

    Ok(())
}
