use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::APP_DIR_NAME;

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
    #[error("model {name} not found in {searched:?} and no download URL configured; copy the file into one of those directories or configure a URL")]
    NotFound { name: String, searched: Vec<PathBuf> },
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Where a model file may come from.
#[derive(Clone, Debug, Default)]
pub struct ModelSource {
    /// Directory checked after the user cache (e.g. a `--models-dir` flag).
    pub bundled_dir: Option<PathBuf>,
    /// Download location used when the file is found nowhere locally.
    pub url: Option<String>,
}

/// Locates a model file by name, downloading it into the cache if needed.
///
/// Search order: user cache dir, `source.bundled_dir`, then `source.url`.
pub fn resolve(
    name: &str,
    source: &ModelSource,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    let cache_dir = model_cache_dir()?;
    resolve_in(&cache_dir, name, source, progress)
}

fn resolve_in(
    cache_dir: &Path,
    name: &str,
    source: &ModelSource,
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    let mut searched = vec![cache_dir.to_path_buf()];
    let cached_path = cache_dir.join(name);
    if cached_path.exists() {
        log::debug!("Model {name} found in cache");
        return Ok(cached_path);
    }

    if let Some(dir) = &source.bundled_dir {
        let bundled_path = dir.join(name);
        if bundled_path.exists() {
            log::debug!("Model {name} found in {}", dir.display());
            return Ok(bundled_path);
        }
        searched.push(dir.clone());
    }

    let Some(url) = &source.url else {
        return Err(ModelResolveError::NotFound {
            name: name.to_string(),
            searched,
        });
    };

    fs::create_dir_all(cache_dir).map_err(ModelResolveError::CacheDir)?;
    log::info!("Downloading {name} from {url}");
    download(url, &cached_path, progress)?;
    Ok(cached_path)
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/GazeGuard/models/`
/// - Linux: `$XDG_CACHE_HOME/GazeGuard/models/` or `~/.cache/GazeGuard/models/`
/// - Windows: `%LOCALAPPDATA%/GazeGuard/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    let base = dirs::data_dir();
    #[cfg(not(target_os = "macos"))]
    let base = dirs::cache_dir();

    base.map(|d| d.join(APP_DIR_NAME).join("models"))
        .ok_or(ModelResolveError::NoCacheDir)
}

fn download(url: &str, dest: &Path, progress: Option<ProgressFn>) -> Result<(), ModelResolveError> {
    let download_err = |source| ModelResolveError::Download {
        url: url.to_string(),
        source,
    };
    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(download_err)?;
    let total = response.content_length().unwrap_or(0);

    // Written next to the destination and renamed once complete
    let temp_path = dest.with_extension("part");
    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ModelResolveError::Write { path, source }
    };

    let result = (|| {
        let mut file = fs::File::create(&temp_path).map_err(write_err(&temp_path))?;
        let mut buf = vec![0u8; 1024 * 1024];
        let mut downloaded: u64 = 0;
        loop {
            let n = response.read(&mut buf).map_err(write_err(&temp_path))?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n]).map_err(write_err(&temp_path))?;
            downloaded += n as u64;
            if let Some(cb) = &progress {
                cb(downloaded, total);
            }
        }
        file.flush().map_err(write_err(&temp_path))?;
        fs::rename(&temp_path, dest).map_err(write_err(dest))
    })();

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_prefers_cached_file() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("cache");
        let bundled = tmp.path().join("bundled");
        fs::create_dir_all(&cache).unwrap();
        fs::create_dir_all(&bundled).unwrap();
        fs::write(cache.join("mesh.onnx"), b"cached").unwrap();
        fs::write(bundled.join("mesh.onnx"), b"bundled").unwrap();

        let source = ModelSource {
            bundled_dir: Some(bundled),
            url: None,
        };
        let path = resolve_in(&cache, "mesh.onnx", &source, None).unwrap();
        assert_eq!(path, cache.join("mesh.onnx"));
    }

    #[test]
    fn test_resolve_falls_back_to_bundled_dir() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("cache");
        let bundled = tmp.path().join("bundled");
        fs::create_dir_all(&bundled).unwrap();
        fs::write(bundled.join("mesh.onnx"), b"bundled").unwrap();

        let source = ModelSource {
            bundled_dir: Some(bundled.clone()),
            url: None,
        };
        let path = resolve_in(&cache, "mesh.onnx", &source, None).unwrap();
        assert_eq!(path, bundled.join("mesh.onnx"));
    }

    #[test]
    fn test_resolve_without_url_reports_searched_dirs() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("cache");
        let bundled = tmp.path().join("bundled");

        let source = ModelSource {
            bundled_dir: Some(bundled.clone()),
            url: None,
        };
        let err = resolve_in(&cache, "mesh.onnx", &source, None).unwrap_err();
        match err {
            ModelResolveError::NotFound { name, searched } => {
                assert_eq!(name, "mesh.onnx");
                assert_eq!(searched, vec![cache, bundled]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_not_found_message_says_how_to_supply_the_model() {
        let tmp = TempDir::new().unwrap();
        let err = resolve_in(tmp.path(), "face.onnx", &ModelSource::default(), None).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("face.onnx"));
        assert!(message.contains("copy the file into one of those directories"));
        assert!(message.contains("configure a URL"));
    }

    #[test]
    fn test_model_cache_dir_returns_path() {
        let path = model_cache_dir().unwrap();
        assert!(path.to_string_lossy().contains(APP_DIR_NAME));
        assert!(path.ends_with("models"));
    }

    #[test]
    fn test_download_invalid_url_leaves_no_partial_file() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("model.onnx");
        let result = download("http://invalid.nonexistent.example.com/model", &dest, None);
        assert!(result.is_err());
        assert!(!dest.exists());
        assert!(!dest.with_extension("part").exists());
    }
}
