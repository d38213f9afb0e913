//! Asset fetching and model file formats
//!
//! Scene descriptions and model files are fetched as text through an
//! [`AssetSource`]. Fetches never block the frame loop: the returned future
//! is polled by the scene manager on each tick and resolves once the data is
//! available.

pub mod obj_loader;
pub mod materials;

pub use obj_loader::{ObjLoader, ObjModel, ObjObject, ObjGroup, ObjError};
pub use materials::{MtlParser, MtlData, MtlError};

use std::path::{Path, PathBuf};

use futures::channel::oneshot;
use futures::future::{self, FutureExt, LocalBoxFuture};
use thiserror::Error;

/// Future resolving to the text contents of an asset
pub type AssetFuture = LocalBoxFuture<'static, Result<String, AssetError>>;

/// Source of text assets addressed by relative path
pub trait AssetSource {
    /// Begin fetching the asset at `path`
    fn fetch_text(&self, path: &str) -> AssetFuture;
}

/// Filesystem-backed asset source
///
/// Each fetch reads the file on a short-lived worker thread and hands the
/// result back through a oneshot channel, so the caller only ever polls.
pub struct FsAssetSource {
    root: PathBuf,
}

impl FsAssetSource {
    /// Create a source rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Base directory of this source
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetSource for FsAssetSource {
    fn fetch_text(&self, path: &str) -> AssetFuture {
        let full_path = self.root.join(path);
        let request = path.to_string();
        let (sender, receiver) = oneshot::channel();

        let spawned = std::thread::Builder::new()
            .name("asset-fetch".to_string())
            .spawn(move || {
                let result = std::fs::read_to_string(&full_path)
                    .map_err(|e| AssetError::from_io(&full_path, e));
                // Receiver is gone if the load was abandoned
                let _ = sender.send(result);
            });

        if let Err(e) = spawned {
            return future::ready(Err(AssetError::Io { path: request, source: e })).boxed_local();
        }

        async move {
            receiver
                .await
                .unwrap_or_else(|_| Err(AssetError::Cancelled(request)))
        }
        .boxed_local()
    }
}

/// Asset fetch errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Asset not found
    #[error("Asset not found: {0}")]
    NotFound(String),

    /// IO error during asset loading
    #[error("IO error reading {path}: {source}")]
    Io {
        /// Path that failed
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The fetch was dropped before producing a result
    #[error("Fetch cancelled: {0}")]
    Cancelled(String),
}

impl AssetError {
    fn from_io(path: &Path, error: std::io::Error) -> Self {
        if error.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path.display().to_string())
        } else {
            Self::Io { path: path.display().to_string(), source: error }
        }
    }
}
