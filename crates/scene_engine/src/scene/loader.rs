//! Scene description loader
//!
//! Loading is split in two halves so the caller stays in charge of when
//! results are applied:
//!
//! 1. [`SceneLoader::load`] returns a future. On a cache hit it is already
//!    resolved and no fetch happens; otherwise it fetches and parses.
//! 2. [`SceneLoader::finish`] takes the resolved result, stores fresh
//!    descriptions in the cache, and turns failures into a log record and
//!    `None`.

use std::rc::Rc;
use std::sync::Arc;

use futures::future::{self, FutureExt, LocalBoxFuture};
use thiserror::Error;

use crate::assets::{AssetError, AssetSource};
use crate::core::AssetConfig;
use crate::scene::{ConfigCache, SceneDescription};

/// Scene description load errors
#[derive(Error, Debug)]
pub enum LoadError {
    /// The document could not be fetched
    #[error("fetch failed: {0}")]
    Fetch(#[from] AssetError),

    /// The document is not a valid scene description
    #[error("parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Outcome of a successful load
#[derive(Debug)]
pub enum Fetched {
    /// Served from the cache without I/O
    Cached(Arc<SceneDescription>),
    /// Freshly fetched and parsed, not yet cached
    Fresh(SceneDescription),
}

/// In-flight scene description load
pub type SceneLoad = LocalBoxFuture<'static, Result<Fetched, LoadError>>;

/// Fetches scene descriptions by name and memoizes them
pub struct SceneLoader {
    source: Rc<dyn AssetSource>,
    assets: AssetConfig,
    cache: ConfigCache,
}

impl SceneLoader {
    /// Create a loader reading from `source`
    pub fn new(source: Rc<dyn AssetSource>, assets: AssetConfig) -> Self {
        Self { source, assets, cache: ConfigCache::new() }
    }

    /// Begin loading the description for `name`
    pub fn load(&self, name: &str) -> SceneLoad {
        if let Some(cached) = self.cache.get(name) {
            log::info!("Using cached scene '{}'", name);
            return future::ready(Ok(Fetched::Cached(cached))).boxed_local();
        }

        let path = self.assets.scene_path(name);
        log::debug!("Fetching scene '{}' from {}", name, path);
        let fetch = self.source.fetch_text(&path);
        async move {
            let text = fetch.await?;
            let description = SceneDescription::from_json(&text)?;
            Ok(Fetched::Fresh(description))
        }
        .boxed_local()
    }

    /// Settle a resolved load
    ///
    /// Fresh descriptions are cached (an entry cached in the meantime wins).
    /// Failures are logged and yield `None`; nothing is cached for them.
    pub fn finish(&mut self, name: &str, result: Result<Fetched, LoadError>) -> Option<Arc<SceneDescription>> {
        match result {
            Ok(Fetched::Cached(description)) => Some(description),
            Ok(Fetched::Fresh(description)) => {
                log::info!("Loaded scene '{}'", name);
                Some(self.cache.insert(name, description))
            }
            Err(e) => {
                log::error!("Failed to load scene '{}': {}", name, e);
                None
            }
        }
    }

    /// Asset source shared with model loading
    pub fn source(&self) -> Rc<dyn AssetSource> {
        Rc::clone(&self.source)
    }

    /// Descriptions parsed so far
    pub fn cache(&self) -> &ConfigCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualAssetSource;
    use futures::executor::block_on;

    fn loader() -> (SceneLoader, ManualAssetSource) {
        let source = ManualAssetSource::new();
        let loader = SceneLoader::new(Rc::new(source.clone()), AssetConfig::default());
        (loader, source)
    }

    #[test]
    fn test_second_load_is_served_from_cache() {
        let (mut loader, source) = loader();

        let pending = loader.load("box");
        source.complete("scenes/box.json", r#"{ "lights": [] }"#);
        let first = loader.finish("box", block_on(pending)).unwrap();

        let result = block_on(loader.load("box"));
        assert!(matches!(result, Ok(Fetched::Cached(_))));
        let second = loader.finish("box", result).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(source.fetch_count("scenes/box.json"), 1);
    }

    #[test]
    fn test_parse_failure_is_not_cached() {
        let (mut loader, source) = loader();

        let pending = loader.load("broken");
        source.complete("scenes/broken.json", "{ nope");
        let result = block_on(pending);
        assert!(matches!(result, Err(LoadError::Parse(_))));
        assert!(loader.finish("broken", result).is_none());
        assert!(!loader.cache().contains("broken"));

        // A retry goes back to the source
        let _retry = loader.load("broken");
        assert_eq!(source.fetch_count("scenes/broken.json"), 2);
    }

    #[test]
    fn test_fetch_failure_reports_error() {
        let (mut loader, source) = loader();

        let pending = loader.load("missing");
        source.fail("scenes/missing.json");
        let result = block_on(pending);
        assert!(matches!(result, Err(LoadError::Fetch(AssetError::NotFound(_)))));
        assert!(loader.finish("missing", result).is_none());
    }
}
