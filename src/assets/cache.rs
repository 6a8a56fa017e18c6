use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use anyhow::Context;
use rayon::prelude::*;

use crate::assets::decode::{CachedImage, decode_image};
use crate::foundation::error::{TripReelError, TripReelResult};

/// Source of encoded image bytes for a resource URL.
pub trait ImageFetcher: Send + Sync {
    /// Fetch the raw encoded bytes behind `url`.
    fn fetch(&self, url: &str) -> TripReelResult<Vec<u8>>;
}

/// Fetches `file://` URLs and plain paths from the local filesystem.
///
/// Relative paths resolve against `root` when one is set.
#[derive(Clone, Debug, Default)]
pub struct FsFetcher {
    root: Option<PathBuf>,
}

impl FsFetcher {
    /// Fetcher resolving relative paths against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, url: &str) -> TripReelResult<PathBuf> {
        let raw = url.strip_prefix("file://").unwrap_or(url);
        if raw.contains("://") {
            return Err(TripReelError::validation(format!(
                "unsupported image url scheme: {url}"
            )));
        }
        let path = Path::new(raw);
        Ok(match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        })
    }
}

impl ImageFetcher for FsFetcher {
    fn fetch(&self, url: &str) -> TripReelResult<Vec<u8>> {
        let path = self.resolve(url)?;
        let bytes =
            std::fs::read(&path).with_context(|| format!("read image {}", path.display()))?;
        Ok(bytes)
    }
}

/// Where cache population work runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadMode {
    /// Fetch and decode on the rayon pool; callers see the entry on a later frame.
    #[default]
    Background,
    /// Fetch and decode on the requesting thread before returning.
    Inline,
}

/// Observable state of a single cache entry.
#[derive(Clone, Debug)]
pub enum ImageState {
    /// Never requested.
    Missing,
    /// Requested and not yet resolved.
    Loading,
    /// Decoded and drawable.
    Ready(Arc<CachedImage>),
    /// Fetch or decode failed; not retried.
    Failed,
}

#[derive(Clone)]
enum Slot {
    Loading,
    Ready(Arc<CachedImage>),
    Failed,
}

struct Inner {
    fetcher: Arc<dyn ImageFetcher>,
    mode: LoadMode,
    slots: RwLock<HashMap<String, Slot>>,
}

/// Lazily populated URL -> decoded image cache.
///
/// Entries are append-only: once a URL has a slot it is only ever moved from loading to ready or
/// failed, never removed or replaced. Cloning the cache shares the same entries.
#[derive(Clone)]
pub struct ImageCache {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("mode", &self.inner.mode)
            .field("entries", &self.len())
            .finish()
    }
}

impl ImageCache {
    /// Cache backed by `fetcher`, loading in `mode`.
    pub fn new(fetcher: Arc<dyn ImageFetcher>, mode: LoadMode) -> Self {
        Self {
            inner: Arc::new(Inner {
                fetcher,
                mode,
                slots: RwLock::new(HashMap::new()),
            }),
        }
    }

    /// Ready image for `url`, without triggering a load.
    pub fn get(&self, url: &str) -> Option<Arc<CachedImage>> {
        match self.read_slot(url) {
            Some(Slot::Ready(img)) => Some(img),
            _ => None,
        }
    }

    /// Current state of `url`.
    pub fn state(&self, url: &str) -> ImageState {
        match self.read_slot(url) {
            None => ImageState::Missing,
            Some(Slot::Loading) => ImageState::Loading,
            Some(Slot::Ready(img)) => ImageState::Ready(img),
            Some(Slot::Failed) => ImageState::Failed,
        }
    }

    /// Start loading `url` unless it already has an entry. Returns `true` when a load was started.
    pub fn request(&self, url: &str) -> bool {
        if !self.claim(url) {
            return false;
        }
        match self.inner.mode {
            LoadMode::Inline => load_into(&self.inner, url),
            LoadMode::Background => {
                let inner = Arc::clone(&self.inner);
                let url = url.to_owned();
                rayon::spawn(move || load_into(&inner, &url));
            }
        }
        true
    }

    /// Ready image for `url`, requesting a load on first reference.
    pub fn get_or_request(&self, url: &str) -> Option<Arc<CachedImage>> {
        if let Some(img) = self.get(url) {
            return Some(img);
        }
        self.request(url);
        self.get(url)
    }

    /// Load every unseen URL in parallel and block until all have resolved.
    pub fn preload<'a>(&self, urls: impl IntoIterator<Item = &'a str>) {
        let claimed: Vec<&str> = urls.into_iter().filter(|u| self.claim(u)).collect();
        claimed.par_iter().for_each(|url| load_into(&self.inner, url));
    }

    /// Number of entries in any state.
    pub fn len(&self) -> usize {
        self.inner
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// `true` when nothing has been requested yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_slot(&self, url: &str) -> Option<Slot> {
        self.inner
            .slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
    }

    fn claim(&self, url: &str) -> bool {
        let mut slots = self
            .inner
            .slots
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if slots.contains_key(url) {
            return false;
        }
        slots.insert(url.to_owned(), Slot::Loading);
        true
    }
}

fn load_into(inner: &Inner, url: &str) {
    let resolved = inner.fetcher.fetch(url).and_then(|bytes| decode_image(&bytes));
    let slot = match resolved {
        Ok(img) => {
            tracing::debug!(url, width = img.width(), height = img.height(), "image ready");
            Slot::Ready(Arc::new(img))
        }
        Err(err) => {
            tracing::warn!(url, error = %err, "image load failed");
            Slot::Failed
        }
    };

    let mut slots = inner.slots.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(existing) = slots.get_mut(url)
        && matches!(existing, Slot::Loading)
    {
        *existing = slot;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/cache.rs"]
mod tests;
