#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Asset registry shared by the simulation and rendering adapters.
//!
//! Assets are addressed by logical path. The [`AssetCache`] asks an
//! [`AssetProvider`] to load each path once and hands out stable
//! [`AssetHandle`] values. Failed loads yield [`AssetHandle::INVALID`] and are
//! retried on the next request.

use std::collections::HashMap;

use dungeon_crawler_core::{
    EnemyKind, ItemKind, TileKind, PLAYER_ANIMATIONS, PROJECTILE_ASSET, TORCH_ASSET,
};
use log::{debug, warn};
use thiserror::Error;

/// Opaque identifier of a loaded asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetHandle(u32);

impl AssetHandle {
    /// Handle returned when an asset could not be loaded.
    pub const INVALID: AssetHandle = AssetHandle(0);

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether the handle refers to a loaded asset.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.0 != 0
    }
}

/// Errors reported by asset providers.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Nothing exists at the requested path.
    #[error("asset `{path}` not found")]
    NotFound {
        /// Logical path that was requested.
        path: String,
    },
    /// The asset exists but could not be read or decoded.
    #[error("asset `{path}` could not be loaded: {reason}")]
    Unreadable {
        /// Logical path that was requested.
        path: String,
        /// Description of the underlying failure.
        reason: String,
    },
}

/// Backend that knows how to bring an asset into memory.
pub trait AssetProvider {
    /// Loads the asset stored at the logical `path`.
    fn load(&mut self, path: &str) -> Result<(), AssetError>;
}

/// Path-deduplicating registry of loaded assets.
#[derive(Debug)]
pub struct AssetCache<P> {
    provider: P,
    handles: HashMap<String, AssetHandle>,
    next_handle: u32,
}

impl<P: AssetProvider> AssetCache<P> {
    /// Creates an empty cache backed by `provider`.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            handles: HashMap::new(),
            next_handle: 1,
        }
    }

    /// Returns the handle for `path`, loading the asset on first use.
    pub fn request(&mut self, path: &str) -> AssetHandle {
        if let Some(handle) = self.handles.get(path) {
            return *handle;
        }

        match self.provider.load(path) {
            Ok(()) => {
                let handle = AssetHandle(self.next_handle);
                self.next_handle = self.next_handle.saturating_add(1);
                let _ = self.handles.insert(path.to_owned(), handle);
                debug!("loaded asset {path} as handle {}", handle.get());
                handle
            }
            Err(error) => {
                warn!("{error}");
                AssetHandle::INVALID
            }
        }
    }

    /// Requests every path and reports how many failed to load.
    pub fn preload<'a>(&mut self, paths: impl IntoIterator<Item = &'a str>) -> usize {
        paths
            .into_iter()
            .filter(|path| !self.request(path).is_valid())
            .count()
    }

    /// Handle of an already loaded asset, or [`AssetHandle::INVALID`].
    #[must_use]
    pub fn handle(&self, path: &str) -> AssetHandle {
        self.handles
            .get(path)
            .copied()
            .unwrap_or(AssetHandle::INVALID)
    }

    /// Number of assets loaded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Reports whether no asset has been loaded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Provides read-only access to the backing provider.
    #[must_use]
    pub fn provider(&self) -> &P {
        &self.provider
    }
}

/// Every logical asset path the game draws.
#[must_use]
pub fn catalog() -> Vec<&'static str> {
    let tiles = TileKind::ALL.into_iter().filter_map(TileKind::asset_path);
    let enemies = EnemyKind::ALL
        .into_iter()
        .flat_map(|kind| kind.animation_assets().iter().copied());
    let items = [
        ItemKind::GOLD,
        ItemKind::GEM,
        ItemKind::HEART,
        ItemKind::Potion,
        ItemKind::Key,
    ]
    .into_iter()
    .map(ItemKind::asset_path);

    tiles
        .chain(PLAYER_ANIMATIONS)
        .chain(enemies)
        .chain(items)
        .chain([TORCH_ASSET, PROJECTILE_ASSET])
        .collect()
}
