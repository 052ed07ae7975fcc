//! Asset provider backed by a directory on disk.

use std::{fs, io::ErrorKind, path::PathBuf};

use dungeon_crawler_assets::{AssetError, AssetProvider};

/// Reads assets relative to a root directory and tracks the bytes read.
#[derive(Debug)]
pub(crate) struct DirectoryProvider {
    root: PathBuf,
    bytes_loaded: u64,
}

impl DirectoryProvider {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            bytes_loaded: 0,
        }
    }

    pub(crate) fn bytes_loaded(&self) -> u64 {
        self.bytes_loaded
    }
}

impl AssetProvider for DirectoryProvider {
    fn load(&mut self, path: &str) -> Result<(), AssetError> {
        match fs::read(self.root.join(path)) {
            Ok(bytes) => {
                self.bytes_loaded += bytes.len() as u64;
                Ok(())
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Err(AssetError::NotFound {
                path: path.to_owned(),
            }),
            Err(error) => Err(AssetError::Unreadable {
                path: path.to_owned(),
                reason: error.to_string(),
            }),
        }
    }
}
