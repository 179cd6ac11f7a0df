//! Media catalog: the owned store of probed assets the compiler reads from.
//!
//! The catalog is created by the caller and passed by reference into the
//! compiler and the exporter; nothing in the library keeps a global copy.

use crate::error::CoreResult;
use crate::external::MediaProber;
use crate::timeline::{FileId, MediaAsset};

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct MediaCatalog {
    assets: BTreeMap<FileId, MediaAsset>,
}

impl MediaCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (or replaces) an asset under its own id.
    pub fn insert(&mut self, asset: MediaAsset) -> FileId {
        let id = asset.id.clone();
        self.assets.insert(id.clone(), asset);
        id
    }

    #[must_use]
    pub fn get(&self, id: &FileId) -> Option<&MediaAsset> {
        self.assets.get(id)
    }

    #[must_use]
    pub fn contains(&self, id: &FileId) -> bool {
        self.assets.contains_key(id)
    }

    pub fn remove(&mut self, id: &FileId) -> Option<MediaAsset> {
        self.assets.remove(id)
    }

    /// Assets in id order.
    pub fn iter(&self) -> impl Iterator<Item = &MediaAsset> {
        self.assets.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Probes `path` and records the result under its absolute storage path.
    ///
    /// Different spellings of the same file share one id, and re-ingesting a
    /// file replaces the earlier record.
    pub fn ingest<P: MediaProber + ?Sized>(
        &mut self,
        prober: &P,
        path: &Path,
    ) -> CoreResult<&MediaAsset> {
        let path = storage_path(path)?;
        let path = path.as_path();
        let probed = prober.probe(path)?;
        let id = FileId::from_path(path);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        log::info!(
            "Ingested {} as {} ({:.3}s, video={}, audio={}, {}x{})",
            name,
            id,
            probed.duration,
            probed.has_video,
            probed.has_audio,
            probed.width,
            probed.height
        );

        let asset = MediaAsset {
            id: id.clone(),
            path: path.to_path_buf(),
            name,
            // Durations are kept to the millisecond.
            duration: (probed.duration * 1000.0).round() / 1000.0,
            has_video: probed.has_video,
            has_audio: probed.has_audio,
            width: probed.width,
            height: probed.height,
        };
        self.assets.insert(id.clone(), asset);
        Ok(&self.assets[&id])
    }
}

/// Absolute form of `path`: symlinks and `..` are resolved when the file
/// exists, otherwise the path is made absolute against the working directory.
fn storage_path(path: &Path) -> CoreResult<PathBuf> {
    match fs::canonicalize(path) {
        Ok(canonical) => Ok(canonical),
        Err(_) => Ok(std::path::absolute(path)?),
    }
}

impl FromIterator<MediaAsset> for MediaCatalog {
    fn from_iter<I: IntoIterator<Item = MediaAsset>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for asset in iter {
            catalog.insert(asset);
        }
        catalog
    }
}
