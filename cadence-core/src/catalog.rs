use std::{
    collections::HashMap,
    path::Path,
    sync::Arc,
};

use anyhow::Context;
use lofty::{
    file::{AudioFile, TaggedFileExt},
    probe::Probe,
    tag::Accessor,
};

use crate::{
    browser,
    track::{Track, TrackId},
};

/// Where tracks come from. The player only ever sees the resolved `Track`s.
pub trait TrackCatalog {
    fn fetch(&self, id: &TrackId) -> Option<Arc<Track>>;

    /// Every known track, in import order
    fn tracks(&self) -> Vec<Arc<Track>>;
}

/// Catalog of local audio files. A file's id is its canonical path, so the
/// same file imported twice resolves to the same track.
#[derive(Debug, Default)]
pub struct LocalLibrary {
    tracks: Vec<Arc<Track>>,
    by_id: HashMap<TrackId, usize>,
}

impl LocalLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Import one file, reading its tags. Returns the existing track when the
    /// file is already known.
    pub fn import(&mut self, path: &Path) -> anyhow::Result<Arc<Track>> {
        let canonical = path
            .canonicalize()
            .with_context(|| format!("Cannot resolve {}", path.display()))?;
        if canonical.is_dir() {
            anyhow::bail!("{} is a directory", canonical.display());
        }

        let id = TrackId::new(canonical.to_string_lossy());
        if let Some(&index) = self.by_id.get(&id) {
            return Ok(Arc::clone(&self.tracks[index]));
        }

        let track = read_track(&canonical, id.clone())?;
        log::debug!("Imported {}", track);
        self.by_id.insert(id, self.tracks.len());
        self.tracks.push(Arc::clone(&track));
        Ok(track)
    }

    /// Import files and directories (one level deep), skipping what fails
    pub fn import_paths<P: AsRef<Path>>(&mut self, paths: &[P]) -> Vec<Arc<Track>> {
        let mut imported = Vec::new();
        for path in paths {
            let path = path.as_ref();
            if path.is_dir() {
                match browser::audio_files_in(path) {
                    Ok(files) => {
                        for file in files {
                            self.import_logged(&file, &mut imported);
                        }
                    }
                    Err(e) => log::warn!("Cannot list {}: {}", path.display(), e),
                }
            } else {
                self.import_logged(path, &mut imported);
            }
        }
        imported
    }

    fn import_logged(&mut self, path: &Path, imported: &mut Vec<Arc<Track>>) {
        match self.import(path) {
            Ok(track) => imported.push(track),
            Err(e) => log::warn!("Skipping {}: {:#}", path.display(), e),
        }
    }
}

impl TrackCatalog for LocalLibrary {
    fn fetch(&self, id: &TrackId) -> Option<Arc<Track>> {
        self.by_id.get(id).map(|&index| Arc::clone(&self.tracks[index]))
    }

    fn tracks(&self) -> Vec<Arc<Track>> {
        self.tracks.clone()
    }
}

/// Build a track from a file's tags, falling back to the file name for the
/// title when there are none.
fn read_track(path: &Path, id: TrackId) -> anyhow::Result<Arc<Track>> {
    let mut builder = Track::builder(id, path.to_string_lossy());

    match Probe::open(path).and_then(|p| p.read()) {
        Ok(tagged_file) => {
            let duration = tagged_file.properties().duration().as_secs_f32();
            if duration > 0.0 {
                builder = builder.duration_secs(duration);
            }
            if let Some(tag) = tagged_file.primary_tag() {
                if let Some(title) = tag.title() {
                    builder = builder.title(title.to_string());
                }
                if let Some(artist) = tag.artist() {
                    builder = builder.artist(artist.to_string());
                }
            }
        }
        Err(e) => log::warn!("Failed to read tags of {}: {}", path.display(), e),
    }

    if !builder.has_title() {
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            builder = builder.title(stem);
        }
    }

    Ok(builder.build_shared()?)
}
