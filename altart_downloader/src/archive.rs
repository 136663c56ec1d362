//! Zip packaging of a session's card images
//!
//! The archive holds every set directory of the session plus the helper
//! script that copies the images into the simulator's card folder.

use optcg_common::{validate_session_id, DeckError, Result, SessionLayout};
use std::fs::File;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Default name of the helper script shipped in every archive
pub const HELPER_SCRIPT_NAME: &str = "copy-to-optcgsim.sh";

/// Name prefix of the per-call staging directories
pub const STAGING_PREFIX: &str = "altart-staging-";

pub struct SessionArchiver {
    layout: SessionLayout,
    helper_script: PathBuf,
    staging_root: Option<PathBuf>,
}

impl SessionArchiver {
    pub fn new(layout: SessionLayout, helper_script: impl Into<PathBuf>) -> Self {
        Self {
            layout,
            helper_script: helper_script.into(),
            staging_root: None,
        }
    }

    /// Stage under `dir` instead of the data directory
    ///
    /// Must be on the same filesystem as the data directory, since the
    /// finished archive is renamed into place.
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_root = Some(dir.into());
        self
    }

    fn staging_root(&self) -> &Path {
        self.staging_root
            .as_deref()
            .unwrap_or_else(|| self.layout.data_dir())
    }

    /// Build `<data_dir>/<session_id>.zip` from the current session files
    ///
    /// The archive is rebuilt from scratch on every call and only replaces
    /// the previous one once it is complete.
    pub fn archive(&self, session_id: &str) -> Result<PathBuf> {
        validate_session_id(session_id)?;

        let session_dir = self.layout.session_dir(session_id);
        if !session_dir.is_dir() {
            return Err(DeckError::SessionNotFound(session_id.to_string()));
        }

        // Removed on drop, whichever way this function returns
        let staging = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(self.staging_root())?;
        let content = staging.path().join("content");
        std::fs::create_dir(&content)?;

        for entry in std::fs::read_dir(&session_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                copy_dir_all(&entry.path(), &content.join(entry.file_name()))?;
            }
        }

        if self.helper_script.is_file() {
            let name = self
                .helper_script
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(HELPER_SCRIPT_NAME));
            std::fs::copy(&self.helper_script, content.join(name))?;
        } else {
            log::debug!(
                "Helper script {} not found, archiving images only",
                self.helper_script.display()
            );
        }

        let pending = staging.path().join("archive.zip");
        let entries = write_zip(&content, &pending)?;

        let archive_path = self.layout.archive_path(session_id);
        std::fs::rename(&pending, &archive_path)?;

        log::info!(
            "Session {}: wrote {} ({} entries)",
            session_id,
            archive_path.display(),
            entries
        );

        Ok(archive_path)
    }
}

fn copy_dir_all(src: &Path, dst: &Path) -> Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry.map_err(walkdir_error)?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| DeckError::Archive(e.to_string()))?;
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Zip everything under `root` into `out`, returning the number of entries
fn write_zip(root: &Path, out: &Path) -> Result<usize> {
    let file = File::create(out)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut count = 0;

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(walkdir_error)?;
        let name = zip_entry_name(root, entry.path())?;

        if entry.file_type().is_dir() {
            zip.add_directory(format!("{}/", name), options)
                .map_err(zip_error)?;
        } else {
            let permissions = if name.ends_with(".sh") { 0o755 } else { 0o644 };
            zip.start_file(name, options.unix_permissions(permissions))
                .map_err(zip_error)?;
            let mut source = File::open(entry.path())?;
            std::io::copy(&mut source, &mut zip)?;
        }
        count += 1;
    }

    zip.finish().map_err(zip_error)?;
    Ok(count)
}

/// Archive entry name with `/` separators regardless of platform
fn zip_entry_name(root: &Path, path: &Path) -> Result<String> {
    let rel = path
        .strip_prefix(root)
        .map_err(|e| DeckError::Archive(e.to_string()))?;
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Ok(parts.join("/"))
}

fn zip_error(err: zip::result::ZipError) -> DeckError {
    match err {
        zip::result::ZipError::Io(io) => DeckError::Io(io),
        other => DeckError::Archive(other.to_string()),
    }
}

fn walkdir_error(err: walkdir::Error) -> DeckError {
    match err.into_io_error() {
        Some(io) => DeckError::Io(io),
        None => DeckError::Archive("filesystem loop while walking session".to_string()),
    }
}
