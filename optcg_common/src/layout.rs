//! On-disk layout of session assets
//!
//! ```text
//! <data_dir>/<session_id>/<set_code>/<card_number>.jpg
//! <data_dir>/<session_id>/<set_code>/<card_number>_small.jpg
//! <data_dir>/<session_id>.zip
//! ```
//!
//! Every path is a pure function of its inputs; nothing here touches the
//! filesystem.

use crate::error::{DeckError, Result};
use std::path::{Path, PathBuf};

/// File name suffix of thumbnails
pub const THUMBNAIL_SUFFIX: &str = "_small.jpg";

/// File name suffix of full-size images
pub const FULL_IMAGE_SUFFIX: &str = ".jpg";

/// Full-size and thumbnail paths for one card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPaths {
    pub full: PathBuf,
    pub thumbnail: PathBuf,
}

/// Root of all session directories
#[derive(Debug, Clone)]
pub struct SessionLayout {
    data_dir: PathBuf,
}

impl SessionLayout {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn session_dir(&self, session_id: &str) -> PathBuf {
        self.data_dir.join(session_id)
    }

    pub fn set_dir(&self, session_id: &str, set_code: &str) -> PathBuf {
        self.session_dir(session_id).join(set_code)
    }

    pub fn card_paths(&self, session_id: &str, set_code: &str, card_number: &str) -> CardPaths {
        let dir = self.set_dir(session_id, set_code);
        CardPaths {
            full: dir.join(full_image_file_name(card_number)),
            thumbnail: dir.join(thumbnail_file_name(card_number)),
        }
    }

    /// Archive sits next to the session directory, never inside it
    pub fn archive_path(&self, session_id: &str) -> PathBuf {
        self.data_dir.join(format!("{}.zip", session_id))
    }
}

pub fn full_image_file_name(card_number: &str) -> String {
    format!("{}{}", card_number, FULL_IMAGE_SUFFIX)
}

pub fn thumbnail_file_name(card_number: &str) -> String {
    format!("{}{}", card_number, THUMBNAIL_SUFFIX)
}

/// True if `name` can be joined onto a directory without leaving it
pub fn is_safe_component(name: &str) -> bool {
    !(name.is_empty()
        || name == "."
        || name.contains("..")
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0'))
}

/// Reject session IDs that would escape or collapse the data directory
pub fn validate_session_id(session_id: &str) -> Result<()> {
    if !is_safe_component(session_id) {
        return Err(DeckError::InvalidSessionId(session_id.to_string()));
    }
    Ok(())
}
