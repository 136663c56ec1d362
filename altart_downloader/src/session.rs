//! Session directories: creation and thumbnail listing

use optcg_common::layout::THUMBNAIL_SUFFIX;
use optcg_common::{validate_session_id, DeckError, Result, SessionLayout};
use uuid::Uuid;
use walkdir::WalkDir;

/// Create a fresh session directory and return its ID
pub fn create_session(layout: &SessionLayout) -> Result<String> {
    let session_id = Uuid::new_v4().to_string();
    std::fs::create_dir_all(layout.session_dir(&session_id))?;
    log::info!("Created session {}", session_id);
    Ok(session_id)
}

/// Thumbnail paths relative to the session directory, `/`-separated and sorted
pub fn list_images(layout: &SessionLayout, session_id: &str) -> Result<Vec<String>> {
    validate_session_id(session_id)?;

    let session_dir = layout.session_dir(session_id);
    if !session_dir.is_dir() {
        return Err(DeckError::SessionNotFound(session_id.to_string()));
    }

    let mut images: Vec<String> = WalkDir::new(&session_dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .ends_with(THUMBNAIL_SUFFIX)
        })
        .filter_map(|entry| {
            let rel = entry.path().strip_prefix(&session_dir).ok()?;
            let parts: Vec<String> = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            Some(parts.join("/"))
        })
        .collect();

    images.sort();
    Ok(images)
}
