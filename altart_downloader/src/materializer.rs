//! Writes alt-art card images into a session directory
//!
//! For each card a full-size JPEG and a thumbnail are stored under
//! `<data_dir>/<session_id>/<set_code>/`. Existing files are overwritten.

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageError, ImageFormat};
use optcg_common::{is_safe_component, CardPaths, CardRecord, DeckError, Result, SessionLayout};
use std::path::Path;

/// Thumbnail bounding box
pub const THUMBNAIL_MAX_WIDTH: u32 = 120;
pub const THUMBNAIL_MAX_HEIGHT: u32 = 167;

/// Source of raw image bytes
pub trait ImageSource {
    fn fetch_image(&self, url: &str) -> Result<Vec<u8>>;
}

/// Why a card produced no files
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Non-success status or transport failure while downloading
    DownloadFailed(String),
    /// Downloaded bytes are not a decodable image
    Undecodable(String),
    /// Card number cannot be used as a file or directory name
    UnsafeCardNumber(String),
}

/// Result of materializing one card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardOutcome {
    Saved(CardPaths),
    Skipped(SkipReason),
}

impl CardOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, CardOutcome::Saved(_))
    }
}

pub struct AssetMaterializer<'a, S: ImageSource> {
    layout: &'a SessionLayout,
    images: &'a S,
}

impl<'a, S: ImageSource> AssetMaterializer<'a, S> {
    pub fn new(layout: &'a SessionLayout, images: &'a S) -> Self {
        Self { layout, images }
    }

    /// Download a card's image and store it with its thumbnail
    ///
    /// Unsafe card numbers, download failures and decode failures are
    /// reported as [`CardOutcome::Skipped`]; only failures to write into the
    /// session directory are errors.
    pub fn materialize(&self, session_id: &str, card: &CardRecord) -> Result<CardOutcome> {
        let set_code = card.set_code();
        if !is_safe_component(set_code) || !is_safe_component(&card.card_number) {
            log::warn!("Skipping {:?}: unusable as a file name", card.card_number);
            return Ok(CardOutcome::Skipped(SkipReason::UnsafeCardNumber(
                card.card_number.clone(),
            )));
        }

        std::fs::create_dir_all(self.layout.session_dir(session_id))?;
        std::fs::create_dir_all(self.layout.set_dir(session_id, set_code))?;

        let bytes = match self.images.fetch_image(&card.image_url) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Skipping {}: download failed: {}", card.card_number, e);
                return Ok(CardOutcome::Skipped(SkipReason::DownloadFailed(
                    e.to_string(),
                )));
            }
        };

        let decoded = match image::load_from_memory(&bytes) {
            Ok(img) => img,
            Err(e) => {
                log::warn!("Skipping {}: cannot decode image: {}", card.card_number, e);
                return Ok(CardOutcome::Skipped(SkipReason::Undecodable(e.to_string())));
            }
        };

        let paths = self
            .layout
            .card_paths(session_id, set_code, &card.card_number);

        let rgb = DynamicImage::ImageRgb8(decoded.to_rgb8());
        write_jpeg(&rgb, &paths.full)?;
        write_jpeg(&make_thumbnail(&rgb), &paths.thumbnail)?;

        log::debug!(
            "Saved {} ({}x{}) to {}",
            card.card_number,
            rgb.width(),
            rgb.height(),
            paths.full.display()
        );

        Ok(CardOutcome::Saved(paths))
    }
}

/// Shrink to fit the thumbnail box, keeping the aspect ratio. Images that
/// already fit are kept as they are.
pub fn make_thumbnail(img: &DynamicImage) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width <= THUMBNAIL_MAX_WIDTH && height <= THUMBNAIL_MAX_HEIGHT {
        return img.clone();
    }
    img.resize(
        THUMBNAIL_MAX_WIDTH,
        THUMBNAIL_MAX_HEIGHT,
        FilterType::Lanczos3,
    )
}

fn write_jpeg(img: &DynamicImage, path: &Path) -> Result<()> {
    img.save_with_format(path, ImageFormat::Jpeg)
        .map_err(|e| match e {
            ImageError::IoError(io) => DeckError::Io(io),
            other => DeckError::Image(other.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::cell::Cell;
    use std::collections::HashMap;
    use std::io::Cursor;
    use tempfile::TempDir;

    /// In-memory image host
    #[derive(Default)]
    struct FakeImages {
        files: HashMap<String, Vec<u8>>,
        requests: Cell<usize>,
    }

    impl FakeImages {
        fn with(mut self, url: &str, bytes: Vec<u8>) -> Self {
            self.files.insert(url.to_string(), bytes);
            self
        }
    }

    impl ImageSource for FakeImages {
        fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
            self.requests.set(self.requests.get() + 1);
            self.files
                .get(url)
                .cloned()
                .ok_or(DeckError::HttpStatus(reqwest::StatusCode::NOT_FOUND))
        }
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 30, 30, 128]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_materialize_writes_full_and_thumbnail() {
        let temp_dir = TempDir::new().unwrap();
        let layout = SessionLayout::new(temp_dir.path());
        let url = "https://cdn/OP01-001_p1.png";
        let images = FakeImages::default().with(url, png_bytes(600, 838));
        let materializer = AssetMaterializer::new(&layout, &images);

        let card = CardRecord::new("OP01-001_p1", url);
        let outcome = materializer.materialize("s1", &card).unwrap();

        let paths = layout.card_paths("s1", "OP01", "OP01-001_p1");
        assert_eq!(outcome, CardOutcome::Saved(paths.clone()));

        let full = image::open(&paths.full).unwrap();
        assert_eq!(full.dimensions(), (600, 838));
        assert_eq!(full.color(), image::ColorType::Rgb8);

        let thumb = image::open(&paths.thumbnail).unwrap();
        let (w, h) = thumb.dimensions();
        assert!(w <= THUMBNAIL_MAX_WIDTH && h <= THUMBNAIL_MAX_HEIGHT);
        assert!(w == THUMBNAIL_MAX_WIDTH || h == THUMBNAIL_MAX_HEIGHT);
        assert_eq!(thumb.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn test_download_failure_is_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let layout = SessionLayout::new(temp_dir.path());
        let images = FakeImages::default();
        let materializer = AssetMaterializer::new(&layout, &images);

        let card = CardRecord::new("OP02-010", "https://cdn/missing.png");
        let outcome = materializer.materialize("s1", &card).unwrap();

        assert!(matches!(
            outcome,
            CardOutcome::Skipped(SkipReason::DownloadFailed(_))
        ));
        // Directories are created before the download is attempted
        assert!(layout.set_dir("s1", "OP02").is_dir());
        let paths = layout.card_paths("s1", "OP02", "OP02-010");
        assert!(!paths.full.exists());
        assert!(!paths.thumbnail.exists());
    }

    #[test]
    fn test_undecodable_bytes_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let layout = SessionLayout::new(temp_dir.path());
        let url = "https://cdn/OP03-001_p1.png";
        let images = FakeImages::default().with(url, b"<html>not an image</html>".to_vec());
        let materializer = AssetMaterializer::new(&layout, &images);

        let outcome = materializer
            .materialize("s1", &CardRecord::new("OP03-001", url))
            .unwrap();

        assert!(matches!(
            outcome,
            CardOutcome::Skipped(SkipReason::Undecodable(_))
        ));
        assert!(!outcome.is_saved());
    }

    #[test]
    fn test_rematerialize_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let layout = SessionLayout::new(temp_dir.path());
        let url = "https://cdn/ST01-001_p1.png";
        let card = CardRecord::new("ST01-001", url);

        let first = FakeImages::default().with(url, png_bytes(300, 419));
        AssetMaterializer::new(&layout, &first)
            .materialize("s1", &card)
            .unwrap();

        let second = FakeImages::default().with(url, png_bytes(200, 280));
        AssetMaterializer::new(&layout, &second)
            .materialize("s1", &card)
            .unwrap();

        let paths = layout.card_paths("s1", "ST01", "ST01-001");
        assert_eq!(image::open(&paths.full).unwrap().dimensions(), (200, 280));

        let files: Vec<_> = std::fs::read_dir(layout.set_dir("s1", "ST01"))
            .unwrap()
            .collect();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_unsafe_card_numbers_are_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let layout = SessionLayout::new(temp_dir.path().join("data"));
        let mut images = FakeImages::default();
        for card_number in ["..-001", "OP01-001/x", "OP01-0\\01", ""] {
            let url = format!("https://cdn/{}_p1.png", card_number);
            images = images.with(&url, png_bytes(60, 80));
        }
        let materializer = AssetMaterializer::new(&layout, &images);

        for card_number in ["..-001", "OP01-001/x", "OP01-0\\01", ""] {
            let card = CardRecord::new(card_number, format!("https://cdn/{}_p1.png", card_number));
            let outcome = materializer.materialize("s1", &card).unwrap();
            assert_eq!(
                outcome,
                CardOutcome::Skipped(SkipReason::UnsafeCardNumber(card_number.to_string()))
            );
        }

        // Nothing is downloaded or written, not even the session directory
        assert_eq!(images.requests.get(), 0);
        assert!(!layout.session_dir("s1").exists());
        assert!(!temp_dir.path().join("data").join("..-001.jpg").exists());
        assert!(!temp_dir.path().join("..-001.jpg").exists());
    }

    #[test]
    fn test_thumbnail_preserves_aspect_ratio() {
        let wide = DynamicImage::new_rgb8(1000, 500);
        let thumb = make_thumbnail(&wide);
        assert_eq!(thumb.dimensions(), (120, 60));

        let tall = DynamicImage::new_rgb8(300, 1670);
        let thumb = make_thumbnail(&tall);
        assert_eq!(thumb.dimensions(), (30, 167));
    }

    #[test]
    fn test_thumbnail_never_enlarges() {
        let small = DynamicImage::new_rgb8(60, 80);
        assert_eq!(make_thumbnail(&small).dimensions(), (60, 80));

        let exact = DynamicImage::new_rgb8(120, 167);
        assert_eq!(make_thumbnail(&exact).dimensions(), (120, 167));
    }

    #[test]
    fn test_single_download_per_card() {
        let temp_dir = TempDir::new().unwrap();
        let layout = SessionLayout::new(temp_dir.path());
        let url = "https://cdn/OP04-001_p1.png";
        let images = FakeImages::default().with(url, png_bytes(120, 167));

        AssetMaterializer::new(&layout, &images)
            .materialize("s1", &CardRecord::new("OP04-001", url))
            .unwrap();

        assert_eq!(images.requests.get(), 1);
    }
}
