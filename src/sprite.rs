//! Talking-character sprite: asset resolution, override import, and the
//! "which image is showing" state.
//!
//! Each [`CharacterSlot`] resolves to a user-uploaded override when one
//! exists in the user image area, otherwise to the bundled default.
//! Overrides are normalised on import: decoded, resized to
//! [`SPRITE_SIZE`]×[`SPRITE_SIZE`] and re-encoded as PNG with maximum
//! compression.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::imageops::FilterType;
use image::RgbaImage;
use thiserror::Error;

use crate::config::AppPaths;
use crate::playback::MouthState;

/// Edge length, in pixels, of a normalised sprite.
pub const SPRITE_SIZE: u32 = 300;

// ---------------------------------------------------------------------------
// AssetError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum AssetError {
    /// The file selected for upload does not exist.
    #[error("image not found: {0}")]
    NotFound(PathBuf),

    /// The file is not an image format we can decode.
    #[error("unsupported or corrupt image {path}: {reason}")]
    InvalidImage { path: PathBuf, reason: String },

    /// Writing the normalised copy failed.
    #[error("cannot store image: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// CharacterSlot
// ---------------------------------------------------------------------------

/// The two character images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterSlot {
    Closed,
    Open,
}

impl CharacterSlot {
    pub fn file_name(&self) -> &'static str {
        match self {
            CharacterSlot::Closed => "cl_char.png",
            CharacterSlot::Open => "op_char.png",
        }
    }
}

impl From<MouthState> for CharacterSlot {
    fn from(state: MouthState) -> Self {
        match state {
            MouthState::Closed => CharacterSlot::Closed,
            MouthState::Open => CharacterSlot::Open,
        }
    }
}

// ---------------------------------------------------------------------------
// CharacterAssets
// ---------------------------------------------------------------------------

/// Resolved paths of both character images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterAssets {
    pub closed: PathBuf,
    pub open: PathBuf,
}

impl CharacterAssets {
    /// Prefer the user override for each slot, falling back to the bundled file.
    pub fn resolve(paths: &AppPaths) -> Self {
        Self {
            closed: resolve_slot(paths, CharacterSlot::Closed),
            open: resolve_slot(paths, CharacterSlot::Open),
        }
    }

    pub fn path(&self, slot: CharacterSlot) -> &Path {
        match slot {
            CharacterSlot::Closed => &self.closed,
            CharacterSlot::Open => &self.open,
        }
    }
}

fn resolve_slot(paths: &AppPaths, slot: CharacterSlot) -> PathBuf {
    let user = paths.user_images_dir.join(slot.file_name());
    if user.is_file() {
        user
    } else {
        paths.bundled_images_dir().join(slot.file_name())
    }
}

/// Normalise `source` and store it as the override for `slot`.
///
/// On any failure the existing override (if any) is left untouched.
///
/// The widget itself has no upload screen; this is the entry point for an
/// external settings flow that copies user images into the override area.
pub fn import_override(
    paths: &AppPaths,
    source: &Path,
    slot: CharacterSlot,
) -> Result<PathBuf, AssetError> {
    if !source.is_file() {
        return Err(AssetError::NotFound(source.to_path_buf()));
    }

    let img = image::open(source).map_err(|e| AssetError::InvalidImage {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    let resized = img.resize_exact(SPRITE_SIZE, SPRITE_SIZE, FilterType::Lanczos3);

    std::fs::create_dir_all(&paths.user_images_dir)?;
    let target = paths.user_images_dir.join(slot.file_name());
    let tmp = target.with_extension("png.tmp");

    let rgba = resized.to_rgba8();
    let encoded = File::create(&tmp)
        .map_err(AssetError::from)
        .and_then(|file| encode_png(&rgba, file))
        .and_then(|file| file.sync_all().map_err(AssetError::from));

    let stored = encoded.and_then(|_| std::fs::rename(&tmp, &target).map_err(AssetError::from));
    if let Err(e) = stored {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }

    log::info!("Stored {:?} sprite override at {}", slot, target.display());
    Ok(target)
}

/// Encode `img` as PNG into `out`, surfacing the final flush error instead of
/// losing it in `BufWriter`'s drop.
fn encode_png<W: Write>(img: &RgbaImage, out: W) -> Result<W, AssetError> {
    let mut writer = BufWriter::new(out);
    let encoder =
        PngEncoder::new_with_quality(&mut writer, CompressionType::Best, PngFilter::Adaptive);
    img.write_with_encoder(encoder)
        .map_err(|e| AssetError::Io(std::io::Error::other(e)))?;
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| AssetError::Io(e.into_error()))
}

// ---------------------------------------------------------------------------
// SpriteView
// ---------------------------------------------------------------------------

/// Tracks which character image is currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteView {
    shown: CharacterSlot,
}

impl SpriteView {
    /// Starts on the closed-mouth image.
    pub fn new() -> Self {
        Self {
            shown: CharacterSlot::Closed,
        }
    }

    /// Apply a parity event; returns `true` when the image actually changed.
    pub fn on_parity(&mut self, state: MouthState) -> bool {
        let next = CharacterSlot::from(state);
        let changed = next != self.shown;
        self.shown = next;
        changed
    }

    pub fn shown(&self) -> CharacterSlot {
        self.shown
    }
}

impl Default for SpriteView {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
