// ── Gallery tiles ──
//
// Each stored QR record is decoded once, when the list arrives, into a
// monochrome bitmap the terminal can draw. A record whose payload does not
// decode still gets a tile so its caption stays visible.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use qrdesk_api::{EntityId, QrRecord};
use thiserror::Error;
use tracing::warn;

pub const EMPTY_PLACEHOLDER: &str = "No QR codes available.";

/// Luma below this is a dark module.
const DARK_THRESHOLD: u8 = 128;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("payload is not a readable image: {0}")]
    Image(#[from] image::ImageError),
}

/// Monochrome pixel grid, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrBitmap {
    width: u32,
    height: u32,
    dark: Vec<bool>,
}

impl QrBitmap {
    /// Build a bitmap by evaluating `is_dark` at every pixel.
    pub fn from_fn(width: u32, height: u32, is_dark: impl Fn(u32, u32) -> bool) -> Self {
        let dark = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| is_dark(x, y))
            .collect();
        Self {
            width,
            height,
            dark,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Out-of-range coordinates read as light.
    pub fn is_dark(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = (y as usize) * (self.width as usize) + (x as usize);
        self.dark.get(idx).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
pub struct GalleryTile {
    pub id: EntityId,
    pub content: String,
    /// Decoded PNG size in bytes (0 when the payload is not base64).
    pub payload_len: usize,
    pub bitmap: Option<QrBitmap>,
}

impl GalleryTile {
    pub fn from_record(record: &QrRecord) -> Self {
        let (payload_len, bitmap) = match STANDARD.decode(record.qr_code_base64.trim()) {
            Ok(bytes) => {
                let bitmap = match rasterize(&bytes) {
                    Ok(bitmap) => Some(bitmap),
                    Err(e) => {
                        warn!(id = %record.id, error = %e, "cannot render QR code");
                        None
                    }
                };
                (bytes.len(), bitmap)
            }
            Err(e) => {
                warn!(id = %record.id, error = %e, "cannot decode QR code");
                (0, None)
            }
        };

        Self {
            id: record.id.clone(),
            content: record.content.clone(),
            payload_len,
            bitmap,
        }
    }
}

/// Tiles in backend order, one per record.
pub fn build_tiles(records: &[QrRecord]) -> Vec<GalleryTile> {
    records.iter().map(GalleryTile::from_record).collect()
}

/// Decode PNG bytes into a bitmap.
pub fn rasterize(png: &[u8]) -> Result<QrBitmap, GalleryError> {
    let img = image::load_from_memory(png)?.to_luma_alpha8();
    let (width, height) = img.dimensions();
    Ok(QrBitmap::from_fn(width, height, |x, y| {
        let [luma, alpha] = img.get_pixel(x, y).0;
        alpha >= DARK_THRESHOLD && luma < DARK_THRESHOLD
    }))
}
