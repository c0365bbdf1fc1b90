// spotvault - core/sniff.rs
//
// Image format classification by magic bytes.
// Core layer: pure functions over a byte slice, no filesystem access —
// the file-reading wrapper lives in platform::fs.
//
// The cache stores images with opaque hash names and no extensions, so the
// leading bytes are the only reliable type signal. Sixteen bytes cover every
// signature below.

use crate::core::model::ImageKind;

/// Classify a file header by its magic bytes.
///
/// `header` is the first bytes of the file; callers normally pass
/// `HEADER_SNIFF_BYTES` (16) bytes but shorter slices are handled — each
/// signature check verifies its own length requirement.
///
/// Returns `ImageKind::Unknown` when no signature matches.
pub fn classify(header: &[u8]) -> ImageKind {
    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if header.len() >= 8 && header[..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
        return ImageKind::Png;
    }

    // JPEG: FF D8 FF start-of-image, optionally confirmed by an APP0/APP1
    // identifier ("JFIF", "Exif") at offset 6.
    if header.len() >= 3 && header[..3] == [0xFF, 0xD8, 0xFF] {
        return ImageKind::Jpeg;
    }
    if header.len() >= 10 && (&header[6..10] == b"JFIF" || eq_ignore_case(&header[6..10], b"exif"))
    {
        return ImageKind::Jpeg;
    }

    // GIF: "GIF"
    if header.len() >= 3 && &header[..3] == b"GIF" {
        return ImageKind::Gif;
    }

    // TIFF: "II*\0" (little-endian) or "MM\0*" (big-endian)
    if header.len() >= 4
        && (header[..4] == [0x49, 0x49, 0x2A, 0x00] || header[..4] == [0x4D, 0x4D, 0x00, 0x2A])
    {
        return ImageKind::Tiff;
    }

    // WebP: "RIFF" .... "WEBP"
    if header.len() >= 12 && &header[..4] == b"RIFF" && &header[8..12] == b"WEBP" {
        return ImageKind::WebP;
    }

    // HEIC/HEIF: ISO-BMFF "ftyp" box at offset 4 with a heic/heif brand.
    if header.len() >= 12 && &header[4..8] == b"ftyp" {
        match &header[8..12] {
            b"heic" | b"heix" => return ImageKind::Heic,
            b"heif" | b"mif1" => return ImageKind::Heif,
            _ => {}
        }
    }

    // BMP: "BM"
    if header.len() >= 2 && &header[..2] == b"BM" {
        return ImageKind::Bmp;
    }

    ImageKind::Unknown
}

fn eq_ignore_case(bytes: &[u8], expected: &[u8]) -> bool {
    bytes.len() == expected.len()
        && bytes
            .iter()
            .zip(expected)
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
}
