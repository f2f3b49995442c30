//! Getting the finished image out: to a file, or inline in the terminal.
//!
//! Terminal display uses the Kitty graphics protocol (Kitty, WezTerm, Konsole,
//! Ghostty): the image is sent as base64-encoded PNG inside APC escape
//! sequences, in chunks of at most 4096 bytes.

use std::io::{self, Cursor, Write};
use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{ImageFormat, RgbImage};
use log::info;
use tempfile::NamedTempFile;

use crate::error::RenderError;

const CHUNK_SIZE: usize = 4096;
const APC_START: &str = "\x1b_G";
const APC_END: &str = "\x1b\\";

pub fn encode_image(image: &RgbImage, format: ImageFormat) -> Result<Vec<u8>, RenderError> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, format)?;
    Ok(buf.into_inner())
}

/// Writes `image` to `path`, format chosen by extension (`.png`, `.jpg`, `.jpeg`).
///
/// The image is fully encoded, written to a temporary file next to `path`
/// and renamed into place, so a failed write never leaves a truncated image.
pub fn save_image(image: &RgbImage, path: &Path) -> Result<(), RenderError> {
    let format = match ImageFormat::from_path(path) {
        Ok(f @ (ImageFormat::Png | ImageFormat::Jpeg)) => f,
        _ => {
            return Err(RenderError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
    };
    let bytes = encode_image(image, format)?;
    write_atomically(path, &bytes).map_err(|source| RenderError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!("saved word cloud to {}", path.display());
    Ok(())
}

fn write_atomically(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    // dropping the temp file on error removes it
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Shows `image` inline by writing Kitty graphics escape sequences to `out`.
pub fn display_image<W: Write>(image: &RgbImage, out: &mut W) -> Result<(), RenderError> {
    let png = encode_image(image, ImageFormat::Png)?;
    let payload = STANDARD.encode(png);
    transmit_png(out, &payload).map_err(RenderError::Display)
}

fn transmit_png<W: Write>(out: &mut W, base64_data: &str) -> io::Result<()> {
    // base64 is ASCII, so byte chunks are valid str slices
    let chunks: Vec<&str> = base64_data
        .as_bytes()
        .chunks(CHUNK_SIZE)
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect();

    for (i, chunk) in chunks.iter().enumerate() {
        let more = if i + 1 == chunks.len() { 0 } else { 1 };
        if i == 0 {
            // a=T: transmit and display, f=100: PNG payload
            write!(out, "{APC_START}a=T,f=100,m={more};{chunk}{APC_END}")?;
        } else {
            write!(out, "{APC_START}m={more};{chunk}{APC_END}")?;
        }
    }
    writeln!(out)?;
    out.flush()
}
