use std::fs;
use std::path::Path;

use ab_glyph::FontArc;
use lazy_static::lazy_static;

use crate::error::RenderError;

const DEJAVU_SANS_BYTES: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");

lazy_static! {
    static ref EMBEDDED_FONT: Option<FontArc> = FontArc::try_from_slice(DEJAVU_SANS_BYTES).ok();
}

pub fn embedded_font() -> Option<FontArc> {
    EMBEDDED_FONT.clone()
}

pub fn load_font_from_path<P: AsRef<Path>>(path: P) -> Result<FontArc, RenderError> {
    let path = path.as_ref();
    let bytes = fs::read(path)
        .map_err(|e| RenderError::Font(format!("{}: {}", path.display(), e)))?;
    FontArc::try_from_vec(bytes)
        .map_err(|e| RenderError::Font(format!("{}: {}", path.display(), e)))
}

/// The user's font when one is given, the embedded one otherwise.
pub fn load_font(custom: Option<&Path>) -> Result<FontArc, RenderError> {
    match custom {
        Some(path) => load_font_from_path(path),
        None => embedded_font()
            .ok_or_else(|| RenderError::Font("embedded font is corrupt".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ab_glyph::{Font, PxScale, ScaleFont};

    #[test]
    fn default_font_is_bundled() {
        assert!(embedded_font().is_some());
        assert!(load_font(None).is_ok());
    }

    #[test]
    fn bundled_font_has_glyphs_for_review_text() {
        let font = load_font(None).unwrap();
        for c in "aéñüß".chars() {
            assert_ne!(font.glyph_id(c).0, 0, "no glyph for {c:?}");
        }
        let scaled = font.as_scaled(PxScale::from(40.0));
        assert!(scaled.height() > 0.0);
    }

    #[test]
    fn custom_font_file_is_loaded() {
        let font = load_font_from_path("assets/fonts/DejaVuSans.ttf");
        assert!(font.is_ok());
    }

    #[test]
    fn missing_custom_font_is_a_font_error() {
        let err = load_font(Some(Path::new("/nonexistent/font.ttf"))).unwrap_err();
        assert!(matches!(err, RenderError::Font(_)));
    }

    #[test]
    fn non_font_file_is_rejected() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut f, b"definitely not a font").unwrap();
        assert!(load_font_from_path(f.path()).is_err());
    }
}
