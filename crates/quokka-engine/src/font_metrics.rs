//! Font metrics backed by fontdue for text measurement during layout.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."

use std::fs;
use std::path::Path;

use fontdue::{Font, FontSettings};
use quokka_css::style::FontRef;
use quokka_css::{ApproximateFontMetrics, FontMetrics};

use crate::LoadError;

/// Common system font paths to search for a default (regular) font.
const FONT_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// System font paths for bold variants.
const FONT_BOLD_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// System font paths for italic variants.
const FONT_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
    "C:\\Windows\\Fonts\\ariali.ttf",
];

/// [§ 15.6 Font boldness](https://www.w3.org/TR/CSS2/fonts.html#font-boldness)
///
/// "'bold' ... Same as '700'." Weights from 600 up use the bold face.
const BOLD_WEIGHT: u16 = 600;

/// Font metrics backed by fontdue's per-glyph and line metrics.
///
/// Advances come from `Font::metrics()`, never `Font::rasterize()`, since
/// layout only needs measurements. Bold and italic faces are optional and
/// fall back to the regular face.
pub struct FontdueFontMetrics {
    regular: Font,
    bold: Option<Font>,
    italic: Option<Font>,
}

impl std::fmt::Debug for FontdueFontMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontdueFontMetrics")
            .field("regular", &self.regular.name())
            .field("bold", &self.bold.is_some())
            .field("italic", &self.italic.is_some())
            .finish()
    }
}

impl FontdueFontMetrics {
    /// Metrics from a single regular face.
    #[must_use]
    pub const fn new(regular: Font) -> Self {
        Self {
            regular,
            bold: None,
            italic: None,
        }
    }

    /// Load the regular face from a font file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] when the file cannot be read and
    /// [`LoadError::Font`] when fontdue rejects it.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let data = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let font = Font::from_bytes(data, FontSettings::default()).map_err(|reason| {
            LoadError::Font {
                path: path.to_path_buf(),
                reason: reason.to_string(),
            }
        })?;
        Ok(Self::new(font))
    }

    /// Search the usual system locations. `None` when no regular face is
    /// installed.
    #[must_use]
    pub fn system() -> Option<Self> {
        let regular = load_font_from_paths(FONT_SEARCH_PATHS, "regular")?;
        Some(Self {
            regular,
            bold: load_font_from_paths(FONT_BOLD_SEARCH_PATHS, "bold"),
            italic: load_font_from_paths(FONT_ITALIC_SEARCH_PATHS, "italic"),
        })
    }

    fn face(&self, font: &FontRef) -> &Font {
        let variant = if font.italic {
            self.italic.as_ref()
        } else if font.weight >= BOLD_WEIGHT {
            self.bold.as_ref()
        } else {
            None
        };
        variant.unwrap_or(&self.regular)
    }
}

/// Try to load a font from a list of filesystem paths.
fn load_font_from_paths(paths: &[&str], label: &str) -> Option<Font> {
    for path in paths {
        if let Ok(data) = fs::read(path)
            && let Ok(font) = Font::from_bytes(data, FontSettings::default())
        {
            log::debug!(target: "font", "loaded {label} font: {path}");
            return Some(font);
        }
    }
    None
}

impl FontMetrics for FontdueFontMetrics {
    fn text_width(&self, text: &str, font: &FontRef) -> f32 {
        let face = self.face(font);
        text.chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| face.metrics(ch, font.size).advance_width)
            .sum()
    }

    fn ascent(&self, font: &FontRef) -> f32 {
        self.face(font)
            .horizontal_line_metrics(font.size)
            .map_or_else(|| ApproximateFontMetrics.ascent(font), |m| m.ascent)
    }

    fn descent(&self, font: &FontRef) -> f32 {
        // fontdue reports the descent below the baseline as a negative number.
        self.face(font)
            .horizontal_line_metrics(font.size)
            .map_or_else(|| ApproximateFontMetrics.descent(font), |m| -m.descent)
    }

    fn line_gap(&self, font: &FontRef) -> f32 {
        self.face(font)
            .horizontal_line_metrics(font.size)
            .map_or_else(|| ApproximateFontMetrics.line_gap(font), |m| m.line_gap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_font_measures_text() {
        // Hosts without any of the searched fonts skip this check.
        let Some(metrics) = FontdueFontMetrics::system() else {
            return;
        };
        let font = FontRef::default();
        assert!(metrics.text_width("hello", &font) > 0.0);
        assert!(metrics.text_width("hello", &font) > metrics.text_width("hi", &font));
        assert!(metrics.ascent(&font) > 0.0);
        assert!(metrics.descent(&font) >= 0.0);
    }

    #[test]
    fn test_unreadable_font_file_is_io_error() {
        let err = FontdueFontMetrics::from_file(Path::new("/nonexistent/quokka.ttf")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
