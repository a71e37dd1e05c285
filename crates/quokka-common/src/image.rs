//! Image provider contract shared by layout and hosts.
//!
//! [§ 10.3.2 Inline, replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-width)
//!
//! Layout never decodes pixels. It asks an [`ImageProvider`] for the
//! intrinsic dimensions of an image reference and receives an opaque
//! [`ImageHandle`] that only the raster backend interprets.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::warning::Warnings;

/// Opaque reference to a loaded image, passed through to draw commands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ImageHandle(String);

impl ImageHandle {
    /// Create a handle for the given image source.
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self(src.into())
    }

    /// The source reference this handle was created for.
    #[must_use]
    pub fn src(&self) -> &str {
        &self.0
    }
}

/// Intrinsic information about a loaded image resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    /// Intrinsic width of the image in pixels.
    width: u32,
    /// Intrinsic height of the image in pixels.
    height: u32,
    /// Handle the raster backend resolves to pixels.
    handle: ImageHandle,
}

impl ImageInfo {
    /// Create image info from intrinsic dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32, handle: ImageHandle) -> Self {
        Self {
            width,
            height,
            handle,
        }
    }

    /// Zero-size stand-in used when an image cannot be loaded.
    #[must_use]
    pub fn placeholder(src: &str) -> Self {
        Self::new(0, 0, ImageHandle::new(src))
    }

    /// Intrinsic width of the image in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Intrinsic height of the image in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Intrinsic dimensions as `(width, height)` in `f32`, for layout.
    #[must_use]
    pub fn dimensions_f32(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }

    /// The opaque handle for draw commands.
    #[must_use]
    pub const fn handle(&self) -> &ImageHandle {
        &self.handle
    }
}

/// Why an image reference could not be resolved.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// The provider has no resource under this reference.
    #[error("image '{0}' not found")]
    NotFound(String),
    /// The resource exists but could not be decoded.
    #[error("image '{src}' could not be decoded: {reason}")]
    Decode {
        /// The image reference.
        src: String,
        /// Decoder message.
        reason: String,
    },
}

/// Resolves image references to intrinsic sizes and opaque handles.
///
/// Implementations must behave as pure functions for the duration of a
/// layout pass: the same reference yields the same answer.
pub trait ImageProvider {
    /// Look up an image by its source reference.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError`] when the image is missing or undecodable.
    fn load(&self, src: &str) -> Result<ImageInfo, ImageError>;
}

/// Resolve `src`, degrading failures to a zero-size placeholder.
///
/// The failure is reported once per pass through `warnings`; layout proceeds.
pub fn load_or_placeholder(
    provider: &dyn ImageProvider,
    src: &str,
    warnings: &Warnings,
) -> ImageInfo {
    provider.load(src).unwrap_or_else(|err| {
        warnings.warn_once("image", &err.to_string());
        ImageInfo::placeholder(src)
    })
}

/// Provider that knows no images; every lookup is [`ImageError::NotFound`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageProvider for NoImages {
    fn load(&self, src: &str) -> Result<ImageInfo, ImageError> {
        Err(ImageError::NotFound(src.to_string()))
    }
}

/// In-memory provider with fixed intrinsic sizes per reference.
#[derive(Debug, Clone, Default)]
pub struct StaticImages {
    sizes: HashMap<String, (u32, u32)>,
}

impl StaticImages {
    /// Create an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image reference with its intrinsic size.
    #[must_use]
    pub fn with(mut self, src: &str, width: u32, height: u32) -> Self {
        let _ = self.sizes.insert(src.to_string(), (width, height));
        self
    }
}

impl ImageProvider for StaticImages {
    fn load(&self, src: &str) -> Result<ImageInfo, ImageError> {
        self.sizes
            .get(src)
            .map(|&(w, h)| ImageInfo::new(w, h, ImageHandle::new(src)))
            .ok_or_else(|| ImageError::NotFound(src.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_images_lookup() {
        let images = StaticImages::new().with("a.png", 40, 20);
        let info = images.load("a.png").unwrap();
        assert_eq!(info.dimensions_f32(), (40.0, 20.0));
        assert_eq!(info.handle().src(), "a.png");
    }

    #[test]
    fn test_missing_image_degrades_to_placeholder() {
        let warnings = Warnings::new();
        let info = load_or_placeholder(&NoImages, "missing.png", &warnings);
        assert!(warnings.was_warned("image", "image 'missing.png' not found"));
        assert_eq!(info.width(), 0);
        assert_eq!(info.height(), 0);
        assert_eq!(info.handle().src(), "missing.png");
    }
}
