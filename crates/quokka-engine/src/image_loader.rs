//! File-backed image provider.
//!
//! [§ 10.3.2 Inline, replaced elements](https://www.w3.org/TR/CSS2/visudet.html#inline-replaced-width)
//!
//! Layout only needs intrinsic dimensions, so images are never decoded
//! here: `image::image_dimensions` reads the header of the file. The
//! handle passed on to draw commands is the resolved path.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use quokka_common::image::{ImageError, ImageHandle, ImageInfo, ImageProvider};

/// Strip query string (`?…`) and fragment identifier (`#…`) from a
/// reference so that the remaining path can be opened.
///
/// [URL Standard § 4.1](https://url.spec.whatwg.org/#concept-url-path)
#[must_use]
pub fn strip_url_decorations(src: &str) -> &str {
    let without_fragment = src.split_once('#').map_or(src, |(b, _)| b);
    without_fragment
        .split_once('?')
        .map_or(without_fragment, |(b, _)| b)
}

/// Whether `src` names a remote or inline resource this provider cannot read.
fn is_remote(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://") || src.starts_with("data:")
}

/// Resolves image references against a base directory on disk.
#[derive(Debug, Clone, Default)]
pub struct FileImageProvider {
    base_dir: PathBuf,
}

impl FileImageProvider {
    /// Resolve relative references against `base_dir`.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// The file a reference points at.
    #[must_use]
    pub fn resolve(&self, src: &str) -> PathBuf {
        let path = Path::new(strip_url_decorations(src));
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl ImageProvider for FileImageProvider {
    fn load(&self, src: &str) -> Result<ImageInfo, ImageError> {
        if is_remote(src) {
            return Err(ImageError::Decode {
                src: src.to_string(),
                reason: "only local files are read".to_string(),
            });
        }
        if strip_url_decorations(src).len() != src.len() {
            log::debug!(target: "image", "ignoring query or fragment in '{src}'");
        }

        let path = self.resolve(src);
        match image::image_dimensions(&path) {
            Ok((width, height)) => {
                log::debug!(target: "image", "'{src}' is {width}x{height}");
                Ok(ImageInfo::new(
                    width,
                    height,
                    ImageHandle::new(path.to_string_lossy()),
                ))
            }
            Err(image::ImageError::IoError(err)) if err.kind() == ErrorKind::NotFound => {
                Err(ImageError::NotFound(src.to_string()))
            }
            Err(err) => Err(ImageError::Decode {
                src: src.to_string(),
                reason: err.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_url_decorations() {
        assert_eq!(strip_url_decorations("a.png?w=10#top"), "a.png");
        assert_eq!(strip_url_decorations("a.png#top"), "a.png");
        assert_eq!(strip_url_decorations("a.png"), "a.png");
    }

    #[test]
    fn test_relative_paths_resolve_against_base() {
        let provider = FileImageProvider::new("/srv/docs");
        assert_eq!(provider.resolve("img/a.png?x=1"), Path::new("/srv/docs/img/a.png"));
        assert_eq!(provider.resolve("/abs/b.png"), Path::new("/abs/b.png"));
    }

    #[test]
    fn test_remote_and_missing_images_fail() {
        let provider = FileImageProvider::new("/nonexistent");
        assert!(matches!(
            provider.load("https://example.com/a.png"),
            Err(ImageError::Decode { .. })
        ));
        assert!(matches!(provider.load("missing.png"), Err(ImageError::NotFound(_))));
    }
}
