//! High-level API of the Quokka layout engine.
//!
//! # Scope
//!
//! This crate provides:
//! - **Configuration** - viewport, selection color and invariant checking
//! - **Document Loading** - styled box trees read from JSON files
//! - **Pipeline** - normalization, layout and paint in one call
//! - **Providers** - fontdue text metrics and file-backed images
//!
//! # Not Implemented
//!
//! - Markup parsing and the CSS cascade: documents arrive with computed
//!   styles already resolved.
//! - Rasterization: the output is a display list for a backend to execute.
//!
//! # Example
//!
//! ```no_run
//! let document = quokka_engine::load_document("page.json".as_ref(), None)?;
//! for command in &document.display_list {
//!     println!("{command:?}");
//! }
//! # Ok::<(), quokka_engine::LoadError>(())
//! ```

pub mod config;
pub mod font_metrics;
pub mod image_loader;

pub use config::EngineConfig;
pub use font_metrics::FontdueFontMetrics;
pub use image_loader::FileImageProvider;
pub use quokka_css as css;

use std::fs;
use std::path::{Path, PathBuf};

use quokka_common::image::ImageProvider;
use quokka_css::layout::InvariantError;
use quokka_css::{
    ApproximateFontMetrics, DisplayList, FontMetrics, FragmentTree, StyledNode, layout, paint,
};
use serde::Serialize;
use thiserror::Error;

/// Error type for document loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read a document, configuration or font file.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The document or configuration is not valid JSON for its type.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A font file that fontdue could not parse.
    #[error("failed to parse font '{path}': {reason}")]
    Font {
        /// The font file.
        path: PathBuf,
        /// fontdue's message.
        reason: String,
    },
    /// Layout produced a fragment tree that breaks a postcondition.
    #[error("layout invariant violated: {0}")]
    Invariant(#[from] InvariantError),
}

/// The result of running a document through the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedDocument {
    /// Source path, empty for documents built in memory.
    pub source_path: String,
    /// Positioned geometry of every box.
    pub fragments: FragmentTree,
    /// Drawing commands in painting order.
    pub display_list: DisplayList,
}

/// Lays out and paints styled box trees with one configuration, one
/// metrics provider and one image provider.
pub struct Engine {
    config: EngineConfig,
    metrics: Box<dyn FontMetrics>,
    images: Box<dyn ImageProvider>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Create an engine. Text is measured with the configured font, else a
    /// system font, else [`ApproximateFontMetrics`]; images resolve against
    /// the working directory.
    ///
    /// # Errors
    ///
    /// Returns an error when `font_path` is set and cannot be loaded.
    pub fn new(config: EngineConfig) -> Result<Self, LoadError> {
        let metrics: Box<dyn FontMetrics> = match &config.font_path {
            Some(path) => Box::new(FontdueFontMetrics::from_file(path)?),
            None => match FontdueFontMetrics::system() {
                Some(metrics) => Box::new(metrics),
                None => {
                    log::info!(target: "font", "no system font found, using approximate metrics");
                    Box::new(ApproximateFontMetrics)
                }
            },
        };
        Ok(Self {
            config,
            metrics,
            images: Box::new(FileImageProvider::default()),
        })
    }

    /// Replace the text metrics provider.
    #[must_use]
    pub fn with_metrics(mut self, metrics: impl FontMetrics + 'static) -> Self {
        self.metrics = Box::new(metrics);
        self
    }

    /// Replace the image provider.
    #[must_use]
    pub fn with_images(mut self, images: impl ImageProvider + 'static) -> Self {
        self.images = Box::new(images);
        self
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run layout and paint over `root`.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Invariant`] when `check_invariants` is enabled
    /// and the fragment tree fails its checks.
    pub fn render(&self, root: &StyledNode) -> Result<RenderedDocument, LoadError> {
        let options = self.config.layout_options();
        let fragments = layout(root, self.metrics.as_ref(), self.images.as_ref(), &options);
        if self.config.check_invariants {
            fragments.check_invariants()?;
        }
        let display_list = paint(&fragments, &options);
        log::debug!(
            target: "engine",
            "rendered document: {} display commands",
            display_list.len()
        );
        Ok(RenderedDocument {
            source_path: String::new(),
            fragments,
            display_list,
        })
    }

    /// Parse a styled box tree from JSON and render it.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Json`] for malformed documents, and the errors
    /// of [`Self::render`].
    pub fn render_json(&self, json: &str) -> Result<RenderedDocument, LoadError> {
        let root: StyledNode = serde_json::from_str(json)?;
        self.render(&root)
    }
}

/// Load a document from a JSON file, with an optional JSON configuration.
///
/// This is the main entry point for hosts. Relative image references
/// resolve against the document's directory. Each render reports its own
/// warnings; nothing carries over from a previous document.
///
/// # Errors
///
/// Returns a [`LoadError`] when a file cannot be read or parsed, or when
/// invariant checking is enabled and fails.
pub fn load_document(path: &Path, config: Option<&Path>) -> Result<RenderedDocument, LoadError> {
    let config = config
        .map(EngineConfig::from_file)
        .transpose()?
        .unwrap_or_default();
    let json = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

    let engine = Engine::new(config)?.with_images(FileImageProvider::new(base_dir));
    let mut document = engine.render_json(&json)?;
    document.source_path = path.display().to_string();
    Ok(document)
}
