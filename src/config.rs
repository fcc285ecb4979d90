//! Configuration types for HTML-to-notebook conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The builder lets callers set only what
//! they care about and rely on documented defaults for the rest.

use crate::error::Html2NbError;
use crate::notebook::NotebookMetadata;
use crate::progress::ProgressCallback;
use std::fmt;

/// Configuration for an HTML-to-notebook conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use html2ipynb::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .concurrency(2)
///     .build()
///     .unwrap();
/// assert_eq!(config.concurrency, 2);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Number of input files read and extracted at the same time. Default: 4.
    ///
    /// Results are always concatenated in input order regardless of which
    /// file finishes first.
    pub concurrency: usize,

    /// Kernel and language metadata written into the notebook.
    /// Default: [`NotebookMetadata::python3`].
    pub metadata: NotebookMetadata,

    /// Optional per-file progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            metadata: NotebookMetadata::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("concurrency", &self.concurrency)
            .field("metadata", &self.metadata)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn metadata(mut self, metadata: NotebookMetadata) -> Self {
        self.config.metadata = metadata;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Html2NbError> {
        let c = &self.config;
        if c.concurrency == 0 {
            return Err(Html2NbError::InvalidConfig(
                "Concurrency must be ≥ 1".into(),
            ));
        }
        if c.metadata.kernelspec.name.trim().is_empty() {
            return Err(Html2NbError::InvalidConfig(
                "Kernel name must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoopProgressCallback;
    use std::sync::Arc;

    #[test]
    fn defaults() {
        let c = ConversionConfig::default();
        assert_eq!(c.concurrency, 4);
        assert_eq!(c.metadata.kernelspec.name, "python3");
        assert!(c.progress_callback.is_none());
    }

    #[test]
    fn concurrency_is_clamped() {
        let c = ConversionConfig::builder().concurrency(0).build().unwrap();
        assert_eq!(c.concurrency, 1);
    }

    #[test]
    fn empty_kernel_name_rejected() {
        let mut meta = NotebookMetadata::python3();
        meta.kernelspec.name = " ".into();
        let err = ConversionConfig::builder().metadata(meta).build().unwrap_err();
        assert!(matches!(err, Html2NbError::InvalidConfig(_)));
    }

    #[test]
    fn debug_hides_callback() {
        let c = ConversionConfig::builder()
            .progress_callback(Arc::new(NoopProgressCallback))
            .build()
            .unwrap();
        let dbg = format!("{c:?}");
        assert!(dbg.contains("<dyn ConversionProgressCallback>"));
    }
}
