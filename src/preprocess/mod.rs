//! Prepare raw template source for the template parser.
//!
//! This process has three stages:
//! - Literal blocks are masked so their content is never scanned.
//! - Namespaces declared in the source are registered.
//! - Every tag and shorthand view helper is checked against the registry.

mod declare;
mod literal;
mod validate;

use std::fmt;

use crate::namespace::{Namespaces, Translate, UriTranslator};
use crate::patterns::Patterns;
use crate::Result;

/// The template source preprocessor.
///
/// The preprocessor stores the pattern table and the namespace URI
/// translation. It keeps no state between templates, so generally you only
/// need to construct one during the lifetime of a program. Each template
/// gets its own [`Namespaces`] registry.
///
/// # Examples
///
/// ```
/// use fluidic::{Namespaces, Preprocessor};
///
/// let preprocessor = Preprocessor::new();
/// let mut namespaces = Namespaces::new();
/// let source = preprocessor.preprocess("{namespace f=Vendor\\Helpers}\n<f:render />", &mut namespaces)?;
/// assert_eq!(source.lines().count(), 2);
/// assert_eq!(namespaces.target("f"), Some("Vendor\\Helpers"));
/// # Ok::<(), fluidic::Error>(())
/// ```
pub struct Preprocessor {
    patterns: Patterns,
    translator: Box<dyn Translate + Send + Sync>,
}

impl Default for Preprocessor {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Preprocessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preprocessor")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl Preprocessor {
    /// Construct a new preprocessor with the standard patterns.
    #[inline]
    pub fn new() -> Self {
        Self::with_patterns(Patterns::default())
    }

    /// Construct a new preprocessor with a custom pattern table.
    #[inline]
    pub fn with_patterns(patterns: Patterns) -> Self {
        Self {
            patterns,
            translator: Box::new(UriTranslator::default()),
        }
    }

    /// Set the translation used for `xmlns:` declaration URIs.
    ///
    /// Defaults to [`UriTranslator::default()`].
    #[inline]
    pub fn set_translator<T>(&mut self, translator: T)
    where
        T: Translate + Send + Sync + 'static,
    {
        self.translator = Box::new(translator);
    }

    /// Returns the pattern table.
    #[inline]
    pub fn patterns(&self) -> &Patterns {
        &self.patterns
    }

    /// Preprocess a template source.
    ///
    /// Masks literal blocks, registers the namespaces the template declares
    /// and fails if any tag or shorthand view helper uses a namespace that
    /// is neither known nor ignored. The returned source always has the
    /// same number of lines as `source`.
    pub fn preprocess(&self, source: &str, namespaces: &mut Namespaces) -> Result<String> {
        let source = self.mask_literals(source);
        self.register_namespaces(&source, namespaces);
        self.validate_namespaces(&source, namespaces)?;
        Ok(source)
    }

    /// Replace the content of every literal block with the newlines it
    /// contained.
    pub fn mask_literals(&self, source: &str) -> String {
        literal::mask(&self.patterns, source)
    }

    /// Register all namespaces declared in the source.
    pub fn register_namespaces(&self, source: &str, namespaces: &mut Namespaces) {
        declare::register(&self.patterns, &*self.translator, source, namespaces)
    }

    /// Check that every namespace used in the source is known or ignored.
    pub fn validate_namespaces(&self, source: &str, namespaces: &Namespaces) -> Result<()> {
        validate::check(&self.patterns, source, namespaces)
    }
}
