//! The namespace registry and namespace URI translation.

use std::collections::BTreeMap;

use regex::Regex;
use tracing::debug;

/// The namespaces known to a single template compilation.
///
/// Maps namespace identifiers like `f` to a target symbol namespace like
/// `Vendor\Package\ViewHelpers`. An identifier registered without a target
/// is *ignored*: tags using it are accepted but never resolved. An ignored
/// identifier containing `*` ignores every identifier it matches, for
/// example `foo*` ignores `foo`, `foobar` and `foo.bar`.
///
/// Create one registry per template and pass it to
/// [`Preprocessor::preprocess`][crate::Preprocessor::preprocess].
#[derive(Debug, Clone, Default)]
pub struct Namespaces {
    bindings: BTreeMap<String, Option<String>>,
    /// Ignored identifiers containing `*`, compiled once when registered.
    wildcards: BTreeMap<String, Regex>,
}

impl PartialEq for Namespaces {
    fn eq(&self, other: &Self) -> bool {
        self.bindings == other.bindings
    }
}

impl Eq for Namespaces {}

impl Namespaces {
    /// Construct an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a namespace identifier, replacing any previous binding.
    ///
    /// A target containing `/` cannot be resolved to a symbol namespace and
    /// is rejected. Returns whether the binding was registered.
    pub fn register<I, T>(&mut self, identifier: I, target: Option<T>) -> bool
    where
        I: Into<String>,
        T: Into<String>,
    {
        let target = target.map(Into::into);
        if matches!(&target, Some(t) if t.contains('/')) {
            return false;
        }
        let identifier = identifier.into();
        self.wildcards.remove(&identifier);
        if target.is_none() && identifier.contains('*') {
            match wildcard(&identifier) {
                Ok(re) => {
                    self.wildcards.insert(identifier.clone(), re);
                }
                Err(err) => {
                    debug!(identifier = %identifier, error = %err, "skipping wildcard namespace")
                }
            }
        }
        self.bindings.insert(identifier, target);
        true
    }

    /// Register a namespace identifier without a target.
    pub fn ignore(&mut self, identifier: impl Into<String>) {
        self.register(identifier, None::<String>);
    }

    /// Whether the identifier is registered with a target.
    pub fn is_known(&self, identifier: &str) -> bool {
        matches!(self.bindings.get(identifier), Some(Some(_)))
    }

    /// Whether the identifier is registered without a target, directly or
    /// through a wildcard.
    pub fn is_ignored(&self, identifier: &str) -> bool {
        if let Some(target) = self.bindings.get(identifier) {
            return target.is_none();
        }
        self.wildcards.values().any(|re| re.is_match(identifier))
    }

    /// Whether a tag using the identifier is acceptable.
    pub fn is_valid_or_ignored(&self, identifier: &str) -> bool {
        self.is_known(identifier) || self.is_ignored(identifier)
    }

    /// Returns the target the identifier is bound to.
    pub fn target(&self, identifier: &str) -> Option<&str> {
        self.bindings.get(identifier)?.as_deref()
    }

    /// Whether the identifier is registered at all, with or without a target.
    pub fn contains(&self, identifier: &str) -> bool {
        self.bindings.contains_key(identifier)
    }

    /// Iterate over all bindings in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.bindings
            .iter()
            .map(|(identifier, target)| (identifier.as_str(), target.as_deref()))
    }

    /// Returns the number of registered identifiers.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns true if no identifier is registered.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Compiles a pattern where `*` stands for any run of `[a-zA-Z0-9.]` into
/// an anchored regex.
fn wildcard(pattern: &str) -> Result<Regex, regex::Error> {
    let parts: Vec<_> = pattern.split('*').map(regex::escape).collect();
    Regex::new(&format!("^{}$", parts.join("[a-zA-Z0-9.]*")))
}

/// Translates the URI of an `xmlns:` declaration into a symbol namespace.
///
/// This trait is implemented for any `Fn(&str) -> String`.
///
/// # Examples
///
/// ```
/// let mut preprocessor = fluidic::Preprocessor::new();
/// preprocessor.set_translator(|uri: &str| uri.replace('.', "\\"));
/// ```
pub trait Translate {
    /// Returns the symbol namespace for `uri`.
    fn translate(&self, uri: &str) -> String;
}

impl<F> Translate for F
where
    F: Fn(&str) -> String,
{
    #[inline]
    fn translate(&self, uri: &str) -> String {
        self(uri)
    }
}

/// The conventional URI translation.
///
/// A URI of the form `<prefix><path><suffix>` becomes `<path><suffix>` with
/// every `/` replaced by `\`, so with the default prefix and suffix
/// `http://typo3.org/ns/Vendor/Package/ViewHelpers` becomes
/// `Vendor\Package\ViewHelpers`. Any other URI is returned as is, which
/// means ordinary XML namespace URIs keep their `/` and are never
/// registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTranslator {
    prefix: String,
    suffix: String,
}

impl Default for UriTranslator {
    fn default() -> Self {
        Self::new("http://typo3.org/ns/", "/ViewHelpers")
    }
}

impl UriTranslator {
    /// Construct a translator for URIs of the form `<prefix><path><suffix>`.
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }
}

impl Translate for UriTranslator {
    fn translate(&self, uri: &str) -> String {
        match uri.strip_prefix(self.prefix.as_str()) {
            Some(path) if path.ends_with(self.suffix.as_str()) => path.replace('/', "\\"),
            _ => uri.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_match(pattern: &str, identifier: &str) -> bool {
        wildcard(pattern).unwrap().is_match(identifier)
    }

    #[test]
    fn wildcard_matches() {
        assert!(is_match("foo*", "foo"));
        assert!(is_match("foo*", "foo.bar"));
        assert!(is_match("*bar", "foobar"));
        assert!(is_match("a*c*e", "abcde"));
        assert!(!is_match("foo*", "fo"));
        assert!(!is_match("foo*", "xfoo"));
        assert!(!is_match("foo*", "foo:bar"));
    }

    #[test]
    fn wildcard_escapes_pattern() {
        assert!(is_match("a.b*", "a.bc"));
        assert!(!is_match("a.b*", "axbc"));
        assert!(is_match("(x)*", "(x)y"));
    }
}
