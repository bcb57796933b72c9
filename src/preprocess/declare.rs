use tracing::debug;

use crate::namespace::{Namespaces, Translate};
use crate::patterns::{Kind, Patterns};

/// Registers the namespaces declared by `xmlns:` attributes and by inline
/// `{namespace ...}` declarations.
pub fn register(
    patterns: &Patterns,
    translator: &dyn Translate,
    source: &str,
    namespaces: &mut Namespaces,
) {
    for m in patterns.find_iter(Kind::XmlnsDeclaration, source) {
        let Some(identifier) = m.namespace.map(|s| &source[s]) else {
            continue;
        };
        let Some(quoted) = m.target.map(|s| &source[s]) else {
            debug!(identifier, "skipping xmlns declaration without a value");
            continue;
        };
        let target = translator.translate(&unquote(quoted));
        if namespaces.register(identifier, Some(target.as_str())) {
            debug!(identifier, target = %target, "registered namespace");
        } else {
            debug!(identifier, target = %target, "skipping unresolvable namespace");
        }
    }

    for m in patterns.find_iter(Kind::InlineDeclaration, source) {
        let Some(identifier) = m.namespace.map(|s| &source[s]) else {
            continue;
        };
        let target = m.target.map(|s| &source[s]);
        namespaces.register(identifier, target);
        match target {
            Some(target) => debug!(identifier, target, "registered namespace"),
            None => debug!(identifier, "ignoring namespace"),
        }
    }
}

/// Strips the outer quotes of a quoted value and removes its escaping.
///
/// Malformed values are returned as best as possible, this never fails.
fn unquote(quoted: &str) -> String {
    let value = match quoted.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            let inner = quoted.strip_prefix(quote).unwrap_or(quoted);
            let inner = inner.strip_suffix(quote).unwrap_or(inner);
            inner.replace(&format!("\\{quote}"), &quote.to_string())
        }
        _ => quoted.to_owned(),
    };
    value.replace("\\\\", "\\")
}
