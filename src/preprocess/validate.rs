use tracing::debug;

use crate::namespace::Namespaces;
use crate::patterns::{Kind, Match, Patterns};
use crate::types::span::Span;
use crate::{Error, Result};

/// Validates a piece of source that matched the handler's pattern.
type Handler = fn(&Validator<'_>, Span, Match) -> Result<()>;

/// The checks applied to every piece of the template, in order. The first
/// pattern that matches a piece decides how it is checked, pieces that match
/// none are scanned for shorthand view helpers.
const HANDLERS: [(Kind, Handler); 2] = [(Kind::OpenTag, open_tag), (Kind::CloseTag, close_tag)];

struct Validator<'a> {
    patterns: &'a Patterns,
    source: &'a str,
    namespaces: &'a Namespaces,
}

/// Fails on the first tag or shorthand view helper, in document order,
/// whose namespace is neither known nor ignored.
pub fn check(patterns: &Patterns, source: &str, namespaces: &Namespaces) -> Result<()> {
    let v = Validator {
        patterns,
        source,
        namespaces,
    };
    for piece in patterns.split(Kind::DynamicTag, source) {
        let text = &source[piece];
        let handler = HANDLERS
            .iter()
            .find_map(|&(kind, handler)| Some((handler, patterns.find(kind, text)?)));
        match handler {
            Some((handler, m)) => handler(&v, piece, m)?,
            None => shorthand(&v, piece)?,
        }
    }
    Ok(())
}

fn open_tag(v: &Validator<'_>, piece: Span, m: Match) -> Result<()> {
    let namespace = m.namespace.unwrap_or(Span { m: 0, n: 0 }).shift(piece.m);
    let identifier = &v.source[namespace];
    if v.namespaces.is_valid_or_ignored(identifier) {
        return Ok(());
    }
    debug!(identifier, "unknown namespace in tag");
    Err(Error::unknown_namespace(
        identifier,
        escape_html(&v.source[piece]),
        v.source,
        piece,
    ))
}

fn close_tag(_: &Validator<'_>, _: Span, _: Match) -> Result<()> {
    Ok(())
}

fn shorthand(v: &Validator<'_>, piece: Span) -> Result<()> {
    let text = &v.source[piece];
    for section in v.patterns.split(Kind::ShorthandSection, text) {
        let s = &text[section];
        if v.patterns.find(Kind::ObjectAccessor, s).is_none() {
            continue;
        }
        for helper in v.patterns.find_iter(Kind::ShorthandViewHelper, s) {
            let Some(namespace) = helper.namespace else {
                continue;
            };
            let namespace = namespace.shift(piece.m + section.m);
            let identifier = &v.source[namespace];
            if !v.namespaces.is_valid_or_ignored(identifier) {
                debug!(identifier, "unknown namespace in shorthand expression");
                return Err(Error::unknown_namespace(
                    identifier, identifier, v.source, namespace,
                ));
            }
        }
    }
    Ok(())
}

fn escape_html(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[test]
fn escape_html_tag() {
    assert_eq!(
        escape_html(r#"<x:y a="1" b='2'/>"#),
        "&lt;x:y a=&quot;1&quot; b=&#039;2&#039;/&gt;"
    );
}
