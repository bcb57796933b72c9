//! Hand written scanners for the recursive parts of the shorthand syntax.
//!
//! Each scanner returns the leftmost match at or after byte `start`, or
//! [`None`] if there is none. A scanner never examines the same input twice
//! for the same candidate, so scanning takes time proportional to the text.
//! All syntax characters are ASCII so every span returned falls on a char
//! boundary.

use std::collections::HashMap;

use crate::patterns::Match;
use crate::types::span::Span;

/// Nested argument arrays deeper than this are not recognized.
const MAX_DEPTH: usize = 64;

/// Finds the first `{...}` section with balanced nested braces.
///
/// A section contains at least one of: shorthand characters, whitespace,
/// quoted strings, or nested sections.
pub fn shorthand_section(text: &str, start: usize) -> Option<Match> {
    let b = text.as_bytes();
    // the end of the section opened at each offset, `None` if it fails
    let mut ends = HashMap::new();
    let mut i = start;
    while let Some(k) = b.get(i..)?.iter().position(|&c| c == b'{') {
        let open = i + k;
        if let Some(end) = section_end(b, open, &mut ends) {
            return Some(Match::new(open..end));
        }
        i = open + 1;
    }
    None
}

/// Scans the section opened at `start`, recording the outcome of every
/// nested section on the way.
///
/// A nested section that fails makes every section around it fail, so one
/// failure settles all open sections at once.
fn section_end(b: &[u8], start: usize, ends: &mut HashMap<usize, Option<usize>>) -> Option<usize> {
    if let Some(end) = ends.get(&start) {
        return *end;
    }

    // open sections and whether each has seen any content yet
    let mut open = vec![(start, false)];
    let mut j = start + 1;
    loop {
        let Some(&c) = b.get(j) else {
            break;
        };
        match c {
            b'{' => match ends.get(&j).copied() {
                Some(Some(end)) => {
                    seen(&mut open);
                    j = end;
                }
                Some(None) => break,
                None => {
                    seen(&mut open);
                    open.push((j, false));
                    j += 1;
                }
            },
            b'}' => {
                let Some(&(s, content)) = open.last() else {
                    break;
                };
                if !content {
                    break;
                }
                open.pop();
                j += 1;
                ends.insert(s, Some(j));
                if open.is_empty() {
                    return Some(j);
                }
                seen(&mut open);
            }
            b'"' | b'\'' => match quoted(b, j) {
                Some(k) => {
                    seen(&mut open);
                    j = k;
                }
                None => break,
            },
            c if is_shorthand_char(c) || c.is_ascii_whitespace() => {
                seen(&mut open);
                j += 1;
            }
            _ => break,
        }
    }

    for (s, _) in open {
        ends.insert(s, None);
    }
    None
}

fn seen(open: &mut [(usize, bool)]) {
    if let Some(top) = open.last_mut() {
        top.1 = true;
    }
}

/// Matches an entire section of the form `{object -> ns:name(args) -> ...}`.
///
/// Every part is optional, so `{post.title}` and `{f:format.raw()}` both
/// match. Only matches when `start` is the start of `text` and the section
/// runs to the end of it.
pub fn object_accessor(text: &str, start: usize) -> Option<Match> {
    let b = text.as_bytes();
    if start != 0 || b.first() != Some(&b'{') {
        return None;
    }
    let end = 1 + run(b, 1, is_object_char);
    // The object may swallow the `-` of a `->` or the namespace of a view
    // helper, nowhere else can a shorter object be followed by its tail.
    let arrow = (end > 1 && b[end - 1] == b'-').then_some(end - 1);
    let namespace = end
        - b[1..end]
            .iter()
            .rev()
            .take_while(|c| c.is_ascii_alphanumeric())
            .count();
    let helper = (namespace < end).then_some(namespace);
    [Some(end), arrow, helper]
        .into_iter()
        .flatten()
        .any(|j| accessor_tail(b, j))
        .then(|| Match::new(0..b.len()))
}

/// Finds the first `ns:name(args)` reference.
pub fn view_helper(text: &str, start: usize) -> Option<Match> {
    let b = text.as_bytes();
    let mut i = start;
    while i < b.len() {
        let namespace = run(b, i, |c| c.is_ascii_alphanumeric());
        if namespace == 0 {
            i += 1;
            continue;
        }
        if let Some((span, end)) = view_helper_at(b, i) {
            return Some(Match {
                span: Span::from(i..end),
                namespace: Some(span),
                target: None,
            });
        }
        // a reference starting later in the run would fail at the same `:`
        i += namespace;
    }
    None
}

fn accessor_tail(b: &[u8], i: usize) -> bool {
    let i = skip_whitespace(b, i);
    let mut starts = Vec::with_capacity(2);
    if b[i..].starts_with(b"->") {
        starts.push(i + 2);
    }
    starts.push(i);

    starts.into_iter().any(|j| {
        let j = skip_whitespace(b, j);
        let with_helper = view_helper_at(b, j).map(|(_, k)| chained(b, k));
        [with_helper, Some(chained(b, j))]
            .into_iter()
            .flatten()
            .any(|k| k + 1 == b.len() && b[k] == b'}')
    })
}

/// Consumes as many `-> ns:name(args)` links as possible.
fn chained(b: &[u8], mut i: usize) -> usize {
    loop {
        let j = skip_whitespace(b, i);
        if !b[j..].starts_with(b"->") {
            return i;
        }
        let j = skip_whitespace(b, j + 2);
        match view_helper_at(b, j) {
            Some((_, k)) => i = k,
            None => return i,
        }
    }
}

/// Returns the namespace span and the end of the view helper at `i`.
fn view_helper_at(b: &[u8], i: usize) -> Option<(Span, usize)> {
    let namespace = run(b, i, |c| c.is_ascii_alphanumeric());
    if namespace == 0 || b.get(i + namespace) != Some(&b':') {
        return None;
    }
    let j = i + namespace + 1;
    let name = run(b, j, |c| c.is_ascii_alphanumeric() || c == b'.');
    if name == 0 || b.get(j + name) != Some(&b'(') {
        return None;
    }
    let k = arguments(b, j + name + 1, 0);
    if b.get(k) != Some(&b')') {
        return None;
    }
    Some((Span::from(i..i + namespace), k + 1))
}

/// Consumes a list of `key: value` arguments and returns where it stops.
fn arguments(b: &[u8], mut i: usize, depth: usize) -> usize {
    while let Some(j) = argument(b, i, depth) {
        i = j;
    }
    i
}

fn argument(b: &[u8], i: usize, depth: usize) -> Option<usize> {
    let mut j = skip_whitespace(b, i);
    let key = run(b, j, is_key_char);
    if key == 0 {
        return None;
    }
    j = skip_whitespace(b, j + key);
    if b.get(j) != Some(&b':') {
        return None;
    }
    j = skip_whitespace(b, j + 1);
    j = match *b.get(j)? {
        b'"' | b'\'' => quoted(b, j)?,
        b'{' if depth < MAX_DEPTH => {
            let k = arguments(b, j + 1, depth + 1);
            if b.get(k) != Some(&b'}') {
                return None;
            }
            k + 1
        }
        _ => {
            let value = run(b, j, is_identifier_char);
            if value == 0 {
                return None;
            }
            j + value
        }
    };
    j = skip_whitespace(b, j);
    if b.get(j) == Some(&b',') {
        j += 1;
    }
    Some(j)
}

/// Consumes a quoted string starting at the quote at `i`, a backslash
/// escapes the quote character.
fn quoted(b: &[u8], i: usize) -> Option<usize> {
    let quote = b[i];
    let mut j = i + 1;
    loop {
        match *b.get(j)? {
            b'\\' if b.get(j + 1) == Some(&quote) => j += 2,
            c if c == quote => return Some(j + 1),
            _ => j += 1,
        }
    }
}

fn run(b: &[u8], i: usize, pred: impl Fn(u8) -> bool) -> usize {
    b.get(i..)
        .map_or(0, |rest| rest.iter().take_while(|c| pred(**c)).count())
}

fn skip_whitespace(b: &[u8], i: usize) -> usize {
    i + run(b, i, |c| c.is_ascii_whitespace())
}

fn is_shorthand_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || b"|->_:=,.()*+^/%".contains(&c)
}

fn is_object_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'-' | b'_' | b'.')
}

fn is_key_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'-' | b'_')
}

fn is_identifier_char(c: u8) -> bool {
    is_key_char(c) || c == b'.'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(text: &str) -> Option<&str> {
        shorthand_section(text, 0).map(|m| &text[m.span])
    }

    #[test]
    fn shorthand_section_nested() {
        assert_eq!(section("{a {b} c} d"), Some("{a {b} c}"));
        assert_eq!(section("{f:x(a: '}')} tail"), Some("{f:x(a: '}')}"));
    }

    #[test]
    fn shorthand_section_rejects() {
        assert_eq!(section("{}"), None);
        assert_eq!(section("{a {} b}"), None);
        assert_eq!(section("{a; b}"), None);
        assert_eq!(section("{unterminated"), None);
        assert_eq!(section("{'open}"), None);
    }

    #[test]
    fn object_accessor_shapes() {
        for text in [
            "{post}",
            "{post.author.email}",
            "{f:format.raw()}",
            "{post.title -> f:format.raw()}",
            "{post->f:a()->g:b(x: 'y', z: {k: v})}",
            "{f:a(x: 1) -> g:b()}",
        ] {
            assert!(object_accessor(text, 0).is_some(), "{text}");
        }
        for text in ["{a: 1}", "{post} ", "{f:a(}", "{1 + 2}"] {
            assert!(object_accessor(text, 0).is_none(), "{text}");
        }
    }

    #[test]
    fn view_helper_namespace_span() {
        let text = "x:y(a: \"q\") rest";
        let m = view_helper(text, 0).unwrap();
        assert_eq!(&text[m.span], "x:y(a: \"q\")");
        assert_eq!(&text[m.namespace.unwrap()], "x");
        assert!(view_helper("x:y", 0).is_none());
        assert!(view_helper("x:y( )", 0).is_none());
    }

    #[test]
    fn shorthand_section_leftmost() {
        assert_eq!(section("{a; b} {c}"), Some("{c}"));
        assert_eq!(section("{a 'x {b} y' ;"), Some("{b}"));
        assert_eq!(section("{{{a {b} ;"), Some("{b}"));
        assert_eq!(shorthand_section("{a} {b}", 1).map(|m| m.span), Some(Span::from(4..7)));
    }

    #[test]
    fn shorthand_section_deeply_nested_failure() {
        let text = format!("{}a;{{b}}", "{".repeat(50_000));
        assert_eq!(section(&text), Some("{b}"));
    }

    #[test]
    fn object_accessor_long_object() {
        let object = "a".repeat(50_000);
        assert!(object_accessor(&format!("{{{object}}}"), 0).is_some());
        assert!(object_accessor(&format!("{{{object} b}}"), 0).is_none());
        assert!(object_accessor(&format!("{{{object}->f:x()}}"), 0).is_some());
        assert!(object_accessor(&format!("{{{object}:x()}}"), 0).is_some());
    }

    #[test]
    fn view_helper_leftmost() {
        let text = "abc x:y z:w() q";
        let m = view_helper(text, 0).unwrap();
        assert_eq!(&text[m.span], "z:w()");
        assert!(view_helper(text, 9).is_none());
        assert!(view_helper(&"a".repeat(50_000), 0).is_none());
    }
}
