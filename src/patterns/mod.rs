//! The table of lexical patterns used to scan template source.
//!
//! Every pattern has a [`Kind`] naming it and a [`Role`] describing what it
//! recognizes. Most patterns are regular expressions compiled once per
//! process. The shorthand syntax nests (`{a -> f:b(c: {d: 1})}`), which a
//! regular expression cannot express, so those patterns are hand written
//! scanners registered in the same table.

mod scan;

use std::fmt;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::types::span::Span;

/// Matches any view helper tag, opening, closing or self-closing.
static DYNAMIC_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?x)
        </?
        [a-zA-Z0-9.]*:[a-zA-Z0-9.]+             # namespace and view helper name
        (?:
            \s*[a-zA-Z0-9:-]+=                  # attribute name
            (?:"(?:\\"|[^"])*"|'(?:\\'|[^'])*') # quoted attribute value
            \s*
        )*
        \s*/?>
        "#,
    )
    .unwrap()
});

static OPEN_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?x)
        ^<
        (?P<namespace>[a-zA-Z0-9.]*):
        (?P<name>[a-zA-Z0-9.]+)
        (?:
            \s*[a-zA-Z0-9:-]+=
            (?:"(?:\\"|[^"])*"|'(?:\\'|[^'])*')
            \s*
        )*
        \s*/?>$
        "#,
    )
    .unwrap()
});

static CLOSE_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^</(?P<namespace>[a-zA-Z0-9.]*):(?P<name>[a-zA-Z0-9.]+)\s*>$").unwrap()
});

static XMLNS_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?xi)
        xmlns:(?P<namespace>[a-z0-9.]+)=
        (?P<target>"[^"]+"|'[^']+')*
        "#,
    )
    .unwrap()
});

static INLINE_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        \{namespace\s*
        (?P<namespace>[a-zA-Z*][a-zA-Z0-9.*]*)
        \s*
        (?:=\s*(?P<target>[A-Za-z0-9.]+(?:\\\w+)*)\s*)?
        \}
        ",
    )
    .unwrap()
});

/// The role a pattern plays while scanning a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Delimits literal blocks.
    Literal,
    /// Declares a namespace.
    Declaration,
    /// Recognizes view helper tags.
    Tag,
    /// Recognizes shorthand `{...}` expressions.
    Shorthand,
}

/// Names a pattern in the [`Patterns`] table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// The begin or end delimiter of a literal block, `<![CDATA[` and `]]>`
    /// by default.
    LiteralBoundary = 0,
    /// `xmlns:f="http://typo3.org/ns/Vendor/Package/ViewHelpers"`
    XmlnsDeclaration = 1,
    /// `{namespace f=Vendor\Package\ViewHelpers}` or `{namespace f}`, unless
    /// preceded by a backslash.
    InlineDeclaration = 2,
    /// Any opening, closing or self-closing view helper tag.
    DynamicTag = 3,
    /// An entire opening or self-closing tag, e.g. `<f:if condition="1">`.
    OpenTag = 4,
    /// An entire closing tag, e.g. `</f:if>`.
    CloseTag = 5,
    /// A `{...}` section with balanced nested braces.
    ShorthandSection = 6,
    /// An entire section of the form `{object -> ns:helper(args) -> ...}`.
    ObjectAccessor = 7,
    /// A single `ns:helper(args)` reference.
    ShorthandViewHelper = 8,
}

/// A single match of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// The span of the entire match.
    pub span: Span,
    /// The span of the namespace identifier, if the pattern captures one.
    pub namespace: Option<Span>,
    /// The span of the declared target, if the pattern captures one.
    pub target: Option<Span>,
}

/// The lexical pattern table.
///
/// Use [`Patterns::default()`] for the standard literal delimiters and
/// [`Patterns::builder()`] to configure them.
#[derive(Debug, Clone)]
pub struct Patterns {
    table: Vec<Matcher>,
}

/// A builder for the pattern table.
#[derive(Debug, Clone)]
pub struct PatternsBuilder<'a> {
    literal: (&'a str, &'a str),
}

#[derive(Clone)]
enum Matcher {
    Literal { begin: String, end: String },
    Regex(&'static Lazy<Regex>),
    /// A regex that does not match directly after a backslash.
    Escapable(&'static Lazy<Regex>),
    /// A hand written search for the leftmost match at or after an offset.
    Scan(fn(&str, usize) -> Option<Match>),
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal { begin, end } => f
                .debug_struct("Literal")
                .field("begin", begin)
                .field("end", end)
                .finish(),
            Self::Regex(re) => f.debug_tuple("Regex").field(&re.as_str()).finish(),
            Self::Escapable(re) => f.debug_tuple("Escapable").field(&re.as_str()).finish(),
            Self::Scan(_) => f.write_str("Scan"),
        }
    }
}

impl Kind {
    /// Every pattern kind in table order.
    pub const ALL: [Kind; 9] = [
        Kind::LiteralBoundary,
        Kind::XmlnsDeclaration,
        Kind::InlineDeclaration,
        Kind::DynamicTag,
        Kind::OpenTag,
        Kind::CloseTag,
        Kind::ShorthandSection,
        Kind::ObjectAccessor,
        Kind::ShorthandViewHelper,
    ];

    pub fn role(self) -> Role {
        match self {
            Kind::LiteralBoundary => Role::Literal,
            Kind::XmlnsDeclaration | Kind::InlineDeclaration => Role::Declaration,
            Kind::DynamicTag | Kind::OpenTag | Kind::CloseTag => Role::Tag,
            Kind::ShorthandSection | Kind::ObjectAccessor | Kind::ShorthandViewHelper => {
                Role::Shorthand
            }
        }
    }

    /// Whether the pattern only matches entire pieces of text.
    pub fn is_anchored(self) -> bool {
        matches!(self, Kind::OpenTag | Kind::CloseTag | Kind::ObjectAccessor)
    }
}

impl Match {
    pub(crate) fn new(span: impl Into<Span>) -> Self {
        Self {
            span: span.into(),
            namespace: None,
            target: None,
        }
    }

    fn from_captures(caps: &Captures<'_>) -> Self {
        let span = |name| caps.name(name).map(|m| Span::from(m.range()));
        Self {
            span: caps.get(0).map(|m| Span::from(m.range())).unwrap_or(Span { m: 0, n: 0 }),
            namespace: span("namespace"),
            target: span("target"),
        }
    }
}

impl Default for Patterns {
    /// Returns the standard pattern table.
    ///
    /// This is equivalent to the following.
    /// ```
    /// let patterns = fluidic::Patterns::builder().literal("<![CDATA[", "]]>").build();
    /// assert_eq!(patterns.literal_delimiters(), ("<![CDATA[", "]]>"));
    /// ```
    #[inline]
    fn default() -> Self {
        Patterns::builder().build()
    }
}

impl Patterns {
    /// Create a new pattern table builder.
    #[inline]
    pub fn builder<'a>() -> PatternsBuilder<'a> {
        PatternsBuilder::new()
    }

    /// Returns the begin and end delimiters of literal blocks.
    pub fn literal_delimiters(&self) -> (&str, &str) {
        match &self.table[Kind::LiteralBoundary as usize] {
            Matcher::Literal { begin, end } => (begin, end),
            _ => unreachable!(),
        }
    }

    /// Matches the pattern against `text`.
    ///
    /// Anchored patterns must match the entire text, all others return the
    /// leftmost match.
    pub fn find(&self, kind: Kind, text: &str) -> Option<Match> {
        let m = self.find_at(kind, text, 0)?;
        if kind.is_anchored() && (m.span.m != 0 || m.span.n != text.len()) {
            return None;
        }
        Some(m)
    }

    /// Returns all non-overlapping matches in `text` in document order.
    pub fn find_iter<'p, 't>(&'p self, kind: Kind, text: &'t str) -> Matches<'p, 't> {
        Matches {
            patterns: self,
            kind,
            text,
            cursor: 0,
        }
    }

    /// Splits `text` around the matches of a pattern.
    ///
    /// The matches themselves are kept as pieces and empty pieces are
    /// dropped, so concatenating the pieces yields `text` again.
    pub fn split(&self, kind: Kind, text: &str) -> Vec<Span> {
        let mut pieces = Vec::new();
        let mut last = 0;
        for m in self.find_iter(kind, text) {
            if m.span.m > last {
                pieces.push(Span::from(last..m.span.m));
            }
            if !m.span.is_empty() {
                pieces.push(m.span);
            }
            last = m.span.n;
        }
        if last < text.len() {
            pieces.push(Span::from(last..text.len()));
        }
        pieces
    }

    fn find_at(&self, kind: Kind, text: &str, start: usize) -> Option<Match> {
        match &self.table[kind as usize] {
            Matcher::Literal { begin, end } => {
                let rest = &text[start..];
                let b = rest.find(begin.as_str()).map(|i| (i, begin.len()));
                let e = rest.find(end.as_str()).map(|i| (i, end.len()));
                let (i, len) = match (b, e) {
                    (Some(b), Some(e)) if e.0 < b.0 => e,
                    (Some(b), _) => b,
                    (None, e) => e?,
                };
                Some(Match::new(start + i..start + i + len))
            }
            Matcher::Regex(re) => re.captures_at(text, start).map(|c| Match::from_captures(&c)),
            Matcher::Escapable(re) => {
                let mut i = start;
                loop {
                    let m = Match::from_captures(&re.captures_at(text, i)?);
                    if !text[..m.span.m].ends_with('\\') {
                        return Some(m);
                    }
                    i = m.span.m + 1;
                }
            }
            Matcher::Scan(search) => search(text, start),
        }
    }
}

/// An iterator over the non-overlapping matches of a pattern.
///
/// This struct is created by [`Patterns::find_iter`].
#[derive(Debug)]
pub struct Matches<'p, 't> {
    patterns: &'p Patterns,
    kind: Kind,
    text: &'t str,
    cursor: usize,
}

impl Iterator for Matches<'_, '_> {
    type Item = Match;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor > self.text.len() {
            return None;
        }
        let m = self.patterns.find_at(self.kind, self.text, self.cursor)?;
        self.cursor = if m.span.is_empty() {
            // step over an empty match to the next char boundary
            let step = self.text[m.span.n..].chars().next().map_or(1, char::len_utf8);
            m.span.n + step
        } else {
            m.span.n
        };
        Some(m)
    }
}

impl<'a> PatternsBuilder<'a> {
    /// Creates a new builder with the standard literal delimiters.
    #[inline]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            literal: ("<![CDATA[", "]]>"),
        }
    }

    /// Set the literal block delimiters.
    ///
    /// # Panics
    ///
    /// If either of the strings are empty or they are equal.
    #[inline]
    pub fn literal(&mut self, begin: &'a str, end: &'a str) -> &mut Self {
        assert!(!begin.is_empty() && !end.is_empty());
        assert_ne!(begin, end, "literal delimiters must differ");
        self.literal = (begin, end);
        self
    }

    /// Builds the pattern table.
    pub fn build(&self) -> Patterns {
        let (begin, end) = self.literal;
        let table = Kind::ALL
            .iter()
            .map(|kind| match kind {
                Kind::LiteralBoundary => Matcher::Literal {
                    begin: begin.into(),
                    end: end.into(),
                },
                Kind::XmlnsDeclaration => Matcher::Regex(&XMLNS_DECLARATION),
                Kind::InlineDeclaration => Matcher::Escapable(&INLINE_DECLARATION),
                Kind::DynamicTag => Matcher::Regex(&DYNAMIC_TAG),
                Kind::OpenTag => Matcher::Regex(&OPEN_TAG),
                Kind::CloseTag => Matcher::Regex(&CLOSE_TAG),
                Kind::ShorthandSection => Matcher::Scan(scan::shorthand_section),
                Kind::ObjectAccessor => Matcher::Scan(scan::object_accessor),
                Kind::ShorthandViewHelper => Matcher::Scan(scan::view_helper),
            })
            .collect();
        Patterns { table }
    }
}

#[test]
fn kind_table_order() {
    for (i, kind) in Kind::ALL.iter().enumerate() {
        assert_eq!(*kind as usize, i);
    }
}
