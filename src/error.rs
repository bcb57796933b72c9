use std::cmp::{max, min};
use std::fmt;

use crate::types::span::Span;

/// An error that can occur during preprocessing or path evaluation.
#[derive(Clone)]
pub struct Error {
    kind: ErrorKind,
    span: Option<(String, Span)>,
}

/// The kind of an [`Error`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A tag or shorthand expression uses a namespace that is neither
    /// registered nor ignored.
    UnknownNamespace {
        /// The namespace identifier.
        identifier: String,
        /// The offending text, HTML escaped for display.
        text: String,
    },

    /// A segment of an object path could not be resolved.
    PathResolution {
        /// The entire object path.
        path: String,
        /// The zero based index of the segment that failed.
        segment: usize,
    },

    /// A value could not be serialized.
    #[cfg(feature = "serde")]
    Serialize(String),
}

impl Error {
    pub(crate) fn unknown_namespace(
        identifier: impl Into<String>,
        text: impl Into<String>,
        source: &str,
        span: impl Into<Span>,
    ) -> Self {
        assert!(!source.is_empty(), "source must be populated");
        Self {
            kind: ErrorKind::UnknownNamespace {
                identifier: identifier.into(),
                text: text.into(),
            },
            span: Some((source.to_string(), span.into())),
        }
    }

    pub(crate) fn path_resolution(path: &str, segment: usize) -> Self {
        Self {
            kind: ErrorKind::PathResolution {
                path: path.to_owned(),
                segment,
            },
            span: None,
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the region of the preprocessed source this error refers to,
    /// if there is one.
    pub fn span(&self) -> Option<Span> {
        self.span.as_ref().map(|(_, span)| *span)
    }

    fn msg(&self) -> String {
        match &self.kind {
            ErrorKind::UnknownNamespace { text, .. } => format!("unknown namespace: {text}"),
            ErrorKind::PathResolution { path, segment } => {
                let name = path.split('.').nth(*segment).unwrap_or_default();
                format!("cannot resolve `{name}` (segment {segment}) of object path `{path}`")
            }
            #[cfg(feature = "serde")]
            ErrorKind::Serialize(msg) => msg.clone(),
        }
    }
}

#[cfg(feature = "serde")]
impl serde::ser::Error for Error {
    fn custom<T>(msg: T) -> Self
    where
        T: fmt::Display,
    {
        Self {
            kind: ErrorKind::Serialize(msg.to_string()),
            span: None,
        }
    }
}

impl std::error::Error for Error {}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.span {
            Some((source, span)) => fmt_pretty(&self.msg(), source, *span, f),
            None => write!(f, "{}", self.msg()),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.span {
            Some((source, span)) => {
                if f.alternate() {
                    fmt_pretty(&self.msg(), source, *span, f)
                } else {
                    write!(f, "{} between bytes {} and {}", self.msg(), span.m, span.n)
                }
            }
            None => write!(f, "{}", self.msg()),
        }
    }
}

/// Renders the line containing the start of `span` and underlines the part
/// of the span that falls on that line.
fn fmt_pretty(msg: &str, source: &str, span: Span, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let start = source[..span.m].rfind('\n').map_or(0, |i| i + 1);
    let end = source[span.m..].find('\n').map_or(source.len(), |i| span.m + i);
    let code = source[start..end].trim_end_matches('\r');

    let line = source[..span.m].matches('\n').count();
    let col = width(&source[start..span.m]);
    let underline = max(1, width(&source[span.m..min(span.n, end)]));

    let num = (line + 1).to_string();
    let pad = width(&num);
    let pipe = "|";
    let carets = "^".repeat(underline);

    write!(
        f,
        "\n \
        {0:pad$} {pipe}\n \
        {num:>} {pipe} {code}\n \
        {0:pad$} {pipe} {carets:>width$} {msg}\n",
        "",
        pad = pad,
        pipe = pipe,
        num = num,
        code = code,
        carets = carets,
        width = col + underline,
        msg = msg
    )
}

#[cfg(feature = "unicode")]
fn width(s: &str) -> usize {
    unicode_width::UnicodeWidthStr::width(s)
}

#[cfg(not(feature = "unicode"))]
fn width(s: &str) -> usize {
    s.chars().count()
}
