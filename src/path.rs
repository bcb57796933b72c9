//! Evaluate object paths like `post.author.email` against a [`Context`].

use tracing::{debug, trace};

use crate::value::ValueCow;
use crate::{Context, Error, Result, Value};

/// How a single path segment is looked up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Accessor {
    /// Try the getter, then the attribute.
    #[default]
    Default,
    /// Call the object getter for the segment.
    Getter,
    /// Read the attribute, map key, or list index for the segment.
    Attribute,
}

/// A parsed object accessor expression, e.g. `{post.author.email}`.
///
/// Created once when a template is parsed and evaluated every time it is
/// rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectPath {
    path: String,
    accessors: Vec<Accessor>,
}

impl ObjectPath {
    /// Construct a path that probes every segment.
    pub fn new(path: impl Into<String>) -> Self {
        Self::with_accessors(path, Vec::new())
    }

    /// Construct a path with one accessor hint per segment.
    ///
    /// Segments without a hint use [`Accessor::Default`].
    pub fn with_accessors(path: impl Into<String>, accessors: impl Into<Vec<Accessor>>) -> Self {
        Self {
            path: path.into(),
            accessors: accessors.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.path
    }

    pub fn accessors(&self) -> &[Accessor] {
        &self.accessors
    }

    /// Evaluate the path against the context.
    pub fn evaluate<'a>(&self, context: &'a Context) -> Result<ValueCow<'a>> {
        evaluate(context, &self.path, &self.accessors)
    }
}

/// Evaluate an object path against the context.
///
/// The whole path is first compared case-insensitively against the
/// keywords: `_all` returns the context root, `true`, `on` and `yes` return
/// `true` and `false`, `off` and `no` return `false`. These can therefore not
/// be used as top-level variable names.
///
/// Otherwise every `.` separated segment is resolved against the result of
/// the previous one, starting at the context root, trying the segment's
/// accessor hint first, then the getter and then the attribute. A variable
/// missing from the root makes the whole path evaluate to [`Value::None`],
/// any other segment that cannot be resolved is an error.
pub fn evaluate<'a>(context: &'a Context, path: &str, accessors: &[Accessor]) -> Result<ValueCow<'a>> {
    match path.to_ascii_lowercase().as_str() {
        "_all" => Ok(ValueCow::Borrowed(context.root())),
        "true" | "on" | "yes" => Ok(ValueCow::Owned(Value::Bool(true))),
        "false" | "off" | "no" => Ok(ValueCow::Owned(Value::Bool(false))),
        _ => extract(context.root(), path, accessors),
    }
}

/// Returns the accessor that resolves each segment of the path, stopping at
/// the first segment that cannot be resolved.
///
/// Passing the result to [`ObjectPath::with_accessors`] skips probing when
/// the path is evaluated against similarly shaped contexts.
pub fn accessors_for(context: &Context, path: &str) -> Vec<Accessor> {
    let mut accessors = Vec::new();
    let mut current = ValueCow::Borrowed(context.root());
    for name in path.split('.') {
        match resolve(&current, name, Accessor::Default) {
            Some((value, accessor)) => {
                accessors.push(accessor);
                current = value;
            }
            None => break,
        }
    }
    accessors
}

fn extract<'a>(root: &'a Value, path: &str, accessors: &[Accessor]) -> Result<ValueCow<'a>> {
    trace!(path, "evaluating object path");
    let mut current = ValueCow::Borrowed(root);
    for (i, name) in path.split('.').enumerate() {
        let hint = accessors.get(i).copied().unwrap_or_default();
        current = match resolve(&current, name, hint) {
            Some((value, _)) => value,
            None if i == 0 && !name.is_empty() => return Ok(ValueCow::Owned(Value::None)),
            None => {
                debug!(path, segment = i, "cannot resolve object path segment");
                return Err(Error::path_resolution(path, i));
            }
        };
    }
    Ok(current)
}

/// Resolves a single segment, only cloning the edge value if `value` is
/// owned.
fn resolve<'a>(value: &ValueCow<'a>, name: &str, hint: Accessor) -> Option<(ValueCow<'a>, Accessor)> {
    if name.is_empty() {
        return None;
    }
    match value {
        &ValueCow::Borrowed(v) => probe(v, name, hint),
        ValueCow::Owned(v) => {
            let (v, accessor) = probe(v, name, hint)?;
            Some((ValueCow::Owned(v.into_owned()), accessor))
        }
    }
}

fn probe<'v>(value: &'v Value, name: &str, hint: Accessor) -> Option<(ValueCow<'v>, Accessor)> {
    [hint, Accessor::Getter, Accessor::Attribute]
        .into_iter()
        .filter(|accessor| *accessor != Accessor::Default)
        .find_map(|accessor| Some((access(value, name, accessor)?, accessor)))
}

fn access<'v>(value: &'v Value, name: &str, accessor: Accessor) -> Option<ValueCow<'v>> {
    match (accessor, value) {
        (Accessor::Getter, Value::Object(object)) => object.get(name).map(ValueCow::Owned),
        (Accessor::Attribute, Value::Object(object)) => object.attribute(name).map(ValueCow::Owned),
        (Accessor::Attribute, Value::Map(map)) => map.get(name).map(ValueCow::Borrowed),
        (Accessor::Attribute, Value::List(list)) => {
            let i = name.parse::<usize>().ok()?;
            list.get(i).map(ValueCow::Borrowed)
        }
        _ => None,
    }
}
