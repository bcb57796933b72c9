//! Defines the [`Value`] enum, representing any data a template can access.

mod cow;
mod from;
#[cfg(feature = "serde")]
mod ser;

pub use std::collections::BTreeMap as Map;
use std::fmt;
use std::mem;
use std::sync::Arc;
pub use std::vec::Vec as List;

pub use crate::value::cow::ValueCow;
#[cfg(feature = "serde")]
pub use crate::value::ser::to_value;

/// Data accessible from object paths represented as a recursive enum.
#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(List<Value>),
    Map(Map<String, Value>),
    Object(Arc<dyn Object>),
}

/// Host data with getters and attributes.
///
/// Object paths resolve each segment against an object by first calling its
/// getter and then reading its attribute. Both return [`None`] when there is
/// no such member, a member that exists but holds nothing should return
/// `Some(Value::None)`.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use fluidic::{evaluate, Context, Object, Value};
///
/// #[derive(Debug)]
/// struct Post {
///     title: String,
/// }
///
/// impl Object for Post {
///     fn get(&self, name: &str) -> Option<Value> {
///         match name {
///             "title" => Some(Value::from(self.title.to_uppercase())),
///             _ => None,
///         }
///     }
/// }
///
/// let mut ctx = Context::new();
/// ctx.insert("post", Arc::new(Post { title: "hello".into() }));
/// let title = evaluate(&ctx, "post.title", &[])?;
/// assert_eq!(*title, Value::from("HELLO"));
/// # Ok::<(), fluidic::Error>(())
/// ```
pub trait Object: fmt::Debug + Send + Sync {
    /// Calls the getter for `name`, e.g. `get_title()` for `title`.
    fn get(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Reads the public attribute `name`.
    fn attribute(&self, _name: &str) -> Option<Value> {
        None
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(s), Self::Bool(o)) => s == o,
            (Self::Integer(s), Self::Integer(o)) => s == o,
            (Self::Float(s), Self::Float(o)) => s == o,
            (Self::String(s), Self::String(o)) => s == o,
            (Self::List(s), Self::List(o)) => s == o,
            (Self::Map(s), Self::Map(o)) => s == o,
            (Self::Object(s), Self::Object(o)) => {
                Arc::as_ptr(s) as *const () == Arc::as_ptr(o) as *const ()
            }
            _ => mem::discriminant(self) == mem::discriminant(other),
        }
    }
}

impl Eq for Value {}

impl Default for Value {
    fn default() -> Self {
        Self::None
    }
}
