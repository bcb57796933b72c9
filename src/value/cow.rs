//! Defines a clone-on-write [`Value`].

use std::ops::Deref;

use crate::Value;

/// The result of evaluating an object path.
///
/// Values found in the context are borrowed from it, values produced while
/// evaluating (keywords, getter results) are owned.
#[derive(Debug, Clone)]
pub enum ValueCow<'a> {
    Borrowed(&'a Value),
    Owned(Value),
}

impl Deref for ValueCow<'_> {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Borrowed(v) => v,
            Self::Owned(v) => v,
        }
    }
}

impl ValueCow<'_> {
    /// Returns the value, cloning it if it is borrowed.
    pub fn into_owned(self) -> Value {
        match self {
            Self::Borrowed(v) => v.clone(),
            Self::Owned(v) => v,
        }
    }

    pub fn is_borrowed(&self) -> bool {
        matches!(self, Self::Borrowed(_))
    }
}

impl PartialEq<Value> for ValueCow<'_> {
    fn eq(&self, other: &Value) -> bool {
        **self == *other
    }
}
