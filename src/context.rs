//! Defines the [`Context`] object paths are evaluated against.

use crate::value::Map;
use crate::Value;

/// The variables available to a template.
///
/// The root of a context is usually a map of variable names to values, but
/// any value can be used, for example an [`Object`][crate::Object] exposing
/// getters. Evaluating object paths never modifies the context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    root: Value,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Construct an empty context.
    pub fn new() -> Self {
        Self {
            root: Value::Map(Map::new()),
        }
    }

    /// Construct a context with the given root value.
    pub fn from_value(root: impl Into<Value>) -> Self {
        Self { root: root.into() }
    }

    /// Construct a context from any serializable value.
    ///
    /// # Examples
    ///
    /// ```
    /// #[derive(serde::Serialize)]
    /// struct Vars { user: User }
    ///
    /// #[derive(serde::Serialize)]
    /// struct User { name: String }
    ///
    /// let ctx = fluidic::Context::from_serialize(Vars { user: User { name: "John".into() } })?;
    /// assert_eq!(*fluidic::evaluate(&ctx, "user.name", &[])?, fluidic::Value::from("John"));
    /// # Ok::<(), fluidic::Error>(())
    /// ```
    #[cfg(feature = "serde")]
    #[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
    pub fn from_serialize<S>(vars: S) -> crate::Result<Self>
    where
        S: serde::Serialize,
    {
        crate::to_value(vars).map(Self::from_value)
    }

    /// Insert a variable, returning the previous value with the same name.
    ///
    /// # Panics
    ///
    /// If the root of the context is not a map.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        match &mut self.root {
            Value::Map(vars) => vars.insert(name.into(), value.into()),
            _ => panic!("context root is not a map"),
        }
    }

    /// Returns the variable with the given name if the root is a map.
    pub fn get(&self, name: &str) -> Option<&Value> {
        match &self.root {
            Value::Map(vars) => vars.get(name),
            _ => None,
        }
    }

    /// Returns the root value, what `_all` evaluates to.
    pub fn root(&self) -> &Value {
        &self.root
    }
}

impl From<Map<String, Value>> for Context {
    fn from(vars: Map<String, Value>) -> Self {
        Self::from_value(Value::Map(vars))
    }
}

impl<K, V> FromIterator<(K, V)> for Context
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let vars = iter.into_iter().map(|(k, v)| (k.into(), v.into()));
        Self::from_value(Value::Map(vars.collect()))
    }
}
