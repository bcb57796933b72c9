//! The front-end of a Fluid-style template engine.
//!
//! # Features
//!
//! ### Preprocessing
//!
//! - Literal blocks: `<![CDATA[ ... ]]>` content is masked before scanning
//! - Namespace declarations: `xmlns:f="..."` and `{namespace f=Vendor\Helpers}`
//! - Ignored namespaces: `{namespace foo}`, `{namespace foo*}`
//! - Validation of every tag `<f:if>` and shorthand view helper
//!   `{post.title -> f:format.raw()}` against the declared namespaces
//! - Line numbers are preserved so parser diagnostics point at the original
//!   source
//!
//! ### Object paths
//!
//! - Dotted paths: `post.author.email`
//! - Keywords: `_all`, `true`, `on`, `yes`, `false`, `off`, `no`
//! - Getter, attribute, map key and list index access
//! - Render using any [`serde`] serializable values or custom [`Object`]s
//!
//! # Getting started
//!
//! Template source is passed through a [`Preprocessor`] together with the
//! [`Namespaces`] registry for that template.
//!
//! ```
//! use fluidic::{Namespaces, Preprocessor};
//!
//! let preprocessor = Preprocessor::new();
//! let mut namespaces = Namespaces::new();
//! namespaces.register("f", Some("Vendor\\Fluid\\ViewHelpers"));
//!
//! let source = preprocessor.preprocess("<f:if condition=\"{visible}\">Hi</f:if>", &mut namespaces)?;
//! assert_eq!(source, "<f:if condition=\"{visible}\">Hi</f:if>");
//!
//! let err = preprocessor.preprocess("<x:unknown />", &mut namespaces).unwrap_err();
//! assert_eq!(err.to_string(), "unknown namespace: &lt;x:unknown /&gt; between bytes 0 and 13");
//! # Ok::<(), fluidic::Error>(())
//! ```
//!
//! Object paths are evaluated against a [`Context`].
//!
//! ```
//! use fluidic::{Context, ObjectPath, Value};
//!
//! let mut ctx = Context::new();
//! ctx.insert("user", Value::from_iter([("name", "John Smith")]));
//!
//! let path = ObjectPath::new("user.name");
//! assert_eq!(*path.evaluate(&ctx)?, Value::from("John Smith"));
//! assert_eq!(*ObjectPath::new("Yes").evaluate(&ctx)?, Value::Bool(true));
//! # Ok::<(), fluidic::Error>(())
//! ```
//!
//! # Errors
//!
//! Errors render the offending source line when formatted with `{:#}`.
//!
//! ```
//! let mut namespaces = fluidic::Namespaces::new();
//! let err = fluidic::Preprocessor::new()
//!     .preprocess("lorem <bad:tag/>", &mut namespaces)
//!     .unwrap_err();
//! assert_eq!(
//!     format!("{:#}", err),
//!     "
//!    |
//!  1 | lorem <bad:tag/>
//!    |       ^^^^^^^^^^ unknown namespace: &lt;bad:tag/&gt;
//! "
//! );
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

mod context;
mod error;
mod namespace;
mod path;
mod patterns;
mod preprocess;
mod types;
mod value;

pub use crate::context::Context;
pub use crate::error::{Error, ErrorKind};
pub use crate::namespace::{Namespaces, Translate, UriTranslator};
pub use crate::path::{accessors_for, evaluate, Accessor, ObjectPath};
pub use crate::patterns::{Kind, Match, Matches, Patterns, PatternsBuilder, Role};
pub use crate::preprocess::Preprocessor;
pub use crate::types::span::Span;
#[cfg(feature = "serde")]
pub use crate::value::to_value;
pub use crate::value::{List, Map, Object, Value, ValueCow};

/// A type alias for results in this crate.
pub type Result<T> = std::result::Result<T, Error>;
