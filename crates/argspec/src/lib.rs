//! Declarative command line argument matching.
//!
//! Describe arguments as [`Action`]s, register them in a [`Registry`], and
//! match a token list against them to get a [`Namespace`]:
//!
//! ```
//! use argspec::{ActionConfig, ArityMode, Conversion, Registry, Value};
//!
//! let registry = Registry::build(|r| {
//!     r.register(ActionConfig::count(["-v", "--verbose"]))?;
//!     r.register(ActionConfig::option(["-n"]).convert(Conversion::parse::<i64>()))?;
//!     r.register(ActionConfig::positional("files").arity(ArityMode::ZeroOrMore))?;
//!     r.register(ActionConfig::positional("out"))?;
//!     Ok(())
//! })?;
//!
//! let ns = registry.parse(["-vv", "a", "-n", "92", "b", "c"])?;
//! assert_eq!(ns["verbose"], Value::Int(2));
//! assert_eq!(ns["n"], Value::Int(92));
//! assert_eq!(ns.get_as::<Vec<String>>("files")?, ["a", "b"]);
//! assert_eq!(ns["out"], Value::from("c"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The same registry can be written with the [`actions!`] macro.

mod action;
mod error;
mod matcher;
mod namespace;
mod partition;
mod registry;
mod value;

pub use argspec_macros::actions;

pub use crate::{
    action::{Action, ActionConfig, ActionKind, ArityMode, Conversion},
    error::{ConfigError, Error, ErrorKind, MatchError, Result, Unrecognized},
    namespace::{Matches, Namespace},
    partition::partition_positionals,
    registry::{Registry, Settings},
    value::{Value, ValueError},
};
