//! wml-core: WML document tree and variable resolution
//!
//! Scenario variables live in a [`Config`] tree. Scripts address them with
//! dotted, bracketed paths (`side[1].unit.hp`, `side.length`) which
//! [`VariableInfo`] resolves under one of three policies: read-only,
//! create-on-demand, or strict. [`VariableStore`] wraps a tree with the
//! operations a scripting engine performs on it.
//!
//! ```
//! use wml_core::VariableStore;
//!
//! let mut store = VariableStore::new();
//! store.set_variable("side[1].gold", 100);
//! assert_eq!(store.get_variable("side.length").to_int(0), 2);
//! assert_eq!(store.get_variable("side[-1].gold").to_int(0), 100);
//! ```

pub mod attribute;
pub mod config;
pub mod error;
pub mod limits;
pub mod store;
pub mod variable;

pub use attribute::{AttributeKind, AttributeValue};
pub use config::{Config, REMOVE_KEY, valid_key};
pub use error::{VariableError, VariableResult};
pub use limits::{DEFAULT_MAX_LOOP, Limits};
pub use store::VariableStore;
pub use variable::{
    Create, LENGTH_KEY, Path, Policy, PolicyKind, ReadAccess, ReadOnly, Segment, SetMode,
    StateKind, Strict, StrictAccess, VariableInfo, WriteAccess, WritePolicy, parse_path,
};
