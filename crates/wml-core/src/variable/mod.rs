//! Path-addressed variable resolution
//!
//! A variable name such as `side[1].unit.hp` is parsed into segments and
//! walked through a [`Config`] one segment at a time. The walk ends in one of
//! four states which decide what the result can be used for:
//!
//! - `Start`: empty path, the whole tree
//! - `Named`: a node plus a key not yet resolved to an attribute or a group
//! - `Indexed`: a node plus a key and a concrete child position
//! - `Temporary`: a computed read-only value (`foo.length`)

mod path;
mod policy;
mod range;

use std::fmt;

use strum::Display;

use crate::attribute::AttributeValue;
use crate::config::Config;
use crate::error::{VariableError, VariableResult};
use crate::limits::Limits;

pub use path::{Path, Segment, parse_path};
pub use policy::{Create, Policy, PolicyKind, ReadOnly, Strict, WritePolicy};
pub use range::SetMode;

/// Pseudo-key that yields the number of children in the preceding group
pub const LENGTH_KEY: &str = "length";

/// Which state a resolved path ended in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum StateKind {
    Start,
    Named,
    Indexed,
    Temporary,
}

enum State<'a, P: Policy> {
    Start(P::Node<'a>),
    Named {
        node: P::Node<'a>,
        key: String,
    },
    Indexed {
        node: P::Node<'a>,
        key: String,
        index: usize,
    },
    Temporary(AttributeValue),
}

impl<'a, P: Policy> State<'a, P> {
    fn kind(&self) -> StateKind {
        match self {
            State::Start(_) => StateKind::Start,
            State::Named { .. } => StateKind::Named,
            State::Indexed { .. } => StateKind::Indexed,
            State::Temporary(_) => StateKind::Temporary,
        }
    }

    /// Advance by one segment. `None` means the path cannot be resolved.
    fn step(self, segment: &Segment) -> Option<Self> {
        match segment {
            Segment::Key(key) => self.step_key(key),
            Segment::Index(index) => self.step_index(*index),
        }
    }

    fn step_key(self, key: &str) -> Option<Self> {
        let node = match self {
            State::Start(node) => node,
            State::Named { node, key: group } => {
                if key == LENGTH_KEY {
                    let count = P::view(&node).child_count(&group);
                    return Some(State::Temporary(AttributeValue::from(count)));
                }
                P::child_at(node, &group, 0)?
            }
            State::Indexed {
                node,
                key: group,
                index,
            } => P::child_at(node, &group, index)?,
            State::Temporary(_) => return None,
        };
        Some(State::Named {
            node,
            key: key.to_string(),
        })
    }

    fn step_index(self, index: i32) -> Option<Self> {
        let State::Named { node, key } = self else {
            return None;
        };
        let index = if index < 0 {
            let count = i64::try_from(P::view(&node).child_count(&key)).ok()?;
            count + i64::from(index)
        } else {
            i64::from(index)
        };
        let index = usize::try_from(index).ok()?;
        Some(State::Indexed { node, key, index })
    }
}

/// A resolved variable path over a borrowed tree.
///
/// The policy `P` fixes how missing children were handled while walking and
/// which accessors are available: every policy offers the shared views,
/// [`WritePolicy`] ones add mutable views, and [`Create`] adds the range
/// mutations in [`SetMode`].
pub struct VariableInfo<'a, P: Policy> {
    name: String,
    explicit_index: bool,
    state: State<'a, P>,
}

pub type ReadAccess<'a> = VariableInfo<'a, ReadOnly>;
pub type WriteAccess<'a> = VariableInfo<'a, Create>;
pub type StrictAccess<'a> = VariableInfo<'a, Strict>;

impl<'a, P: Policy> VariableInfo<'a, P> {
    /// Resolve `name` against `root` with default [`Limits`]
    pub fn new(name: &str, root: P::Node<'a>) -> VariableResult<Self> {
        Self::with_limits(name, root, &Limits::default())
    }

    pub fn with_limits(name: &str, root: P::Node<'a>, limits: &Limits) -> VariableResult<Self> {
        let path = parse_path(name, limits)?;
        let mut state = State::Start(root);
        for segment in path.segments() {
            state = state
                .step(segment)
                .ok_or_else(|| VariableError::invalid(name))?;
        }
        Ok(Self {
            name: name.to_string(),
            explicit_index: path.ends_with_index(),
            state,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> StateKind {
        self.state.kind()
    }

    /// Whether the path ended in an explicit `[i]`
    pub fn explicit_index(&self) -> bool {
        self.explicit_index
    }

    fn invalid(&self) -> VariableError {
        VariableError::invalid(&self.name)
    }

    /// True for a computed value or an attribute that is actually set
    pub fn exists_as_attribute(&self) -> bool {
        match &self.state {
            State::Temporary(_) => true,
            State::Named { node, key } => P::view(node).has_attribute(key),
            _ => false,
        }
    }

    /// True when the path names an existing child (or the whole tree)
    pub fn exists_as_container(&self) -> bool {
        match &self.state {
            State::Start(_) => true,
            State::Named { node, key } => P::view(node).has_child(key),
            State::Indexed { node, key, index } => P::view(node).child_count(key) > *index,
            State::Temporary(_) => false,
        }
    }

    /// The scalar the path names. Missing attributes read as blank.
    pub fn as_scalar(&self) -> VariableResult<&AttributeValue> {
        match &self.state {
            State::Named { node, key } => Ok(P::view(node).get(key)),
            State::Temporary(value) => Ok(value),
            _ => Err(self.invalid()),
        }
    }

    /// The node the path names, without creating anything
    pub fn as_container(&self) -> VariableResult<&Config> {
        let found = match &self.state {
            State::Start(node) => Some(P::view(node)),
            State::Named { node, key } => P::read_child(P::view(node), key, 0),
            State::Indexed { node, key, index } => P::read_child(P::view(node), key, *index),
            State::Temporary(_) => None,
        };
        found.ok_or_else(|| self.invalid())
    }

    /// The whole group for a named path, or the single indexed child
    pub fn as_array(&self) -> VariableResult<&[Config]> {
        match &self.state {
            State::Named { node, key } => Ok(P::view(node).child_range(key)),
            State::Indexed { node, key, index } => P::read_child(P::view(node), key, *index)
                .map(std::slice::from_ref)
                .ok_or_else(|| self.invalid()),
            _ => Err(self.invalid()),
        }
    }
}

impl<'a, P: WritePolicy> VariableInfo<'a, P> {
    /// Writable attribute slot, created blank if absent.
    ///
    /// Computed values such as `length` cannot be written.
    pub fn as_scalar_mut(&mut self) -> VariableResult<&mut AttributeValue> {
        match &mut self.state {
            State::Named { node, key } => Ok(P::view_mut(node).entry(key)),
            _ => Err(VariableError::invalid(&self.name)),
        }
    }

    pub fn as_container_mut(&mut self) -> VariableResult<&mut Config> {
        let name = &self.name;
        let found = match &mut self.state {
            State::Start(node) => Some(P::view_mut(node)),
            State::Named { node, key } => P::child_at_mut(P::view_mut(node), key, 0),
            State::Indexed { node, key, index } => {
                P::child_at_mut(P::view_mut(node), key, *index)
            }
            State::Temporary(_) => None,
        };
        found.ok_or_else(|| VariableError::invalid(name))
    }

    pub fn as_array_mut(&mut self) -> VariableResult<&mut [Config]> {
        let name = &self.name;
        match &mut self.state {
            State::Named { node, key } => Ok(P::view_mut(node).child_range_mut(key)),
            State::Indexed { node, key, index } => {
                P::child_at_mut(P::view_mut(node), key, *index)
                    .map(std::slice::from_mut)
                    .ok_or_else(|| VariableError::invalid(name))
            }
            _ => Err(VariableError::invalid(name)),
        }
    }

    /// Remove what the path names.
    ///
    /// A named path drops every child of the group and, unless `only_tables`
    /// is set, the attribute of the same name. An indexed path drops that one
    /// child.
    pub fn clear(&mut self, only_tables: bool) -> VariableResult<()> {
        match &mut self.state {
            State::Named { node, key } => {
                let cfg = P::view_mut(node);
                cfg.clear_children(key);
                if !only_tables {
                    cfg.remove_attribute(key);
                }
                Ok(())
            }
            State::Indexed { node, key, index } => {
                P::view_mut(node).remove_child(key, *index);
                Ok(())
            }
            _ => Err(VariableError::invalid(&self.name)),
        }
    }
}

impl<P: Policy> fmt::Debug for VariableInfo<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableInfo")
            .field("name", &self.name)
            .field("policy", &P::KIND)
            .field("state", &self.state.kind())
            .finish()
    }
}
