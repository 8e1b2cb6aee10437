//! Resolution policies
//!
//! A policy decides what happens when a path names a child that does not
//! exist. The walking algorithm is shared; the policy is a type parameter so
//! read-only resolution can work on `&Config` while the mutating policies
//! hold `&mut Config`.

use strum::Display;

use crate::config::{Config, EMPTY_CONFIG};

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::ReadOnly {}
    impl Sealed for super::Create {}
    impl Sealed for super::Strict {}
}

/// Runtime name of a policy, used in diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum PolicyKind {
    ReadOnly,
    Create,
    Strict,
}

/// Missing-node behaviour shared by all resolution policies
pub trait Policy: sealed::Sealed {
    /// Reference to a node held while walking
    type Node<'a>;

    const KIND: PolicyKind;

    fn view<'b>(node: &'b Self::Node<'_>) -> &'b Config;

    /// Step into child `index` of group `tag`. `None` means the path is
    /// unusable under this policy.
    fn child_at<'a>(node: Self::Node<'a>, tag: &str, index: usize) -> Option<Self::Node<'a>>;

    /// Child lookup for shared views, which never create anything
    fn read_child<'b>(cfg: &'b Config, tag: &str, index: usize) -> Option<&'b Config> {
        Some(cfg.child(tag, index).unwrap_or(&EMPTY_CONFIG))
    }
}

/// Policies that hold the tree mutably
pub trait WritePolicy: Policy {
    fn view_mut<'b>(node: &'b mut Self::Node<'_>) -> &'b mut Config;

    fn child_at_mut<'b>(cfg: &'b mut Config, tag: &str, index: usize) -> Option<&'b mut Config>;
}

/// Never mutates; missing children read as a shared empty config
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadOnly;

/// Creates missing children, padding groups with empty configs
#[derive(Debug, Clone, Copy, Default)]
pub struct Create;

/// Fails on any missing child without touching the tree
#[derive(Debug, Clone, Copy, Default)]
pub struct Strict;

impl Policy for ReadOnly {
    type Node<'a> = &'a Config;

    const KIND: PolicyKind = PolicyKind::ReadOnly;

    fn view<'b>(node: &'b Self::Node<'_>) -> &'b Config {
        node
    }

    fn child_at<'a>(node: Self::Node<'a>, tag: &str, index: usize) -> Option<Self::Node<'a>> {
        Self::read_child(node, tag, index)
    }
}

impl Policy for Create {
    type Node<'a> = &'a mut Config;

    const KIND: PolicyKind = PolicyKind::Create;

    fn view<'b>(node: &'b Self::Node<'_>) -> &'b Config {
        node
    }

    fn child_at<'a>(node: Self::Node<'a>, tag: &str, index: usize) -> Option<Self::Node<'a>> {
        Self::child_at_mut(node, tag, index)
    }
}

impl WritePolicy for Create {
    fn view_mut<'b>(node: &'b mut Self::Node<'_>) -> &'b mut Config {
        node
    }

    fn child_at_mut<'b>(cfg: &'b mut Config, tag: &str, index: usize) -> Option<&'b mut Config> {
        Some(cfg.child_or_insert(tag, index))
    }
}

impl Policy for Strict {
    type Node<'a> = &'a mut Config;

    const KIND: PolicyKind = PolicyKind::Strict;

    fn view<'b>(node: &'b Self::Node<'_>) -> &'b Config {
        node
    }

    fn child_at<'a>(node: Self::Node<'a>, tag: &str, index: usize) -> Option<Self::Node<'a>> {
        Self::child_at_mut(node, tag, index)
    }

    fn read_child<'b>(cfg: &'b Config, tag: &str, index: usize) -> Option<&'b Config> {
        cfg.child(tag, index)
    }
}

impl WritePolicy for Strict {
    fn view_mut<'b>(node: &'b mut Self::Node<'_>) -> &'b mut Config {
        node
    }

    fn child_at_mut<'b>(cfg: &'b mut Config, tag: &str, index: usize) -> Option<&'b mut Config> {
        cfg.child_mut(tag, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_sides() -> Config {
        let mut cfg = Config::new();
        cfg.add_child("side").set("gold", 100);
        cfg.add_child("side");
        cfg
    }

    #[test]
    fn test_read_only_misses_are_empty() {
        let cfg = two_sides();
        let found = ReadOnly::child_at(&cfg, "side", 0).unwrap();
        assert_eq!(found.get("gold").to_int(0), 100);

        let missing = ReadOnly::child_at(&cfg, "side", 7).unwrap();
        assert!(missing.is_empty());
        assert_eq!(cfg.child_count("side"), 2);
    }

    #[test]
    fn test_create_pads_group() {
        let mut cfg = two_sides();
        Create::child_at(&mut cfg, "side", 5).unwrap().set("gold", 5);
        assert_eq!(cfg.child_count("side"), 6);
        assert!(cfg.child("side", 4).unwrap().is_empty());
    }

    #[test]
    fn test_strict_refuses_missing() {
        let mut cfg = two_sides();
        assert!(Strict::child_at(&mut cfg, "side", 2).is_none());
        assert!(Strict::child_at(&mut cfg, "unit", 0).is_none());
        assert!(Strict::read_child(&cfg, "side", 2).is_none());
        assert!(Strict::child_at(&mut cfg, "side", 1).is_some());
        assert_eq!(cfg, two_sides());
    }

    fn descend<'a, P: Policy>(
        mut node: P::Node<'a>,
        steps: &[(&str, usize)],
    ) -> Option<P::Node<'a>> {
        for (tag, index) in steps {
            node = P::child_at(node, tag, *index)?;
        }
        Some(node)
    }

    #[test]
    fn test_generic_descent_per_policy() {
        let steps = [("side", 1), ("unit", 2)];

        let mut cfg = two_sides();
        let unit = descend::<Create>(&mut cfg, &steps).unwrap();
        unit.set("hp", 7);
        assert_eq!(cfg.child("side", 1).unwrap().child_count("unit"), 3);

        let read = descend::<ReadOnly>(&cfg, &steps).unwrap();
        assert_eq!(read.get("hp").to_int(0), 7);
        assert!(descend::<ReadOnly>(&cfg, &[("side", 9)]).unwrap().is_empty());

        let before = cfg.clone();
        assert!(descend::<Strict>(&mut cfg, &[("side", 1), ("unit", 3)]).is_none());
        assert_eq!(
            descend::<Strict>(&mut cfg, &steps).unwrap().get("hp").to_int(0),
            7
        );
        assert_eq!(cfg, before);
    }

    #[test]
    fn test_policy_names() {
        assert_eq!(ReadOnly::KIND.to_string(), "read-only");
        assert_eq!(Create::KIND.to_string(), "create");
        assert_eq!(Strict::KIND.to_string(), "strict");
    }
}
