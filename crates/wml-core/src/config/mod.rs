//! WML document tree
//!
//! A [`Config`] holds scalar attributes keyed by name and named groups of
//! child configs. Attributes are kept sorted by key. Groups keep the order in
//! which their tag was first added, and children inside a group are
//! positional.

mod display;
mod merge;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::attribute::{AttributeValue, BLANK};

/// Attribute that marks a child for deletion during [`Config::merge_with`]
pub const REMOVE_KEY: &str = "__remove";

/// Shared empty config handed out by read-only lookups
pub(crate) static EMPTY_CONFIG: Config = Config::new();

/// Ordered children sharing one tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ChildGroup {
    tag: String,
    nodes: Vec<Config>,
}

/// A WML node: attributes plus ordered, repeatable child groups
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    attributes: BTreeMap<String, AttributeValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<ChildGroup>,
}

/// Whether `key` can name an attribute or a tag: non-empty, ASCII
/// alphanumerics and underscores only.
pub fn valid_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

impl Config {
    pub const fn new() -> Self {
        Self {
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// No attributes and no children
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty()
    }

    pub fn clear(&mut self) {
        self.attributes.clear();
        self.children.clear();
    }

    /// Exchange contents with another config
    pub fn swap(&mut self, other: &mut Config) {
        std::mem::swap(self, other);
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    /// Attribute value, or a shared blank when absent
    pub fn get(&self, key: &str) -> &AttributeValue {
        self.attributes.get(key).unwrap_or(&BLANK)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut AttributeValue> {
        self.attributes.get_mut(key)
    }

    /// Attribute slot, created blank when absent
    pub fn entry(&mut self, key: &str) -> &mut AttributeValue {
        self.attributes.entry(key.to_string()).or_default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<AttributeValue>) {
        self.attributes.insert(key.to_string(), value.into());
    }

    /// Builder-style [`Config::set`]
    pub fn with(mut self, key: &str, value: impl Into<AttributeValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn remove_attribute(&mut self, key: &str) -> Option<AttributeValue> {
        self.attributes.remove(key)
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copy every attribute of `other` over this one. Blank values erase.
    pub fn merge_attributes(&mut self, other: &Config) {
        for (key, value) in &other.attributes {
            if value.is_blank() {
                self.attributes.remove(key);
            } else {
                self.attributes.insert(key.clone(), value.clone());
            }
        }
    }

    // =========================================================================
    // Children
    // =========================================================================

    fn group(&self, tag: &str) -> Option<&ChildGroup> {
        self.children.iter().find(|g| g.tag == tag)
    }

    fn group_position(&self, tag: &str) -> Option<usize> {
        self.children.iter().position(|g| g.tag == tag)
    }

    /// Children vector for `tag`, registering the tag if it is new
    pub(crate) fn group_mut(&mut self, tag: &str) -> &mut Vec<Config> {
        let pos = match self.group_position(tag) {
            Some(pos) => pos,
            None => {
                self.children.push(ChildGroup {
                    tag: tag.to_string(),
                    nodes: Vec::new(),
                });
                self.children.len() - 1
            }
        };
        &mut self.children[pos].nodes
    }

    /// Drop the tag entry once its last child is gone
    pub(crate) fn prune_group(&mut self, tag: &str) {
        self.children.retain(|g| g.tag != tag || !g.nodes.is_empty());
    }

    pub fn child_count(&self, tag: &str) -> usize {
        self.group(tag).map_or(0, |g| g.nodes.len())
    }

    /// Number of children across all tags
    pub fn all_children_count(&self) -> usize {
        self.children.iter().map(|g| g.nodes.len()).sum()
    }

    pub fn has_child(&self, tag: &str) -> bool {
        self.child_count(tag) > 0
    }

    pub fn child(&self, tag: &str, index: usize) -> Option<&Config> {
        self.group(tag).and_then(|g| g.nodes.get(index))
    }

    pub fn child_mut(&mut self, tag: &str, index: usize) -> Option<&mut Config> {
        self.children
            .iter_mut()
            .find(|g| g.tag == tag)
            .and_then(|g| g.nodes.get_mut(index))
    }

    /// Child at `index`, appending empty children until it exists
    pub fn child_or_insert(&mut self, tag: &str, index: usize) -> &mut Config {
        let nodes = self.group_mut(tag);
        if nodes.len() <= index {
            nodes.resize_with(index + 1, Config::new);
        }
        &mut nodes[index]
    }

    /// All children with `tag`, in order
    pub fn child_range(&self, tag: &str) -> &[Config] {
        match self.group(tag) {
            Some(g) => &g.nodes,
            None => &[],
        }
    }

    pub fn child_range_mut(&mut self, tag: &str) -> &mut [Config] {
        match self.children.iter_mut().find(|g| g.tag == tag) {
            Some(g) => g.nodes.as_mut_slice(),
            None => &mut [],
        }
    }

    /// Append an empty child and return it
    pub fn add_child(&mut self, tag: &str) -> &mut Config {
        self.add_child_with(tag, Config::new())
    }

    pub fn add_child_with(&mut self, tag: &str, child: Config) -> &mut Config {
        let nodes = self.group_mut(tag);
        nodes.push(child);
        let last = nodes.len() - 1;
        &mut nodes[last]
    }

    /// Insert a child at `index`, clamped to the current group length
    pub fn add_child_at(&mut self, tag: &str, child: Config, index: usize) -> &mut Config {
        let nodes = self.group_mut(tag);
        let index = index.min(nodes.len());
        nodes.insert(index, child);
        &mut nodes[index]
    }

    /// Remove and return the child at `index`, if present
    pub fn remove_child(&mut self, tag: &str, index: usize) -> Option<Config> {
        let pos = self.group_position(tag)?;
        let nodes = &mut self.children[pos].nodes;
        if index >= nodes.len() {
            return None;
        }
        let removed = nodes.remove(index);
        if nodes.is_empty() {
            self.children.remove(pos);
        }
        Some(removed)
    }

    pub fn clear_children(&mut self, tag: &str) {
        self.children.retain(|g| g.tag != tag);
    }

    /// Append every child of `other` under `tag`
    pub fn append_children(&mut self, other: &Config, tag: &str) {
        let theirs = other.child_range(tag);
        if theirs.is_empty() {
            return;
        }
        self.group_mut(tag).extend(theirs.iter().cloned());
    }

    /// Tags with at least one child, in first-insertion order
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.children.iter().map(|g| g.tag.as_str())
    }

    /// Every `(tag, child)` pair, grouped by tag
    pub fn all_children(&self) -> impl Iterator<Item = (&str, &Config)> {
        self.children
            .iter()
            .flat_map(|g| g.nodes.iter().map(move |c| (g.tag.as_str(), c)))
    }
}
