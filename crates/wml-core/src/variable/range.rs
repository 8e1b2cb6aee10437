//! Bulk mutations over a range of sibling children
//!
//! The target range comes from the resolved path: a named path covers the
//! whole group, an indexed path covers the single slot `[i, i + 1)`.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::{Create, State, VariableInfo, WritePolicy};
use crate::config::Config;
use crate::error::{VariableError, VariableResult};

/// How supplied children are combined with the target range
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SetMode {
    /// Swap the range for the supplied children
    #[default]
    Replace,
    /// Merge the supplied children into the existing ones position by position
    Merge,
    /// Add after the last child of the group
    Append,
    /// Add before the start of the range
    Insert,
}

impl<'a> VariableInfo<'a, Create> {
    /// Node, group tag and `[start, end)` the path designates
    fn target(&mut self) -> VariableResult<(&mut Config, &str, usize, usize)> {
        match &mut self.state {
            State::Named { node, key } => {
                let cfg = Create::view_mut(node);
                let len = cfg.child_count(key);
                Ok((cfg, key.as_str(), 0, len))
            }
            State::Indexed { node, key, index } => {
                Ok((Create::view_mut(node), key.as_str(), *index, *index + 1))
            }
            _ => Err(VariableError::invalid(&self.name)),
        }
    }

    /// Apply `data` to the target range according to `mode`
    pub fn set_range(&mut self, data: Vec<Config>, mode: SetMode) -> VariableResult<()> {
        match mode {
            SetMode::Replace => self.replace_range(data).map(|_| ()),
            SetMode::Merge => self.merge_range(data),
            SetMode::Append => self.append_range(data).map(|_| ()),
            SetMode::Insert => self.insert_range(data).map(|_| ()),
        }
    }

    /// Replace the target range with `data`, growing or shrinking the group
    pub fn replace_range(&mut self, data: Vec<Config>) -> VariableResult<&mut [Config]> {
        let (cfg, tag, start, end) = self.target()?;
        Ok(splice_children(cfg, tag, start, end, data))
    }

    /// Insert `data` before the start of the target range
    pub fn insert_range(&mut self, data: Vec<Config>) -> VariableResult<&mut [Config]> {
        let (cfg, tag, start, _) = self.target()?;
        Ok(splice_children(cfg, tag, start, start, data))
    }

    /// Add `data` after the last child of the group, whatever the index
    pub fn append_range(&mut self, data: Vec<Config>) -> VariableResult<&mut [Config]> {
        let (cfg, tag, _, _) = self.target()?;
        let len = cfg.child_count(tag);
        Ok(splice_children(cfg, tag, len, len, data))
    }

    /// Merge `data` into the children starting at the target range
    pub fn merge_range(&mut self, data: Vec<Config>) -> VariableResult<()> {
        let (cfg, tag, start, _) = self.target()?;
        let mut scratch = Config::new();
        for _ in 0..start {
            scratch.add_child(tag);
        }
        for child in data {
            scratch.add_child_with(tag, child);
        }
        cfg.merge_with(&scratch);
        Ok(())
    }
}

/// Make `[start, end)` of group `tag` hold exactly `data`, creating empty
/// children first so that `end` is in bounds.
fn splice_children<'c>(
    cfg: &'c mut Config,
    tag: &str,
    start: usize,
    end: usize,
    data: Vec<Config>,
) -> &'c mut [Config] {
    if end > 0 {
        cfg.child_or_insert(tag, end - 1);
    }
    let count = data.len();
    let removed: Vec<Config> = cfg.group_mut(tag).splice(start..end, data).collect();
    tracing::trace!(
        target: "wml::variables",
        tag,
        start,
        removed = removed.len(),
        inserted = count,
        "range replaced"
    );
    if count == 0 {
        cfg.prune_group(tag);
        return &mut [];
    }
    cfg.child_range_mut(tag)
        .get_mut(start..start + count)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variable::WriteAccess;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    fn numbered(tag: &str, ns: &[i64]) -> Config {
        let mut cfg = Config::new();
        for n in ns {
            cfg.add_child(tag).set("n", *n);
        }
        cfg
    }

    fn items(ns: &[i64]) -> Vec<Config> {
        ns.iter().map(|n| Config::new().with("n", *n)).collect()
    }

    fn ns(cfg: &Config, tag: &str) -> Vec<i64> {
        cfg.child_range(tag).iter().map(|c| c.get("n").to_int(-1)).collect()
    }

    #[test]
    fn test_mode_names() {
        let names: Vec<String> = SetMode::iter().map(|m| m.to_string()).collect();
        assert_eq!(names, ["replace", "merge", "append", "insert"]);
        assert_eq!(SetMode::from_str("insert").unwrap(), SetMode::Insert);
        assert!(SetMode::from_str("prepend").is_err());
    }

    #[test]
    fn test_replace_whole_group() {
        let mut root = numbered("a", &[1, 2, 3]);
        let mut info = WriteAccess::new("a", &mut root).unwrap();
        let replaced = info.replace_range(items(&[7, 8])).unwrap();
        assert_eq!(replaced.len(), 2);
        assert_eq!(ns(&root, "a"), [7, 8]);
    }

    #[test]
    fn test_replace_with_nothing_clears_group() {
        let mut root = numbered("a", &[1, 2, 3]);
        WriteAccess::new("a", &mut root)
            .unwrap()
            .replace_range(Vec::new())
            .unwrap();
        assert_eq!(root.child_count("a"), 0);
        assert!(root.is_empty());
    }

    #[test]
    fn test_replace_single_index_grows() {
        let mut root = numbered("a", &[1, 2, 3]);
        WriteAccess::new("a[1]", &mut root)
            .unwrap()
            .replace_range(items(&[20, 21, 22]))
            .unwrap();
        assert_eq!(ns(&root, "a"), [1, 20, 21, 22, 3]);
    }

    #[test]
    fn test_replace_past_end_pads() {
        let mut root = numbered("a", &[1]);
        WriteAccess::new("a[3]", &mut root)
            .unwrap()
            .replace_range(items(&[9]))
            .unwrap();
        assert_eq!(ns(&root, "a"), [1, -1, -1, 9]);
    }

    #[test]
    fn test_insert_shifts_existing() {
        let mut root = numbered("a", &[1, 2, 3]);
        WriteAccess::new("a[1]", &mut root)
            .unwrap()
            .insert_range(items(&[10, 11]))
            .unwrap();
        assert_eq!(ns(&root, "a"), [1, 10, 11, 2, 3]);
    }

    #[test]
    fn test_insert_on_named_path_prepends() {
        let mut root = numbered("a", &[1, 2]);
        WriteAccess::new("a", &mut root)
            .unwrap()
            .insert_range(items(&[0]))
            .unwrap();
        assert_eq!(ns(&root, "a"), [0, 1, 2]);
    }

    #[test]
    fn test_insert_past_end_pads() {
        let mut root = Config::new();
        WriteAccess::new("a[2]", &mut root)
            .unwrap()
            .insert_range(items(&[5]))
            .unwrap();
        assert_eq!(ns(&root, "a"), [-1, -1, 5]);
    }

    #[test]
    fn test_append_ignores_index() {
        let mut root = numbered("a", &[1, 2]);
        let mut info = WriteAccess::new("a[0]", &mut root).unwrap();
        let added = info.append_range(items(&[3])).unwrap();
        assert_eq!(added.len(), 1);
        assert_eq!(ns(&root, "a"), [1, 2, 3]);
    }

    #[test]
    fn test_append_nested_creates_parent() {
        let mut root = Config::new();
        WriteAccess::new("store.item", &mut root)
            .unwrap()
            .set_range(items(&[1]), SetMode::Append)
            .unwrap();
        let store = root.child("store", 0).unwrap();
        assert_eq!(ns(store, "item"), [1]);
    }

    #[test]
    fn test_merge_keeps_existing() {
        let mut root = numbered("a", &[1, 2]);
        root.child_mut("a", 1).unwrap().set("keep", "yes");
        WriteAccess::new("a[1]", &mut root)
            .unwrap()
            .merge_range(items(&[20, 30]))
            .unwrap();

        assert_eq!(ns(&root, "a"), [1, 20, 30]);
        assert!(root.child("a", 1).unwrap().get("keep").to_bool(false));
    }

    #[test]
    fn test_merge_past_end_pads() {
        let mut root = numbered("a", &[1]);
        WriteAccess::new("a[3]", &mut root)
            .unwrap()
            .set_range(items(&[4]), SetMode::Merge)
            .unwrap();
        assert_eq!(ns(&root, "a"), [1, -1, -1, 4]);
    }

    #[test]
    fn test_range_ops_reject_temporary_and_start() {
        let mut root = numbered("a", &[1]);
        let mut info = WriteAccess::new("a.length", &mut root).unwrap();
        for mode in SetMode::iter() {
            assert!(info.set_range(items(&[1]), mode).is_err());
        }
        let mut info = WriteAccess::new("", &mut root).unwrap();
        assert!(info.set_range(items(&[1]), SetMode::Replace).is_err());
        assert_eq!(ns(&root, "a"), [1]);
    }
}
