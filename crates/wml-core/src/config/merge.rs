//! Recursive overlay of one config onto another

use super::{Config, REMOVE_KEY};

impl Config {
    /// Overlay `other` onto this config.
    ///
    /// Attributes are copied across (blank values erase). For every tag in
    /// `other`, its `i`-th child is merged into this config's `i`-th child of
    /// the same tag; extra children are appended. A child carrying
    /// `__remove=yes` deletes its counterpart instead of merging into it.
    pub fn merge_with(&mut self, other: &Config) {
        self.merge_attributes(other);

        for group in &other.children {
            let tag = group.tag.as_str();
            let shared = self.child_count(tag).min(group.nodes.len());
            let mut doomed = Vec::new();

            for (index, theirs) in group.nodes[..shared].iter().enumerate() {
                if theirs.get(REMOVE_KEY).to_bool(false) {
                    doomed.push(index);
                } else if let Some(ours) = self.child_mut(tag, index) {
                    ours.merge_with(theirs);
                }
            }

            for theirs in &group.nodes[shared..] {
                self.add_child_with(tag, theirs.clone());
            }

            // Back to front so earlier indices stay valid
            for index in doomed.into_iter().rev() {
                self.remove_child(tag, index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overlays_attributes() {
        let mut base = Config::new().with("a", 1).with("b", 2);
        let patch = Config::new()
            .with("b", 20)
            .with("c", 30)
            .with("a", crate::AttributeValue::Blank);
        base.merge_with(&patch);

        assert!(!base.has_attribute("a"));
        assert_eq!(base.get("b").to_int(0), 20);
        assert_eq!(base.get("c").to_int(0), 30);
    }

    #[test]
    fn test_merge_children_positionally() {
        let mut base = Config::new();
        base.add_child("side").set("gold", 100);
        base.add_child("side").set("gold", 200);

        let mut patch = Config::new();
        patch.add_child("side");
        patch.add_child("side").set("team", "north");
        patch.add_child("side").set("gold", 50);
        base.merge_with(&patch);

        assert_eq!(base.child_count("side"), 3);
        let first = base.child("side", 0).unwrap();
        assert_eq!(first.get("gold").to_int(0), 100);
        let second = base.child("side", 1).unwrap();
        assert_eq!(second.get("gold").to_int(0), 200);
        assert_eq!(second.get("team").str(), "north");
        assert_eq!(base.child("side", 2).unwrap().get("gold").to_int(0), 50);
    }

    #[test]
    fn test_merge_recurses() {
        let mut base = Config::new();
        base.add_child("side").add_child("unit").set("hp", 10);

        let mut patch = Config::new();
        patch.add_child("side").add_child("unit").set("xp", 3);
        base.merge_with(&patch);

        let unit = base.child("side", 0).unwrap().child("unit", 0).unwrap();
        assert_eq!(unit.get("hp").to_int(0), 10);
        assert_eq!(unit.get("xp").to_int(0), 3);
    }

    #[test]
    fn test_merge_remove_marker() {
        let mut base = Config::new();
        base.add_child("item").set("id", "a");
        base.add_child("item").set("id", "b");
        base.add_child("item").set("id", "c");

        let mut patch = Config::new();
        patch.add_child("item");
        patch.add_child("item").set(REMOVE_KEY, true);
        base.merge_with(&patch);

        let ids: Vec<String> = base.child_range("item").iter().map(|c| c.get("id").str()).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn test_merge_into_empty() {
        let mut base = Config::new();
        let mut patch = Config::new().with("x", "y");
        patch.add_child("t").set("k", 1);
        base.merge_with(&patch);
        assert_eq!(base, patch);
    }
}
