use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_TAG: &str = "button";

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct TagName(String);

/// Caller supplied description of one menu entry and its submenu.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuItemSpec {
    pub tag: Option<TagName>,
    pub icon: Option<String>,
    pub label: Option<String>,
    /// Raw markup shown instead of the icon.
    pub custom_content: Option<String>,
    pub class_name: Option<String>,
    pub attributes: BTreeMap<String, String>,
    pub id: Option<String>,
    pub href: Option<String>,
    pub target: Option<String>,
    pub rel: Option<String>,
    #[serde(alias = "submenu")]
    pub children: Vec<MenuItemSpec>,
}

impl MenuItemSpec {
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn with_children(mut self, children: Vec<MenuItemSpec>) -> Self {
        self.children = children;
        self
    }

    pub fn tag_name(&self) -> &str {
        self.tag.as_ref().map_or(DEFAULT_TAG, |t| t.as_str())
    }

    pub fn classes(&self) -> Vec<&str> {
        self.class_name
            .as_deref()
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Link the item opens, from the explicit field or the attribute bag.
    pub fn target(&self) -> Option<String> {
        self.resolved_attributes().remove("href")
    }

    /// Attribute bag merged with the explicit fields, which take precedence.
    pub fn resolved_attributes(&self) -> BTreeMap<String, String> {
        let mut attrs = self.attributes.clone();
        let explicit = [
            ("id", &self.id),
            ("href", &self.href),
            ("target", &self.target),
            ("rel", &self.rel),
        ];
        for (key, value) in explicit {
            if let Some(value) = value {
                attrs.insert(key.to_string(), value.clone());
            }
        }
        attrs
    }

    fn detached(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            icon: self.icon.clone(),
            label: self.label.clone(),
            custom_content: self.custom_content.clone(),
            class_name: self.class_name.clone(),
            attributes: self.attributes.clone(),
            id: self.id.clone(),
            href: self.href.clone(),
            target: self.target.clone(),
            rel: self.rel.clone(),
            children: Vec::new(),
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Display, From, Into,
)]
pub struct ItemId(usize);

#[derive(Debug, Clone)]
pub struct Node {
    pub spec: MenuItemSpec,
    pub parent: Option<ItemId>,
    pub depth: usize,
    pub children: Vec<ItemId>,
}

impl Node {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn label(&self) -> &str {
        self.spec.label.as_deref().unwrap_or_default()
    }
}

/// Item specs flattened into a table. Children are referenced by id.
#[derive(Debug, Clone, Default)]
pub struct MenuTree {
    nodes: Vec<Node>,
    roots: Vec<ItemId>,
}

impl MenuTree {
    pub fn new(specs: &[MenuItemSpec]) -> Self {
        let mut tree = Self::default();
        let roots = specs
            .iter()
            .map(|spec| tree.insert(spec, None, 0))
            .collect();
        tree.roots = roots;
        tree
    }

    fn insert(&mut self, spec: &MenuItemSpec, parent: Option<ItemId>, depth: usize) -> ItemId {
        let id = ItemId(self.nodes.len());
        self.nodes.push(Node {
            spec: spec.detached(),
            parent,
            depth,
            children: Vec::new(),
        });

        let children: Vec<ItemId> = spec
            .children
            .iter()
            .map(|child| self.insert(child, Some(id), depth + 1))
            .collect();
        self.nodes[id.0].children = children;
        id
    }

    pub fn roots(&self) -> &[ItemId] {
        &self.roots
    }

    pub fn get(&self, id: ItemId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn children(&self, id: ItemId) -> &[ItemId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of menu levels. The root set counts as one level even when empty.
    pub fn levels(&self) -> usize {
        self.nodes.iter().map(|n| n.depth + 1).max().unwrap_or(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<MenuItemSpec> {
        vec![
            MenuItemSpec::labeled("a").with_children(vec![
                MenuItemSpec::labeled("a1"),
                MenuItemSpec::labeled("a2")
                    .with_children(vec![MenuItemSpec::labeled("a2x")]),
            ]),
            MenuItemSpec::labeled("b"),
        ]
    }

    #[test]
    fn test_arena_structure() {
        let tree = MenuTree::new(&sample());
        assert_eq!(tree.len(), 5);
        assert_eq!(tree.levels(), 3);
        assert_eq!(tree.roots().len(), 2);

        let a = tree.roots()[0];
        let children = tree.children(a);
        assert_eq!(children.len(), 2);
        let a2 = tree.get(children[1]).unwrap();
        assert_eq!(a2.label(), "a2");
        assert_eq!(a2.parent, Some(a));
        assert_eq!(a2.depth, 1);
        assert!(a2.spec.children.is_empty());
        assert!(!tree.get(tree.roots()[1]).unwrap().has_children());
    }

    #[test]
    fn test_empty_tree_has_one_level() {
        assert_eq!(MenuTree::new(&[]).levels(), 1);
    }

    #[test]
    fn test_explicit_attributes_override_bag() {
        let mut spec = MenuItemSpec::labeled("docs");
        spec.attributes.insert("href".into(), "/old".into());
        spec.attributes.insert("data-x".into(), "1".into());
        spec.href = Some("/docs".into());
        spec.rel = Some("noopener".into());

        let attrs = spec.resolved_attributes();
        assert_eq!(attrs["href"], "/docs");
        assert_eq!(attrs["data-x"], "1");
        assert_eq!(attrs["rel"], "noopener");
        assert!(!attrs.contains_key("id"));
    }

    #[test]
    fn test_submenu_alias_and_defaults() {
        let spec: MenuItemSpec = serde_json::from_str(
            r#"{"label": "root", "class_name": "x  y", "submenu": [{"label": "child"}]}"#,
        )
        .unwrap();
        assert_eq!(spec.children.len(), 1);
        assert_eq!(spec.tag_name(), DEFAULT_TAG);
        assert_eq!(spec.classes(), vec!["x", "y"]);
    }

    #[test]
    fn test_target_falls_back_to_bag() {
        let mut spec = MenuItemSpec::labeled("site");
        assert_eq!(spec.target(), None);

        spec.attributes.insert("href".into(), "https://x".into());
        assert_eq!(spec.target().as_deref(), Some("https://x"));

        spec.href = Some("https://y".into());
        assert_eq!(spec.target().as_deref(), Some("https://y"));
    }

    #[test]
    fn test_tag_from_toml_string() {
        let spec: MenuItemSpec = serde_json::from_str(r#"{"tag": "a", "label": "link"}"#).unwrap();
        assert_eq!(spec.tag, Some(TagName::from("a".to_string())));
        assert_eq!(spec.tag_name(), "a");
    }
}
