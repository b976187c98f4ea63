use bevy::log::warn;
use indexmap::IndexMap;
use serde_json::{ Map, Value };

use crate::I18nError;

/// Children of a section, kept in insertion order.
///
/// The order matters: a bare key is searched for in the top-level sections
/// one after another and the first hit wins.
pub type Section = IndexMap<String, TranslationNode>;

/// A value in a translation tree.
///
/// ```json
/// "nav": {
///   "dashboard": "Dashboard"
/// }
/// ```
/// `nav` is a [`TranslationNode::Section`] holding the [`TranslationNode::Leaf`] `"Dashboard"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationNode {
    /// Display text
    Leaf(String),
    /// A nested group of keys
    Section(Section),
}

impl TranslationNode {
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            TranslationNode::Leaf(text) => Some(text),
            TranslationNode::Section(_) => None,
        }
    }

    pub fn as_section(&self) -> Option<&Section> {
        match self {
            TranslationNode::Section(section) => Some(section),
            TranslationNode::Leaf(_) => None,
        }
    }
}

/// All translations of a single language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTree {
    root: Section,
}

impl TranslationTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tree from a JSON object. See [`TranslationTree::merge_json`].
    pub fn from_json(value: &Value) -> Result<Self, I18nError> {
        let mut tree = Self::new();
        tree.merge_json(value, "<root>")?;
        Ok(tree)
    }

    pub fn root(&self) -> &Section {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Walks a dot-delimited path. Every segment but the last must name a
    /// section and the last one must name a leaf.
    pub fn get_path(&self, path: &str) -> Option<&str> {
        let mut segments = path.split('.');
        let mut node = self.root.get(segments.next()?)?;
        for segment in segments {
            node = node.as_section()?.get(segment)?;
        }
        node.as_leaf()
    }

    /// Looks `key` up as-is among the top-level entries.
    pub fn get_top_level(&self, key: &str) -> Option<&str> {
        self.root.get(key).and_then(TranslationNode::as_leaf)
    }

    /// Returns the first top-level section, in insertion order, with a direct
    /// leaf child named `key`.
    pub fn find_in_sections(&self, key: &str) -> Option<&str> {
        self.root
            .values()
            .filter_map(TranslationNode::as_section)
            .find_map(|section| section.get(key).and_then(TranslationNode::as_leaf))
    }

    /// Inserts a leaf at a dot-delimited path, creating sections on the way.
    /// A leaf standing where a section is needed gets replaced.
    pub fn insert(&mut self, path: &str, text: impl Into<String>) {
        let mut segments: Vec<&str> = path.split('.').collect();
        let Some(last) = segments.pop() else {
            return;
        };

        let mut section = &mut self.root;
        for segment in segments {
            section = section_entry(section, segment);
        }
        section.insert(last.to_string(), TranslationNode::Leaf(text.into()));
    }

    /// Merges the entries of a JSON object into the root.
    ///
    /// Strings become leaves and objects become sections, merged with any
    /// section of the same name already present. Other JSON values are
    /// skipped. `origin` names the data source in diagnostics.
    pub fn merge_json(&mut self, value: &Value, origin: &str) -> Result<(), I18nError> {
        let object = value.as_object().ok_or_else(|| I18nError::InvalidRoot(origin.to_string()))?;
        merge_object(&mut self.root, object, "");
        Ok(())
    }

    /// Merges a JSON object as the section `name`.
    pub fn merge_section_json(&mut self, name: &str, value: &Value) -> Result<(), I18nError> {
        let object = value.as_object().ok_or_else(|| I18nError::InvalidRoot(name.to_string()))?;
        merge_object(section_entry(&mut self.root, name), object, name);
        Ok(())
    }

    /// Every path that ends in a leaf, depth-first in insertion order.
    pub fn leaf_paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        collect_leaf_paths(&self.root, "", &mut paths);
        paths
    }
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() { key.to_string() } else { format!("{prefix}.{key}") }
}

fn section_entry<'a>(section: &'a mut Section, key: &str) -> &'a mut Section {
    let node = section.entry(key.to_string()).or_insert_with(|| TranslationNode::Section(Section::new()));
    if let TranslationNode::Leaf(_) = node {
        *node = TranslationNode::Section(Section::new());
    }
    match node {
        TranslationNode::Section(child) => child,
        TranslationNode::Leaf(_) => unreachable!("leaf replaced by a section above"),
    }
}

fn merge_object(target: &mut Section, source: &Map<String, Value>, prefix: &str) {
    for (key, value) in source {
        match value {
            Value::String(text) => {
                target.insert(key.clone(), TranslationNode::Leaf(text.clone()));
            }
            Value::Object(nested) => {
                let path = join(prefix, key);
                merge_object(section_entry(target, key), nested, &path);
            }
            other => {
                warn!("Skipping non-text translation at '{}': {}", join(prefix, key), other);
            }
        }
    }
}

fn collect_leaf_paths(section: &Section, prefix: &str, out: &mut Vec<String>) {
    for (key, node) in section {
        let path = join(prefix, key);
        match node {
            TranslationNode::Leaf(_) => out.push(path),
            TranslationNode::Section(child) => collect_leaf_paths(child, &path, out),
        }
    }
}
