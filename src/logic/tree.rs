//! Option tree construction
//!
//! Turns the flat, validated option list of a product into roots plus a
//! parent id → ordered children mapping.
//!
//! # Ordering
//!
//! Options are sorted by `display_order` ascending. The sort is stable, so
//! equal orders keep their position in the CMS export.
//!
//! # Irregular content
//!
//! | Situation                          | Handling |
//! |------------------------------------|----------|
//! | Duplicate id                       | First occurrence kept, later ones dropped |
//! | Parent id not in the tree          | Stays in that parent's bucket, never visible |
//! | Parent cycle                       | Not rejected; walks are bounded by tree size |

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;

use crate::option::PersonalizationOption;
use crate::types::PersonalizationType;

/// Parent/child structure of a product's personalization fields
#[derive(Debug, Clone, Default)]
pub struct OptionTree {
    /// All options, sorted by display order
    options: Vec<PersonalizationOption>,
    index: HashMap<String, usize>,
    roots: Vec<usize>,
    children: HashMap<String, Vec<usize>>,
}

impl OptionTree {
    /// Build the tree. Never fails; see the module docs for irregular input.
    pub fn build(options: Vec<PersonalizationOption>) -> Self {
        let mut seen = HashSet::new();
        let mut options: Vec<PersonalizationOption> = options
            .into_iter()
            .filter(|option| {
                let fresh = seen.insert(option.id.clone());
                if !fresh {
                    tracing::warn!(option = %option.id, "dropping duplicate option id");
                }
                fresh
            })
            .collect();
        options.sort_by_key(|option| option.display_order);

        let mut tree = Self {
            index: HashMap::with_capacity(options.len()),
            ..Self::default()
        };
        for (position, option) in options.iter().enumerate() {
            tree.index.insert(option.id.clone(), position);
            match &option.parent_option_id {
                Some(parent) => tree.children.entry(parent.clone()).or_default().push(position),
                None => tree.roots.push(position),
            }
        }
        tree.options = options;

        tracing::debug!(
            options = tree.options.len(),
            roots = tree.roots.len(),
            parents = tree.children.len(),
            "built option tree"
        );
        tree
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&PersonalizationOption> {
        self.index.get(id).map(|&i| &self.options[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Options without a parent, in display order
    pub fn roots(&self) -> impl Iterator<Item = &PersonalizationOption> {
        self.roots.iter().map(|&i| &self.options[i])
    }

    /// Direct children of `id`, in display order
    pub fn children_of<'a>(
        &'a self,
        id: &str,
    ) -> impl Iterator<Item = &'a PersonalizationOption> + use<'a> {
        self.children
            .get(id)
            .into_iter()
            .flatten()
            .map(|&i| &self.options[i])
    }

    /// Parent id → child ids, for inspection and serialization
    pub fn children_by_parent(&self) -> BTreeMap<&str, Vec<&str>> {
        self.children
            .iter()
            .map(|(parent, kids)| {
                (
                    parent.as_str(),
                    kids.iter().map(|&i| self.options[i].id.as_str()).collect(),
                )
            })
            .collect()
    }

    /// The parent record, when the parent exists in the tree
    pub fn parent_of(&self, option: &PersonalizationOption) -> Option<&PersonalizationOption> {
        option.parent_option_id.as_deref().and_then(|p| self.get(p))
    }

    /// Ancestors from the direct parent upwards. Stops at a missing parent or
    /// after visiting every option once, whichever comes first.
    pub fn ancestors<'a>(&'a self, option: &'a PersonalizationOption) -> Vec<&'a PersonalizationOption> {
        let mut chain = Vec::new();
        let mut current = option;
        while let Some(parent) = self.parent_of(current) {
            if chain.len() >= self.options.len() {
                tracing::warn!(option = %option.id, "parent cycle detected");
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Every descendant of `id`, depth-first in display order
    pub fn descendants_of<'a>(&'a self, id: &str) -> Vec<&'a PersonalizationOption> {
        let mut out = Vec::new();
        let mut visited = HashSet::new();
        visited.insert(id.to_string());
        self.collect_descendants(id, &mut visited, &mut out);
        out
    }

    fn collect_descendants<'a>(
        &'a self,
        id: &str,
        visited: &mut HashSet<String>,
        out: &mut Vec<&'a PersonalizationOption>,
    ) {
        for child in self.children_of(id) {
            if visited.insert(child.id.clone()) {
                out.push(child);
                self.collect_descendants(&child.id, visited, out);
            }
        }
    }

    /// All options in rendering order: each root followed depth-first by its
    /// descendants, then anything unreachable from a root (orphans, cycles).
    pub fn iter(&self) -> impl Iterator<Item = &PersonalizationOption> {
        let mut order: Vec<&PersonalizationOption> = Vec::with_capacity(self.options.len());
        let mut visited: HashSet<String> = HashSet::new();
        for root in self.roots() {
            if visited.insert(root.id.clone()) {
                order.push(root);
                self.collect_descendants(&root.id, &mut visited, &mut order);
            }
        }
        order.extend(self.options.iter().filter(|o| !visited.contains(&o.id)));
        order.into_iter()
    }

    /// Root options grouped for rendering (simple, complex, standalone)
    pub fn groups(&self) -> BTreeMap<PersonalizationType, Vec<&PersonalizationOption>> {
        let mut groups: BTreeMap<PersonalizationType, Vec<&PersonalizationOption>> = BTreeMap::new();
        for root in self.roots() {
            groups.entry(root.personalization_type).or_default().push(root);
        }
        groups
    }

    pub fn summary(&self) -> TreeSummary {
        TreeSummary {
            roots: self.roots().map(|o| o.id.clone()).collect(),
            children_by_parent: self
                .children_by_parent()
                .into_iter()
                .map(|(p, kids)| (p.to_string(), kids.into_iter().map(str::to_string).collect()))
                .collect(),
            orphans: self
                .options
                .iter()
                .filter(|o| o.parent_option_id.as_deref().is_some_and(|p| !self.contains(p)))
                .map(|o| o.id.clone())
                .collect(),
        }
    }
}

/// Serializable shape of a tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSummary {
    pub roots: Vec<String>,
    pub children_by_parent: BTreeMap<String, Vec<String>>,
    /// Options whose parent is not part of the tree
    pub orphans: Vec<String>,
}
