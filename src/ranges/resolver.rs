//! Hierarchy and inherited values for one [`Range`].
//!
//! A range stores its elements flat with parent ids. [`Resolver`] indexes
//! them once and answers two questions:
//!
//! - **tree**: the parent/child forest, as nested [`ResolvedNode`]s or as a
//!   pre-order list of [`FlatNode`]s with a depth for indentation;
//! - **effective values**: an element's own label/abbrev, else the nearest
//!   ancestor's, else the element's own id.
//!
//! A parent id that does not exist in the range makes the element a root.
//! Parent cycles are cut: every element on a cycle is treated as a root and
//! the cycle is reported as a warning. None of the walks recurse, so deep or
//! broken hierarchies cannot overflow the stack.

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::base::Multitext;
use crate::config::ResolverConfig;

use super::{Range, ResolverError};

/// Inherited display values of one element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Effective {
    pub label: String,
    pub abbrev: String,
}

/// An element placed in the hierarchy.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedNode {
    pub id: String,
    /// Parent as used in the tree: `None` for roots, including elements
    /// whose declared parent is missing or part of a cycle.
    pub parent: Option<String>,
    pub depth: usize,
    pub label: String,
    pub abbrev: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub children: Vec<ResolvedNode>,
}

impl ResolvedNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// One row of the flattened view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FlatNode {
    pub id: String,
    pub parent: Option<String>,
    pub depth: usize,
    pub label: String,
    pub abbrev: String,
    pub is_leaf: bool,
}

/// The resolved forest of a range plus whatever went wrong building it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedTree {
    pub range: String,
    pub roots: Vec<ResolvedNode>,
    pub warnings: Vec<ResolverError>,
}

impl ResolvedTree {
    pub fn roots(&self) -> &[ResolvedNode] {
        &self.roots
    }

    /// Cycles found while building; the tree itself is still complete.
    pub fn warnings(&self) -> &[ResolverError] {
        &self.warnings
    }

    /// Pre-order list: each parent directly before its children, siblings in
    /// range order. With `leaves_only`, category headers (nodes that have
    /// children) are left out but depths are unchanged.
    pub fn flatten(&self, leaves_only: bool) -> Vec<FlatNode> {
        let mut out = Vec::new();
        let mut stack: Vec<&ResolvedNode> = self.roots.iter().rev().collect();
        while let Some(node) = stack.pop() {
            if !leaves_only || node.is_leaf() {
                out.push(FlatNode {
                    id: node.id.clone(),
                    parent: node.parent.clone(),
                    depth: node.depth,
                    label: node.label.clone(),
                    abbrev: node.abbrev.clone(),
                    is_leaf: node.is_leaf(),
                });
            }
            stack.extend(node.children.iter().rev());
        }
        out
    }

    pub fn find(&self, id: &str) -> Option<&ResolvedNode> {
        let mut stack: Vec<&ResolvedNode> = self.roots.iter().collect();
        while let Some(node) = stack.pop() {
            if node.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter());
        }
        None
    }

    /// Number of nodes in the forest.
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&ResolvedNode> = self.roots.iter().collect();
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

/// Indexed view of one range.
pub struct Resolver<'r> {
    range: &'r Range,
    language: String,
    index: FxHashMap<&'r str, usize>,
    /// Declared parent position; `None` for roots and dangling parents.
    declared: Vec<Option<usize>>,
    /// Parent as used for the tree and inheritance, with cycles cut.
    links: Vec<Option<usize>>,
    cycles: Vec<Vec<String>>,
}

impl<'r> Resolver<'r> {
    pub fn new(range: &'r Range, config: &ResolverConfig) -> Self {
        let mut index = FxHashMap::default();
        for (i, element) in range.elements.iter().enumerate() {
            index.entry(element.id.as_str()).or_insert(i);
        }

        let declared: Vec<Option<usize>> = range
            .elements
            .iter()
            .map(|e| {
                let parent = e.parent.as_deref()?;
                let found = index.get(parent).copied();
                if found.is_none() {
                    debug!(range = %range.id, element = %e.id, parent, "dangling parent, treating as root");
                }
                found
            })
            .collect();

        let (links, cycles) = cut_cycles(&declared, range);
        for path in &cycles {
            warn!(range = %range.id, cycle = %path.join(" -> "), "parent cycle in range");
        }

        Self {
            range,
            language: config.language.clone(),
            index,
            declared,
            links,
            cycles,
        }
    }

    pub fn range(&self) -> &'r Range {
        self.range
    }

    /// Cycles found in the declared parent links.
    pub fn cycle_warnings(&self) -> Vec<ResolverError> {
        self.cycles
            .iter()
            .map(|path| ResolverError::cycle(&self.range.id, path.clone()))
            .collect()
    }

    /// Effective values, failing if `id` is unknown or its ancestry runs into
    /// a cycle.
    pub fn try_resolve_effective(&self, id: &str) -> Result<Effective, ResolverError> {
        let start = self.position(id)?;
        let mut visited = vec![false; self.range.elements.len()];
        let mut path: Vec<String> = Vec::new();
        let mut current = Some(start);
        while let Some(i) = current {
            if visited[i] {
                path.push(self.range.elements[i].id.clone());
                return Err(ResolverError::cycle(&self.range.id, path));
            }
            visited[i] = true;
            path.push(self.range.elements[i].id.clone());
            current = self.declared[i];
        }
        Ok(self.effective_at(start))
    }

    /// Effective values that never fail: cycle members fall back to their
    /// own values (or id), and an unknown id resolves to itself.
    pub fn resolve_effective(&self, id: &str) -> Effective {
        match self.try_resolve_effective(id) {
            Ok(effective) => effective,
            Err(ResolverError::UnknownElement { .. }) => {
                warn!(range = %self.range.id, element = id, "resolving unknown range element");
                Effective {
                    label: id.to_string(),
                    abbrev: id.to_string(),
                }
            }
            Err(err) => {
                warn!(range = %self.range.id, element = id, error = %err, "falling back");
                match self.index.get(id) {
                    Some(&i) => self.effective_at(i),
                    None => Effective {
                        label: id.to_string(),
                        abbrev: id.to_string(),
                    },
                }
            }
        }
    }

    /// Build the forest. Never fails; cycles end up in
    /// [`ResolvedTree::warnings`].
    pub fn build_tree(&self) -> ResolvedTree {
        let n = self.range.elements.len();
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut roots = Vec::new();
        for (i, parent) in self.links.iter().enumerate() {
            if !self.is_canonical(i) {
                continue;
            }
            match parent {
                Some(p) => children[*p].push(i),
                None => roots.push(i),
            }
        }

        // Pre-order walk: parents are visited before their children, so
        // inherited values and depths can be filled in one pass.
        let mut order = Vec::with_capacity(n);
        let mut depth = vec![0usize; n];
        let mut label: Vec<Option<&str>> = vec![None; n];
        let mut abbrev: Vec<Option<&str>> = vec![None; n];
        let mut stack: Vec<usize> = roots.iter().rev().copied().collect();
        while let Some(i) = stack.pop() {
            let element = &self.range.elements[i];
            let parent = self.links[i];
            let (d, l, a) = match parent {
                Some(p) => (depth[p] + 1, label[p], abbrev[p]),
                None => (0, None, None),
            };
            depth[i] = d;
            label[i] = self.own(&element.labels).or(l);
            abbrev[i] = self.own(&element.abbrevs).or(a);
            trace!(range = %self.range.id, element = %element.id, depth = depth[i], "resolved");
            order.push(i);
            stack.extend(children[i].iter().rev());
        }

        // Assemble nested nodes bottom-up.
        let mut built: Vec<Option<ResolvedNode>> = vec![None; n];
        for &i in order.iter().rev() {
            let element = &self.range.elements[i];
            let kids = children[i].iter().filter_map(|c| built[*c].take()).collect();
            built[i] = Some(ResolvedNode {
                id: element.id.clone(),
                parent: self.links[i].map(|p| self.range.elements[p].id.clone()),
                depth: depth[i],
                label: label[i].unwrap_or(&element.id).to_string(),
                abbrev: abbrev[i].unwrap_or(&element.id).to_string(),
                description: self.own(&element.descriptions).map(str::to_string),
                children: kids,
            });
        }

        ResolvedTree {
            range: self.range.id.clone(),
            roots: roots.iter().filter_map(|r| built[*r].take()).collect(),
            warnings: self.cycle_warnings(),
        }
    }

    fn position(&self, id: &str) -> Result<usize, ResolverError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| ResolverError::unknown_element(&self.range.id, id))
    }

    /// Elements with a repeated id are left out of the tree; lookups by id
    /// always reach the first one.
    fn is_canonical(&self, i: usize) -> bool {
        self.index.get(self.range.elements[i].id.as_str()) == Some(&i)
    }

    fn own<'m>(&self, mt: &'m Multitext) -> Option<&'m str> {
        mt.display(&self.language).filter(|s| !s.trim().is_empty())
    }

    /// Walk the cut links toward the root. Terminates because cut links
    /// contain no cycles.
    fn effective_at(&self, start: usize) -> Effective {
        let mut label = None;
        let mut abbrev = None;
        let mut current = Some(start);
        while let Some(i) = current {
            let element = &self.range.elements[i];
            label = label.or_else(|| self.own(&element.labels));
            abbrev = abbrev.or_else(|| self.own(&element.abbrevs));
            if label.is_some() && abbrev.is_some() {
                break;
            }
            current = self.links[i];
        }
        let id = &self.range.elements[start].id;
        Effective {
            label: label.unwrap_or(id).to_string(),
            abbrev: abbrev.unwrap_or(id).to_string(),
        }
    }
}

/// Remove every parent link that lies on a cycle.
///
/// Returns the cut links and each cycle as an id path that starts and ends
/// with the same element.
fn cut_cycles(declared: &[Option<usize>], range: &Range) -> (Vec<Option<usize>>, Vec<Vec<String>>) {
    const UNSEEN: u8 = 0;
    const ON_PATH: u8 = 1;
    const DONE: u8 = 2;

    let mut links = declared.to_vec();
    let mut cycles = Vec::new();
    let mut state = vec![UNSEEN; declared.len()];

    for start in 0..declared.len() {
        let mut path: Vec<usize> = Vec::new();
        let mut current = Some(start);
        while let Some(i) = current {
            match state[i] {
                DONE => break,
                ON_PATH => {
                    let from = path.iter().position(|&p| p == i).unwrap_or(0);
                    let members = &path[from..];
                    let mut ids: Vec<String> =
                        members.iter().map(|&m| range.elements[m].id.clone()).collect();
                    ids.push(range.elements[i].id.clone());
                    for &m in members {
                        links[m] = None;
                    }
                    cycles.push(ids);
                    break;
                }
                _ => {
                    state[i] = ON_PATH;
                    path.push(i);
                    current = declared[i];
                }
            }
        }
        for i in path {
            state[i] = DONE;
        }
    }
    (links, cycles)
}

/// Build the forest of `range` with default settings.
pub fn build_tree(range: &Range) -> ResolvedTree {
    Resolver::new(range, &ResolverConfig::default()).build_tree()
}

/// Lenient effective values with default settings.
pub fn resolve_effective(range: &Range, id: &str) -> Effective {
    Resolver::new(range, &ResolverConfig::default()).resolve_effective(id)
}

/// Strict effective values with default settings.
pub fn try_resolve_effective(range: &Range, id: &str) -> Result<Effective, ResolverError> {
    Resolver::new(range, &ResolverConfig::default()).try_resolve_effective(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranges::RangeElement;
    use rstest::rstest;

    fn effective(label: &str, abbrev: &str) -> Effective {
        Effective {
            label: label.into(),
            abbrev: abbrev.into(),
        }
    }

    fn parent_and_child(child_abbrev: Option<&str>) -> Range {
        let mut child = RangeElement::new("B").with_parent("A");
        if let Some(abbrev) = child_abbrev {
            child = child.with_abbrev("en", abbrev);
        }
        Range::new("r")
            .with_element(
                RangeElement::new("A")
                    .with_label("en", "Parent")
                    .with_abbrev("en", "P"),
            )
            .with_element(child)
    }

    #[rstest]
    #[case(None, effective("Parent", "P"))]
    #[case(Some("B2"), effective("Parent", "B2"))]
    fn test_values_inherit_from_nearest_ancestor(
        #[case] child_abbrev: Option<&str>,
        #[case] expected: Effective,
    ) {
        let range = parent_and_child(child_abbrev);
        assert_eq!(try_resolve_effective(&range, "B").unwrap(), expected);
        let tree = build_tree(&range);
        let node = tree.find("B").unwrap();
        assert_eq!((node.label.as_str(), node.abbrev.as_str()), (expected.label.as_str(), expected.abbrev.as_str()));
    }

    #[test]
    fn test_inheritance_skips_blank_values_and_falls_back_to_id() {
        let range = Range::new("r")
            .with_element(RangeElement::new("root").with_abbrev("en", "R"))
            .with_element(RangeElement::new("mid").with_parent("root").with_label("en", "  "))
            .with_element(RangeElement::new("leaf").with_parent("mid"));
        assert_eq!(resolve_effective(&range, "leaf"), effective("leaf", "R"));
    }

    #[test]
    fn test_display_language_preference() {
        let range = Range::new("r").with_element(
            RangeElement::new("n")
                .with_label("en", "Noun")
                .with_label("fr", "Nom"),
        );
        let resolver = Resolver::new(&range, &ResolverConfig::default().with_language("fr"));
        assert_eq!(resolver.resolve_effective("n").label, "Nom");
        let resolver = Resolver::new(&range, &ResolverConfig::default().with_language("de"));
        assert_eq!(resolver.resolve_effective("n").label, "Noun");
    }

    #[test]
    fn test_two_element_cycle_falls_back_to_ids() {
        let range = Range::new("r")
            .with_element(RangeElement::new("X").with_parent("Y"))
            .with_element(RangeElement::new("Y").with_parent("X"));

        let err = try_resolve_effective(&range, "X").unwrap_err();
        assert_eq!(
            err,
            ResolverError::cycle("r", vec!["X".into(), "Y".into(), "X".into()])
        );
        assert_eq!(resolve_effective(&range, "X"), effective("X", "X"));
        assert_eq!(resolve_effective(&range, "Y"), effective("Y", "Y"));

        let tree = build_tree(&range);
        assert_eq!(tree.warnings().len(), 1);
        let ids: Vec<_> = tree.roots().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["X", "Y"]);
    }

    #[test]
    fn test_self_parent_is_a_cycle() {
        let range = Range::new("r").with_element(RangeElement::new("S").with_parent("S"));
        let tree = build_tree(&range);
        assert_eq!(tree.len(), 1);
        assert_eq!(
            tree.warnings(),
            &[ResolverError::cycle("r", vec!["S".into(), "S".into()])]
        );
    }

    #[test]
    fn test_descendant_of_cycle_stays_in_tree() {
        let range = Range::new("r")
            .with_element(RangeElement::new("X").with_parent("Y").with_label("en", "Ex"))
            .with_element(RangeElement::new("Y").with_parent("X"))
            .with_element(RangeElement::new("Z").with_parent("X"));
        let tree = build_tree(&range);
        let z = tree.find("Z").unwrap();
        assert_eq!(z.depth, 1);
        assert_eq!(z.label, "Ex");
        assert!(try_resolve_effective(&range, "Z").is_err());
        assert_eq!(resolve_effective(&range, "Z").label, "Ex");
    }

    #[test]
    fn test_dangling_parent_becomes_root() {
        let range = Range::new("r")
            .with_element(RangeElement::new("orphan").with_parent("missing"))
            .with_element(RangeElement::new("a"));
        let tree = build_tree(&range);
        assert!(tree.warnings().is_empty());
        let roots: Vec<_> = tree.roots().iter().map(|n| (n.id.as_str(), n.parent.is_none())).collect();
        assert_eq!(roots, vec![("orphan", true), ("a", true)]);
    }

    #[test]
    fn test_flatten_is_pre_order_with_depth() {
        let range = Range::new("r")
            .with_element(RangeElement::new("a"))
            .with_element(RangeElement::new("b"))
            .with_element(RangeElement::new("a1").with_parent("a"))
            .with_element(RangeElement::new("a1x").with_parent("a1"))
            .with_element(RangeElement::new("a2").with_parent("a"));
        let tree = build_tree(&range);

        let all: Vec<_> = tree
            .flatten(false)
            .into_iter()
            .map(|n| (n.id, n.depth))
            .collect();
        assert_eq!(
            all,
            vec![
                ("a".to_string(), 0),
                ("a1".to_string(), 1),
                ("a1x".to_string(), 2),
                ("a2".to_string(), 1),
                ("b".to_string(), 0),
            ]
        );

        let leaves: Vec<_> = tree.flatten(true).into_iter().map(|n| n.id).collect();
        assert_eq!(leaves, vec!["a1x", "a2", "b"]);
    }

    #[test]
    fn test_unknown_element() {
        let range = Range::new("r");
        assert_eq!(
            try_resolve_effective(&range, "nope"),
            Err(ResolverError::unknown_element("r", "nope"))
        );
        assert_eq!(resolve_effective(&range, "nope"), effective("nope", "nope"));
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let mut range = Range::new("deep").with_element(RangeElement::new("e0").with_label("en", "Top"));
        for i in 1..2_000 {
            range = range.with_element(RangeElement::new(format!("e{i}")).with_parent(format!("e{}", i - 1)));
        }
        let tree = build_tree(&range);
        assert_eq!(tree.len(), 2_000);
        assert_eq!(resolve_effective(&range, "e1999").label, "Top");
        assert_eq!(tree.flatten(true).len(), 1);
    }
}
