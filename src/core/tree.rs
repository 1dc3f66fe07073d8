use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::visibility::RowExtent;

pub type RowId = String;
pub type ItemId = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    #[serde(default)]
    pub parent_id: Option<RowId>,
    #[serde(default)]
    pub expanded: Option<bool>,
    #[serde(default)]
    pub height: Option<f64>,
}

impl Row {
    #[must_use]
    pub fn new(id: impl Into<RowId>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            expanded: None,
            height: None,
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<RowId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    #[must_use]
    pub fn with_expanded(mut self, expanded: bool) -> Self {
        self.expanded = Some(expanded);
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expanded.unwrap_or(false)
    }

    #[must_use]
    pub fn height_or(&self, default_height: f64) -> f64 {
        self.height.unwrap_or(default_height)
    }
}

/// Half-open `[start, end)` time span of an item, in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemTime {
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub row_id: RowId,
    pub time: ItemTime,
    #[serde(default)]
    pub label: String,
}

impl Item {
    #[must_use]
    pub fn new(id: impl Into<ItemId>, row_id: impl Into<RowId>, start: f64, end: f64) -> Self {
        Self {
            id: id.into(),
            row_id: row_id.into(),
            time: ItemTime { start, end },
            label: String::new(),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

pub type Rows = IndexMap<RowId, Row>;
pub type Items = IndexMap<ItemId, Item>;

/// A row placed in the tree, with its children and the items it owns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub row: Row,
    /// Parent actually used by the tree; `None` for roots, including rows
    /// whose declared parent is missing or was cut to break a cycle.
    pub parent_id: Option<RowId>,
    /// Ancestor chain from the root down to the direct parent.
    pub parents: Vec<RowId>,
    pub children: Vec<RowId>,
    pub items: Vec<Item>,
    pub depth: usize,
}

/// Owned nested projection of the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedRow {
    pub row: Row,
    pub items: Vec<Item>,
    pub children: Vec<NestedRow>,
}

/// Row forest built from flat row and item collections.
///
/// `nodes` is the flat projection by id (in input order) and `flat` the
/// depth-first pre-order projection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RowTree {
    nodes: IndexMap<RowId, TreeNode>,
    roots: Vec<RowId>,
    flat: Vec<RowId>,
    broken_cycles: Vec<RowId>,
    dropped_items: usize,
}

impl RowTree {
    /// Builds the tree. Rows whose parent is unknown become roots; items whose
    /// row is unknown are dropped.
    #[must_use]
    pub fn build<'a>(
        rows: impl IntoIterator<Item = &'a Row>,
        items: impl IntoIterator<Item = &'a Item>,
    ) -> Self {
        let mut nodes: IndexMap<RowId, TreeNode> = IndexMap::new();
        for row in rows {
            nodes.insert(
                row.id.clone(),
                TreeNode {
                    row: row.clone(),
                    parent_id: None,
                    parents: Vec::new(),
                    children: Vec::new(),
                    items: Vec::new(),
                    depth: 0,
                },
            );
        }

        let links: Vec<(usize, usize)> = nodes
            .values()
            .enumerate()
            .filter_map(|(index, node)| {
                let parent = node.row.parent_id.as_ref()?;
                if parent == &node.row.id {
                    return None;
                }
                nodes.get_index_of(parent).map(|parent_index| (index, parent_index))
            })
            .collect();
        for (child, parent) in links {
            let child_id = nodes[child].row.id.clone();
            nodes[child].parent_id = Some(nodes[parent].row.id.clone());
            nodes[parent].children.push(child_id);
        }

        let mut tree = Self {
            roots: nodes
                .values()
                .filter(|node| node.parent_id.is_none())
                .map(|node| node.row.id.clone())
                .collect(),
            nodes,
            ..Self::default()
        };
        tree.rebuild_flat();
        tree.break_cycles();

        for item in items {
            match tree.nodes.get_mut(&item.row_id) {
                Some(node) => node.items.push(item.clone()),
                None => {
                    tree.dropped_items += 1;
                    debug!(item_id = %item.id, row_id = %item.row_id, "dropping item of unknown row");
                }
            }
        }
        tree
    }

    /// Recomputes the pre-order projection, depths and ancestor chains from roots.
    fn rebuild_flat(&mut self) {
        let mut flat = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(RowId, Vec<RowId>)> = self
            .roots
            .iter()
            .rev()
            .map(|id| (id.clone(), Vec::new()))
            .collect();
        while let Some((id, parents)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(&id) else {
                continue;
            };
            node.depth = parents.len();
            node.parents.clone_from(&parents);
            let mut child_parents = parents;
            child_parents.push(id.clone());
            for child in node.children.iter().rev() {
                stack.push((child.clone(), child_parents.clone()));
            }
            flat.push(id);
        }
        self.flat = flat;
    }

    /// Rows unreachable from any root hang on a parent cycle. The first such
    /// row (input order) that lies on the cycle is promoted to a root, until
    /// every row is reachable. Roots stay in input order.
    fn break_cycles(&mut self) {
        while self.flat.len() < self.nodes.len() {
            let reached: std::collections::HashSet<&RowId> = self.flat.iter().collect();
            let Some(start) = self.nodes.keys().find(|id| !reached.contains(id)).cloned() else {
                break;
            };
            let Some(cut) = self.cycle_member(&start) else {
                break;
            };
            if let Some(parent) = self.nodes.get(&cut).and_then(|node| node.parent_id.clone()) {
                if let Some(parent_node) = self.nodes.get_mut(&parent) {
                    parent_node.children.retain(|child| child != &cut);
                }
            }
            if let Some(node) = self.nodes.get_mut(&cut) {
                node.parent_id = None;
            }
            warn!(row_id = %cut, "row parent cycle detected; promoting row to root");
            self.roots.push(cut.clone());
            self.roots
                .sort_by_key(|id| self.nodes.get_index_of(id.as_str()).unwrap_or(usize::MAX));
            self.broken_cycles.push(cut);
            self.rebuild_flat();
        }
    }

    /// Walks parents from `start` and returns the cycle member earliest in input order.
    fn cycle_member(&self, start: &RowId) -> Option<RowId> {
        let mut walk: Vec<&RowId> = Vec::new();
        let mut current = start;
        loop {
            if let Some(position) = walk.iter().position(|id| *id == current) {
                return walk[position..]
                    .iter()
                    .min_by_key(|id| self.nodes.get_index_of(id.as_str()).unwrap_or(usize::MAX))
                    .map(|id| (*id).clone());
            }
            walk.push(current);
            current = self.nodes.get(current)?.parent_id.as_ref()?;
        }
    }

    /// Replaces the stored copy of `row` when its placement is unchanged.
    ///
    /// Returns `false` when the row is unknown or its parent changed, in which
    /// case the tree must be rebuilt instead.
    pub fn sync_row(&mut self, row: &Row) -> bool {
        match self.nodes.get_mut(&row.id) {
            Some(node) if node.row.parent_id == row.parent_id => {
                node.row = row.clone();
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&TreeNode> {
        self.nodes.get(id)
    }

    /// Flat projection indexed by row id.
    #[must_use]
    pub fn by_id(&self) -> &IndexMap<RowId, TreeNode> {
        &self.nodes
    }

    /// Depth-first pre-order row ids; every row is followed by its whole subtree.
    #[must_use]
    pub fn flat(&self) -> &[RowId] {
        &self.flat
    }

    #[must_use]
    pub fn roots(&self) -> &[RowId] {
        &self.roots
    }

    /// Rows promoted to roots to break parent cycles, in the order they were cut.
    #[must_use]
    pub fn broken_cycles(&self) -> &[RowId] {
        &self.broken_cycles
    }

    #[must_use]
    pub fn dropped_items(&self) -> usize {
        self.dropped_items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        self.flat.iter().filter_map(|id| self.nodes.get(id))
    }

    #[must_use]
    pub fn nested(&self) -> Vec<NestedRow> {
        self.roots.iter().filter_map(|id| self.nest(id)).collect()
    }

    fn nest(&self, id: &RowId) -> Option<NestedRow> {
        let node = self.nodes.get(id)?;
        Some(NestedRow {
            row: node.row.clone(),
            items: node.items.clone(),
            children: node
                .children
                .iter()
                .filter_map(|child| self.nest(child))
                .collect(),
        })
    }

    /// Pre-order rows whose whole ancestor chain is expanded.
    ///
    /// A collapsed row is itself included; its descendants are not.
    #[must_use]
    pub fn rows_with_parents_expanded(&self, default_row_height: f64) -> Vec<RowExtent> {
        let mut rows = Vec::with_capacity(self.flat.len());
        let mut collapsed_depth: Option<usize> = None;
        for node in self.iter() {
            if let Some(depth) = collapsed_depth {
                if node.depth > depth {
                    continue;
                }
                collapsed_depth = None;
            }
            rows.push(RowExtent {
                id: node.row.id.clone(),
                height: node.row.height_or(default_row_height),
            });
            if !node.row.is_expanded() {
                collapsed_depth = Some(node.depth);
            }
        }
        rows
    }
}
