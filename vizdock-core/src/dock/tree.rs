//! Structural edits on live dock trees
//!
//! These functions operate on `DockNode<PanelId>`, the shape the dock keeps
//! at runtime. Paths are lists of child indices through split nodes; the
//! empty path is the root.
//!
//! # Folding
//!
//! ```text
//! Split(H) [1, 1]                      Split(H) [1, 0.5, 0.5]
//! ├── Leaf(A)          remove(C)       ├── Leaf(A)
//! └── Split(V) [1, 1]  ─────────►      ├── Leaf(B)
//!     ├── Split(H) [1, 1]              └── Leaf(D)
//!     │   ├── Leaf(B)
//!     │   └── Leaf(D)
//!     └── Leaf(C)
//! ```
//!
//! A split left with one child is replaced by that child, and a split
//! nested directly in a split of the same orientation is spliced into its
//! parent with its weights scaled to the slot it occupied.

use crate::error::DockError;
use crate::layout::DockNode;
use crate::types::{Orientation, PanelId};

/// Weight of each side when a node is wrapped in a new two-way split.
pub const DEFAULT_SPLIT_WEIGHT: f64 = 0.5;

/// Path of child indices from the root to the leaf or tab group holding
/// `id`.
pub fn find_path(node: &DockNode<PanelId>, id: PanelId) -> Option<Vec<usize>> {
    match node {
        DockNode::Leaf { widget } => (*widget == id).then(Vec::new),
        DockNode::TabGroup { widgets, .. } => widgets.contains(&id).then(Vec::new),
        DockNode::Split { children, .. } => children.iter().enumerate().find_map(|(i, child)| {
            find_path(child, id).map(|mut path| {
                path.insert(0, i);
                path
            })
        }),
    }
}

/// Mutably borrows the node at `path`.
pub fn node_at_mut<'a>(
    node: &'a mut DockNode<PanelId>,
    path: &[usize],
) -> Option<&'a mut DockNode<PanelId>> {
    match path.split_first() {
        None => Some(node),
        Some((&index, rest)) => match node {
            DockNode::Split { children, .. } => node_at_mut(children.get_mut(index)?, rest),
            _ => None,
        },
    }
}

fn wrap(
    existing: DockNode<PanelId>,
    id: PanelId,
    orientation: Orientation,
    after: bool,
) -> DockNode<PanelId> {
    let added = DockNode::leaf(id);
    let children = if after {
        vec![existing, added]
    } else {
        vec![added, existing]
    };
    DockNode::Split {
        orientation,
        children,
        sizes: vec![DEFAULT_SPLIT_WEIGHT, DEFAULT_SPLIT_WEIGHT],
    }
}

/// Docks `id` next to the container holding `reference`.
///
/// Inside a split of the same orientation the reference's weight is halved
/// between it and the new leaf; otherwise the reference is wrapped in a new
/// two-way split.
pub fn insert_split(
    root: DockNode<PanelId>,
    id: PanelId,
    reference: PanelId,
    orientation: Orientation,
    after: bool,
) -> Result<DockNode<PanelId>, DockError> {
    let path = find_path(&root, reference).ok_or(DockError::PanelNotFound(reference))?;
    let Some((&index, parent_path)) = path.split_last() else {
        return Ok(wrap(root, id, orientation, after));
    };
    let mut root = root;
    let Some(DockNode::Split {
        orientation: parent_orientation,
        children,
        sizes,
    }) = node_at_mut(&mut root, parent_path)
    else {
        return Err(DockError::InvalidPath(parent_path.to_vec()));
    };
    if *parent_orientation == orientation {
        let weight = sizes
            .get_mut(index)
            .ok_or_else(|| DockError::InvalidPath(path.clone()))?;
        let half = *weight / 2.0;
        *weight = half;
        let at = if after { index + 1 } else { index };
        children.insert(at, DockNode::leaf(id));
        sizes.insert(at, half);
    } else {
        let slot = children
            .get_mut(index)
            .ok_or_else(|| DockError::InvalidPath(path.clone()))?;
        let existing = std::mem::replace(slot, DockNode::leaf(id));
        *slot = wrap(existing, id, orientation, after);
    }
    Ok(root)
}

/// Docks `id` at the start or end of the root along `orientation`.
pub fn insert_at_root(
    root: Option<DockNode<PanelId>>,
    id: PanelId,
    orientation: Orientation,
    after: bool,
) -> DockNode<PanelId> {
    match root {
        None => DockNode::leaf(id),
        Some(DockNode::Split {
            orientation: root_orientation,
            mut children,
            mut sizes,
        }) if root_orientation == orientation => {
            let weight = if sizes.is_empty() {
                1.0
            } else {
                sizes.iter().sum::<f64>() / sizes.len() as f64
            };
            if after {
                children.push(DockNode::leaf(id));
                sizes.push(weight);
            } else {
                children.insert(0, DockNode::leaf(id));
                sizes.insert(0, weight);
            }
            DockNode::Split {
                orientation,
                children,
                sizes,
            }
        }
        Some(existing) => wrap(existing, id, orientation, after),
    }
}

/// Adds `id` as a tab next to `reference` and makes it the active tab.
pub fn insert_tab(
    root: DockNode<PanelId>,
    id: PanelId,
    reference: PanelId,
    after: bool,
) -> Result<DockNode<PanelId>, DockError> {
    let path = find_path(&root, reference).ok_or(DockError::PanelNotFound(reference))?;
    let mut root = root;
    let container =
        node_at_mut(&mut root, &path).ok_or_else(|| DockError::InvalidPath(path.clone()))?;
    match container {
        DockNode::Leaf { widget } => {
            let existing = *widget;
            let (widgets, current) = if after {
                (vec![existing, id], 1)
            } else {
                (vec![id, existing], 0)
            };
            *container = DockNode::TabGroup { widgets, current };
        }
        DockNode::TabGroup { widgets, current } => {
            let position = widgets
                .iter()
                .position(|widget| *widget == reference)
                .ok_or(DockError::PanelNotFound(reference))?;
            let at = if after { position + 1 } else { position };
            widgets.insert(at, id);
            *current = at;
        }
        DockNode::Split { .. } => return Err(DockError::InvalidPath(path)),
    }
    Ok(root)
}

/// Removes `id`, folding the tree. Returns the remaining tree (`None` when
/// it became empty) and whether `id` was found.
pub fn remove(node: DockNode<PanelId>, id: PanelId) -> (Option<DockNode<PanelId>>, bool) {
    match node {
        DockNode::Leaf { widget } if widget == id => (None, true),
        leaf @ DockNode::Leaf { .. } => (Some(leaf), false),
        DockNode::TabGroup {
            mut widgets,
            current,
        } => {
            let Some(position) = widgets.iter().position(|widget| *widget == id) else {
                return (Some(DockNode::TabGroup { widgets, current }), false);
            };
            widgets.remove(position);
            if widgets.is_empty() {
                return (None, true);
            }
            let current = if position < current {
                current - 1
            } else {
                current.min(widgets.len() - 1)
            };
            (Some(DockNode::TabGroup { widgets, current }), true)
        }
        DockNode::Split {
            orientation,
            children,
            sizes,
        } => {
            let mut found = false;
            let mut kept_children = Vec::with_capacity(children.len());
            let mut kept_sizes = Vec::with_capacity(sizes.len());
            for (child, size) in children.into_iter().zip(sizes) {
                if found {
                    kept_children.push(child);
                    kept_sizes.push(size);
                    continue;
                }
                let (remaining, removed) = remove(child, id);
                found = removed;
                if let Some(remaining) = remaining {
                    kept_children.push(remaining);
                    kept_sizes.push(size);
                }
            }
            if !found {
                let node = DockNode::Split {
                    orientation,
                    children: kept_children,
                    sizes: kept_sizes,
                };
                return (Some(node), false);
            }
            (fold(orientation, kept_children, kept_sizes), true)
        }
    }
}

/// Normalizes a split: splices same-orientation child splits into it and
/// collapses it into its only child.
pub fn fold(
    orientation: Orientation,
    children: Vec<DockNode<PanelId>>,
    sizes: Vec<f64>,
) -> Option<DockNode<PanelId>> {
    let mut flat_children = Vec::with_capacity(children.len());
    let mut flat_sizes = Vec::with_capacity(sizes.len());
    for (child, weight) in children.into_iter().zip(sizes) {
        match child {
            DockNode::Split {
                orientation: child_orientation,
                children: grandchildren,
                sizes: child_sizes,
            } if child_orientation == orientation => {
                let total: f64 = child_sizes.iter().sum();
                let count = child_sizes.len().max(1) as f64;
                for (grandchild, size) in grandchildren.into_iter().zip(child_sizes) {
                    let share = if total > 0.0 { size / total } else { 1.0 / count };
                    flat_children.push(grandchild);
                    flat_sizes.push(weight * share);
                }
            }
            other => {
                flat_children.push(other);
                flat_sizes.push(weight);
            }
        }
    }
    match flat_children.len() {
        0 => None,
        1 => flat_children.pop(),
        _ => Some(DockNode::Split {
            orientation,
            children: flat_children,
            sizes: flat_sizes,
        }),
    }
}

/// Widgets that are on screen: every leaf and the active tab of each group.
pub fn visible_widgets(node: &DockNode<PanelId>) -> Vec<PanelId> {
    let mut out = Vec::new();
    collect_visible(node, &mut out);
    out
}

fn collect_visible(node: &DockNode<PanelId>, out: &mut Vec<PanelId>) {
    match node {
        DockNode::Leaf { widget } => out.push(*widget),
        DockNode::TabGroup { widgets, current } => {
            if let Some(widget) = widgets.get(*current).or_else(|| widgets.last()) {
                out.push(*widget);
            }
        }
        DockNode::Split { children, .. } => {
            for child in children {
                collect_visible(child, out);
            }
        }
    }
}
