//! Dock tree state machine

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, instrument};

use super::tree;
use crate::error::DockError;
use crate::layout::{DockNode, validate_sizes};
use crate::types::{Orientation, PanelId};

/// Dock display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DockMode {
    /// Every widget is laid out in the tree.
    #[default]
    MultipleDocument,
    /// One tab group fills the dock.
    SingleDocument,
}

impl fmt::Display for DockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MultipleDocument => write!(f, "multiple-document"),
            Self::SingleDocument => write!(f, "single-document"),
        }
    }
}

/// Where to dock a widget.
///
/// A missing `reference` docks at the matching edge of the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertMode {
    /// Left of the reference.
    SplitLeft {
        /// Widget to dock next to.
        reference: Option<PanelId>,
    },
    /// Right of the reference.
    SplitRight {
        /// Widget to dock next to.
        reference: Option<PanelId>,
    },
    /// Above the reference.
    SplitTop {
        /// Widget to dock next to.
        reference: Option<PanelId>,
    },
    /// Below the reference.
    SplitBottom {
        /// Widget to dock next to.
        reference: Option<PanelId>,
    },
    /// A tab before the reference.
    TabBefore {
        /// Widget whose tab group receives the new tab.
        reference: Option<PanelId>,
    },
    /// A tab after the reference.
    TabAfter {
        /// Widget whose tab group receives the new tab.
        reference: Option<PanelId>,
    },
}

impl InsertMode {
    /// The reference widget, if any.
    #[must_use]
    pub const fn reference(&self) -> Option<PanelId> {
        match *self {
            Self::SplitLeft { reference }
            | Self::SplitRight { reference }
            | Self::SplitTop { reference }
            | Self::SplitBottom { reference }
            | Self::TabBefore { reference }
            | Self::TabAfter { reference } => reference,
        }
    }

    /// Dock at the right edge of the root.
    #[must_use]
    pub const fn split_right() -> Self {
        Self::SplitRight { reference: None }
    }

    /// Dock right of `reference`.
    #[must_use]
    pub const fn split_right_of(reference: PanelId) -> Self {
        Self::SplitRight {
            reference: Some(reference),
        }
    }
}

/// The dock: a tree of detail widgets plus single-document mode.
#[derive(Debug, Clone, Default)]
pub struct DockTree {
    root: Option<DockNode<PanelId>>,
    mode: DockMode,
    snapshot: Option<DockNode<PanelId>>,
}

impl DockTree {
    /// Creates an empty dock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> DockMode {
        self.mode
    }

    /// Whether the dock is maximized on one tab group.
    #[must_use]
    pub fn is_single_document(&self) -> bool {
        self.mode == DockMode::SingleDocument
    }

    /// Live root node.
    #[must_use]
    pub const fn root(&self) -> Option<&DockNode<PanelId>> {
        self.root.as_ref()
    }

    /// Widgets in pre-order.
    #[must_use]
    pub fn widgets(&self) -> Vec<PanelId> {
        self.root
            .as_ref()
            .map(|root| root.widgets().into_iter().copied().collect())
            .unwrap_or_default()
    }

    /// Widgets currently on screen.
    #[must_use]
    pub fn visible_widgets(&self) -> Vec<PanelId> {
        self.root
            .as_ref()
            .map(tree::visible_widgets)
            .unwrap_or_default()
    }

    /// Whether `id` is docked.
    #[must_use]
    pub fn contains(&self, id: PanelId) -> bool {
        self.root
            .as_ref()
            .is_some_and(|root| tree::find_path(root, id).is_some())
    }

    /// Number of docked widgets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, DockNode::widget_count)
    }

    /// Whether the dock is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Docks `id` according to `mode`.
    ///
    /// While in single-document mode every insert lands as the active tab
    /// of the maximized group.
    #[instrument(skip(self), fields(dock_mode = %self.mode))]
    pub fn add_widget(&mut self, id: PanelId, mode: InsertMode) -> Result<(), DockError> {
        if self.contains(id) {
            return Err(DockError::AlreadyDocked(id));
        }
        let reference = mode.reference();
        if reference == Some(id) {
            return Err(DockError::SelfReference(id));
        }
        if let Some(reference) = reference
            && !self.contains(reference)
        {
            return Err(DockError::PanelNotFound(reference));
        }

        if self.is_single_document()
            && let Some(DockNode::TabGroup { widgets, current }) = self.root.as_mut()
        {
            widgets.push(id);
            *current = widgets.len() - 1;
            return Ok(());
        }

        let root = self.root.clone();
        self.root = Some(match mode {
            InsertMode::SplitLeft { reference } => {
                Self::split(root, id, reference, Orientation::Horizontal, false)?
            }
            InsertMode::SplitRight { reference } => {
                Self::split(root, id, reference, Orientation::Horizontal, true)?
            }
            InsertMode::SplitTop { reference } => {
                Self::split(root, id, reference, Orientation::Vertical, false)?
            }
            InsertMode::SplitBottom { reference } => {
                Self::split(root, id, reference, Orientation::Vertical, true)?
            }
            InsertMode::TabBefore { reference } => Self::tab(root, id, reference, false)?,
            InsertMode::TabAfter { reference } => Self::tab(root, id, reference, true)?,
        });
        debug!(panel_id = %id, "Widget docked");
        Ok(())
    }

    fn split(
        root: Option<DockNode<PanelId>>,
        id: PanelId,
        reference: Option<PanelId>,
        orientation: Orientation,
        after: bool,
    ) -> Result<DockNode<PanelId>, DockError> {
        match (root, reference) {
            (Some(root), Some(reference)) => {
                tree::insert_split(root, id, reference, orientation, after)
            }
            (root, _) => Ok(tree::insert_at_root(root, id, orientation, after)),
        }
    }

    fn tab(
        root: Option<DockNode<PanelId>>,
        id: PanelId,
        reference: Option<PanelId>,
        after: bool,
    ) -> Result<DockNode<PanelId>, DockError> {
        let Some(root) = root else {
            return Ok(DockNode::leaf(id));
        };
        let reference = match reference {
            Some(reference) => reference,
            None => {
                let widgets = root.widgets();
                let edge = if after { widgets.last() } else { widgets.first() };
                match edge {
                    Some(edge) => **edge,
                    None => return Ok(DockNode::leaf(id)),
                }
            }
        };
        tree::insert_tab(root, id, reference, after)
    }

    /// Removes `id`, folding the tree.
    ///
    /// Removing the last widget while maximized leaves single-document mode.
    #[instrument(skip(self), fields(dock_mode = %self.mode))]
    pub fn remove_widget(&mut self, id: PanelId) -> Result<(), DockError> {
        let Some(root) = self.root.take() else {
            return Err(DockError::PanelNotFound(id));
        };
        let (remaining, found) = tree::remove(root, id);
        self.root = remaining;
        if !found {
            return Err(DockError::PanelNotFound(id));
        }
        if self.is_single_document() && self.root.is_none() {
            self.leave_single_document()?;
        }
        debug!(panel_id = %id, "Widget undocked");
        Ok(())
    }

    /// Moves a docked widget, as a drag and drop would.
    pub fn move_widget(&mut self, id: PanelId, mode: InsertMode) -> Result<(), DockError> {
        if mode.reference() == Some(id) {
            return Err(DockError::SelfReference(id));
        }
        if let Some(reference) = mode.reference()
            && !self.contains(reference)
        {
            return Err(DockError::PanelNotFound(reference));
        }
        let before = self.clone();
        self.remove_widget(id)?;
        if let Err(err) = self.add_widget(id, mode) {
            *self = before;
            return Err(err);
        }
        Ok(())
    }

    /// Makes `id` the active tab of its group.
    pub fn activate(&mut self, id: PanelId) -> Result<(), DockError> {
        let root = self.root.as_mut().ok_or(DockError::PanelNotFound(id))?;
        let path = tree::find_path(root, id).ok_or(DockError::PanelNotFound(id))?;
        if let Some(DockNode::TabGroup { widgets, current }) = tree::node_at_mut(root, &path)
            && let Some(position) = widgets.iter().position(|widget| *widget == id)
        {
            *current = position;
        }
        Ok(())
    }

    /// Replaces the weights of the split at `path`.
    pub fn set_sizes(&mut self, path: &[usize], sizes: Vec<f64>) -> Result<(), DockError> {
        let node = self
            .root
            .as_mut()
            .and_then(|root| tree::node_at_mut(root, path));
        let Some(DockNode::Split {
            children,
            sizes: current,
            ..
        }) = node
        else {
            return Err(DockError::InvalidPath(path.to_vec()));
        };
        if sizes.len() != children.len() {
            return Err(DockError::SizeCount {
                expected: children.len(),
                actual: sizes.len(),
            });
        }
        validate_sizes(&sizes).map_err(DockError::from)?;
        *current = sizes;
        Ok(())
    }

    /// Maximizes the dock on one tab group holding every widget, with `id`
    /// active. The current tree is kept as a snapshot.
    #[instrument(skip(self))]
    pub fn enter_single_document(&mut self, id: PanelId) -> Result<(), DockError> {
        if self.is_single_document() {
            return Err(DockError::AlreadySingleDocument);
        }
        if !self.contains(id) {
            return Err(DockError::PanelNotFound(id));
        }
        let widgets = self.widgets();
        let current = widgets
            .iter()
            .position(|widget| *widget == id)
            .unwrap_or_default();
        self.snapshot = self.root.take();
        self.root = Some(DockNode::TabGroup { widgets, current });
        self.mode = DockMode::SingleDocument;
        debug!(panel_id = %id, "Entered single-document mode");
        Ok(())
    }

    /// Restores the snapshot taken by
    /// [`enter_single_document`](Self::enter_single_document).
    ///
    /// Widgets removed meanwhile are pruned from the snapshot; widgets added
    /// meanwhile are docked at the right edge.
    #[instrument(skip(self))]
    pub fn leave_single_document(&mut self) -> Result<(), DockError> {
        if !self.is_single_document() {
            return Err(DockError::NotSingleDocument);
        }
        let live = self.widgets();
        let live_set: HashSet<PanelId> = live.iter().copied().collect();
        let mut restored = self.snapshot.take();
        let snapshot_widgets: Vec<PanelId> = restored
            .as_ref()
            .map(|root| root.widgets().into_iter().copied().collect())
            .unwrap_or_default();
        for id in &snapshot_widgets {
            if !live_set.contains(id)
                && let Some(root) = restored.take()
            {
                restored = tree::remove(root, *id).0;
            }
        }
        let snapshot_set: HashSet<PanelId> = snapshot_widgets.into_iter().collect();
        self.root = restored;
        self.mode = DockMode::MultipleDocument;
        for id in live.into_iter().filter(|id| !snapshot_set.contains(id)) {
            self.add_widget(id, InsertMode::split_right())?;
        }
        debug!("Left single-document mode");
        Ok(())
    }

    /// The tree as it would be persisted: the snapshot while maximized,
    /// otherwise the live tree.
    pub fn persistent_layout(&self) -> Result<Option<DockNode<PanelId>>, DockError> {
        if self.is_single_document() {
            let mut restored = self.clone();
            restored.leave_single_document()?;
            Ok(restored.root)
        } else {
            Ok(self.root.clone())
        }
    }

    /// The live tree.
    #[must_use]
    pub fn save_layout(&self) -> Option<DockNode<PanelId>> {
        self.root.clone()
    }

    /// Replaces the whole tree, leaving single-document mode.
    pub fn restore_layout(&mut self, root: Option<DockNode<PanelId>>) -> Result<(), DockError> {
        if let Some(node) = &root {
            node.validate()?;
            let mut seen = HashSet::new();
            if let Some(duplicate) = node.widgets().into_iter().find(|id| !seen.insert(**id)) {
                return Err(DockError::AlreadyDocked(*duplicate));
            }
        }
        self.root = root;
        self.snapshot = None;
        self.mode = DockMode::MultipleDocument;
        Ok(())
    }

    /// Removes every widget.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
