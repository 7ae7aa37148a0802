//! Linear split container used for the master panel.

use tracing::debug;

use crate::error::DockError;
use crate::types::{Orientation, PanelId};

/// Widgets laid out along one axis with relative weights.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitPanel {
    orientation: Orientation,
    widgets: Vec<PanelId>,
    sizes: Vec<f64>,
}

impl Default for SplitPanel {
    fn default() -> Self {
        Self::new(Orientation::Vertical)
    }
}

impl SplitPanel {
    /// Creates an empty split.
    #[must_use]
    pub const fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            widgets: Vec::new(),
            sizes: Vec::new(),
        }
    }

    /// Layout direction.
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Widgets in display order.
    #[must_use]
    pub fn widgets(&self) -> &[PanelId] {
        &self.widgets
    }

    /// Relative weights, index-aligned with [`widgets`](Self::widgets).
    #[must_use]
    pub fn relative_sizes(&self) -> &[f64] {
        &self.sizes
    }

    /// Number of widgets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Whether the split holds no widget.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Whether `id` is part of the split.
    #[must_use]
    pub fn contains(&self, id: PanelId) -> bool {
        self.widgets.contains(&id)
    }

    /// Position of `id`.
    #[must_use]
    pub fn index_of(&self, id: PanelId) -> Option<usize> {
        self.widgets.iter().position(|widget| *widget == id)
    }

    fn mean_weight(&self) -> f64 {
        if self.sizes.is_empty() {
            1.0
        } else {
            self.sizes.iter().sum::<f64>() / self.sizes.len() as f64
        }
    }

    /// Appends `id`.
    pub fn add(&mut self, id: PanelId) -> Result<(), DockError> {
        self.insert(self.widgets.len(), id)
    }

    /// Inserts `id` at `index`, clamped to the end. The new widget gets the
    /// mean weight of the existing ones.
    pub fn insert(&mut self, index: usize, id: PanelId) -> Result<(), DockError> {
        if self.contains(id) {
            return Err(DockError::AlreadyDocked(id));
        }
        let index = index.min(self.widgets.len());
        let weight = self.mean_weight();
        self.widgets.insert(index, id);
        self.sizes.insert(index, weight);
        debug!(panel_id = %id, index, "Widget added to split panel");
        Ok(())
    }

    /// Removes `id` and its weight, returning its former index.
    pub fn remove(&mut self, id: PanelId) -> Result<usize, DockError> {
        let index = self.index_of(id).ok_or(DockError::PanelNotFound(id))?;
        self.widgets.remove(index);
        self.sizes.remove(index);
        Ok(index)
    }

    /// Replaces the relative weights.
    pub fn set_relative_sizes(&mut self, sizes: Vec<f64>) -> Result<(), DockError> {
        if sizes.len() != self.widgets.len() {
            return Err(DockError::SizeCount {
                expected: self.widgets.len(),
                actual: sizes.len(),
            });
        }
        if let Some(bad) = sizes.iter().find(|size| !size.is_finite() || **size < 0.0) {
            return Err(DockError::InvalidSize(*bad));
        }
        self.sizes = sizes;
        Ok(())
    }

    /// Removes every widget.
    pub fn clear(&mut self) {
        self.widgets.clear();
        self.sizes.clear();
    }
}
