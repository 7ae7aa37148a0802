//! Layout document model
//!
//! A [`LayoutDocument`] is the persisted form of a whole workspace: the
//! top-level master/detail proportions, the recursive dock tree of detail
//! panels and the ordered list of master panels. Every panel is stored as a
//! [`PanelConfig`], the viewer's own settings plus the `master` flag.
//!
//! # Wire format
//!
//! ```json
//! {
//!   "sizes": [1, 3],
//!   "detail": {
//!     "main": {
//!       "type": "split-area",
//!       "orientation": "horizontal",
//!       "children": [
//!         { "type": "tab-area", "widgets": [{ "table": "sales", "master": false }], "current": 0 },
//!         { "type": "leaf", "widget": { "table": "sales", "row-pivots": ["region"] } }
//!       ],
//!       "sizes": [0.5, 0.5]
//!     }
//!   },
//!   "master": { "widgets": [], "sizes": [] }
//! }
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::LayoutError;
use crate::types::Orientation;

/// Default `[master, detail]` proportions of the workspace split.
pub const DEFAULT_WORKSPACE_SIZES: [f64; 2] = [1.0, 3.0];

const fn default_workspace_sizes() -> [f64; 2] {
    DEFAULT_WORKSPACE_SIZES
}

/// A single `(column, operator, value)` filter, stored as a 3-element array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter(pub String, pub String, pub Value);

impl Filter {
    /// Creates a filter.
    pub fn new(column: impl Into<String>, op: impl Into<String>, value: impl Into<Value>) -> Self {
        Self(column.into(), op.into(), value.into())
    }

    /// Column the filter applies to.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.0
    }

    /// Comparison operator.
    #[must_use]
    pub fn op(&self) -> &str {
        &self.1
    }

    /// Value compared against.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.2
    }
}

/// Settings understood by a viewer.
///
/// Every field is optional: when a config is restored, absent fields leave
/// the viewer's current setting untouched. Keys the workspace does not
/// interpret are kept verbatim in `settings`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ViewerConfig {
    /// Display name of the panel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Table registry key the panel is bound to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Row pivot columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_pivots: Option<Vec<String>>,
    /// Column pivot columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_pivots: Option<Vec<String>>,
    /// Applied filters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<Filter>>,
    /// Any other visualization setting.
    #[serde(flatten)]
    pub settings: Map<String, Value>,
}

impl ViewerConfig {
    /// A partial config that only touches the filters.
    #[must_use]
    pub fn with_filters(filters: Vec<Filter>) -> Self {
        Self {
            filters: Some(filters),
            ..Self::default()
        }
    }

    /// Applied filters, empty when unset.
    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        self.filters.as_deref().unwrap_or_default()
    }

    /// Row pivots, empty when unset.
    #[must_use]
    pub fn row_pivots(&self) -> &[String] {
        self.row_pivots.as_deref().unwrap_or_default()
    }

    /// Column pivots, empty when unset.
    #[must_use]
    pub fn column_pivots(&self) -> &[String] {
        self.column_pivots.as_deref().unwrap_or_default()
    }

    /// Overlays every field present in `patch` onto `self`.
    pub fn merge(&mut self, patch: Self) {
        if patch.name.is_some() {
            self.name = patch.name;
        }
        if patch.table.is_some() {
            self.table = patch.table;
        }
        if patch.row_pivots.is_some() {
            self.row_pivots = patch.row_pivots;
        }
        if patch.column_pivots.is_some() {
            self.column_pivots = patch.column_pivots;
        }
        if patch.filters.is_some() {
            self.filters = patch.filters;
        }
        self.settings.extend(patch.settings);
    }
}

/// Persisted configuration of one panel: viewer settings plus the
/// `master` flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelConfig {
    /// Whether the panel is a master panel.
    #[serde(default)]
    pub master: bool,
    /// Everything the viewer itself saves.
    #[serde(flatten)]
    pub viewer: ViewerConfig,
}

impl PanelConfig {
    /// Creates a detail config bound to `table`.
    pub fn for_table(table: impl Into<String>) -> Self {
        Self {
            master: false,
            viewer: ViewerConfig {
                table: Some(table.into()),
                ..ViewerConfig::default()
            },
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.viewer.name = Some(name.into());
        self
    }

    /// Sets the row pivots.
    #[must_use]
    pub fn with_row_pivots<I, S>(mut self, pivots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.viewer.row_pivots = Some(pivots.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the column pivots.
    #[must_use]
    pub fn with_column_pivots<I, S>(mut self, pivots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.viewer.column_pivots = Some(pivots.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the filters.
    #[must_use]
    pub fn with_filters(mut self, filters: Vec<Filter>) -> Self {
        self.viewer.filters = Some(filters);
        self
    }

    /// Sets the master flag.
    #[must_use]
    pub const fn with_master(mut self, master: bool) -> Self {
        self.master = master;
        self
    }
}

/// A node of the dock tree.
///
/// `W` is the widget payload: [`PanelConfig`] in persisted documents,
/// [`PanelId`](crate::types::PanelId) in the live dock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DockNode<W> {
    /// Children laid out along `orientation`, weighted by `sizes`.
    #[serde(rename = "split-area")]
    Split {
        /// Layout direction.
        orientation: Orientation,
        /// Child nodes in display order.
        children: Vec<DockNode<W>>,
        /// Relative weight of each child, index-aligned with `children`.
        sizes: Vec<f64>,
    },
    /// Widgets stacked behind a tab bar.
    #[serde(rename = "tab-area")]
    TabGroup {
        /// Widgets in tab order.
        widgets: Vec<W>,
        /// Index of the active tab.
        #[serde(default)]
        current: usize,
    },
    /// A single widget slot.
    #[serde(rename = "leaf")]
    Leaf {
        /// The widget.
        widget: W,
    },
}

impl<W> DockNode<W> {
    /// Creates a leaf node.
    pub const fn leaf(widget: W) -> Self {
        Self::Leaf { widget }
    }

    /// Creates a split with equal weights.
    #[must_use]
    pub fn split(orientation: Orientation, children: Vec<Self>) -> Self {
        let sizes = vec![1.0 / children.len().max(1) as f64; children.len()];
        Self::Split {
            orientation,
            children,
            sizes,
        }
    }

    /// Creates a tab group with the first tab active.
    #[must_use]
    pub const fn tabs(widgets: Vec<W>) -> Self {
        Self::TabGroup {
            widgets,
            current: 0,
        }
    }

    /// Replaces every widget with `f(widget)`, keeping the tree shape.
    pub fn map_widgets<U>(self, mut f: impl FnMut(W) -> U) -> DockNode<U> {
        self.map_with(&mut f)
    }

    fn map_with<U, F: FnMut(W) -> U>(self, f: &mut F) -> DockNode<U> {
        match self {
            Self::Split {
                orientation,
                children,
                sizes,
            } => DockNode::Split {
                orientation,
                children: children.into_iter().map(|child| child.map_with(f)).collect(),
                sizes,
            },
            Self::TabGroup { widgets, current } => DockNode::TabGroup {
                widgets: widgets.into_iter().map(|widget| f(widget)).collect(),
                current,
            },
            Self::Leaf { widget } => DockNode::Leaf { widget: f(widget) },
        }
    }

    /// Fallible [`map_widgets`](Self::map_widgets); stops at the first error.
    pub fn try_map_widgets<U, E>(
        self,
        mut f: impl FnMut(W) -> Result<U, E>,
    ) -> Result<DockNode<U>, E> {
        self.try_map_with(&mut f)
    }

    fn try_map_with<U, E, F: FnMut(W) -> Result<U, E>>(self, f: &mut F) -> Result<DockNode<U>, E> {
        Ok(match self {
            Self::Split {
                orientation,
                children,
                sizes,
            } => DockNode::Split {
                orientation,
                children: children
                    .into_iter()
                    .map(|child| child.try_map_with(f))
                    .collect::<Result<_, _>>()?,
                sizes,
            },
            Self::TabGroup { widgets, current } => DockNode::TabGroup {
                widgets: widgets
                    .into_iter()
                    .map(|widget| f(widget))
                    .collect::<Result<_, _>>()?,
                current,
            },
            Self::Leaf { widget } => DockNode::Leaf { widget: f(widget)? },
        })
    }

    /// Borrows every widget in pre-order (depth-first, left-to-right).
    #[must_use]
    pub fn widgets(&self) -> Vec<&W> {
        let mut out = Vec::new();
        self.collect_widgets(&mut out);
        out
    }

    fn collect_widgets<'a>(&'a self, out: &mut Vec<&'a W>) {
        match self {
            Self::Split { children, .. } => {
                for child in children {
                    child.collect_widgets(out);
                }
            }
            Self::TabGroup { widgets, .. } => out.extend(widgets.iter()),
            Self::Leaf { widget } => out.push(widget),
        }
    }

    /// Number of widgets in the tree.
    #[must_use]
    pub fn widget_count(&self) -> usize {
        match self {
            Self::Split { children, .. } => children.iter().map(Self::widget_count).sum(),
            Self::TabGroup { widgets, .. } => widgets.len(),
            Self::Leaf { .. } => 1,
        }
    }

    /// Depth of the tree; a leaf or tab group has depth 0.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Split { children, .. } => {
                1 + children.iter().map(Self::depth).max().unwrap_or_default()
            }
            Self::TabGroup { .. } | Self::Leaf { .. } => 0,
        }
    }

    /// Checks structural consistency: aligned sizes, no empty containers,
    /// active tabs in range and finite non-negative weights.
    ///
    /// # Errors
    ///
    /// Returns the first [`LayoutError`] found.
    pub fn validate(&self) -> Result<(), LayoutError> {
        match self {
            Self::Split {
                children, sizes, ..
            } => {
                if children.is_empty() {
                    return Err(LayoutError::EmptySplit);
                }
                if children.len() != sizes.len() {
                    return Err(LayoutError::SizeMismatch {
                        children: children.len(),
                        sizes: sizes.len(),
                    });
                }
                validate_sizes(sizes)?;
                children.iter().try_for_each(Self::validate)
            }
            Self::TabGroup { widgets, current } => {
                if widgets.is_empty() {
                    return Err(LayoutError::EmptyTabGroup);
                }
                if *current >= widgets.len() {
                    return Err(LayoutError::TabIndexOutOfRange {
                        current: *current,
                        len: widgets.len(),
                    });
                }
                Ok(())
            }
            Self::Leaf { .. } => Ok(()),
        }
    }
}

/// Checks that every weight is finite and non-negative.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidSize`] for the first offending weight.
pub fn validate_sizes(sizes: &[f64]) -> Result<(), LayoutError> {
    match sizes.iter().find(|size| !size.is_finite() || **size < 0.0) {
        Some(size) => Err(LayoutError::InvalidSize(*size)),
        None => Ok(()),
    }
}

/// The outer wrapper of a dock tree; `main` is absent for an empty dock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DockLayout<W> {
    /// Root node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<DockNode<W>>,
}

impl<W> Default for DockLayout<W> {
    fn default() -> Self {
        Self { main: None }
    }
}

impl<W> DockLayout<W> {
    /// Wraps a root node.
    pub const fn new(main: Option<DockNode<W>>) -> Self {
        Self { main }
    }

    /// Maps every widget, recursing into `main`.
    pub fn map_widgets<U>(self, f: impl FnMut(W) -> U) -> DockLayout<U> {
        DockLayout {
            main: self.main.map(|node| node.map_widgets(f)),
        }
    }

    /// Number of widgets in the layout.
    #[must_use]
    pub fn widget_count(&self) -> usize {
        self.main.as_ref().map_or(0, DockNode::widget_count)
    }
}

/// The ordered master panels and their relative heights.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MasterLayout {
    /// Master panel configs, top to bottom.
    #[serde(default)]
    pub widgets: Vec<PanelConfig>,
    /// Relative weight of each master panel.
    #[serde(default)]
    pub sizes: Vec<f64>,
}

/// Serializable snapshot of a whole workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    /// `[master, detail]` relative weights of the top-level split.
    #[serde(default = "default_workspace_sizes")]
    pub sizes: [f64; 2],
    /// Dock tree of detail panels.
    #[serde(default)]
    pub detail: DockLayout<PanelConfig>,
    /// Master panels.
    #[serde(default)]
    pub master: MasterLayout,
}

impl Default for LayoutDocument {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_WORKSPACE_SIZES,
            detail: DockLayout::default(),
            master: MasterLayout::default(),
        }
    }
}

impl LayoutDocument {
    /// Parses and validates a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Parse`] for malformed JSON, or a validation
    /// error for a structurally inconsistent tree.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let doc: Self =
            serde_json::from_str(json).map_err(|e| LayoutError::Parse(e.to_string()))?;
        doc.validate()?;
        Ok(doc)
    }

    /// Serializes the document to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Serialize`] if serialization fails.
    pub fn to_json(&self) -> Result<String, LayoutError> {
        serde_json::to_string(self).map_err(|e| LayoutError::Serialize(e.to_string()))
    }

    /// Serializes the document to indented JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::Serialize`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, LayoutError> {
        serde_json::to_string_pretty(self).map_err(|e| LayoutError::Serialize(e.to_string()))
    }

    /// Validates sizes and the dock tree.
    ///
    /// # Errors
    ///
    /// Returns the first [`LayoutError`] found.
    pub fn validate(&self) -> Result<(), LayoutError> {
        validate_sizes(&self.sizes)?;
        validate_sizes(&self.master.sizes)?;
        if !self.master.sizes.is_empty() && self.master.sizes.len() != self.master.widgets.len() {
            return Err(LayoutError::MasterSizeMismatch {
                widgets: self.master.widgets.len(),
                sizes: self.master.sizes.len(),
            });
        }
        match &self.detail.main {
            Some(node) => node.validate(),
            None => Ok(()),
        }
    }

    /// Total number of panels, master and detail.
    #[must_use]
    pub fn panel_count(&self) -> usize {
        self.master.widgets.len() + self.detail.widget_count()
    }

    /// Every table name referenced by a panel, sorted.
    #[must_use]
    pub fn table_names(&self) -> BTreeSet<String> {
        let detail = self
            .detail
            .main
            .as_ref()
            .map(DockNode::widgets)
            .unwrap_or_default();
        self.master
            .widgets
            .iter()
            .chain(detail)
            .filter_map(|config| config.viewer.table.clone())
            .collect()
    }
}
