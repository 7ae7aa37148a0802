//! Master to detail filter propagation
//!
//! When a master panel reports a selection, every detail panel receives the
//! selection's filters restricted to the columns its own table knows about.
//! The panel's existing filters survive unless they constrain one of the
//! master's candidate columns (its pivots and filtered columns), in which
//! case the selection takes precedence.
//!
//! Each detail panel is updated by its own task. A task remembers the
//! panel's generation at spawn time and drops its result if the panel was
//! closed or fully restored meanwhile.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future::join_all;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::error::ViewerError;
use crate::layout::{Filter, ViewerConfig};
use crate::types::PanelId;
use crate::viewer::{DataSource, Schema, Viewer};

/// Columns a master panel's selection speaks for: its row pivots, column
/// pivots and filtered columns.
#[must_use]
pub fn candidate_columns(config: &ViewerConfig) -> HashSet<String> {
    config
        .row_pivots()
        .iter()
        .chain(config.column_pivots())
        .cloned()
        .chain(config.filters().iter().map(|filter| filter.column().to_string()))
        .collect()
}

/// Computes a detail panel's new filters.
///
/// Incoming filters on columns present in `schema` come first, followed by
/// the panel's current filters on non-candidate columns. Only the first
/// filter per column is kept.
#[must_use]
pub fn merge_filters(
    candidates: &HashSet<String>,
    incoming: &[Filter],
    current: &[Filter],
    schema: &Schema,
) -> Vec<Filter> {
    let valid = incoming
        .iter()
        .filter(|filter| !filter.column().is_empty() && schema.contains_key(filter.column()));
    let retained = current
        .iter()
        .filter(|filter| !candidates.contains(filter.column()));
    let mut seen = HashSet::new();
    valid
        .chain(retained)
        .filter(|filter| seen.insert(filter.column().to_string()))
        .cloned()
        .collect()
}

/// A detail panel captured when a selection is dispatched.
#[derive(Clone)]
pub struct FilterTarget {
    /// Panel to update.
    pub panel: PanelId,
    /// Its viewer.
    pub viewer: Arc<dyn Viewer>,
    /// Its bound data source.
    pub table: Option<Arc<dyn DataSource>>,
    /// Its generation counter.
    pub generation: Arc<AtomicU64>,
    /// Generation observed at dispatch time.
    pub expected: u64,
    /// Its filters at dispatch time.
    pub current_filters: Vec<Filter>,
}

/// What happened to one detail panel.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOutcome {
    /// The filters were applied.
    Applied(Vec<Filter>),
    /// The panel changed before the update landed; nothing was applied.
    Discarded,
    /// The panel has no data source.
    Unbound,
    /// Reading the schema or restoring the viewer failed.
    Failed(ViewerError),
}

/// Handles on the tasks spawned for one selection.
///
/// The tasks run to completion whether or not the batch is awaited.
#[derive(Debug, Default)]
pub struct PropagationBatch {
    tasks: Vec<(PanelId, JoinHandle<FilterOutcome>)>,
}

impl PropagationBatch {
    /// Number of spawned tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no task was spawned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Waits for every task and returns the per-panel outcomes.
    pub async fn settle(self) -> Vec<(PanelId, FilterOutcome)> {
        let (panels, handles): (Vec<_>, Vec<_>) = self.tasks.into_iter().unzip();
        let results = join_all(handles).await;
        panels
            .into_iter()
            .zip(results)
            .map(|(panel, result)| {
                let outcome = result.unwrap_or_else(|err| {
                    FilterOutcome::Failed(ViewerError::Restore(format!("task failed: {err}")))
                });
                (panel, outcome)
            })
            .collect()
    }
}

/// Spawns one filter update per target.
///
/// Outside a Tokio runtime nothing is spawned and the batch is empty.
#[instrument(skip_all, fields(targets = targets.len(), filters = incoming.len()))]
pub fn propagate(
    candidates: HashSet<String>,
    incoming: Vec<Filter>,
    targets: Vec<FilterTarget>,
) -> PropagationBatch {
    let Ok(handle) = Handle::try_current() else {
        warn!("No async runtime; filter propagation skipped");
        return PropagationBatch::default();
    };
    let candidates = Arc::new(candidates);
    let incoming = Arc::new(incoming);
    let tasks = targets
        .into_iter()
        .map(|target| {
            let panel = target.panel;
            let candidates = Arc::clone(&candidates);
            let incoming = Arc::clone(&incoming);
            let task = handle.spawn(filter_panel(target, candidates, incoming));
            (panel, task)
        })
        .collect();
    PropagationBatch { tasks }
}

async fn filter_panel(
    target: FilterTarget,
    candidates: Arc<HashSet<String>>,
    incoming: Arc<Vec<Filter>>,
) -> FilterOutcome {
    let Some(table) = target.table else {
        warn!(panel_id = %target.panel, "Detail panel has no table; skipping filters");
        return FilterOutcome::Unbound;
    };
    let schema = match table.schema().await {
        Ok(schema) => schema,
        Err(err) => {
            warn!(panel_id = %target.panel, table = table.name(), error = %err, "Schema read failed");
            return FilterOutcome::Failed(err);
        }
    };
    let filters = merge_filters(&candidates, &incoming, &target.current_filters, &schema);
    if target.generation.load(Ordering::SeqCst) != target.expected {
        debug!(panel_id = %target.panel, "Panel changed during propagation; discarding filters");
        return FilterOutcome::Discarded;
    }
    match target
        .viewer
        .restore(ViewerConfig::with_filters(filters.clone()))
        .await
    {
        Ok(()) => {
            debug!(panel_id = %target.panel, count = filters.len(), "Filters applied");
            FilterOutcome::Applied(filters)
        }
        Err(err) => {
            warn!(panel_id = %target.panel, error = %err, "Failed to apply filters");
            FilterOutcome::Failed(err)
        }
    }
}
