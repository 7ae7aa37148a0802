//! Master selections reaching detail panels

use std::sync::Arc;
use std::time::Duration;

use vizdock_core::testing::MemoryTable;
use vizdock_core::{
    Filter, FilterOutcome, InsertMode, PanelConfig, ViewerConfig, ViewerEvent, WidgetSpec,
};

use super::support::{spec, workspace};

fn selection(filters: Vec<Filter>) -> ViewerEvent {
    ViewerEvent::Selection {
        config: ViewerConfig::with_filters(filters),
    }
}

#[tokio::test]
async fn selection_overrides_candidate_filters_only() {
    let (mut ws, host) = workspace();
    let master_spec = spec(
        &ws,
        "sales",
        PanelConfig::for_table("sales")
            .with_row_pivots(["region"])
            .with_filters(vec![Filter::new("region", "==", "EMEA")])
            .with_master(true),
    );
    let master = ws.add_widget(master_spec, InsertMode::split_right()).await.unwrap();
    let detail_spec = spec(
        &ws,
        "sales",
        PanelConfig::for_table("sales").with_filters(vec![
            Filter::new("region", "==", "APAC"),
            Filter::new("year", "==", "2020"),
        ]),
    );
    let detail = ws.add_widget(detail_spec, InsertMode::split_right()).await.unwrap();

    host.viewer(&master)
        .unwrap()
        .emit(&selection(vec![Filter::new("region", "==", "EMEA")]));
    let batches = ws.process_events();
    assert_eq!(batches.len(), 1);
    let outcomes = batches.into_iter().next().unwrap().settle().await;
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].0, detail);

    let expected = vec![
        Filter::new("region", "==", "EMEA"),
        Filter::new("year", "==", "2020"),
    ];
    assert_eq!(outcomes[0].1, FilterOutcome::Applied(expected.clone()));
    assert_eq!(host.viewer(&detail).unwrap().config().filters(), expected);
}

#[tokio::test]
async fn filters_are_restricted_to_each_schema() {
    let (mut ws, host) = workspace();
    let master_spec = spec(
        &ws,
        "sales",
        PanelConfig::for_table("sales").with_master(true),
    );
    let master = ws.add_widget(master_spec, InsertMode::split_right()).await.unwrap();
    let stock_spec = spec(&ws, "stock", PanelConfig::for_table("stock"));
    let stock = ws.add_widget(stock_spec, InsertMode::split_right()).await.unwrap();
    let sales_spec = spec(&ws, "sales", PanelConfig::for_table("sales"));
    let sales = ws.add_widget(sales_spec, InsertMode::split_right()).await.unwrap();

    host.viewer(&master).unwrap().emit(&selection(vec![
        Filter::new("region", "==", "EMEA"),
        Filter::new("year", "==", 2021),
    ]));
    for batch in ws.process_events() {
        batch.settle().await;
    }

    assert_eq!(
        host.viewer(&stock).unwrap().config().filters(),
        [Filter::new("year", "==", 2021)]
    );
    assert_eq!(
        host.viewer(&sales).unwrap().config().filters(),
        [
            Filter::new("region", "==", "EMEA"),
            Filter::new("year", "==", 2021)
        ]
    );
}

#[tokio::test]
async fn detail_selection_is_not_propagated() {
    let (mut ws, host) = workspace();
    let a_spec = spec(&ws, "sales", PanelConfig::for_table("sales"));
    let a = ws.add_widget(a_spec, InsertMode::split_right()).await.unwrap();
    let b_spec = spec(&ws, "sales", PanelConfig::for_table("sales"));
    let b = ws.add_widget(b_spec, InsertMode::split_right()).await.unwrap();

    // Detail panels have no selection listener at all.
    host.viewer(&a)
        .unwrap()
        .emit(&selection(vec![Filter::new("region", "==", "EMEA")]));
    assert!(ws.process_events().is_empty());
    assert!(host.viewer(&b).unwrap().config().filters().is_empty());
}

#[tokio::test]
async fn demoted_master_stops_propagating() {
    let (mut ws, host) = workspace();
    let m_spec = spec(&ws, "sales", PanelConfig::for_table("sales").with_master(true));
    let m = ws.add_widget(m_spec, InsertMode::split_right()).await.unwrap();
    let d_spec = spec(&ws, "sales", PanelConfig::for_table("sales"));
    ws.add_widget(d_spec, InsertMode::split_right()).await.unwrap();

    ws.make_detail(m).await.unwrap();
    host.viewer(&m)
        .unwrap()
        .emit(&selection(vec![Filter::new("region", "==", "EMEA")]));
    assert!(ws.process_events().is_empty());
}

#[tokio::test]
async fn unbound_detail_is_skipped() {
    let (mut ws, host) = workspace();
    let m_spec = spec(&ws, "sales", PanelConfig::for_table("sales").with_master(true));
    let m = ws.add_widget(m_spec, InsertMode::split_right()).await.unwrap();
    let unbound = ws
        .add_widget(
            WidgetSpec::new("loose", PanelConfig::default()),
            InsertMode::split_right(),
        )
        .await
        .unwrap();

    host.viewer(&m)
        .unwrap()
        .emit(&selection(vec![Filter::new("region", "==", "EMEA")]));
    let outcomes = ws.process_events().pop().unwrap().settle().await;
    assert_eq!(outcomes, vec![(unbound, FilterOutcome::Unbound)]);
}

#[tokio::test]
async fn late_update_for_closed_panel_is_discarded() {
    let (mut ws, host) = workspace();
    ws.add_table(
        "slow",
        Arc::new(
            MemoryTable::new("slow", [("region", "string")]).with_delay(Duration::from_millis(20)),
        ),
    );
    let m_spec = spec(&ws, "sales", PanelConfig::for_table("sales").with_master(true));
    let m = ws.add_widget(m_spec, InsertMode::split_right()).await.unwrap();
    let slow_spec = spec(&ws, "slow", PanelConfig::for_table("slow"));
    let slow = ws.add_widget(slow_spec, InsertMode::split_right()).await.unwrap();
    let restores_before = host.viewer(&slow).unwrap().restores().len();

    host.viewer(&m)
        .unwrap()
        .emit(&selection(vec![Filter::new("region", "==", "EMEA")]));
    let batch = ws.process_events().pop().unwrap();
    ws.close_widget(slow).await.unwrap();

    let outcomes = batch.settle().await;
    assert_eq!(outcomes, vec![(slow, FilterOutcome::Discarded)]);
    assert_eq!(host.viewer(&slow).unwrap().restores().len(), restores_before);
}
