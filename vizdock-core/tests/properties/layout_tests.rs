//! Property tests for layout documents

use proptest::prelude::*;
use vizdock_core::{
    DockLayout, DockNode, Filter, LayoutDocument, MasterLayout, Orientation, PanelConfig,
};

// ============================================================================
// Test Strategies
// ============================================================================

fn orientation_strategy() -> impl Strategy<Value = Orientation> {
    prop_oneof![Just(Orientation::Horizontal), Just(Orientation::Vertical)]
}

fn panel_config_strategy() -> impl Strategy<Value = PanelConfig> + Clone {
    (
        "[a-z]{1,8}",
        proptest::option::of("[A-Za-z ]{1,12}"),
        proptest::collection::vec("[a-z]{1,6}", 0..3),
        proptest::collection::vec(("[a-z]{1,6}", 0i64..3000), 0..3),
    )
        .prop_map(|(table, name, pivots, filters)| {
            let mut config = PanelConfig::for_table(table);
            if let Some(name) = name {
                config = config.with_name(name);
            }
            if !pivots.is_empty() {
                config = config.with_row_pivots(pivots);
            }
            if !filters.is_empty() {
                config = config.with_filters(
                    filters
                        .into_iter()
                        .map(|(column, value)| Filter::new(column, "==", value))
                        .collect(),
                );
            }
            config
        })
}

fn weights(len: usize) -> impl Strategy<Value = Vec<f64>> {
    proptest::collection::vec((1u32..100).prop_map(|w| f64::from(w) / 10.0), len)
}

fn dock_node_strategy<W, S>(widget: S) -> impl Strategy<Value = DockNode<W>>
where
    W: Clone + std::fmt::Debug + 'static,
    S: Strategy<Value = W> + Clone + 'static,
{
    let leaf = prop_oneof![
        widget.clone().prop_map(DockNode::leaf),
        proptest::collection::vec(widget, 1..4).prop_flat_map(|widgets| {
            let len = widgets.len();
            (Just(widgets), 0..len)
                .prop_map(|(widgets, current)| DockNode::TabGroup { widgets, current })
        }),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        (orientation_strategy(), proptest::collection::vec(inner, 1..4)).prop_flat_map(
            |(orientation, children)| {
                let len = children.len();
                (Just(orientation), Just(children), weights(len)).prop_map(
                    |(orientation, children, sizes)| DockNode::Split {
                        orientation,
                        children,
                        sizes,
                    },
                )
            },
        )
    })
}

fn layout_document_strategy() -> impl Strategy<Value = LayoutDocument> {
    (
        weights(2),
        proptest::option::of(dock_node_strategy(panel_config_strategy())),
        proptest::collection::vec(panel_config_strategy(), 0..3),
    )
        .prop_flat_map(|(sizes, main, masters)| {
            let len = masters.len();
            (Just(sizes), Just(main), Just(masters), weights(len))
        })
        .prop_map(|(sizes, main, masters, master_sizes)| LayoutDocument {
            sizes: [sizes[0], sizes[1]],
            detail: DockLayout::new(main),
            master: MasterLayout {
                widgets: masters
                    .into_iter()
                    .map(|config| config.with_master(true))
                    .collect(),
                sizes: master_sizes,
            },
        })
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn map_widgets_preserves_shape(node in dock_node_strategy(0u32..1000)) {
        let mapped = node.clone().map_widgets(|w| u64::from(w) * 2);
        prop_assert_eq!(mapped.widget_count(), node.widget_count());
        prop_assert_eq!(mapped.depth(), node.depth());
        let doubled: Vec<u64> = node.widgets().into_iter().map(|w| u64::from(*w) * 2).collect();
        let actual: Vec<u64> = mapped.widgets().into_iter().copied().collect();
        prop_assert_eq!(actual, doubled);
        prop_assert!(mapped.validate().is_ok());
    }

    #[test]
    fn try_map_widgets_stops_at_first_error(node in dock_node_strategy(0u32..10)) {
        let result: Result<DockNode<u32>, u32> =
            node.clone().try_map_widgets(|w| if w == 7 { Err(w) } else { Ok(w) });
        let has_seven = node.widgets().into_iter().any(|w| *w == 7);
        prop_assert_eq!(result.is_err(), has_seven);
    }

    #[test]
    fn generated_documents_survive_json(doc in layout_document_strategy()) {
        prop_assert!(doc.validate().is_ok());
        let json = doc.to_json().unwrap();
        let parsed = LayoutDocument::from_json(&json).unwrap();
        prop_assert_eq!(parsed.panel_count(), doc.panel_count());
        prop_assert_eq!(parsed, doc);
    }

    #[test]
    fn table_names_cover_every_panel(doc in layout_document_strategy()) {
        let names = doc.table_names();
        prop_assert!(names.len() <= doc.panel_count());
        for config in &doc.master.widgets {
            let table = config.viewer.table.as_deref().unwrap();
            prop_assert!(names.contains(table));
        }
    }
}
