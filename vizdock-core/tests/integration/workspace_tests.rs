//! Workspace save/restore, master/detail moves and single-document mode

use vizdock_core::{
    DockNode, InsertMode, LayoutDocument, Orientation, PanelConfig, PanelId, Region,
    Viewer, ViewerEventKind, WorkspaceError,
};

use super::support::{spec, workspace};

const LAYOUT_JSON: &str = r#"{
    "sizes": [1, 3],
    "detail": {
        "main": {
            "type": "split-area",
            "orientation": "vertical",
            "sizes": [0.5, 0.5],
            "children": [
                {"type": "leaf", "widget": {"table": "sales", "name": "By region", "row-pivots": ["region"]}},
                {"type": "tab-area", "current": 1, "widgets": [
                    {"table": "stock", "name": "Stock"},
                    {"table": "sales", "name": "Amounts", "plugin": "d3_y_bar"}
                ]}
            ]
        }
    },
    "master": {
        "widgets": [{"table": "sales", "name": "Regions", "row-pivots": ["region"]}],
        "sizes": [1]
    }
}"#;

#[tokio::test]
async fn save_restore_round_trip() {
    let (mut ws, _host) = workspace();
    let a_spec = spec(
        &ws,
        "sales",
        PanelConfig::for_table("sales")
            .with_name("A")
            .with_row_pivots(["region"]),
    );
    let a = ws.add_widget(a_spec, InsertMode::split_right()).await.unwrap();
    let b_spec = spec(&ws, "stock", PanelConfig::for_table("stock").with_name("B"));
    let b = ws
        .add_widget(b_spec, InsertMode::SplitBottom { reference: Some(a) })
        .await
        .unwrap();
    let c_spec = spec(&ws, "sales", PanelConfig::for_table("sales").with_name("C"));
    ws.add_widget(c_spec, InsertMode::TabAfter { reference: Some(b) })
        .await
        .unwrap();
    let m_spec = spec(
        &ws,
        "sales",
        PanelConfig::for_table("sales").with_name("M").with_master(true),
    );
    ws.add_widget(m_spec, InsertMode::split_right()).await.unwrap();
    ws.set_sizes([2.0, 5.0]).unwrap();

    let saved = ws.save().unwrap();
    assert_eq!(saved.panel_count(), 4);
    assert_eq!(saved.master.widgets.len(), 1);
    assert!(saved.master.widgets[0].master);
    let json = saved.to_json().unwrap();

    let (mut restored, host) = workspace();
    restored
        .restore(LayoutDocument::from_json(&json).unwrap())
        .await
        .unwrap();
    restored.check_invariants().unwrap();
    assert_eq!(host.created(), 4);
    assert_eq!(restored.save().unwrap(), saved);
    assert_eq!(restored.save().unwrap().to_json().unwrap(), json);
}

#[tokio::test]
async fn restore_external_document() {
    let (mut ws, host) = workspace();
    let doc = LayoutDocument::from_json(LAYOUT_JSON).unwrap();
    ws.restore(doc.clone()).await.unwrap();
    ws.check_invariants().unwrap();

    assert_eq!(ws.len(), 4);
    assert!(ws.is_master_mounted());
    assert_eq!(ws.mounted_regions(), vec![Region::Master, Region::Detail]);
    assert_eq!(ws.sizes(), [1.0, 3.0]);

    let master = ws.master().widgets()[0];
    let panel = ws.panel(master).unwrap();
    assert!(panel.is_master());
    assert_eq!(panel.title(), "Regions");
    let viewer = host.viewer(&master).unwrap();
    assert_eq!(viewer.listener_count(ViewerEventKind::Selection), 1);
    assert_eq!(viewer.table_name().as_deref(), Some("sales"));

    // Only the current tab of the tab group is visible.
    let detail = ws.dock().widgets();
    assert_eq!(detail.len(), 3);
    assert!(ws.panel(detail[0]).unwrap().is_visible());
    assert!(!ws.panel(detail[1]).unwrap().is_visible());
    assert!(ws.panel(detail[2]).unwrap().is_visible());

    let saved = ws.save().unwrap();
    assert_eq!(saved.detail, doc.detail);
    assert_eq!(
        saved.detail.main.as_ref().map(DockNode::widget_count),
        Some(3)
    );
}

#[tokio::test]
async fn restore_replaces_previous_panels() {
    let (mut ws, host) = workspace();
    let old_spec = spec(&ws, "sales", PanelConfig::for_table("sales"));
    let old = ws.add_widget(old_spec, InsertMode::split_right()).await.unwrap();
    ws.restore(LayoutDocument::from_json(LAYOUT_JSON).unwrap())
        .await
        .unwrap();
    assert!(matches!(ws.panel(old), Err(WorkspaceError::UnknownPanel(_))));
    let viewer = host.viewer(&old).unwrap();
    assert!(viewer.is_deleted());
    assert_eq!(viewer.total_listeners(), 0);
}

#[tokio::test]
async fn unregistered_table_restores_without_data() {
    let (mut ws, host) = workspace();
    let json = r#"{"detail": {"main": {"type": "leaf", "widget": {"table": "ghost"}}}}"#;
    ws.restore(LayoutDocument::from_json(json).unwrap())
        .await
        .unwrap();
    let id = ws.dock().widgets()[0];
    assert!(ws.panel(id).unwrap().table().is_none());
    assert!(host.viewer(&id).unwrap().table_name().is_none());
    assert_eq!(ws.panel(id).unwrap().title(), vizdock_core::DEFAULT_TITLE);
    assert!(!ws.is_master_mounted());
    ws.check_invariants().unwrap();
}

#[tokio::test]
async fn invalid_document_leaves_workspace_untouched() {
    let (mut ws, _host) = workspace();
    let keep_spec = spec(&ws, "sales", PanelConfig::for_table("sales"));
    let keep = ws.add_widget(keep_spec, InsertMode::split_right()).await.unwrap();
    let mut doc = LayoutDocument::from_json(LAYOUT_JSON).unwrap();
    doc.master.sizes = vec![1.0, 1.0];
    assert!(matches!(
        ws.restore(doc).await,
        Err(WorkspaceError::Layout(_))
    ));
    assert!(ws.panel(keep).is_ok());
}

#[tokio::test]
async fn master_panel_mounts_and_unmounts() {
    let (mut ws, host) = workspace();
    let first_spec = spec(&ws, "sales", PanelConfig::for_table("sales"));
    let first = ws.add_widget(first_spec, InsertMode::split_right()).await.unwrap();
    let second_spec = spec(&ws, "stock", PanelConfig::for_table("stock"));
    let second = ws.add_widget(second_spec, InsertMode::split_right()).await.unwrap();
    assert_eq!(ws.mounted_regions(), vec![Region::Detail]);

    ws.set_sizes([4.0, 4.0]).unwrap();
    ws.make_master(first).await.unwrap();
    assert_eq!(ws.mounted_regions(), vec![Region::Master, Region::Detail]);
    assert_eq!(ws.sizes(), [1.0, 3.0]);
    let viewer = host.viewer(&first).unwrap();
    assert!(viewer.is_selectable());
    assert!(viewer.has_class(vizdock_core::MASTER_CLASS));
    assert!(!viewer.has_class(vizdock_core::DETAIL_CLASS));
    assert!(viewer.restyle_count() > 0);

    ws.make_detail(first).await.unwrap();
    assert_eq!(ws.mounted_regions(), vec![Region::Detail]);
    assert!(!viewer.is_selectable());
    assert_eq!(ws.dock().widgets(), vec![second, first]);
    ws.check_invariants().unwrap();
}

#[tokio::test]
async fn toggling_roles_never_duplicates_listeners() {
    let (mut ws, host) = workspace();
    let id_spec = spec(&ws, "sales", PanelConfig::for_table("sales"));
    let id = ws.add_widget(id_spec, InsertMode::split_right()).await.unwrap();
    let viewer = host.viewer(&id).unwrap();

    for round in 0..4 {
        ws.toggle_master_detail(id).await.unwrap();
        let master = round % 2 == 0;
        assert_eq!(ws.panel(id).unwrap().is_master(), master);
        assert_eq!(viewer.listener_count(ViewerEventKind::ContextMenu), 1);
        assert_eq!(viewer.listener_count(ViewerEventKind::SettingsToggled), 1);
        assert_eq!(
            viewer.listener_count(ViewerEventKind::Selection),
            usize::from(master)
        );
        ws.check_invariants().unwrap();
    }
}

#[tokio::test]
async fn duplicate_master_goes_after_source() {
    let (mut ws, host) = workspace();
    let mut ids = Vec::new();
    for name in ["one", "two"] {
        let master_spec = spec(
            &ws,
            "sales",
            PanelConfig::for_table("sales").with_name(name).with_master(true),
        );
        ids.push(ws.add_widget(master_spec, InsertMode::split_right()).await.unwrap());
    }
    let copy = ws.duplicate(ids[0]).await.unwrap();
    assert_eq!(ws.master().widgets(), &[ids[0], copy, ids[1]]);

    let panel = ws.panel(copy).unwrap();
    assert_eq!(panel.title(), vizdock_core::DUPLICATE_TITLE);
    assert!(panel.is_master());
    assert_eq!(panel.save(), ws.panel(ids[0]).unwrap().save());
    assert_eq!(
        host.viewer(&copy).unwrap().listener_count(ViewerEventKind::Selection),
        1
    );
    assert_eq!(
        host.viewer(&copy).unwrap().table_name().as_deref(),
        Some("sales")
    );
    ws.check_invariants().unwrap();
}

#[tokio::test]
async fn duplicate_detail_docks_right_of_source() {
    let (mut ws, _host) = workspace();
    let a_spec = spec(&ws, "sales", PanelConfig::for_table("sales"));
    let a = ws.add_widget(a_spec, InsertMode::split_right()).await.unwrap();
    let b_spec = spec(&ws, "stock", PanelConfig::for_table("stock"));
    let b = ws.add_widget(b_spec, InsertMode::split_right()).await.unwrap();

    let copy = ws.duplicate(a).await.unwrap();
    assert_eq!(ws.dock().widgets(), vec![a, copy, b]);
    assert!(matches!(
        ws.dock().root(),
        Some(DockNode::Split {
            orientation: Orientation::Horizontal,
            ..
        })
    ));
    assert!(!ws.panel(copy).unwrap().is_master());
}

#[tokio::test]
async fn single_document_round_trip() {
    let (mut ws, host) = workspace();
    let mut ids: Vec<PanelId> = Vec::new();
    for table in ["sales", "stock", "sales"] {
        let detail_spec = spec(&ws, table, PanelConfig::for_table(table));
        ids.push(ws.add_widget(detail_spec, InsertMode::split_right()).await.unwrap());
    }
    let before = ws.save().unwrap();

    let resizes = host.viewer(&ids[1]).unwrap().resize_count();
    ws.toggle_single_document(ids[1]).await.unwrap();
    assert!(ws.dock().is_single_document());
    assert_eq!(ws.dock().visible_widgets(), vec![ids[1]]);
    assert!(!ws.panel(ids[0]).unwrap().is_visible());
    assert!(ws.panel(ids[1]).unwrap().is_visible());
    assert!(host.viewer(&ids[1]).unwrap().resize_count() > resizes);

    // Saving while maximized keeps the full layout.
    assert_eq!(ws.save().unwrap(), before);

    ws.toggle_single_document(ids[1]).await.unwrap();
    assert!(!ws.dock().is_single_document());
    assert_eq!(ws.save().unwrap(), before);
    assert!(ws.panel(ids[0]).unwrap().is_visible());
    ws.check_invariants().unwrap();
}

#[tokio::test]
async fn duplicate_leaves_single_document_mode() {
    let (mut ws, _host) = workspace();
    let a_spec = spec(&ws, "sales", PanelConfig::for_table("sales"));
    let a = ws.add_widget(a_spec, InsertMode::split_right()).await.unwrap();
    let b_spec = spec(&ws, "stock", PanelConfig::for_table("stock"));
    let b = ws.add_widget(b_spec, InsertMode::split_right()).await.unwrap();
    ws.toggle_single_document(a).await.unwrap();

    let copy = ws.duplicate(a).await.unwrap();
    assert!(!ws.dock().is_single_document());
    assert_eq!(ws.dock().widgets(), vec![a, copy, b]);
}

#[tokio::test]
async fn toggle_master_detail_leaves_single_document_mode() {
    let (mut ws, _host) = workspace();
    let a_spec = spec(&ws, "sales", PanelConfig::for_table("sales"));
    let a = ws.add_widget(a_spec, InsertMode::split_right()).await.unwrap();
    let b_spec = spec(&ws, "stock", PanelConfig::for_table("stock"));
    let b = ws.add_widget(b_spec, InsertMode::split_right()).await.unwrap();
    ws.toggle_single_document(b).await.unwrap();

    ws.toggle_master_detail(b).await.unwrap();
    assert!(!ws.dock().is_single_document());
    assert_eq!(ws.dock().widgets(), vec![a]);
    assert_eq!(ws.master().widgets(), &[b]);
    ws.check_invariants().unwrap();
}

#[tokio::test]
async fn clear_layout_closes_everything() {
    let (mut ws, host) = workspace();
    ws.restore(LayoutDocument::from_json(LAYOUT_JSON).unwrap())
        .await
        .unwrap();
    let ids = ws.all_widgets();
    ws.clear_layout().await;
    assert!(ws.is_empty());
    assert!(ws.dock().is_empty());
    assert!(!ws.is_master_mounted());
    for id in ids {
        let viewer = host.viewer(&id).unwrap();
        assert!(viewer.is_deleted());
        assert!(viewer.is_detached());
        assert_eq!(viewer.total_listeners(), 0);
    }
    ws.check_invariants().unwrap();
}

#[tokio::test]
async fn move_and_resize_docked_panels() {
    let (mut ws, _host) = workspace();
    let a_spec = spec(&ws, "sales", PanelConfig::for_table("sales"));
    let a = ws.add_widget(a_spec, InsertMode::split_right()).await.unwrap();
    let b_spec = spec(&ws, "stock", PanelConfig::for_table("stock"));
    let b = ws.add_widget(b_spec, InsertMode::split_right()).await.unwrap();

    ws.move_widget(b, InsertMode::TabBefore { reference: Some(a) })
        .await
        .unwrap();
    assert_eq!(ws.dock().widgets(), vec![b, a]);
    assert_eq!(ws.dock().visible_widgets(), vec![b]);
    assert!(!ws.panel(a).unwrap().is_visible());

    ws.activate(a).await.unwrap();
    assert!(ws.panel(a).unwrap().is_visible());
    assert!(!ws.panel(b).unwrap().is_visible());

    ws.make_master(a).await.unwrap();
    assert!(matches!(
        ws.move_widget(a, InsertMode::split_right()).await,
        Err(WorkspaceError::NotDocked(_))
    ));
    ws.resize_master(vec![3.0]).unwrap();
    assert_eq!(ws.master().relative_sizes(), &[3.0]);
    assert!(ws.resize_master(vec![1.0, 1.0]).is_err());
}
