//! Context menus and command execution

use vizdock_core::{
    CommandId, Filter, InsertMode, MenuEntry, PanelConfig, ViewerEvent, WorkspaceError,
};

use super::support::{spec, workspace};

fn command_ids(entries: &[MenuEntry]) -> Vec<CommandId> {
    entries
        .iter()
        .filter_map(|entry| match entry {
            MenuEntry::Command { id, .. } => Some(*id),
            MenuEntry::Separator => None,
        })
        .collect()
}

fn label_of(entries: &[MenuEntry], command: CommandId) -> Option<&'static str> {
    entries.iter().find_map(|entry| match entry {
        MenuEntry::Command { id, label, .. } if *id == command => Some(*label),
        _ => None,
    })
}

#[tokio::test]
async fn menu_depends_on_panel_location() {
    let (mut ws, host) = workspace();
    let d_spec = spec(&ws, "sales", PanelConfig::for_table("sales"));
    let detail = ws.add_widget(d_spec, InsertMode::split_right()).await.unwrap();
    let m_spec = spec(&ws, "sales", PanelConfig::for_table("sales").with_master(true));
    let master = ws.add_widget(m_spec, InsertMode::split_right()).await.unwrap();

    let detail_menu = ws.context_menu(detail).unwrap();
    assert_eq!(
        command_ids(&detail_menu),
        vec![
            CommandId::ToggleSingleDocument,
            CommandId::Duplicate,
            CommandId::ToggleMasterDetail,
            CommandId::Export,
            CommandId::Copy,
            CommandId::Reset,
        ]
    );
    let master_menu = ws.context_menu(master).unwrap();
    assert!(!command_ids(&master_menu).contains(&CommandId::ToggleSingleDocument));
    assert_ne!(
        label_of(&detail_menu, CommandId::ToggleMasterDetail),
        label_of(&master_menu, CommandId::ToggleMasterDetail)
    );

    // Labels follow the dock mode.
    let before = label_of(&detail_menu, CommandId::ToggleSingleDocument);
    ws.toggle_single_document(detail).await.unwrap();
    let after = label_of(&ws.context_menu(detail).unwrap(), CommandId::ToggleSingleDocument);
    assert_ne!(before, after);

    host.viewer(&master)
        .unwrap()
        .emit(&ViewerEvent::ContextMenu { x: 4.0, y: 2.0 });
    ws.process_events();
    let menu = ws.open_menu().unwrap();
    assert_eq!(menu.panel, master);
    assert_eq!((menu.x, menu.y), (4.0, 2.0));
}

#[tokio::test]
async fn executing_a_command_closes_the_menu() {
    let (mut ws, host) = workspace();
    let d_spec = spec(
        &ws,
        "sales",
        PanelConfig::for_table("sales")
            .with_row_pivots(["region"])
            .with_filters(vec![Filter::new("year", ">", 2000)]),
    );
    let id = ws.add_widget(d_spec, InsertMode::split_right()).await.unwrap();
    host.viewer(&id)
        .unwrap()
        .emit(&ViewerEvent::ContextMenu { x: 0.0, y: 0.0 });
    ws.process_events();
    assert!(ws.open_menu().is_some());

    ws.execute(CommandId::Reset, id).await.unwrap();
    assert!(ws.open_menu().is_none());
    let config = host.viewer(&id).unwrap().config();
    assert!(config.row_pivots().is_empty());
    assert!(config.filters().is_empty());
}

#[tokio::test]
async fn duplicate_command_adds_a_panel() {
    let (mut ws, _host) = workspace();
    let d_spec = spec(&ws, "sales", PanelConfig::for_table("sales"));
    let id = ws.add_widget(d_spec, InsertMode::split_right()).await.unwrap();
    ws.execute(CommandId::Duplicate, id).await.unwrap();
    assert_eq!(ws.len(), 2);
    assert_eq!(ws.dock().len(), 2);
}

#[tokio::test]
async fn command_ids_parse_from_strings() {
    let (mut ws, host) = workspace();
    let d_spec = spec(&ws, "sales", PanelConfig::for_table("sales"));
    let id = ws.add_widget(d_spec, InsertMode::split_right()).await.unwrap();
    let command: CommandId = "panel:export".parse().unwrap();
    ws.execute(command, id).await.unwrap();
    assert_eq!(host.viewer(&id).unwrap().download_count(), 1);
    assert!("panel:explode".parse::<CommandId>().is_err());
}

#[tokio::test]
async fn commands_on_unknown_panels_fail() {
    let (mut ws, _host) = workspace();
    let ghost = vizdock_core::PanelId::new();
    assert!(matches!(
        ws.execute(CommandId::Copy, ghost).await,
        Err(WorkspaceError::UnknownPanel(_))
    ));
    assert!(matches!(
        ws.context_menu(ghost),
        Err(WorkspaceError::UnknownPanel(_))
    ));
}
