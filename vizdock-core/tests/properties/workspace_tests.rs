//! Property tests for master/detail sequences
//!
//! Whatever sequence of promotions, demotions, duplications and closes is
//! applied, every panel stays in exactly one container and a save/restore
//! round trip reproduces the saved document.

use std::sync::Arc;

use proptest::prelude::*;
use vizdock_core::testing::{MemoryHost, MemoryTable};
use vizdock_core::{
    InsertMode, LayoutDocument, PanelConfig, WidgetSpec, Workspace, WorkspaceOptions,
};

#[derive(Debug, Clone)]
enum WorkspaceOp {
    Add { master: bool },
    Toggle(usize),
    Duplicate(usize),
    Maximize(usize),
    Close(usize),
}

fn workspace_op_strategy() -> impl Strategy<Value = WorkspaceOp> {
    prop_oneof![
        3 => any::<bool>().prop_map(|master| WorkspaceOp::Add { master }),
        3 => (0usize..16).prop_map(WorkspaceOp::Toggle),
        1 => (0usize..16).prop_map(WorkspaceOp::Duplicate),
        1 => (0usize..16).prop_map(WorkspaceOp::Maximize),
        1 => (0usize..16).prop_map(WorkspaceOp::Close),
    ]
}

fn new_workspace() -> Workspace {
    let mut workspace = Workspace::new(Arc::new(MemoryHost::new()), WorkspaceOptions::default());
    workspace.add_table("t", Arc::new(MemoryTable::new("t", [("a", "string")])));
    workspace
}

async fn apply(workspace: &mut Workspace, op: WorkspaceOp) {
    let widgets = workspace.all_widgets();
    let pick = |index: usize| (!widgets.is_empty()).then(|| widgets[index % widgets.len()]);
    match op {
        WorkspaceOp::Add { master } => {
            let mut spec = WidgetSpec::new("t", PanelConfig::for_table("t").with_master(master));
            spec.table = workspace.get_table("t");
            workspace
                .add_widget(spec, InsertMode::split_right())
                .await
                .unwrap();
        }
        WorkspaceOp::Toggle(index) => {
            if let Some(id) = pick(index) {
                workspace.toggle_master_detail(id).await.unwrap();
            }
        }
        WorkspaceOp::Duplicate(index) => {
            if let Some(id) = pick(index) {
                workspace.duplicate(id).await.unwrap();
            }
        }
        WorkspaceOp::Maximize(index) => {
            if let Some(id) = pick(index)
                && (workspace.dock().is_single_document() || workspace.dock().contains(id))
            {
                workspace.toggle_single_document(id).await.unwrap();
            }
        }
        WorkspaceOp::Close(index) => {
            if let Some(id) = pick(index) {
                workspace.close_widget(id).await.unwrap();
            }
        }
    }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn panels_stay_in_exactly_one_container(
        ops in proptest::collection::vec(workspace_op_strategy(), 0..25)
    ) {
        runtime().block_on(async {
            let mut workspace = new_workspace();
            for op in ops {
                apply(&mut workspace, op).await;
                workspace.check_invariants().unwrap();
                assert_eq!(
                    workspace.is_master_mounted(),
                    !workspace.master().is_empty()
                );
                assert_eq!(
                    workspace.len(),
                    workspace.master().len() + workspace.dock().len()
                );
            }
        });
    }

    #[test]
    fn save_restore_reproduces_document(
        ops in proptest::collection::vec(workspace_op_strategy(), 0..20)
    ) {
        runtime().block_on(async {
            let mut workspace = new_workspace();
            for op in ops {
                apply(&mut workspace, op).await;
            }
            let saved = workspace.save().unwrap();
            let json = saved.to_json().unwrap();

            let mut restored = new_workspace();
            restored
                .restore(LayoutDocument::from_json(&json).unwrap())
                .await
                .unwrap();
            restored.check_invariants().unwrap();
            assert_eq!(restored.save().unwrap(), saved);
            assert!(!restored.dock().is_single_document());
        });
    }
}
