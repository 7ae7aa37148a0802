//! Dock tree of detail panels
//!
//! The dock arranges panels in a recursive tree of splits, tab groups and
//! leaves, and can temporarily maximize everything into one tab group
//! (single-document mode).
//!
//! # Module Structure
//!
//! - `tree` - Structural edits on `DockNode<PanelId>` (insert, remove, fold)
//! - `model` - The [`DockTree`] state machine
//!
//! # Example
//!
//! ```
//! use vizdock_core::dock::{DockTree, InsertMode};
//! use vizdock_core::PanelId;
//!
//! let mut dock = DockTree::new();
//! let (a, b) = (PanelId::new(), PanelId::new());
//! dock.add_widget(a, InsertMode::split_right()).unwrap();
//! dock.add_widget(b, InsertMode::split_right_of(a)).unwrap();
//! assert_eq!(dock.widgets(), vec![a, b]);
//!
//! dock.enter_single_document(b).unwrap();
//! assert_eq!(dock.visible_widgets(), vec![b]);
//! dock.leave_single_document().unwrap();
//! assert_eq!(dock.visible_widgets(), vec![a, b]);
//! ```

mod model;
mod tree;

pub use model::{DockMode, DockTree, InsertMode};
pub use tree::{DEFAULT_SPLIT_WEIGHT, find_path, fold, visible_widgets};
