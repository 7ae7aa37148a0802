//! Context-menu commands
//!
//! Each command is declared once with its label, icon and visibility, all
//! evaluated against a [`CommandContext`] describing the panel the menu
//! was opened on. The workspace builds menus from the registry and runs the
//! selected command through [`crate::Workspace::execute`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Identifier of a built-in command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CommandId {
    /// Export the panel's view as CSV.
    Export,
    /// Copy the panel's view to the clipboard.
    Copy,
    /// Reset the panel's settings.
    Reset,
    /// Duplicate the panel.
    Duplicate,
    /// Move the panel between the master panel and the dock.
    ToggleMasterDetail,
    /// Maximize or restore the dock around the panel.
    ToggleSingleDocument,
}

impl CommandId {
    /// Every command, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Export,
        Self::Copy,
        Self::Reset,
        Self::Duplicate,
        Self::ToggleMasterDetail,
        Self::ToggleSingleDocument,
    ];

    /// Stable string identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Export => "panel:export",
            Self::Copy => "panel:copy",
            Self::Reset => "panel:reset",
            Self::Duplicate => "panel:duplicate",
            Self::ToggleMasterDetail => "workspace:master",
            Self::ToggleSingleDocument => "workspace:toggle-single-document",
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A string that is not a command identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown command: {0}")]
pub struct UnknownCommand(pub String);

impl FromStr for CommandId {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| UnknownCommand(s.to_string()))
    }
}

/// State of the panel a menu is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommandContext {
    /// Whether the panel lives in the dock (otherwise in the master panel).
    pub in_dock: bool,
    /// Whether the dock is in single-document mode.
    pub single_document: bool,
}

/// A label or icon, fixed or computed from the context.
#[derive(Clone, Copy)]
pub enum Text {
    /// Fixed text.
    Static(&'static str),
    /// Text depending on the context.
    Dynamic(fn(&CommandContext) -> &'static str),
}

impl Text {
    /// Resolves the text for `context`.
    #[must_use]
    pub fn resolve(&self, context: &CommandContext) -> &'static str {
        match *self {
            Self::Static(text) => text,
            Self::Dynamic(f) => f(context),
        }
    }
}

impl fmt::Debug for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(text) => write!(f, "Static({text:?})"),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// Declaration of one command.
#[derive(Debug, Clone, Copy)]
pub struct CommandDef {
    /// Menu label.
    pub label: Text,
    /// Icon class.
    pub icon: Text,
    /// Visibility predicate; `None` means always visible.
    pub visible: Option<fn(&CommandContext) -> bool>,
}

/// An entry of a built menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    /// A runnable command.
    Command {
        /// Command to run.
        id: CommandId,
        /// Resolved label.
        label: &'static str,
        /// Resolved icon class.
        icon: &'static str,
    },
    /// A visual separator.
    Separator,
}

/// Menu layout: commands in display order, `None` for a separator.
const MENU_LAYOUT: [Option<CommandId>; 7] = [
    Some(CommandId::ToggleSingleDocument),
    Some(CommandId::Duplicate),
    Some(CommandId::ToggleMasterDetail),
    None,
    Some(CommandId::Export),
    Some(CommandId::Copy),
    Some(CommandId::Reset),
];

fn master_label(context: &CommandContext) -> &'static str {
    if context.in_dock { "Master" } else { "Detail" }
}

fn master_icon(context: &CommandContext) -> &'static str {
    if context.in_dock {
        "vd-MenuItem-master"
    } else {
        "vd-MenuItem-detail"
    }
}

fn maximize_label(context: &CommandContext) -> &'static str {
    if context.single_document {
        "Minimize"
    } else {
        "Maximize"
    }
}

fn maximize_icon(context: &CommandContext) -> &'static str {
    if context.single_document {
        "vd-MenuItem-minimize"
    } else {
        "vd-MenuItem-maximize"
    }
}

const fn in_dock(context: &CommandContext) -> bool {
    context.in_dock
}

/// Registry of command declarations.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    commands: HashMap<CommandId, CommandDef>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Creates a registry holding the built-in commands.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            commands: HashMap::new(),
        };
        registry.add(
            CommandId::Export,
            CommandDef {
                label: Text::Static("Export CSV"),
                icon: Text::Static("vd-MenuItem-export"),
                visible: None,
            },
        );
        registry.add(
            CommandId::Copy,
            CommandDef {
                label: Text::Static("Copy To Clipboard"),
                icon: Text::Static("vd-MenuItem-copy"),
                visible: None,
            },
        );
        registry.add(
            CommandId::Reset,
            CommandDef {
                label: Text::Static("Reset"),
                icon: Text::Static("vd-MenuItem-reset"),
                visible: None,
            },
        );
        registry.add(
            CommandId::Duplicate,
            CommandDef {
                label: Text::Static("Duplicate"),
                icon: Text::Static("vd-MenuItem-duplicate"),
                visible: None,
            },
        );
        registry.add(
            CommandId::ToggleMasterDetail,
            CommandDef {
                label: Text::Dynamic(master_label),
                icon: Text::Dynamic(master_icon),
                visible: None,
            },
        );
        registry.add(
            CommandId::ToggleSingleDocument,
            CommandDef {
                label: Text::Dynamic(maximize_label),
                icon: Text::Dynamic(maximize_icon),
                visible: Some(in_dock),
            },
        );
        registry
    }

    /// Registers or replaces a command declaration.
    pub fn add(&mut self, id: CommandId, def: CommandDef) {
        self.commands.insert(id, def);
    }

    /// Looks up a declaration.
    #[must_use]
    pub fn get(&self, id: CommandId) -> Option<&CommandDef> {
        self.commands.get(&id)
    }

    /// Label of `id` in `context`.
    #[must_use]
    pub fn label(&self, id: CommandId, context: &CommandContext) -> Option<&'static str> {
        self.get(id).map(|def| def.label.resolve(context))
    }

    /// Icon class of `id` in `context`.
    #[must_use]
    pub fn icon(&self, id: CommandId, context: &CommandContext) -> Option<&'static str> {
        self.get(id).map(|def| def.icon.resolve(context))
    }

    /// Whether `id` is registered and visible in `context`.
    #[must_use]
    pub fn is_visible(&self, id: CommandId, context: &CommandContext) -> bool {
        self.get(id)
            .is_some_and(|def| def.visible.is_none_or(|visible| visible(context)))
    }

    /// Builds the context menu for `context`, skipping hidden commands.
    #[must_use]
    pub fn build_menu(&self, context: &CommandContext) -> Vec<MenuEntry> {
        MENU_LAYOUT
            .iter()
            .filter_map(|slot| match slot {
                None => Some(MenuEntry::Separator),
                Some(id) if self.is_visible(*id, context) => {
                    let def = self.get(*id)?;
                    Some(MenuEntry::Command {
                        id: *id,
                        label: def.label.resolve(context),
                        icon: def.icon.resolve(context),
                    })
                }
                Some(_) => None,
            })
            .collect()
    }
}
