//! Core console types, independent of any renderer.
//!
//! This module provides the fundamental building blocks:
//! - [`Console`] - The console object owning all state below
//! - [`CVar`] - Variable bindings to host-owned primitives
//! - [`ConCmd`] - Command handlers with typed signatures
//! - [`ConsoleRegistry`] - Identifier lookup for variables and commands
//! - [`Dispatcher`] - Line execution with nested sub-expressions
//! - [`ScrollbackLog`] - Bounded circular output log
//! - [`LineEditor`] / [`CommandHistory`] - The input line
//! - [`PanelVisibility`] - Show/hide animation state machine
//! - Messages for communication with the host

mod cmd;
mod console;
mod cvar;
mod dispatch;
mod editor;
mod error;
mod events;
mod registry;
mod scrollback;
mod tokenizer;
mod value;
mod visibility;

pub use cmd::{CommandArgs, CommandHandler, ConCmd};
pub use console::{COMMAND_ECHO_PREFIX, Console, ConsoleKey};
pub use cvar::{CVar, CVarFlags};
pub use dispatch::{Dispatcher, MAX_ARITY, MAX_NESTING_DEPTH, builtin_names, is_builtin};
pub use editor::{CommandHistory, LineEditor};
pub use error::ConsoleError;
pub use events::{
    ConsoleEventsPlugin, ConsoleInputEvent, ConsoleOutputEvent, ConsoleOutputLevel,
    ConsoleToggleEvent,
};
pub use registry::{ConsoleRegistry, Resolved};
pub use scrollback::{LinesBack, ScrollbackLog};
pub use tokenizer::{ArgSource, next_argument, split_arguments, split_identifier};
pub use value::{ConsoleValue, Value, ValueType};
pub use visibility::{PanelVisibility, Transition, VisibilityState};
