//! Event handling for P-Plus.
//!
//! Terminal input is translated into [`Action`](crate::state::Action)s by
//! the [`EventHandler`], using the configured key bindings.

mod handler;
mod input;

pub use handler::EventHandler;
pub use input::{InputEvent, Key, Modifiers};
