//! # escr - Escape Handler Stack for Layered UIs
//!
//! A last-in-first-out registry of dismissal handlers, letting nested UI
//! layers (modals, popovers, menus) each claim responsibility for a
//! cancel/escape gesture. The most recently opened layer is always offered
//! the event first and only if it declines does the event fall through to
//! the layer beneath it.
//!
//! ## Key Features
//! - Strict LIFO dispatch with early stop on the first consuming handler
//! - Disposer tokens for removing a handler without ever invoking it
//! - Safe re-entrancy: handlers may register, dispose, and dispatch
//!   against the same stack mid-drain
//! - Built-in leak diagnostics via `tracing`
//! - Configurable behavior with TOML persistence
//!
//! ## Example
//! ```
//! use escr::EscapeStack;
//!
//! let stack: EscapeStack<&str> = EscapeStack::new();
//!
//! // The dialog opened first, then a menu on top of it.
//! let _dialog = stack.add(|_| true);
//! let _menu = stack.add(|event| {
//!     println!("menu declined {event:?}");
//!     false
//! });
//!
//! // Most recent layer first: the menu declines, the dialog consumes.
//! stack.pop(Some(&"escape"));
//! assert!(stack.is_empty());
//! ```
//!
//! The stack is single-threaded by design: handles are cheap clones of one
//! shared interior and are not `Send`. Wiring actual key events (e.g. a
//! terminal `Esc` press) to [`EscapeStack::pop`] is the host application's
//! job.

pub mod stack;
pub mod handler;
pub mod error;
pub mod config;

// Re-export main types for easy use
pub use stack::{Disposer, EscapeStack, StackStats};
pub use handler::{EscapeHandler, HandlerId};
pub use error::{EscError, EscResult};
pub use config::StackConfig;
