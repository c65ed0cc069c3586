//! ``src/stack.rs``
//! ============================================================================
//! # `EscapeStack`: LIFO dismissal routing for layered UIs
//!
//! Each dismissible layer registers a handler when it opens and disposes it
//! when it closes normally. A global dismissal gesture calls
//! [`EscapeStack::pop`], which offers the event to the most recently opened
//! layer first and walks down the stack until a handler consumes it or the
//! stack runs out.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use compact_str::CompactString;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::config::StackConfig;
use crate::handler::{EscapeHandler, HandlerId};

/// Inline capacity of the entry list. Layer nesting rarely goes deeper.
const INLINE_HANDLERS: usize = 4;

/// One registered handler together with its stable identity.
struct Entry<E> {
    id: HandlerId,
    label: Option<CompactString>,
    handler: EscapeHandler<E>,
}

struct Inner<E> {
    entries: SmallVec<[Entry<E>; INLINE_HANDLERS]>,
    next_id: u64,
    config: StackConfig,
    added_total: u64,
    invoked_total: u64,
    disposed_total: u64,
}

/// Last-in-first-out registry of escape handlers.
///
/// Handles are cheap clones of one shared interior, so a handler closure
/// can capture its own handle and operate on the stack mid-drain. The
/// interior is single-threaded (`Rc`), matching the synchronous UI-thread
/// execution model; handles are not `Send`.
pub struct EscapeStack<E> {
    inner: Rc<RefCell<Inner<E>>>,
}

impl<E> EscapeStack<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(StackConfig::default())
    }

    #[must_use]
    pub fn with_config(config: StackConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                entries: SmallVec::new(),
                next_id: 0,
                config,
                added_total: 0,
                invoked_total: 0,
                disposed_total: 0,
            })),
        }
    }

    /// Register a handler on top of the stack.
    ///
    /// The handler is invoked with the event passed to [`EscapeStack::pop`]
    /// and returns `true` once it has fully consumed that event. The
    /// returned [`Disposer`] removes this registration without invoking the
    /// handler; dropping the disposer does nothing.
    pub fn add<H>(&self, handler: H) -> Disposer<E>
    where
        H: FnMut(Option<&E>) -> bool + 'static,
    {
        self.push_entry(None, Box::new(handler))
    }

    /// Register a handler with a diagnostic label that shows up in trace
    /// output. Labels carry no behavioral meaning.
    pub fn add_labeled<H>(&self, label: impl Into<CompactString>, handler: H) -> Disposer<E>
    where
        H: FnMut(Option<&E>) -> bool + 'static,
    {
        self.push_entry(Some(label.into()), Box::new(handler))
    }

    fn push_entry(&self, label: Option<CompactString>, handler: EscapeHandler<E>) -> Disposer<E> {
        let mut inner = self.inner.borrow_mut();
        let id = HandlerId::new(inner.next_id);
        inner.next_id += 1;
        inner.added_total += 1;
        inner.entries.push(Entry { id, label, handler });

        let depth = inner.entries.len();
        trace!("registered escape handler {} (depth {})", id, depth);

        if let Some(threshold) = inner.config.leak_warn_threshold {
            if depth > threshold {
                warn!(
                    "escape stack depth {} exceeds {}; a layer may not be disposing its handler",
                    depth, threshold
                );
            }
        }

        Disposer {
            stack: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Dispatch a dismissal event.
    ///
    /// Removes the top handler, invokes it with `event`, and repeats with
    /// the next one down until a handler returns `true` or the stack is
    /// empty. An invoked handler is removed *before* its invocation, so a
    /// handler never observes itself registered and is gone even if it
    /// panics; a panic propagates to the caller and leaves the deeper
    /// entries registered.
    ///
    /// The drain operates on live state: handlers may register, dispose,
    /// or dispatch against this same stack during their own invocation. A
    /// handler registered mid-drain becomes the new top and is offered the
    /// same event if the handler that registered it declines.
    pub fn pop(&self, event: Option<&E>) {
        let log_invocations = self.inner.borrow().config.log_invocations;

        loop {
            // Take the top entry and release the borrow before invoking,
            // so the handler itself may mutate the stack.
            let popped = {
                let mut inner = self.inner.borrow_mut();
                let entry = inner.entries.pop();
                if entry.is_some() {
                    inner.invoked_total += 1;
                }
                entry
            };

            let Some(mut entry) = popped else {
                trace!("escape stack drained without a consumer");
                break;
            };

            if log_invocations {
                match entry.label.as_deref() {
                    Some(label) => debug!("invoking escape handler {} ({label})", entry.id),
                    None => debug!("invoking escape handler {}", entry.id),
                }
            }

            if (entry.handler)(event) {
                trace!("escape handler {} consumed the event", entry.id);
                break;
            }
        }
    }

    /// Drop every registered handler without invoking any of them.
    /// Outstanding disposers become inert.
    pub fn clear(&self) {
        let removed = {
            let mut inner = self.inner.borrow_mut();
            let removed = inner.entries.len();
            inner.entries.clear();
            removed
        };

        if removed > 0 {
            debug!("cleared {} escape handler(s) without invoking", removed);
        }
    }

    /// Number of currently registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    /// Check if no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// Lifetime counters for diagnostics.
    #[must_use]
    pub fn stats(&self) -> StackStats {
        let inner = self.inner.borrow();
        StackStats {
            depth: inner.entries.len(),
            added_total: inner.added_total,
            invoked_total: inner.invoked_total,
            disposed_total: inner.disposed_total,
        }
    }
}

impl<E> Default for EscapeStack<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EscapeStack<E> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<E> fmt::Debug for EscapeStack<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("EscapeStack")
            .field("depth", &inner.entries.len())
            .field("next_id", &inner.next_id)
            .finish()
    }
}

/// Removal capability for one registered handler.
///
/// Returned by [`EscapeStack::add`]; calling [`Disposer::dispose`] removes
/// exactly the entry this disposer was issued for, without invoking it.
/// Disposal is idempotent and stays a silent no-op after the entry is gone
/// (drained by `pop`, cleared, or the whole stack dropped).
#[must_use = "hold on to the Disposer so the handler can be deregistered when its layer closes"]
pub struct Disposer<E> {
    stack: Weak<RefCell<Inner<E>>>,
    id: HandlerId,
}

impl<E> Disposer<E> {
    /// Remove the associated handler without invoking it.
    pub fn dispose(&self) {
        let Some(inner) = self.stack.upgrade() else {
            return;
        };

        let mut inner = inner.borrow_mut();
        if let Some(pos) = inner.entries.iter().position(|entry| entry.id == self.id) {
            inner.entries.remove(pos);
            inner.disposed_total += 1;
            trace!("disposed escape handler {} without invoking", self.id);
        }
    }

    /// Whether the associated handler is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.stack
            .upgrade()
            .is_some_and(|inner| inner.borrow().entries.iter().any(|entry| entry.id == self.id))
    }

    /// Identity of the associated entry.
    #[must_use]
    pub const fn id(&self) -> HandlerId {
        self.id
    }
}

impl<E> fmt::Debug for Disposer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disposer")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Snapshot of the stack's lifetime counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackStats {
    pub depth: usize,
    pub added_total: u64,
    pub invoked_total: u64,
    pub disposed_total: u64,
}
