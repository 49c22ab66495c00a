//! Listener tables and message dispatch (spec §4.5).
//!
//! Three scopes are tried in order for every received frame: ID (exact
//! match against a pending query's allocated ID), type, then generic
//! (catch-all). The first listener to return anything but [`ListenerResult::Next`]
//! stops the scan. `userdata`/`userdata2` on the dispatched [`Message`] are
//! reset to their defaults between the ID scope and the type scope — an ID
//! listener's opaque data must never leak into a type or generic listener's
//! view of the same message.
//!
//! Ported from the id/type/generic listener arrays and `TF_HandleReceivedMessage`
//! in `TinyFrame.c`. Tables are fixed-size slices of `Option<Slot>` rather than
//! `heapless::Vec`, because slots are removed in place (leaving holes) instead
//! of shifting — exactly how the original's `count_id_lst` high-water mark
//! plus per-slot `fn == NULL` works.

use crate::config::FrameConfig;
use crate::error::{ListenerError, SendError};
use crate::message::{ListenerResult, Message};

pub(crate) type Msg<'a, C> = Message<
    'a,
    <C as FrameConfig>::Id,
    <C as FrameConfig>::Type,
    <C as FrameConfig>::UserData,
    <C as FrameConfig>::UserData2,
>;

/// The subset of `Engine` operations a listener callback may use to react —
/// reply, send unrelated frames, or register a follow-up query — without the
/// callback's function-pointer type needing to name every buffer-capacity
/// const generic of the concrete `Engine` it's attached to.
pub trait EngineOps<C: FrameConfig> {
    /// Sends a new, unsolicited frame.
    fn send(&mut self, ty: C::Type, data: &[u8]) -> Result<(), SendError>;
    /// Replies to the message that triggered this dispatch (or any other
    /// frame ID the caller still considers open).
    fn respond(&mut self, id: C::Id, ty: C::Type, data: &[u8]) -> Result<(), SendError>;
    /// Sends a frame and registers an ID listener for its reply.
    fn query(
        &mut self,
        ty: C::Type,
        data: &[u8],
        on_reply: Listener<C>,
        timeout_ticks: Option<u32>,
    ) -> Result<(), SendError>;
}

/// A dispatch callback: `fn(engine, message) -> ListenerResult`.
pub type Listener<C> = fn(&mut dyn EngineOps<C>, &mut Msg<'_, C>) -> ListenerResult;

pub(crate) struct IdListenerSlot<C: FrameConfig> {
    pub id: u32,
    pub callback: Listener<C>,
    /// Ticks remaining before this listener expires and is dropped with a
    /// `data: None` notification call. `None` means it never expires.
    pub timeout_ticks: Option<u32>,
    /// The value `ListenerResult::Renew` resets `timeout_ticks` to.
    pub default_timeout: Option<u32>,
    pub userdata: C::UserData,
    pub userdata2: C::UserData2,
}

impl<C: FrameConfig> Copy for IdListenerSlot<C> {}
impl<C: FrameConfig> Clone for IdListenerSlot<C> {
    fn clone(&self) -> Self {
        *self
    }
}

pub(crate) struct TypeListenerSlot<C: FrameConfig> {
    pub ty: u32,
    pub callback: Listener<C>,
}

impl<C: FrameConfig> Copy for TypeListenerSlot<C> {}
impl<C: FrameConfig> Clone for TypeListenerSlot<C> {
    fn clone(&self) -> Self {
        *self
    }
}

pub(crate) struct GenericListenerSlot<C: FrameConfig> {
    pub callback: Listener<C>,
}

impl<C: FrameConfig> Copy for GenericListenerSlot<C> {}
impl<C: FrameConfig> Clone for GenericListenerSlot<C> {
    fn clone(&self) -> Self {
        *self
    }
}

/// Inserts into the first free (`None`) slot, raising `count` if the new
/// entry extends past the previous high-water mark.
pub(crate) fn insert<T: Copy>(
    table: &mut [Option<T>],
    count: &mut usize,
    slot: T,
) -> Result<(), ListenerError> {
    for (i, entry) in table.iter_mut().enumerate() {
        if entry.is_none() {
            *entry = Some(slot);
            if i + 1 > *count {
                *count = i + 1;
            }
            return Ok(());
        }
    }
    Err(ListenerError::TableFull)
}

/// Removes the first slot (within `0..count`) for which `matches` returns
/// true. `count` is decremented only when the freed slot was the last one
/// in range, mirroring `cleanup_id_listener`'s single-step shrink.
pub(crate) fn remove<T: Copy>(
    table: &mut [Option<T>],
    count: &mut usize,
    matches: impl Fn(&T) -> bool,
) -> Result<(), ListenerError> {
    for i in 0..*count {
        if let Some(entry) = table[i] {
            if matches(&entry) {
                table[i] = None;
                if i + 1 == *count {
                    *count -= 1;
                }
                return Ok(());
            }
        }
    }
    Err(ListenerError::NotFound)
}

// Dispatch and tick-driven expiry both need to hand the listener being
// invoked a `&mut dyn EngineOps<C>` that re-borrows the *whole* engine, at
// the same time as indexing into that engine's own listener arrays. A free
// function taking the arrays and the `ops` handle as separate parameters
// can't do this — both would have to borrow from the same `Engine`, which
// the borrow checker (rightly) refuses. So both live as methods directly on
// `Engine` in `engine.rs`, where `self` is a single reborrowable receiver
// and each array access is a short-lived copy-out rather than a held
// reference. `insert`/`remove` above have no such conflict, since they never
// invoke a callback.
