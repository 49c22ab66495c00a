//! Caller-actionable send-side failures (spec §7).
//!
//! Everything else in spec §7's error table is a receive-side event with no
//! synchronous caller to report it to — those go through [`crate::log`]
//! instead. These two are the only operations a caller can react to
//! (retry, back off, allocate fewer concurrent queries).

/// Failure of a send-family call.
#[derive(Debug, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SendError {
    /// `send`/`query`/`respond`/a multipart session was attempted while the
    /// send-lock was already held by another session.
    #[error("send attempted while the transmit lock is held")]
    TxLocked,
    /// Registering the query's ID listener failed because the ID listener
    /// table is full; the send-lock is released again and no bytes are
    /// emitted.
    #[error("no free slot in the ID listener table")]
    ListenerTableFull,
}

/// Failure of an `add_*`/`remove_*`/`renew_*` listener-registry call.
#[derive(Debug, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ListenerError {
    /// `add_*_listener` found no free slot.
    #[error("no free slot in the listener table")]
    TableFull,
    /// `remove_*`/`renew_id_listener` found no matching entry.
    #[error("no matching listener registered")]
    NotFound,
}
