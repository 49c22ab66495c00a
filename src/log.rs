//! Receive-side diagnostics (spec §7).
//!
//! Every `TF_Error(...)` call site in the original library reports one of
//! these events. None of them are errors the caller driving `accept()` can
//! react to synchronously — the frame is simply dropped and parsing
//! resumes — so they're surfaced through a sink instead of a `Result`.

/// One structured diagnostic event, matching a row of spec §7's error table.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DiagnosticEvent {
    /// No byte received for `PARSER_TIMEOUT_TICKS` while mid-frame; parser reset.
    ParserTimeout,
    /// Computed head checksum didn't match the one on the wire; frame dropped.
    HeadChecksumMismatch,
    /// Computed data checksum didn't match the one on the wire; frame dropped.
    DataChecksumMismatch,
    /// Declared `LEN` exceeded `MAX_PAYLOAD_RX`; payload discarded, frame
    /// not dispatched.
    PayloadTooLarge { len: u32, max: u32 },
    /// `remove_*_listener`/`renew_id_listener` found no matching entry.
    ListenerNotFound,
    /// Dispatch exhausted ID, type and generic scopes with no consumer.
    UnhandledMessage,
}

/// A sink for [`DiagnosticEvent`]s. Implement this to route engine
/// diagnostics to your logging framework of choice; the default `Engine`
/// constructor uses [`NoopDiagnostics`], so paying for this costs nothing
/// unless you opt in.
pub trait Diagnostics {
    fn log(&mut self, event: DiagnosticEvent);
}

/// Discards every event. Zero runtime cost once inlined.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn log(&mut self, _event: DiagnosticEvent) {}
}

/// Routes events to `defmt::warn!`/`defmt::error!`, mirroring the teacher
/// stack's `defmt_rtt` logging transport. Only available with the `defmt`
/// feature.
#[cfg(feature = "defmt")]
#[derive(Copy, Clone, Debug, Default)]
pub struct DefmtDiagnostics;

#[cfg(feature = "defmt")]
impl Diagnostics for DefmtDiagnostics {
    fn log(&mut self, event: DiagnosticEvent) {
        match event {
            DiagnosticEvent::UnhandledMessage => defmt::warn!("unhandled message: {}", event),
            _ => defmt::error!("{}", event),
        }
    }
}
