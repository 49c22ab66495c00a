//! The send-lock (spec §5): advisory mutual exclusion over the sender's
//! staging buffer, ID counter, and the composition of a single frame.

use core::cell::Cell;

/// Claims and releases the transmit side. `Engine` is generic over this so
/// the soft/external policy split in spec §5 is a type-level choice rather
/// than a runtime branch.
pub trait TxLock {
    /// Attempts to claim the lock; `false` means it was already held.
    fn claim(&self) -> bool;
    /// Releases a previously-claimed lock.
    fn release(&self);
}

/// Default policy: a single `bool` flag, checked and set with no further
/// synchronization. Not safe against true parallel producers — see spec §5
/// ("Soft … Not safe against true parallel producers").
#[derive(Debug, Default)]
pub struct SoftLock(Cell<bool>);

impl TxLock for SoftLock {
    fn claim(&self) -> bool {
        if self.0.get() {
            return false;
        }
        self.0.set(true);
        true
    }

    fn release(&self) {
        self.0.set(false);
    }
}

/// Host-provided claim/release hooks — a real mutex, or an
/// interrupt-disable pair on a single-core target. The engine calls these
/// verbatim around every send session; callback re-entry from within a
/// listener to issue a reply must go through the same discipline.
pub struct ExternalLock<Claim, Release>
where
    Claim: Fn() -> bool,
    Release: Fn(),
{
    claim: Claim,
    release: Release,
}

impl<Claim, Release> ExternalLock<Claim, Release>
where
    Claim: Fn() -> bool,
    Release: Fn(),
{
    pub fn new(claim: Claim, release: Release) -> Self {
        ExternalLock { claim, release }
    }
}

impl<Claim, Release> TxLock for ExternalLock<Claim, Release>
where
    Claim: Fn() -> bool,
    Release: Fn(),
{
    fn claim(&self) -> bool {
        (self.claim)()
    }

    fn release(&self) {
        (self.release)()
    }
}
