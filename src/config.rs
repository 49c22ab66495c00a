//! Compile-time configuration surface.
//!
//! Everything here is fixed per instantiation: the wire widths of the ID,
//! length and type fields, the checksum variant, the start-of-frame
//! settings and the two listener user-data slots. An `Engine` is generic
//! over one `FrameConfig` impl plus the handful of buffer-capacity const
//! generics declared directly on `Engine` (see `engine.rs`), mirroring how
//! the original C library generated all of this from a single `TF_Config.h`.

use crate::checksum::Checksum;
use crate::frame::FrameInt;

/// Which side of a connection this engine instance is. Only used to set
/// the high bit of locally-allocated frame IDs so the two peers never
/// collide while allocating independently.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PeerRole {
    /// High bit of locally-allocated IDs is 0.
    Initiator,
    /// High bit of locally-allocated IDs is 1.
    Responder,
}

impl PeerRole {
    /// The value OR-ed into the high bit of a locally-allocated ID.
    pub(crate) const fn bit(self) -> bool {
        matches!(self, PeerRole::Responder)
    }
}

/// Bundles the compile-time-fixed parameters of a frame engine
/// instantiation: field widths, checksum variant, SOF framing and the two
/// opaque listener user-data types.
///
/// Implement this on a zero-sized marker type and pass that type as the
/// `C` parameter of `Engine`.
pub trait FrameConfig {
    /// Wire width of the frame-ID field (`u8`, `u16` or `u32`).
    type Id: FrameInt;
    /// Wire width of the payload-length field.
    type Len: FrameInt;
    /// Wire width of the message-type field.
    type Type: FrameInt;
    /// Checksum kernel.
    type Cksum: Checksum;
    /// Opaque data an ID listener carries between registration and
    /// dispatch (or cleanup). Defaults to `()` for configs that don't need it.
    type UserData: Copy + Default;
    /// A second opaque slot, independent of `UserData`.
    type UserData2: Copy + Default;

    /// Whether a start-of-frame sentinel byte is emitted/expected.
    const USE_SOF: bool;
    /// Value of the sentinel when `USE_SOF` is true. Unused otherwise.
    const SOF_BYTE: u8 = 0x01;
    /// Ticks of receive inactivity after which a partial frame is abandoned.
    const PARSER_TIMEOUT_TICKS: u32;
}
