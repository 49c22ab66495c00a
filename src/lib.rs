//! A peer-to-peer framing protocol engine for reliable message exchange
//! over an arbitrary byte stream (a UART, a TCP socket, a USB CDC pipe —
//! anything that can move bytes in both directions).
//!
//! Frames are `SOF? ID LEN TYPE HEAD_CKSUM? payload DATA_CKSUM?`, with the
//! width of `ID`/`LEN`/`TYPE` and the checksum kernel fixed per
//! instantiation through a [`FrameConfig`] impl. An [`Engine`] drives both
//! directions: feed it received bytes through [`Engine::accept`], and it
//! dispatches completed frames to whichever of its ID, type or generic
//! listeners matches; call [`Engine::send`]/[`Engine::respond`]/[`Engine::query`]
//! to transmit.
//!
//! No heap allocation, no dynamic dispatch in the hot path: every buffer is
//! a fixed-size array sized by the const generics on `Engine`, so this
//! builds and runs on `no_std` targets. Enable the `std` feature for a
//! `FrameWriter` bridge to `std::io::Write`, or `demos` for two TCP demo
//! binaries.
#![cfg_attr(not(test), no_std)]
#![allow(clippy::too_many_arguments)]

mod checksum;
mod config;
mod engine;
mod error;
mod frame;
mod io;
mod listener;
mod lock;
mod log;
mod message;
mod parser;
mod sender;

pub use checksum::{Checksum, Crc16, Crc32, Crc8, Custom, CustomChecksum, NoChecksum, Xor};
pub use config::{FrameConfig, PeerRole};
pub use engine::Engine;
pub use error::{ListenerError, SendError};
pub use frame::FrameInt;
pub use io::FrameWriter;
#[cfg(feature = "std")]
pub use io::StdWriter;
#[cfg(any(test, feature = "std"))]
pub use io::VecWriter;
pub use listener::{EngineOps, Listener};
pub use lock::{ExternalLock, SoftLock, TxLock};
#[cfg(feature = "defmt")]
pub use log::DefmtDiagnostics;
pub use log::{DiagnosticEvent, Diagnostics, NoopDiagnostics};
pub use message::{ListenerResult, Message};
