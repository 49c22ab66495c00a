//! The host-supplied byte sink (spec §6, `write_impl`).

/// Receives the bytes of an outbound frame. The engine may call this more
/// than once per frame (the staging buffer is flushed whenever it fills, or
/// whenever a multipart session needs room). Per spec §6, this never fails
/// from the protocol's point of view — I/O errors are the host's concern.
pub trait FrameWriter {
    fn write(&mut self, bytes: &[u8]);
}

/// A `FrameWriter` that appends to a growable buffer. Used by the test
/// suite; also handy for hosts that want to batch writes themselves.
/// Requires `std` (or `#[cfg(test)]`, which always has it available).
#[cfg(any(test, feature = "std"))]
#[derive(Debug, Default)]
pub struct VecWriter(pub std::vec::Vec<u8>);

#[cfg(any(test, feature = "std"))]
impl FrameWriter for VecWriter {
    fn write(&mut self, bytes: &[u8]) {
        self.0.extend_from_slice(bytes);
    }
}

/// Bridges any `std::io::Write` to [`FrameWriter`], swallowing write
/// errors the same way the protocol contract says it must — they're the
/// host's concern, not the engine's.
#[cfg(feature = "std")]
pub struct StdWriter<W>(pub W);

#[cfg(feature = "std")]
impl<W: std::io::Write> FrameWriter for StdWriter<W> {
    fn write(&mut self, bytes: &[u8]) {
        let _ = self.0.write_all(bytes);
    }
}
