//! The message type passed to listeners and accepted from senders (spec §3).

/// A frame's logical contents, independent of wire width.
///
/// `data` borrows from the engine's receive buffer on the inbound path (only
/// valid for the duration of a single dispatch — copy it if you need to keep
/// it) or from the caller on the outbound path (must stay valid until the
/// send call returns). `None` means either "multipart send, payload arrives
/// via separate calls" on the outbound path, or "listener cleanup/timeout
/// notification" on the inbound path — never "zero-length payload", which is
/// `Some(&[])`.
#[derive(Debug)]
pub struct Message<'a, Id, Type, UserData, UserData2> {
    pub id: Id,
    pub is_response: bool,
    pub ty: Type,
    pub data: Option<&'a [u8]>,
    pub len: usize,
    pub userdata: UserData,
    pub userdata2: UserData2,
}

impl<'a, Id: Default, Type: Default, UserData: Default, UserData2: Default>
    Message<'a, Id, Type, UserData, UserData2>
{
    /// A message with everything zeroed/defaulted, mirroring `TF_ClearMsg`.
    pub fn new(ty: Type, data: &'a [u8]) -> Self {
        Message {
            id: Id::default(),
            is_response: false,
            ty,
            len: data.len(),
            data: Some(data),
            userdata: UserData::default(),
            userdata2: UserData2::default(),
        }
    }

    /// Starts a multipart send: payload arrives later via
    /// `Engine::send_chunk`/`send_end`.
    pub fn new_multipart(ty: Type, len: usize) -> Self {
        Message {
            id: Id::default(),
            is_response: false,
            ty,
            len,
            data: None,
            userdata: UserData::default(),
            userdata2: UserData2::default(),
        }
    }
}

/// Return value of a listener callback, controlling dispatch and the
/// listener's own lifetime (spec §4.5).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ListenerResult {
    /// Not handled; let the next listener in scope order try.
    Next,
    /// Handled; keep the listener, timer unchanged.
    Stay,
    /// Handled; keep the listener, reset its timeout (ID listeners only —
    /// behaves as `Stay` for type/generic listeners, which never expire).
    Renew,
    /// Handled; remove the listener. The listener is assumed to have
    /// already cleaned up its own `userdata`, so no cleanup notification
    /// is sent.
    Close,
}
