//! The public façade (spec §4.6): wires the parser, sender, lock and
//! listener tables together into one engine instance per connection.
//!
//! `Engine` owns its [`FrameWriter`] directly rather than taking one per
//! call, mirroring the original library embedding a single `write_impl`
//! pointer in its context struct. The five buffer-capacity parameters are
//! const generics (see the module doc on [`crate::config::FrameConfig`] for
//! why they can't be associated consts); `L` and `D` default to
//! [`SoftLock`] and [`NoopDiagnostics`] so a minimal instantiation only
//! needs to name `C` and `W`.

use crate::config::{FrameConfig, PeerRole};
use crate::error::{ListenerError, SendError};
use crate::frame::FrameInt;
use crate::io::FrameWriter;
use crate::listener::{
    insert, remove, EngineOps, GenericListenerSlot, IdListenerSlot, Listener, Msg,
    TypeListenerSlot,
};
use crate::lock::{SoftLock, TxLock};
use crate::log::{Diagnostics, NoopDiagnostics};
use crate::message::ListenerResult;
use crate::parser::{Parser, ParserOutcome};
use crate::sender::Sender;

pub struct Engine<
    C,
    W,
    const MAX_PAYLOAD_RX: usize,
    const SEND_BUF_LEN: usize,
    const MAX_ID_LST: usize,
    const MAX_TYPE_LST: usize,
    const MAX_GEN_LST: usize,
    L = SoftLock,
    D = NoopDiagnostics,
> where
    C: FrameConfig,
{
    role: PeerRole,
    next_id: u32,
    writer: W,
    parser: Parser<C, MAX_PAYLOAD_RX>,
    sender: Sender<C, SEND_BUF_LEN>,
    lock: L,
    diagnostics: D,
    id_listeners: [Option<IdListenerSlot<C>>; MAX_ID_LST],
    id_count: usize,
    type_listeners: [Option<TypeListenerSlot<C>>; MAX_TYPE_LST],
    type_count: usize,
    generic_listeners: [Option<GenericListenerSlot<C>>; MAX_GEN_LST],
    generic_count: usize,
}

impl<
        C,
        W,
        const MAX_PAYLOAD_RX: usize,
        const SEND_BUF_LEN: usize,
        const MAX_ID_LST: usize,
        const MAX_TYPE_LST: usize,
        const MAX_GEN_LST: usize,
        L,
        D,
    > Engine<C, W, MAX_PAYLOAD_RX, SEND_BUF_LEN, MAX_ID_LST, MAX_TYPE_LST, MAX_GEN_LST, L, D>
where
    C: FrameConfig,
    W: FrameWriter,
    L: TxLock + Default,
    D: Diagnostics + Default,
{
    /// Builds an engine with the default lock and diagnostics policies.
    pub fn new(role: PeerRole, writer: W) -> Self {
        Self::with_parts(role, writer, L::default(), D::default())
    }
}

impl<
        C,
        W,
        const MAX_PAYLOAD_RX: usize,
        const SEND_BUF_LEN: usize,
        const MAX_ID_LST: usize,
        const MAX_TYPE_LST: usize,
        const MAX_GEN_LST: usize,
        L,
        D,
    > Engine<C, W, MAX_PAYLOAD_RX, SEND_BUF_LEN, MAX_ID_LST, MAX_TYPE_LST, MAX_GEN_LST, L, D>
where
    C: FrameConfig,
    W: FrameWriter,
    L: TxLock,
    D: Diagnostics,
{
    /// Builds an engine with a caller-supplied lock and diagnostics sink.
    pub fn with_parts(role: PeerRole, writer: W, lock: L, diagnostics: D) -> Self {
        Engine {
            role,
            next_id: 0,
            writer,
            parser: Parser::new(),
            sender: Sender::new(),
            lock,
            diagnostics,
            id_listeners: [None; MAX_ID_LST],
            id_count: 0,
            type_listeners: [None; MAX_TYPE_LST],
            type_count: 0,
            generic_listeners: [None; MAX_GEN_LST],
            generic_count: 0,
        }
    }

    /// Resets the receive state machine to `Sof` without touching any
    /// listener table.
    pub fn reset_parser(&mut self) {
        self.parser.reset();
    }

    /// Advances the inactivity timeout and every ID listener's countdown by
    /// one tick. Call this on a fixed cadence (e.g. once per millisecond).
    pub fn tick(&mut self) {
        self.parser.tick();
        self.tick_id_listeners();
    }

    /// Borrows the underlying byte sink, e.g. to inspect buffered output in
    /// tests or to reach host-specific methods the `FrameWriter` trait
    /// doesn't expose.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Mutably borrows the underlying byte sink.
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Feeds a block of freshly-received bytes through the parser,
    /// dispatching any frame(s) that complete and logging any diagnostic
    /// events along the way.
    pub fn accept(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.accept_byte(byte);
        }
    }

    fn accept_byte(&mut self, byte: u8) {
        match self.parser.accept_byte(byte) {
            ParserOutcome::None => {}
            ParserOutcome::Diagnostic(event) => self.diagnostics.log(event),
            ParserOutcome::FrameReady => {
                let id = self.parser.frame_id();
                let ty = self.parser.frame_type();
                // Copy the payload out of the parser's buffer before
                // dispatching: dispatch re-borrows `self` whole (so a
                // listener can call back into `send`/`respond`), which
                // can't coexist with a live borrow of `self.parser`.
                let mut local = [0u8; MAX_PAYLOAD_RX];
                let payload = self.parser.payload();
                let len = payload.len();
                local[..len].copy_from_slice(payload);
                self.dispatch(id, ty, &local[..len]);
            }
        }
    }

    fn dispatch(&mut self, frame_id: u32, frame_type: u32, payload: &[u8]) {
        let mut msg = Msg::<C> {
            id: C::Id::from_u32(frame_id),
            is_response: false,
            ty: C::Type::from_u32(frame_type),
            data: Some(payload),
            len: payload.len(),
            userdata: Default::default(),
            userdata2: Default::default(),
        };

        for i in 0..self.id_count {
            let Some(slot) = self.id_listeners[i] else { continue };
            if slot.id != frame_id {
                continue;
            }
            msg.userdata = slot.userdata;
            msg.userdata2 = slot.userdata2;
            match (slot.callback)(self, &mut msg) {
                ListenerResult::Next => continue,
                ListenerResult::Stay => return,
                ListenerResult::Renew => {
                    if let Some(s) = &mut self.id_listeners[i] {
                        s.timeout_ticks = s.default_timeout;
                    }
                    return;
                }
                ListenerResult::Close => {
                    self.id_listeners[i] = None;
                    if i + 1 == self.id_count {
                        self.id_count -= 1;
                    }
                    return;
                }
            }
        }

        msg.userdata = Default::default();
        msg.userdata2 = Default::default();

        for i in 0..self.type_count {
            let Some(slot) = self.type_listeners[i] else { continue };
            if slot.ty != frame_type {
                continue;
            }
            match (slot.callback)(self, &mut msg) {
                ListenerResult::Next => continue,
                ListenerResult::Close => {
                    self.type_listeners[i] = None;
                    if i + 1 == self.type_count {
                        self.type_count -= 1;
                    }
                    return;
                }
                ListenerResult::Stay | ListenerResult::Renew => return,
            }
        }

        for i in 0..self.generic_count {
            let Some(slot) = self.generic_listeners[i] else { continue };
            match (slot.callback)(self, &mut msg) {
                ListenerResult::Next => continue,
                ListenerResult::Close => {
                    self.generic_listeners[i] = None;
                    if i + 1 == self.generic_count {
                        self.generic_count -= 1;
                    }
                    return;
                }
                ListenerResult::Stay | ListenerResult::Renew => return,
            }
        }

        self.diagnostics
            .log(crate::log::DiagnosticEvent::UnhandledMessage);
    }

    fn tick_id_listeners(&mut self) {
        let mut expired = None;
        for i in 0..self.id_count {
            if let Some(slot) = &mut self.id_listeners[i] {
                if let Some(ticks) = &mut slot.timeout_ticks {
                    if *ticks > 0 {
                        *ticks -= 1;
                        if *ticks == 0 {
                            expired = Some(i);
                            break;
                        }
                    }
                }
            }
        }

        if let Some(i) = expired {
            let slot = self.id_listeners[i].expect("expired index always refers to a live slot");
            let mut msg = Msg::<C> {
                id: C::Id::from_u32(slot.id),
                is_response: false,
                ty: C::Type::default(),
                data: None,
                len: 0,
                userdata: slot.userdata,
                userdata2: slot.userdata2,
            };
            let _ = (slot.callback)(self, &mut msg);
            self.id_listeners[i] = None;
            if i + 1 == self.id_count {
                self.id_count -= 1;
            }
        }
    }

    fn alloc_id(&mut self) -> u32 {
        let peer_bit = 1u32 << (C::Id::WIDTH * 8 - 1);
        let id = self.next_id | if self.role.bit() { peer_bit } else { 0 };
        self.next_id = (self.next_id + 1) & (peer_bit - 1);
        id
    }

    /// Starts a multipart send, writing the header up front. Returns the
    /// allocated frame ID. Must be followed by zero or more [`Self::send_chunk`]
    /// calls whose combined length equals `total_len`, then [`Self::send_end`].
    pub fn send_begin(&mut self, ty: C::Type, total_len: usize) -> Result<C::Id, SendError> {
        if !self.lock.claim() {
            return Err(SendError::TxLocked);
        }
        let id = self.alloc_id();
        self.sender
            .begin(&mut self.writer, id, total_len as u32, ty.to_u32());
        Ok(C::Id::from_u32(id))
    }

    /// Starts a multipart reply, reusing `id` instead of allocating a new one.
    pub fn respond_begin(
        &mut self,
        id: C::Id,
        ty: C::Type,
        total_len: usize,
    ) -> Result<(), SendError> {
        if !self.lock.claim() {
            return Err(SendError::TxLocked);
        }
        self.sender
            .begin(&mut self.writer, id.to_u32(), total_len as u32, ty.to_u32());
        Ok(())
    }

    /// Starts a multipart query: allocates an ID, registers `on_reply` for
    /// it, then writes the header — in that order, so the listener is live
    /// before any byte of the frame reaches the wire. Follow with zero or
    /// more [`Self::send_chunk`] calls and then [`Self::send_end`], the same
    /// as [`Self::send_begin`]. Unlike [`EngineOps::query`], which only
    /// takes a single complete payload slice, this lets the body be streamed
    /// in pieces.
    pub fn query_begin(
        &mut self,
        ty: C::Type,
        total_len: usize,
        on_reply: Listener<C>,
        timeout_ticks: Option<u32>,
    ) -> Result<C::Id, SendError> {
        if !self.lock.claim() {
            return Err(SendError::TxLocked);
        }
        let id = self.alloc_id();
        if insert(
            &mut self.id_listeners,
            &mut self.id_count,
            IdListenerSlot {
                id,
                callback: on_reply,
                timeout_ticks,
                default_timeout: timeout_ticks,
                userdata: Default::default(),
                userdata2: Default::default(),
            },
        )
        .is_err()
        {
            self.lock.release();
            return Err(SendError::ListenerTableFull);
        }
        self.sender
            .begin(&mut self.writer, id, total_len as u32, ty.to_u32());
        Ok(C::Id::from_u32(id))
    }

    /// Streams one more slice of a multipart send's body.
    pub fn send_chunk(&mut self, bytes: &[u8]) {
        self.sender.chunk(&mut self.writer, bytes);
    }

    /// Appends the tail checksum and releases the send lock, closing out a
    /// session started with [`Self::send_begin`] or [`Self::respond_begin`].
    pub fn send_end(&mut self) {
        self.sender.end(&mut self.writer);
        self.lock.release();
    }

    /// Registers a listener for one specific frame ID, with an optional
    /// tick-based expiry. Prefer [`EngineOps::query`] when you're also
    /// sending the frame that provoked the wait.
    pub fn add_id_listener(
        &mut self,
        id: C::Id,
        callback: Listener<C>,
        timeout_ticks: Option<u32>,
    ) -> Result<(), ListenerError> {
        insert(
            &mut self.id_listeners,
            &mut self.id_count,
            IdListenerSlot {
                id: id.to_u32(),
                callback,
                timeout_ticks,
                default_timeout: timeout_ticks,
                userdata: Default::default(),
                userdata2: Default::default(),
            },
        )
    }

    /// Removes an ID listener, notifying it once more with `msg.data = None`
    /// first — the same cleanup call tick-driven expiry makes, since a
    /// direct removal like this one is just as much a "this wait is over"
    /// event as a timeout is.
    pub fn remove_id_listener(&mut self, id: C::Id) -> Result<(), ListenerError> {
        let target = id.to_u32();
        let found = (0..self.id_count)
            .find(|&i| matches!(self.id_listeners[i], Some(slot) if slot.id == target));

        let Some(i) = found else {
            self.diagnostics
                .log(crate::log::DiagnosticEvent::ListenerNotFound);
            return Err(ListenerError::NotFound);
        };

        let slot = self.id_listeners[i].expect("found index always refers to a live slot");
        let mut msg = Msg::<C> {
            id: C::Id::from_u32(slot.id),
            is_response: false,
            ty: C::Type::default(),
            data: None,
            len: 0,
            userdata: slot.userdata,
            userdata2: slot.userdata2,
        };
        let _ = (slot.callback)(self, &mut msg);

        remove(&mut self.id_listeners, &mut self.id_count, |s| {
            s.id == target
        })
    }

    /// Resets a live ID listener's timeout back to the value it was
    /// registered with, the same effect `ListenerResult::Renew` has when
    /// returned from dispatch.
    pub fn renew_id_listener(&mut self, id: C::Id) -> Result<(), ListenerError> {
        let target = id.to_u32();
        for i in 0..self.id_count {
            if let Some(slot) = &mut self.id_listeners[i] {
                if slot.id == target {
                    slot.timeout_ticks = slot.default_timeout;
                    return Ok(());
                }
            }
        }
        self.diagnostics
            .log(crate::log::DiagnosticEvent::ListenerNotFound);
        Err(ListenerError::NotFound)
    }

    /// Logs `ListenerNotFound` when a `remove_*` call found no match; a
    /// private helper so each `remove_*` stays a one-line call/return.
    fn log_if_not_found(&mut self, result: &Result<(), ListenerError>) {
        if matches!(result, Err(ListenerError::NotFound)) {
            self.diagnostics
                .log(crate::log::DiagnosticEvent::ListenerNotFound);
        }
    }

    pub fn add_type_listener(
        &mut self,
        ty: C::Type,
        callback: Listener<C>,
    ) -> Result<(), ListenerError> {
        insert(
            &mut self.type_listeners,
            &mut self.type_count,
            TypeListenerSlot {
                ty: ty.to_u32(),
                callback,
            },
        )
    }

    pub fn remove_type_listener(&mut self, ty: C::Type) -> Result<(), ListenerError> {
        let target = ty.to_u32();
        let result = remove(&mut self.type_listeners, &mut self.type_count, |s| {
            s.ty == target
        });
        self.log_if_not_found(&result);
        result
    }

    pub fn add_generic_listener(&mut self, callback: Listener<C>) -> Result<(), ListenerError> {
        insert(
            &mut self.generic_listeners,
            &mut self.generic_count,
            GenericListenerSlot { callback },
        )
    }

    pub fn remove_generic_listener(&mut self, callback: Listener<C>) -> Result<(), ListenerError> {
        let result = remove(&mut self.generic_listeners, &mut self.generic_count, |s| {
            s.callback == callback
        });
        self.log_if_not_found(&result);
        result
    }
}

impl<
        C,
        W,
        const MAX_PAYLOAD_RX: usize,
        const SEND_BUF_LEN: usize,
        const MAX_ID_LST: usize,
        const MAX_TYPE_LST: usize,
        const MAX_GEN_LST: usize,
        L,
        D,
    > EngineOps<C>
    for Engine<C, W, MAX_PAYLOAD_RX, SEND_BUF_LEN, MAX_ID_LST, MAX_TYPE_LST, MAX_GEN_LST, L, D>
where
    C: FrameConfig,
    W: FrameWriter,
    L: TxLock,
    D: Diagnostics,
{
    fn send(&mut self, ty: C::Type, data: &[u8]) -> Result<(), SendError> {
        if !self.lock.claim() {
            return Err(SendError::TxLocked);
        }
        let id = self.alloc_id();
        self.sender
            .begin(&mut self.writer, id, data.len() as u32, ty.to_u32());
        self.sender.chunk(&mut self.writer, data);
        self.sender.end(&mut self.writer);
        self.lock.release();
        Ok(())
    }

    fn respond(&mut self, id: C::Id, ty: C::Type, data: &[u8]) -> Result<(), SendError> {
        if !self.lock.claim() {
            return Err(SendError::TxLocked);
        }
        self.sender
            .begin(&mut self.writer, id.to_u32(), data.len() as u32, ty.to_u32());
        self.sender.chunk(&mut self.writer, data);
        self.sender.end(&mut self.writer);
        self.lock.release();
        Ok(())
    }

    fn query(
        &mut self,
        ty: C::Type,
        data: &[u8],
        on_reply: Listener<C>,
        timeout_ticks: Option<u32>,
    ) -> Result<(), SendError> {
        if !self.lock.claim() {
            return Err(SendError::TxLocked);
        }
        let id = self.alloc_id();
        if insert(
            &mut self.id_listeners,
            &mut self.id_count,
            IdListenerSlot {
                id,
                callback: on_reply,
                timeout_ticks,
                default_timeout: timeout_ticks,
                userdata: Default::default(),
                userdata2: Default::default(),
            },
        )
        .is_err()
        {
            self.lock.release();
            return Err(SendError::ListenerTableFull);
        }
        self.sender
            .begin(&mut self.writer, id, data.len() as u32, ty.to_u32());
        self.sender.chunk(&mut self.writer, data);
        self.sender.end(&mut self.writer);
        self.lock.release();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::Xor;
    use crate::io::VecWriter;

    struct Cfg;
    impl FrameConfig for Cfg {
        type Id = u16;
        type Len = u16;
        type Type = u8;
        type Cksum = Xor;
        type UserData = ();
        type UserData2 = ();
        const USE_SOF: bool = true;
        const PARSER_TIMEOUT_TICKS: u32 = 5;
    }

    type TestEngine = Engine<Cfg, VecWriter, 32, 32, 4, 4, 4>;

    std::thread_local! {
        static RECEIVED: std::cell::RefCell<std::vec::Vec<u8>> = std::cell::RefCell::new(std::vec::Vec::new());
        static TIMED_OUT: std::cell::Cell<bool> = std::cell::Cell::new(false);
        static REMOVED_WITH_NO_DATA: std::cell::Cell<bool> = std::cell::Cell::new(false);
    }

    #[test]
    fn send_then_receive_round_trips_through_a_generic_listener() {
        let mut tx = TestEngine::new(PeerRole::Initiator, VecWriter::default());
        EngineOps::send(&mut tx, 0x10, b"hello").unwrap();
        let bytes = tx.writer.0.clone();

        fn capture(_ops: &mut dyn EngineOps<Cfg>, msg: &mut Msg<'_, Cfg>) -> ListenerResult {
            RECEIVED.with(|r| r.borrow_mut().extend_from_slice(msg.data.unwrap()));
            ListenerResult::Stay
        }

        let mut rx = TestEngine::new(PeerRole::Responder, VecWriter::default());
        rx.add_generic_listener(capture).unwrap();
        rx.accept(&bytes);

        RECEIVED.with(|r| assert_eq!(r.borrow().as_slice(), b"hello"));
    }

    #[test]
    fn query_registers_an_id_listener_that_fires_on_reply() {
        let mut peer_a = TestEngine::new(PeerRole::Initiator, VecWriter::default());

        fn on_reply(_ops: &mut dyn EngineOps<Cfg>, msg: &mut Msg<'_, Cfg>) -> ListenerResult {
            assert_eq!(msg.data.unwrap(), b"pong");
            ListenerResult::Close
        }
        EngineOps::query(&mut peer_a, 0x01, b"ping", on_reply, None).unwrap();
        let request_bytes = peer_a.writer.0.clone();

        // peer B receives the request via a type listener and responds.
        let mut peer_b = TestEngine::new(PeerRole::Responder, VecWriter::default());
        fn respond_pong(ops: &mut dyn EngineOps<Cfg>, msg: &mut Msg<'_, Cfg>) -> ListenerResult {
            ops.respond(msg.id, 0x02, b"pong").unwrap();
            ListenerResult::Close
        }
        peer_b.add_type_listener(0x01, respond_pong).unwrap();
        peer_b.accept(&request_bytes);
        let reply_bytes = peer_b.writer.0.clone();

        // peer A receives the reply; its id listener should fire and close.
        peer_a.accept(&reply_bytes);
        assert_eq!(peer_a.id_count, 0);
    }

    #[test]
    fn send_while_locked_is_rejected() {
        let mut engine = TestEngine::new(PeerRole::Initiator, VecWriter::default());
        assert!(engine.lock.claim());
        assert!(matches!(
            EngineOps::send(&mut engine, 0x01, b"x"),
            Err(SendError::TxLocked)
        ));
    }

    #[test]
    fn listener_table_full_releases_the_lock_and_reports_the_right_error() {
        type TinyTable = Engine<Cfg, VecWriter, 16, 16, 1, 1, 1>;
        let mut engine = TinyTable::new(PeerRole::Initiator, VecWriter::default());

        fn never_called(_ops: &mut dyn EngineOps<Cfg>, _msg: &mut Msg<'_, Cfg>) -> ListenerResult {
            ListenerResult::Next
        }
        engine.add_id_listener(7, never_called, None).unwrap();

        let result = EngineOps::query(&mut engine, 0x01, b"x", never_called, None);
        assert!(matches!(result, Err(SendError::ListenerTableFull)));
        // lock must have been released, so a plain send still works.
        assert!(EngineOps::send(&mut engine, 0x02, b"y").is_ok());
    }

    #[test]
    fn tick_expires_an_id_listener_and_notifies_it_with_no_data() {
        fn on_timeout(_ops: &mut dyn EngineOps<Cfg>, msg: &mut Msg<'_, Cfg>) -> ListenerResult {
            TIMED_OUT.with(|t| t.set(msg.data.is_none()));
            ListenerResult::Stay
        }

        let mut engine = TestEngine::new(PeerRole::Initiator, VecWriter::default());
        engine.add_id_listener(1, on_timeout, Some(2)).unwrap();
        engine.tick();
        assert_eq!(engine.id_count, 1);
        engine.tick();
        assert_eq!(engine.id_count, 0);
        assert!(TIMED_OUT.with(|t| t.get()));
    }

    #[test]
    fn remove_id_listener_notifies_the_callback_with_no_data() {
        fn on_removed(_ops: &mut dyn EngineOps<Cfg>, msg: &mut Msg<'_, Cfg>) -> ListenerResult {
            REMOVED_WITH_NO_DATA.with(|r| r.set(msg.data.is_none()));
            ListenerResult::Stay
        }

        let mut engine = TestEngine::new(PeerRole::Initiator, VecWriter::default());
        engine.add_id_listener(1, on_removed, None).unwrap();
        engine.remove_id_listener(1).unwrap();

        assert!(REMOVED_WITH_NO_DATA.with(|r| r.get()));
        assert_eq!(engine.id_count, 0);
    }

    #[test]
    fn remove_id_listener_on_unknown_id_reports_not_found() {
        let mut engine = TestEngine::new(PeerRole::Initiator, VecWriter::default());
        assert!(matches!(
            engine.remove_id_listener(42),
            Err(ListenerError::NotFound)
        ));
    }

    #[test]
    fn query_begin_registers_the_listener_before_any_bytes_are_written() {
        let mut peer_a = TestEngine::new(PeerRole::Initiator, VecWriter::default());

        fn on_reply(_ops: &mut dyn EngineOps<Cfg>, msg: &mut Msg<'_, Cfg>) -> ListenerResult {
            assert_eq!(msg.data.unwrap(), b"pong");
            ListenerResult::Close
        }
        let id = peer_a.query_begin(0x01, 4, on_reply, None).unwrap();
        assert_eq!(peer_a.id_count, 1);
        peer_a.send_chunk(b"pi");
        peer_a.send_chunk(b"ng");
        peer_a.send_end();
        let request_bytes = peer_a.writer.0.clone();

        let mut peer_b = TestEngine::new(PeerRole::Responder, VecWriter::default());
        fn respond_pong(ops: &mut dyn EngineOps<Cfg>, msg: &mut Msg<'_, Cfg>) -> ListenerResult {
            ops.respond(msg.id, 0x02, b"pong").unwrap();
            ListenerResult::Close
        }
        peer_b.add_type_listener(0x01, respond_pong).unwrap();
        peer_b.accept(&request_bytes);
        let reply_bytes = peer_b.writer.0.clone();

        peer_a.accept(&reply_bytes);
        assert_eq!(peer_a.id_count, 0);
        let _ = id;
    }
}
