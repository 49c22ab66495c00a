//! TCP demo: accepts one connection at a time and echoes every frame's
//! payload back under the same type, logging each hop with `tracing`.
//!
//! Grounded on `demo_server`/`demo_init(TF_SLAVE, ...)` in the original
//! library's socket demo: a listening socket, one accepted peer at a time,
//! and a read loop that feeds received bytes straight into the framing
//! engine.

use std::io::{ErrorKind, Read};
use std::net::{TcpListener, TcpStream};
use std::time::Duration;

use frametalk::{Crc16, Engine, EngineOps, FrameConfig, ListenerResult, PeerRole, StdWriter};

const PORT: u16 = 9798;
const READ_TIMEOUT: Duration = Duration::from_millis(10);

struct DemoConfig;

impl FrameConfig for DemoConfig {
    type Id = u16;
    type Len = u16;
    type Type = u8;
    type Cksum = Crc16;
    type UserData = ();
    type UserData2 = ();
    const USE_SOF: bool = true;
    const PARSER_TIMEOUT_TICKS: u32 = 500;
}

type DemoEngine = Engine<DemoConfig, StdWriter<TcpStream>, 1024, 256, 8, 8, 8>;

fn echo_listener(
    ops: &mut dyn EngineOps<DemoConfig>,
    msg: &mut frametalk::Message<'_, u16, u8, (), ()>,
) -> ListenerResult {
    let Some(data) = msg.data else { return ListenerResult::Next };
    tracing::info!(id = msg.id, ty = msg.ty, len = data.len(), "echoing frame back");
    if let Err(err) = ops.respond(msg.id, msg.ty, data) {
        tracing::error!(?err, "failed to echo frame");
    }
    ListenerResult::Next
}

fn serve(stream: TcpStream) -> std::io::Result<()> {
    stream.set_read_timeout(Some(READ_TIMEOUT))?;
    let write_half = stream.try_clone()?;
    let mut read_half = stream;

    let mut engine = DemoEngine::new(PeerRole::Responder, StdWriter(write_half));
    engine.add_generic_listener(echo_listener).expect("generic listener slot is free at startup");

    let mut buf = [0u8; 1024];
    loop {
        match read_half.read(&mut buf) {
            Ok(0) => {
                tracing::info!("peer closed the connection");
                return Ok(());
            }
            Ok(n) => engine.accept(&buf[..n]),
            Err(err) if err.kind() == ErrorKind::WouldBlock || err.kind() == ErrorKind::TimedOut => {}
            Err(err) => return Err(err),
        }
        engine.tick();
    }
}

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let listener = TcpListener::bind(("127.0.0.1", PORT))?;
    tracing::info!(port = PORT, "listening");

    loop {
        let (stream, addr) = listener.accept()?;
        tracing::info!(%addr, "peer connected");
        if let Err(err) = serve(stream) {
            tracing::error!(?err, "connection ended with an error");
        }
    }
}
