//! TCP demo: connects to `echo_server`, sends a frame with [`EngineOps::query`]
//! once a second, and logs whatever comes back.
//!
//! Grounded on `demo_client`/`demo_init(TF_MASTER, ...)` in the original
//! library's socket demo — the client side always initiates.

use std::io::{ErrorKind, Read};
use std::net::TcpStream;
use std::time::{Duration, Instant};

use frametalk::{Crc16, Engine, EngineOps, FrameConfig, ListenerResult, PeerRole, StdWriter};

const PORT: u16 = 9798;
const READ_TIMEOUT: Duration = Duration::from_millis(10);
const PING_TYPE: u8 = 0x01;
const SEND_INTERVAL: Duration = Duration::from_secs(1);

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

fn on_reply(
    _ops: &mut dyn EngineOps<DemoConfig>,
    msg: &mut frametalk::Message<'_, u16, u8, (), ()>,
) -> ListenerResult {
    match msg.data {
        Some(data) => tracing::info!(id = msg.id, payload = ?data, "reply received"),
        None => tracing::warn!(id = msg.id, "query timed out with no reply"),
    }
    ListenerResult::Close
}

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let stream = TcpStream::connect(("127.0.0.1", PORT))?;
    stream.set_read_timeout(Some(READ_TIMEOUT))?;
    tracing::info!("connected");

    let write_half = stream.try_clone()?;
    let mut read_half = stream;
    let mut engine = DemoEngine::new(PeerRole::Initiator, StdWriter(write_half));

    let mut buf = [0u8; 1024];
    let mut last_send = Instant::now() - SEND_INTERVAL;
    let mut counter: u8 = 0;

    loop {
        if last_send.elapsed() >= SEND_INTERVAL {
            let payload = [b'p', b'i', b'n', b'g', counter];
            match engine.query(PING_TYPE, &payload, on_reply, Some(300)) {
                Ok(()) => tracing::info!(counter, "sent ping"),
                Err(err) => tracing::warn!(?err, "ping send rejected"),
            }
            counter = counter.wrapping_add(1);
            last_send = Instant::now();
        }

        match read_half.read(&mut buf) {
            Ok(0) => {
                tracing::info!("server closed the connection");
                return Ok(());
            }
            Ok(n) => engine.accept(&buf[..n]),
            Err(err) if err.kind() == ErrorKind::WouldBlock || err.kind() == ErrorKind::TimedOut => {}
            Err(err) => return Err(err),
        }
        engine.tick();
    }
}
