use std::time::{Duration, Instant};

use ffmpeg_input::{Error, Result, Session};
use tokio::sync::watch;
use tracing::info;

const REPORT_INTERVAL: Duration = Duration::from_secs(2);

/**
    What to do with a session while it is held open.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoldMode {
    /// Keep the session open until stopped.
    Idle,
    /// Read packets until end of stream or until stopped.
    /// `stream` restricts counting to one stream; `None` counts all of them.
    Drain { stream: Option<usize> },
}

/// Why a hold ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    Signal,
    EndOfStream,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoldSummary {
    pub packets: u64,
    pub keyframes: u64,
    pub bytes: u64,
    pub reason: StopReason,
}

impl HoldSummary {
    fn new(reason: StopReason) -> Self {
        Self {
            packets: 0,
            keyframes: 0,
            bytes: 0,
            reason,
        }
    }
}

/**
    Shared stop flag, triggered once (typically by Ctrl-C).
*/
#[derive(Clone)]
pub struct StopSignal {
    tx: std::sync::Arc<watch::Sender<bool>>,
}

impl StopSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            tx: std::sync::Arc::new(tx),
        }
    }

    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }

    pub async fn stopped(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in self, so the channel cannot close while we wait.
        let _ = rx.wait_for(|stopped| *stopped).await;
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

/**
    Keep a session open according to `mode`.

    The session is only borrowed; closing it stays with the caller. While
    draining, a stop also raises the session's interrupt flag so a read that
    is blocked on a stalled source returns; the session cannot be read from
    afterwards.
*/
pub async fn hold(session: &mut Session, mode: HoldMode, stop: &StopSignal) -> Result<HoldSummary> {
    match mode {
        HoldMode::Idle => {
            stop.stopped().await;
            Ok(HoldSummary::new(StopReason::Signal))
        }
        HoldMode::Drain { stream } => {
            let interrupt = session.interrupt().clone();
            let watcher = stop.clone();
            let link = tokio::spawn(async move {
                watcher.stopped().await;
                interrupt.interrupt();
            });

            let result = tokio::task::block_in_place(|| drain(session, stream, stop));
            link.abort();
            result
        }
    }
}

fn drain(session: &mut Session, stream: Option<usize>, stop: &StopSignal) -> Result<HoldSummary> {
    let mut reader = session.packets()?;
    if let Some(index) = stream {
        reader = reader.filter(index);
    }

    let mut summary = HoldSummary::new(StopReason::Signal);
    let mut last_report = Instant::now();

    while !stop.is_stopped() {
        let packet = match reader.next_packet() {
            Ok(Some(packet)) => packet,
            Ok(None) if stop.is_stopped() => break,
            Ok(None) => {
                summary.reason = StopReason::EndOfStream;
                break;
            }
            Err(Error::Interrupted) => break,
            Err(e) => return Err(e),
        };

        summary.packets += 1;
        summary.bytes += packet.size as u64;
        if packet.is_keyframe {
            summary.keyframes += 1;
        }

        if last_report.elapsed() > REPORT_INTERVAL {
            info!(
                packets = summary.packets,
                bytes = summary.bytes,
                "reading"
            );
            last_report = Instant::now();
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::net::{TcpListener, TcpStream};
    use std::thread::JoinHandle;

    use ffmpeg_input::InputDescriptor;
    use tempfile::NamedTempFile;

    use super::*;

    /// Half a second of 8 kHz 16-bit mono silence.
    fn wav_fixture() -> NamedTempFile {
        let data_len: u32 = 8000;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVEfmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&8000u32.to_le_bytes());
        bytes.extend_from_slice(&16000u32.to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.resize(44 + data_len as usize, 0);

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();
        file.flush().unwrap();
        file
    }

    fn open(file: &NamedTempFile) -> Session {
        ffmpeg_input::initialize().unwrap();
        let url = file.path().to_str().unwrap();
        let descriptor = InputDescriptor::build(Some("wav"), url, true).unwrap();
        ffmpeg_input::open(&descriptor).unwrap()
    }

    /// A TCP source that sends a few bytes of raw PCM and then goes silent.
    fn stalled_source() -> (String, JoinHandle<TcpStream>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("tcp://{}", listener.local_addr().unwrap());
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            stream.write_all(&[0; 16]).unwrap();
            stream
        });
        (url, server)
    }

    #[test]
    fn stop_signal_is_shared() {
        let stop = StopSignal::new();
        let other = stop.clone();
        assert!(!stop.is_stopped());
        other.trigger();
        assert!(stop.is_stopped());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn drain_reads_to_end_and_keeps_session() {
        let fixture = wav_fixture();
        let mut session = open(&fixture);
        let stop = StopSignal::new();

        let summary = hold(&mut session, HoldMode::Drain { stream: Some(0) }, &stop)
            .await
            .unwrap();

        assert_eq!(summary.reason, StopReason::EndOfStream);
        assert_eq!(summary.bytes, 8000);
        assert!(summary.packets > 0);
        assert!(session.is_valid());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn drain_stops_when_signalled() {
        let fixture = wav_fixture();
        let mut session = open(&fixture);
        let stop = StopSignal::new();
        stop.trigger();

        let summary = hold(&mut session, HoldMode::Drain { stream: None }, &stop)
            .await
            .unwrap();
        assert_eq!(summary.reason, StopReason::Signal);
        assert_eq!(summary.packets, 0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn idle_waits_for_stop() {
        let fixture = wav_fixture();
        let mut session = open(&fixture);
        let stop = StopSignal::new();

        let trigger = stop.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            trigger.trigger();
        });

        let summary = hold(&mut session, HoldMode::Idle, &stop).await.unwrap();
        assert_eq!(summary.reason, StopReason::Signal);

        session.close();
        assert!(!session.is_valid());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn stop_unblocks_stalled_read() {
        ffmpeg_input::initialize().unwrap();
        let (url, server) = stalled_source();
        // Fails the read instead of hanging if the stop never reaches FFmpeg.
        let descriptor = InputDescriptor::build(Some("s16le"), &url, false)
            .unwrap()
            .with_option("rw_timeout", "20000000")
            .unwrap();
        let mut session = ffmpeg_input::open(&descriptor).unwrap();

        let stop = StopSignal::new();
        let trigger = stop.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            trigger.trigger();
        });

        let started = Instant::now();
        let summary = hold(&mut session, HoldMode::Drain { stream: None }, &stop)
            .await
            .unwrap();

        assert_eq!(summary.reason, StopReason::Signal);
        assert!(started.elapsed() < Duration::from_secs(10));
        assert!(session.interrupt().is_interrupted());

        session.close();
        drop(server.join().unwrap());
    }
}
