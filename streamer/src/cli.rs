use anyhow::{Context, Result};
use clap::Parser;
use ffmpeg_input::{InputDescriptor, Interrupt};
use ffmpeg_types::MediaInfo;
use tokio::signal;
use tracing::{info, warn};

use crate::hold::{HoldMode, StopSignal, hold};

#[derive(Parser, Debug)]
#[command(name = "streamer")]
#[command(about = "Open a media input and keep the session alive")]
pub struct Args {
    /// Path or URL of the media source
    #[arg(env = "STREAMER_URL")]
    pub url: String,

    /// Container format hint (auto-detect when omitted)
    #[arg(short, long, env = "STREAMER_FORMAT")]
    pub format: Option<String>,

    /// Skip stream analysis when opening
    #[arg(long)]
    pub no_probe: bool,

    /// Dump the container layout after opening
    #[arg(short, long)]
    pub verbose: bool,

    /// Demuxer or protocol option as KEY=VALUE (repeatable)
    #[arg(short = 'o', long = "option", value_parser = parse_option)]
    pub options: Vec<(String, String)>,

    /// Read packets until end of stream instead of idling
    #[arg(long)]
    pub drain: bool,

    /// With --drain, count packets of every stream instead of only video
    #[arg(long, requires = "drain")]
    pub all_streams: bool,
}

impl Args {
    pub async fn run(self) -> Result<()> {
        ffmpeg_input::initialize().context("failed to initialize FFmpeg")?;

        let stop = StopSignal::new();
        let interrupt = Interrupt::new();
        watch_ctrl_c(stop.clone(), interrupt.clone());

        let descriptor = self.descriptor()?.with_interrupt(interrupt);
        let mut session = ffmpeg_input::open(&descriptor)?;

        let media_info = session.info()?;
        log_media_info(&media_info);

        let mode = if self.drain {
            let stream = if self.all_streams {
                None
            } else {
                let video = session.video_stream_index()?;
                if video.is_none() {
                    warn!("no video stream found, counting all streams");
                }
                video
            };
            HoldMode::Drain { stream }
        } else {
            HoldMode::Idle
        };

        info!(mode = ?mode, "holding session, press Ctrl-C to stop");
        let result = hold(&mut session, mode, &stop).await;
        session.close();

        let summary = result.with_context(|| format!("reading from '{}' failed", self.url))?;
        info!(
            packets = summary.packets,
            keyframes = summary.keyframes,
            bytes = summary.bytes,
            reason = ?summary.reason,
            "session finished"
        );

        Ok(())
    }

    fn descriptor(&self) -> Result<InputDescriptor> {
        let mut descriptor =
            InputDescriptor::build(self.format.as_deref(), &self.url, !self.no_probe)?
                .with_dump(self.verbose);
        for (key, value) in &self.options {
            descriptor = descriptor.with_option(key, value)?;
        }
        Ok(descriptor)
    }
}

/**
    First Ctrl-C stops the hold and aborts blocking FFmpeg I/O; a second one
    exits immediately.
*/
fn watch_ctrl_c(stop: StopSignal, interrupt: Interrupt) {
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "unable to listen for Ctrl-C");
            return;
        }
        info!("interrupt received, stopping");
        stop.trigger();
        interrupt.interrupt();

        if signal::ctrl_c().await.is_ok() {
            warn!("second interrupt received, exiting");
            std::process::exit(130);
        }
    });
}

fn parse_option(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

fn log_media_info(media_info: &MediaInfo) {
    info!(
        format = %media_info.format_name,
        duration = ?media_info.duration,
        bit_rate = ?media_info.bit_rate,
        streams = media_info.streams.len(),
        "input opened"
    );
    for stream in &media_info.streams {
        info!(
            index = stream.index,
            kind = %stream.kind,
            codec = %stream.codec,
            time_base = %stream.time_base,
            duration = ?stream.duration,
            "stream"
        );
    }
}
