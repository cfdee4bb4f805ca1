/*!
    Input sessions.
*/

use std::fmt;

use ffmpeg_next::format::context::Input as InputContext;
use ffmpeg_next::media::Type;
use ffmpeg_types::{Error, MediaInfo, Result};
use tracing::debug;

use crate::interrupt::Interrupt;
use crate::probe::extract_media_info;
use crate::reader::PacketReader;

/**
    An open input, exclusively owning one native format context.

    Created by [`Runtime::open`](crate::Runtime::open). The context is
    released exactly once: by [`Session::close`], or on drop if the session
    was never closed. Sessions cannot be cloned; pass them by reference to
    anything that reads from them.

    A read blocked on a stalled source can be aborted from another thread
    through [`Session::interrupt`].
*/
pub struct Session<C = InputContext> {
    // Released in `close`, before `interrupt`, which the native context polls.
    context: Option<C>,
    url: String,
    interrupt: Interrupt,
}

impl<C> Session<C> {
    pub(crate) fn new(context: C, url: impl Into<String>, interrupt: Interrupt) -> Self {
        Self {
            context: Some(context),
            url: url.into(),
            interrupt,
        }
    }

    /**
        Returns true while the session still owns a live context.
    */
    pub fn is_valid(&self) -> bool {
        self.context.is_some()
    }

    /**
        Release the native context.

        Closing an already closed session does nothing.
    */
    pub fn close(&mut self) {
        if let Some(context) = self.context.take() {
            drop(context);
            debug!(url = %self.url, "input session closed");
        }
    }

    /**
        The source this session was opened from.
    */
    pub fn url(&self) -> &str {
        &self.url
    }

    /**
        The interrupt flag polled by this session's blocking reads.

        Clone it and raise it from another thread to make a stalled read
        return [`Error::Interrupted`]. Reads keep failing that way afterwards;
        the session can still be closed normally.
    */
    pub fn interrupt(&self) -> &Interrupt {
        &self.interrupt
    }

    pub(crate) fn context(&self) -> Result<&C> {
        self.context.as_ref().ok_or(Error::Closed)
    }

    pub(crate) fn context_mut(&mut self) -> Result<&mut C> {
        self.context.as_mut().ok_or(Error::Closed)
    }
}

impl Session<InputContext> {
    /**
        Describe the container and its streams.

        Without probing, stream durations and codec details may be missing.
    */
    pub fn info(&self) -> Result<MediaInfo> {
        Ok(extract_media_info(self.context()?))
    }

    /**
        Index of the first video stream, if the input has one.
    */
    pub fn video_stream_index(&self) -> Result<Option<usize>> {
        let input = self.context()?;
        Ok(input
            .streams()
            .find(|stream| stream.parameters().medium() == Type::Video)
            .map(|stream| stream.index()))
    }

    /**
        Write the container layout to the native log.
    */
    pub fn dump(&self) -> Result<()> {
        let input = self.context()?;
        ffmpeg_next::format::context::input::dump(input, 0, Some(&self.url));
        Ok(())
    }

    /**
        Borrow the session for reading packets.

        The reader holds the session mutably, so only one reader can exist
        at a time and the session cannot be closed while it is alive.
    */
    pub fn packets(&mut self) -> Result<PacketReader<'_>> {
        Ok(PacketReader::new(self.context_mut()?))
    }
}

impl<C> Drop for Session<C> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<C> fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("url", &self.url)
            .field("open", &self.is_valid())
            .finish()
    }
}
