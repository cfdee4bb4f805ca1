/*!
    Packet reading over a borrowed session.
*/

use ffmpeg_next::Packet;
use ffmpeg_next::format::context::Input as InputContext;
use ffmpeg_types::{Error, PacketInfo, Result};

/**
    Reads demuxed packets from a session it borrows.

    Created by [`Session::packets`](crate::Session::packets). Packets are
    returned in file order, interleaved between streams, unless the reader
    is restricted to a single stream with [`PacketReader::filter`].
*/
pub struct PacketReader<'a> {
    input: &'a mut InputContext,
    stream_filter: Option<usize>,
}

impl<'a> PacketReader<'a> {
    pub(crate) fn new(input: &'a mut InputContext) -> Self {
        Self {
            input,
            stream_filter: None,
        }
    }

    /**
        Only return packets of the given stream; others are skipped.
    */
    pub fn filter(mut self, stream_index: usize) -> Self {
        self.stream_filter = Some(stream_index);
        self
    }

    /**
        Read the next packet.

        Returns `Ok(None)` at end of stream, and [`Error::Interrupted`] if
        the session's interrupt flag was raised while the read was blocked.
    */
    pub fn next_packet(&mut self) -> Result<Option<PacketInfo>> {
        loop {
            let mut packet = Packet::empty();
            match packet.read(self.input) {
                Ok(()) => {}
                Err(ffmpeg_next::Error::Eof) => return Ok(None),
                Err(ffmpeg_next::Error::Exit) => return Err(Error::Interrupted),
                Err(e) => return Err(Error::Read(e.to_string())),
            }

            if let Some(wanted) = self.stream_filter {
                if packet.stream() != wanted {
                    continue;
                }
            }

            return Ok(Some(PacketInfo {
                stream_index: packet.stream(),
                pts: packet.pts(),
                dts: packet.dts(),
                duration: packet.duration(),
                size: packet.size(),
                is_keyframe: packet.is_key(),
            }));
        }
    }
}

impl Iterator for PacketReader<'_> {
    type Item = Result<PacketInfo>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_packet().transpose()
    }
}
