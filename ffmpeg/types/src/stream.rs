/*!
    Stream information types.
*/

use std::fmt;
use std::time::Duration;

use crate::Rational;

/**
    The kind of media carried by a stream.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum MediaKind {
    Video,
    Audio,
    Subtitle,
    Data,
    Attachment,
    Unknown,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Subtitle => "subtitle",
            Self::Data => "data",
            Self::Attachment => "attachment",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/**
    Information about a single stream inside an opened container.
*/
#[derive(Clone, Debug)]
pub struct StreamInfo {
    /// Index of the stream within the container.
    pub index: usize,
    /// Media kind.
    pub kind: MediaKind,
    /// Codec name as reported by the demuxer (e.g. "h264", "aac").
    pub codec: String,
    /// Time base for timestamps.
    pub time_base: Rational,
    /// Stream duration (may be unavailable, especially without probing).
    pub duration: Option<Duration>,
    /// Number of frames, if the container records it.
    pub frames: Option<u64>,
}

/**
    Combined information about an opened input.
*/
#[derive(Clone, Debug, Default)]
pub struct MediaInfo {
    /// Short name of the demuxer that opened the input (e.g. "mov,mp4,m4a,3gp,3g2,mj2").
    pub format_name: String,
    /// Total duration of the media (may be unavailable).
    pub duration: Option<Duration>,
    /// Overall bit rate in bits per second (if known).
    pub bit_rate: Option<u64>,
    /// All streams, in container order.
    pub streams: Vec<StreamInfo>,
}

impl MediaInfo {
    /**
        Returns the first stream of the given kind.
    */
    pub fn first(&self, kind: MediaKind) -> Option<&StreamInfo> {
        self.streams.iter().find(|s| s.kind == kind)
    }

    pub fn has_video(&self) -> bool {
        self.first(MediaKind::Video).is_some()
    }

    pub fn has_audio(&self) -> bool {
        self.first(MediaKind::Audio).is_some()
    }
}

/**
    Metadata of a demuxed packet.

    The payload itself stays with the demuxer; callers that need it
    read through the session's packet reader.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PacketInfo {
    /// Index of the stream this packet belongs to.
    pub stream_index: usize,
    /// Presentation timestamp in the stream time base.
    pub pts: Option<i64>,
    /// Decode timestamp in the stream time base.
    pub dts: Option<i64>,
    /// Duration in the stream time base.
    pub duration: i64,
    /// Payload size in bytes.
    pub size: usize,
    /// Whether the packet starts a keyframe.
    pub is_keyframe: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(index: usize, kind: MediaKind) -> StreamInfo {
        StreamInfo {
            index,
            kind,
            codec: "none".into(),
            time_base: Rational::new(1, 1000),
            duration: None,
            frames: None,
        }
    }

    #[test]
    fn media_info_first_picks_lowest_index() {
        let info = MediaInfo {
            streams: vec![
                stream(0, MediaKind::Audio),
                stream(1, MediaKind::Video),
                stream(2, MediaKind::Video),
            ],
            ..Default::default()
        };

        assert_eq!(info.first(MediaKind::Video).map(|s| s.index), Some(1));
        assert!(info.has_audio());
        assert!(info.first(MediaKind::Subtitle).is_none());
    }

    #[test]
    fn media_info_default_is_empty() {
        let info = MediaInfo::default();
        assert!(!info.has_video());
        assert!(!info.has_audio());
    }

    #[test]
    fn media_kind_display() {
        assert_eq!(MediaKind::Video.to_string(), "video");
        assert_eq!(MediaKind::Attachment.to_string(), "attachment");
    }
}
