/*!
    Extracting media metadata from an opened input.
*/

use ffmpeg_next::format::context::Input as InputContext;
use ffmpeg_next::format::stream::Stream;

use ffmpeg_types::{MediaInfo, StreamInfo};

use crate::convert::{duration_from_micros, media_kind_from_ffmpeg, positive, rational_from_ffmpeg};

/**
    Extract MediaInfo from an already-opened input context.
*/
pub(crate) fn extract_media_info(input_ctx: &InputContext) -> MediaInfo {
    let streams = input_ctx.streams().map(|s| extract_stream_info(&s)).collect();

    MediaInfo {
        format_name: input_ctx.format().name().to_string(),
        duration: duration_from_micros(input_ctx.duration()),
        bit_rate: positive(input_ctx.bit_rate()),
        streams,
    }
}

fn extract_stream_info(stream: &Stream<'_>) -> StreamInfo {
    let parameters = stream.parameters();
    let time_base = rational_from_ffmpeg(stream.time_base());

    StreamInfo {
        index: stream.index(),
        kind: media_kind_from_ffmpeg(parameters.medium()),
        codec: parameters.id().name().to_string(),
        time_base,
        duration: time_base.to_duration(stream.duration()),
        frames: positive(stream.frames()),
    }
}
