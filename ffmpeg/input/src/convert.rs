/*!
    Conversion utilities between ffmpeg-next types and ffmpeg-types.
*/

use std::time::Duration;

use ffmpeg_types::{MediaKind, Rational};

/**
    Convert ffmpeg_next::Rational to our Rational.
*/
pub fn rational_from_ffmpeg(r: ffmpeg_next::Rational) -> Rational {
    Rational::new(r.numerator(), r.denominator())
}

/**
    Convert an ffmpeg_next media type to our MediaKind.
*/
pub fn media_kind_from_ffmpeg(medium: ffmpeg_next::media::Type) -> MediaKind {
    use ffmpeg_next::media::Type;

    match medium {
        Type::Video => MediaKind::Video,
        Type::Audio => MediaKind::Audio,
        Type::Subtitle => MediaKind::Subtitle,
        Type::Data => MediaKind::Data,
        Type::Attachment => MediaKind::Attachment,
        Type::Unknown => MediaKind::Unknown,
    }
}

/**
    Convert a container duration in AV_TIME_BASE units (microseconds).

    FFmpeg reports unknown durations as AV_NOPTS_VALUE or zero.
*/
pub fn duration_from_micros(duration: i64) -> Option<Duration> {
    (duration > 0).then(|| Duration::from_micros(duration as u64))
}

/**
    Convert a non-positive "unknown" count into None.
*/
pub fn positive(value: i64) -> Option<u64> {
    (value > 0).then_some(value as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_durations_are_none() {
        assert_eq!(duration_from_micros(0), None);
        assert_eq!(duration_from_micros(i64::MIN), None);
        assert_eq!(
            duration_from_micros(1_500_000),
            Some(Duration::from_millis(1500))
        );
    }

    #[test]
    fn rational_conversion() {
        let r = rational_from_ffmpeg(ffmpeg_next::Rational::new(1, 90000));
        assert_eq!(r, Rational::new(1, 90000));
    }

    #[test]
    fn media_kind_conversion() {
        use ffmpeg_next::media::Type;
        assert_eq!(media_kind_from_ffmpeg(Type::Video), MediaKind::Video);
        assert_eq!(media_kind_from_ffmpeg(Type::Attachment), MediaKind::Attachment);
        assert_eq!(positive(-1), None);
        assert_eq!(positive(42), Some(42));
    }
}
