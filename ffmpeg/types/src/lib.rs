/*!
    Shared types for the ffmpeg input crates.

    This crate defines the vocabulary that crosses crate boundaries: the error
    taxonomy of an input session and the plain-data descriptions of what a
    session contains. It has no dependency on FFmpeg, so consumers can depend
    on it without pulling in FFmpeg bindings.
*/

mod error;
mod rational;
mod stream;

pub use error::{Error, Result};
pub use rational::Rational;
pub use stream::{MediaInfo, MediaKind, PacketInfo, StreamInfo};
