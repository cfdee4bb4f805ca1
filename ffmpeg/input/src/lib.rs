/*!
    Media input sessions for the ffmpeg crates.

    This crate handles the input side of a media pipeline: it sets up the
    FFmpeg libraries once per process, opens files and network streams
    through FFmpeg's demuxers, and hands out [`Session`]s that own the opened
    format context until they are closed.

    ```ignore
    ffmpeg_input::initialize()?;

    let descriptor = InputDescriptor::build(Some("mp4"), "guigu.mp4", true)?;
    let mut session = ffmpeg_input::open(&descriptor)?;

    for packet in session.packets()? {
        println!("{:?}", packet?);
    }
    ```
*/

mod backend;
mod convert;
mod descriptor;
mod interrupt;
mod native;
mod probe;
mod reader;
mod runtime;
mod session;

pub use backend::Ffmpeg;
pub use descriptor::InputDescriptor;
pub use interrupt::Interrupt;
pub use native::{Backend, EncodedInput, NativeString};
pub use reader::PacketReader;
pub use runtime::{Runtime, RuntimeState, initialize, open, runtime};
pub use session::Session;

pub use ffmpeg_types::{Error, MediaInfo, MediaKind, PacketInfo, Result, StreamInfo};
