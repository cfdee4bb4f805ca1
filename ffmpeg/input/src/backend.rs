/*!
    FFmpeg implementation of the native backend.
*/

use std::ffi::{c_int, c_void};
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};

use ffmpeg_next::format::context::Input as InputContext;
use ffmpeg_next::util::log;
use ffmpeg_next::{Dictionary, ffi};
use tracing::{debug, warn};

use crate::native::{Backend, EncodedInput, NativeString};

/**
    The FFmpeg libraries (libavformat, libavdevice, libavcodec).
*/
#[derive(Clone, Copy, Debug, Default)]
pub struct Ffmpeg;

impl Backend for Ffmpeg {
    type Context = InputContext;

    fn setup(&self) -> Result<(), String> {
        ffmpeg_next::init().map_err(|e| e.to_string())?;
        ffmpeg_next::format::network::init();
        log::set_level(log::Level::Warning);
        Ok(())
    }

    fn open_input(&self, input: &EncodedInput<'_>) -> Result<InputContext, String> {
        let format = input
            .format
            .as_ref()
            .map_or(ptr::null(), find_input_format);

        let mut options = Dictionary::new();
        for (key, value) in input.options {
            options.set(key, value);
        }

        // SAFETY: avformat_alloc_context returns an empty context or null.
        let mut raw = unsafe { ffi::avformat_alloc_context() };
        if raw.is_null() {
            return Err("unable to allocate format context".into());
        }

        // SAFETY: `raw` is a freshly allocated context we exclusively own. The
        // interrupt flag behind `opaque` is kept alive by the runtime and then
        // the session until the context is closed. On failure
        // avformat_open_input frees the context and nulls `raw`. The url and
        // format pointers outlive the call. The options dictionary is handed
        // over and taken back immediately afterwards.
        let context = unsafe {
            (*raw).interrupt_callback = ffi::AVIOInterruptCB {
                callback: Some(interrupt_requested),
                opaque: input.interrupt.as_opaque(),
            };

            let mut opts = options.disown();
            let ret = ffi::avformat_open_input(&mut raw, input.url.as_ptr(), format, &mut opts);
            let unused = Dictionary::own(opts);

            if ret < 0 {
                return Err(ffmpeg_next::Error::from(ret).to_string());
            }
            for (key, _) in unused.iter() {
                warn!(option = key, "option not recognised by the demuxer");
            }

            InputContext::wrap(raw)
        };

        if input.probe {
            // SAFETY: `context` owns a valid, opened format context. If the
            // analysis fails, dropping `context` closes it.
            let ret = unsafe { ffi::avformat_find_stream_info(raw, ptr::null_mut()) };
            if ret < 0 {
                return Err(format!(
                    "stream analysis failed: {}",
                    ffmpeg_next::Error::from(ret)
                ));
            }
        }

        debug!(
            url = input.url.as_str(),
            format = context.format().name(),
            streams = context.streams().count(),
            probed = input.probe,
            "input opened"
        );

        if input.dump {
            ffmpeg_next::format::context::input::dump(&context, 0, Some(input.url.as_str()));
        }

        Ok(context)
    }
}

/**
    Polled by FFmpeg while it blocks on I/O; non-zero aborts the operation.
*/
unsafe extern "C" fn interrupt_requested(opaque: *mut c_void) -> c_int {
    // SAFETY: `opaque` is `Interrupt::as_opaque`, alive as long as the context.
    let flag = unsafe { &*opaque.cast::<AtomicBool>() };
    c_int::from(flag.load(Ordering::SeqCst))
}

/**
    Look up a demuxer by name. Unknown names fall back to auto-detection.
*/
fn find_input_format(name: &NativeString) -> *const ffi::AVInputFormat {
    // SAFETY: `name` is a valid NUL-terminated string for the whole call.
    let format = unsafe { ffi::av_find_input_format(name.as_ptr()) };
    if format.is_null() {
        warn!(
            format = name.as_str(),
            "unknown input format, falling back to auto-detection"
        );
    }
    format
}
