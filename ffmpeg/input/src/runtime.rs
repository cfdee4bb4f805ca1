/*!
    The process-wide media runtime and the input opener.
*/

use std::sync::OnceLock;

use ffmpeg_types::{Error, Result};
use tracing::{debug, error, info, warn};

use crate::backend::Ffmpeg;
use crate::descriptor::InputDescriptor;
use crate::interrupt::Interrupt;
use crate::native::{Backend, EncodedInput};
use crate::session::Session;

/**
    Lifecycle state of a [`Runtime`].
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuntimeState {
    /// `initialize` has not run yet.
    Uninitialized,
    /// Initialization succeeded; inputs can be opened.
    Ready,
    /// Initialization failed; nothing can be opened for the rest of the process.
    Failed,
}

/**
    Gate around a native backend: set up once, then open inputs.

    The backend's global setup runs at most once, no matter how many times
    or from how many threads [`Runtime::initialize`] is called. Opening is
    refused until setup has succeeded.
*/
pub struct Runtime<B> {
    backend: B,
    setup: OnceLock<Result<()>>,
}

impl<B: Backend> Runtime<B> {
    pub const fn new(backend: B) -> Self {
        Self {
            backend,
            setup: OnceLock::new(),
        }
    }

    /**
        Run the backend's global setup if it has not run yet.

        Every call returns the outcome of the first one.
    */
    pub fn initialize(&self) -> Result<()> {
        self.setup
            .get_or_init(|| match self.backend.setup() {
                Ok(()) => {
                    info!("media runtime initialized");
                    Ok(())
                }
                Err(reason) => {
                    error!(%reason, "media runtime initialization failed");
                    Err(Error::InitializationFailed(reason))
                }
            })
            .clone()
    }

    pub fn state(&self) -> RuntimeState {
        match self.setup.get() {
            None => RuntimeState::Uninitialized,
            Some(Ok(())) => RuntimeState::Ready,
            Some(Err(_)) => RuntimeState::Failed,
        }
    }

    /**
        Open an input.

        The descriptor's fields are encoded for the native call and released
        again before this returns, whether the open succeeded or not. A
        failure always names the source URL.

        The session polls the descriptor's interrupt flag, or a fresh one if
        the descriptor has none.
    */
    pub fn open(&self, descriptor: &InputDescriptor) -> Result<Session<B::Context>> {
        match self.setup.get() {
            None => return Err(Error::NotInitialized),
            Some(Err(e)) => return Err(e.clone()),
            Some(Ok(())) => {}
        }

        // Declared before `encoded` so it outlives any context dropped on failure.
        let interrupt = descriptor.interrupt().cloned().unwrap_or_default();
        let encoded = EncodedInput::encode(descriptor, &interrupt)?;

        debug!(
            url = descriptor.url(),
            format = descriptor.format_hint().unwrap_or("auto"),
            probe = descriptor.probe(),
            "opening input"
        );

        match self.backend.open_input(&encoded) {
            Ok(context) => {
                info!(url = descriptor.url(), "input session opened");
                Ok(Session::new(context, descriptor.url(), interrupt.clone()))
            }
            Err(reason) => {
                warn!(url = descriptor.url(), %reason, "unable to open input");
                Err(Error::open_failed(descriptor.url(), reason))
            }
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

static FFMPEG: Runtime<Ffmpeg> = Runtime::new(Ffmpeg);

/**
    The process-wide FFmpeg runtime.
*/
pub fn runtime() -> &'static Runtime<Ffmpeg> {
    &FFMPEG
}

/**
    Initialize the process-wide FFmpeg runtime.

    Call this once from the entry point before opening anything. Later calls
    are cheap and return the first outcome.
*/
pub fn initialize() -> Result<&'static Runtime<Ffmpeg>> {
    FFMPEG.initialize()?;
    Ok(&FFMPEG)
}

/**
    Open an input on the process-wide FFmpeg runtime.

    # Example

    ```ignore
    ffmpeg_input::initialize()?;
    let descriptor = InputDescriptor::build(Some("mp4"), "guigu.mp4", true)?;
    let mut session = ffmpeg_input::open(&descriptor)?;
    println!("{:?}", session.info()?);
    session.close();
    ```
*/
pub fn open(descriptor: &InputDescriptor) -> Result<Session> {
    FFMPEG.open(descriptor)
}
