/*!
    The boundary to the native demuxing library.

    Everything the native layer needs from a descriptor is encoded into
    [`NativeString`] buffers held by an [`EncodedInput`]. The buffers are
    released when the `EncodedInput` goes out of scope, whichever way the
    open call exits.
*/

use std::ffi::{CString, c_char};

use ffmpeg_types::{Error, Result};

use crate::descriptor::InputDescriptor;
use crate::interrupt::Interrupt;

#[cfg(test)]
thread_local! {
    static ALLOCATED: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
    static RELEASED: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/**
    An owned, NUL-terminated buffer handed to the native layer.

    The native side only borrows the pointer for the duration of a call.
*/
pub struct NativeString {
    inner: CString,
}

impl NativeString {
    pub fn new(value: &str) -> Result<Self> {
        let inner = CString::new(value)
            .map_err(|_| Error::invalid_descriptor(format!("{value:?} contains a NUL byte")))?;

        #[cfg(test)]
        ALLOCATED.with(|n| n.set(n.get() + 1));

        Ok(Self { inner })
    }

    pub fn as_ptr(&self) -> *const c_char {
        self.inner.as_ptr()
    }

    pub fn as_str(&self) -> &str {
        // Built from a &str, so always valid UTF-8.
        self.inner.to_str().unwrap_or_default()
    }
}

impl Drop for NativeString {
    fn drop(&mut self) {
        #[cfg(test)]
        RELEASED.with(|n| n.set(n.get() + 1));
    }
}

impl std::fmt::Debug for NativeString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("NativeString").field(&self.inner).finish()
    }
}

/**
    Allocation and release counts for native strings on the current thread.
*/
#[cfg(test)]
pub(crate) fn buffer_counts() -> (usize, usize) {
    (ALLOCATED.with(|n| n.get()), RELEASED.with(|n| n.get()))
}

/**
    A descriptor encoded for one native open call.
*/
#[derive(Debug)]
pub struct EncodedInput<'a> {
    pub format: Option<NativeString>,
    pub url: NativeString,
    pub options: &'a [(String, String)],
    pub probe: bool,
    pub dump: bool,
    pub interrupt: &'a Interrupt,
}

impl<'a> EncodedInput<'a> {
    pub fn encode(descriptor: &'a InputDescriptor, interrupt: &'a Interrupt) -> Result<Self> {
        let format = descriptor.format_hint().map(NativeString::new).transpose()?;
        let url = NativeString::new(descriptor.url())?;

        Ok(Self {
            format,
            url,
            options: descriptor.options(),
            probe: descriptor.probe(),
            dump: descriptor.dump(),
            interrupt,
        })
    }
}

/**
    The native demuxing library, as seen by the runtime.

    `setup` runs at most once per runtime. `open_input` returns the native
    context on success; dropping the context releases it. The context may
    poll `input.interrupt` for as long as it lives; the runtime keeps the
    flag alive until the context is dropped. Failures are
    reported as a human readable reason, which the runtime attaches to the
    source URL.
*/
pub trait Backend {
    type Context;

    fn setup(&self) -> std::result::Result<(), String>;

    fn open_input(&self, input: &EncodedInput<'_>) -> std::result::Result<Self::Context, String>;
}
