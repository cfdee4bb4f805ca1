/*!
    Cancellation of blocking native I/O.
*/

use std::ffi::c_void;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/**
    A flag that aborts blocking I/O on the session it is attached to.

    The native layer polls the flag while it waits for data, so raising it
    makes a stalled open or read return with [`Error::Interrupted`]
    (or an open failure) instead of blocking until the source delivers.
    Clones share the same flag. Once raised it stays raised.

    [`Error::Interrupted`]: ffmpeg_types::Error::Interrupted
*/
#[derive(Clone, Debug, Default)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Abort any blocking I/O on the attached session, now and from now on.
    */
    pub fn interrupt(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_interrupted(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /**
        Pointer to the shared flag, for the native callback.

        Valid for as long as any clone of this handle is alive.
    */
    pub(crate) fn as_opaque(&self) -> *mut c_void {
        Arc::as_ptr(&self.flag).cast_mut().cast()
    }
}

impl PartialEq for Interrupt {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.flag, &other.flag)
    }
}

impl Eq for Interrupt {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let interrupt = Interrupt::new();
        let other = interrupt.clone();
        assert_eq!(interrupt, other);
        assert_ne!(interrupt, Interrupt::new());

        assert!(!interrupt.is_interrupted());
        other.interrupt();
        assert!(interrupt.is_interrupted());
        assert_eq!(interrupt.as_opaque(), other.as_opaque());
    }
}
