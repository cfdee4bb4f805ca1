/*!
    Input descriptors: the caller's parameters for opening a session.
*/

use ffmpeg_types::{Error, Result};

use crate::interrupt::Interrupt;

/**
    Describes an input to open.

    Built with [`InputDescriptor::build`], which validates the fields locally.
    A descriptor owns no native resources; the runtime encodes it for the
    native layer only for the duration of an open call.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputDescriptor {
    format_hint: Option<String>,
    url: String,
    probe: bool,
    dump: bool,
    options: Vec<(String, String)>,
    interrupt: Option<Interrupt>,
}

impl InputDescriptor {
    /**
        Build a descriptor from user supplied parameters.

        An empty (or absent) format hint means auto-detection. The URL must
        be non-empty. Fields containing NUL bytes are rejected because they
        can never be handed to the native layer.

        # Example

        ```ignore
        let descriptor = InputDescriptor::build(Some("mp4"), "guigu.mp4", true)?;
        ```
    */
    pub fn build(format_hint: Option<&str>, url: &str, probe: bool) -> Result<Self> {
        if url.trim().is_empty() {
            return Err(Error::invalid_descriptor("source url is empty"));
        }
        check_nul("source url", url)?;

        let format_hint = match format_hint.map(str::trim) {
            Some(hint) if !hint.is_empty() => {
                check_nul("format hint", hint)?;
                Some(hint.to_string())
            }
            _ => None,
        };

        Ok(Self {
            format_hint,
            url: url.to_string(),
            probe,
            dump: false,
            options: Vec::new(),
            interrupt: None,
        })
    }

    /**
        Log the container layout once the input is open.
    */
    pub fn with_dump(mut self, dump: bool) -> Self {
        self.dump = dump;
        self
    }

    /**
        Add a demuxer or protocol option (e.g. `rw_timeout`, `rtsp_transport`).

        Options are passed through to the native open call unchanged.
        Options the demuxer does not recognise are reported, not rejected.
    */
    pub fn with_option(mut self, key: &str, value: &str) -> Result<Self> {
        if key.is_empty() {
            return Err(Error::invalid_descriptor("option key is empty"));
        }
        check_nul("option key", key)?;
        check_nul("option value", value)?;
        self.options.push((key.to_string(), value.to_string()));
        Ok(self)
    }

    /**
        Attach the interrupt flag the opened session will poll.

        Raising it also aborts the open call itself if it is still waiting on
        the source. Without one, each session gets a fresh flag, reachable
        through [`Session::interrupt`](crate::Session::interrupt).
    */
    pub fn with_interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = Some(interrupt);
        self
    }

    pub fn format_hint(&self) -> Option<&str> {
        self.format_hint.as_deref()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn probe(&self) -> bool {
        self.probe
    }

    pub fn dump(&self) -> bool {
        self.dump
    }

    pub fn options(&self) -> &[(String, String)] {
        &self.options
    }

    pub fn interrupt(&self) -> Option<&Interrupt> {
        self.interrupt.as_ref()
    }
}

fn check_nul(field: &str, value: &str) -> Result<()> {
    if value.contains('\0') {
        return Err(Error::invalid_descriptor(format!(
            "{field} contains a NUL byte"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_rejects_empty_url() {
        for url in ["", "   ", "\t\n"] {
            let err = InputDescriptor::build(Some("mp4"), url, true).unwrap_err();
            assert!(matches!(err, Error::InvalidDescriptor(_)), "{url:?}: {err}");
        }
    }

    #[test]
    fn build_rejects_nul_bytes() {
        assert!(InputDescriptor::build(None, "a\0b.mp4", true).is_err());
        assert!(InputDescriptor::build(Some("mp\04"), "a.mp4", true).is_err());
    }

    #[test]
    fn empty_hint_means_auto_detect() {
        let descriptor = InputDescriptor::build(Some(""), "guigu.mp4", false).unwrap();
        assert_eq!(descriptor.format_hint(), None);
        assert!(!descriptor.probe());

        let descriptor = InputDescriptor::build(None, "guigu.mp4", true).unwrap();
        assert_eq!(descriptor.format_hint(), None);
    }

    #[test]
    fn build_keeps_fields() {
        let descriptor = InputDescriptor::build(Some("mp4"), "guigu.mp4", true)
            .unwrap()
            .with_dump(true);
        assert_eq!(descriptor.format_hint(), Some("mp4"));
        assert_eq!(descriptor.url(), "guigu.mp4");
        assert!(descriptor.probe());
        assert!(descriptor.dump());
        assert!(descriptor.options().is_empty());
        assert!(descriptor.interrupt().is_none());
    }

    #[test]
    fn interrupt_is_shared_with_the_caller() {
        let interrupt = Interrupt::new();
        let descriptor = InputDescriptor::build(None, "rtsp://camera/stream", false)
            .unwrap()
            .with_interrupt(interrupt.clone());

        interrupt.interrupt();
        assert!(descriptor.interrupt().unwrap().is_interrupted());
    }

    #[test]
    fn options_are_validated() {
        let descriptor = InputDescriptor::build(None, "rtsp://camera/stream", true)
            .unwrap()
            .with_option("rtsp_transport", "tcp")
            .unwrap();
        assert_eq!(
            descriptor.options(),
            &[("rtsp_transport".to_string(), "tcp".to_string())]
        );

        assert!(descriptor.clone().with_option("", "x").is_err());
        assert!(descriptor.with_option("timeout", "5\0").is_err());
    }
}
