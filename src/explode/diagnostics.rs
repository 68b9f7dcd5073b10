use std::fmt;

/// Routes progress messages to the `log` facade and the subscribed debug hook.
#[derive(Default)]
pub(crate) struct Diagnostics {
    sink: Option<Box<dyn FnMut(&str)>>,
    /// Per-object detail, enabled by `ExplodeOptions::debug`
    pub(crate) verbose: bool,
}

impl Diagnostics {
    pub(crate) fn subscribe(&mut self, sink: Box<dyn FnMut(&str)>) {
        self.sink = Some(sink);
    }

    pub(crate) fn debug(&mut self, args: fmt::Arguments<'_>) {
        let message = args.to_string();
        log::debug!("{message}");
        self.emit(&message);
    }

    /// Degraded but recovered conditions.
    pub(crate) fn warn(&mut self, args: fmt::Arguments<'_>) {
        let message = args.to_string();
        log::warn!("{message}");
        self.emit(&message);
    }

    pub(crate) fn detail(&mut self, args: fmt::Arguments<'_>) {
        if !self.verbose {
            return;
        }
        let message = args.to_string();
        log::trace!("{message}");
        self.emit(&message);
    }

    fn emit(&mut self, message: &str) {
        if let Some(sink) = self.sink.as_mut() {
            sink(message);
        }
    }
}
