use std::fmt;

use log::{Level, Log, Metadata, Record};

const TARGET: &str = "lambda_rewrite";

/// Optional diagnostic sink handed to the parser and the engine.
///
/// Nothing is read from a global context: with no sink the core stays
/// silent. A binary that has installed a logger can pass [`log::logger()`].
#[derive(Clone, Copy, Default)]
pub struct Diagnostics<'a> {
    sink: Option<&'a dyn Log>,
}

impl<'a> Diagnostics<'a> {
    #[must_use]
    pub const fn silent() -> Self {
        Self { sink: None }
    }

    #[must_use]
    pub const fn new(sink: &'a dyn Log) -> Self {
        Self { sink: Some(sink) }
    }

    /// Whether a record at `level` would reach the sink. Lets callers skip
    /// building expensive messages.
    #[must_use]
    pub fn enabled(&self, level: Level) -> bool {
        let Some(sink) = self.sink else {
            return false;
        };
        let metadata = Metadata::builder().level(level).target(TARGET).build();
        sink.enabled(&metadata)
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Debug, args);
    }

    pub fn trace(&self, args: fmt::Arguments<'_>) {
        self.emit(Level::Trace, args);
    }

    fn emit(&self, level: Level, args: fmt::Arguments<'_>) {
        let Some(sink) = self.sink else {
            return;
        };
        let record = Record::builder()
            .args(args)
            .level(level)
            .target(TARGET)
            .module_path_static(Some(module_path!()))
            .build();
        if sink.enabled(record.metadata()) {
            sink.log(&record);
        }
    }
}

impl fmt::Debug for Diagnostics<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics")
            .field("attached", &self.sink.is_some())
            .finish()
    }
}
