//=========================================================================
// Debug Sink
//=========================================================================
//
// Fire-and-forget diagnostic channel for host transitions.
//
// Emissions happen on window/lifecycle transitions and one-time startup
// diagnostics, never per pixel.
//
//=========================================================================

use log::debug;

/// Receives short diagnostic strings.
pub trait DebugSink {
    fn emit(&self, text: &str);
}

/// Production sink: forwards every emission to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DebugSink for LogSink {
    fn emit(&self, text: &str) {
        debug!(target: "platform::debug", "{}", text);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::DebugSink;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every emission for later assertions.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingSink {
        lines: Rc<RefCell<Vec<String>>>,
    }

    impl RecordingSink {
        pub(crate) fn lines(&self) -> Vec<String> {
            self.lines.borrow().clone()
        }

        pub(crate) fn count(&self, text: &str) -> usize {
            self.lines.borrow().iter().filter(|line| line.as_str() == text).count()
        }
    }

    impl DebugSink for RecordingSink {
        fn emit(&self, text: &str) {
            self.lines.borrow_mut().push(text.to_string());
        }
    }
}
