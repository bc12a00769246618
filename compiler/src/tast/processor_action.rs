//! Control signal returned by traversal callbacks.

use std::fmt;

/// Tells a traversal driver whether to keep going.
///
/// `Stop` must unwind through every enclosing loop and recursive call at
/// once. `Unhandled` means "nothing more to try at this level"; callers that
/// only ask [`ProcessorAction::is_stop`] treat it like `Continue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessorAction {
    Continue,
    Stop,
    Unhandled,
}

impl ProcessorAction {
    pub const fn is_stop(self) -> bool {
        matches!(self, ProcessorAction::Stop)
    }

    pub const fn is_next(self) -> bool {
        !self.is_stop()
    }

    /// Combine the results of two sibling enumerations.
    ///
    /// `Continue` on either side wins; otherwise the left value is kept.
    pub const fn merge(self, other: ProcessorAction) -> ProcessorAction {
        match (self, other) {
            (ProcessorAction::Continue, _) | (_, ProcessorAction::Continue) => {
                ProcessorAction::Continue
            }
            _ => self,
        }
    }
}

impl fmt::Display for ProcessorAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessorAction::Continue => "continue",
            ProcessorAction::Stop => "stop",
            ProcessorAction::Unhandled => "unhandled",
        };
        write!(f, "{}", name)
    }
}
