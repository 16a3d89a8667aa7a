/// A UI-level signal that drives the session lifecycle.
///
/// Produced by whatever front end hosts the session (buttons, key presses);
/// the session consumes these, never raw input events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Begin the session: NotStarted -> Running.
    Start,
    /// Discard the whole session and build a fresh one.
    Restart,
    /// No-op (used for input mapping that hasn't been bound yet).
    Noop,
}

impl Action {
    /// Map a UI control name to an action.
    pub fn from_control(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "start" | "start-button" => Self::Start,
            "restart" | "restart-button" => Self::Restart,
            _ => Self::Noop,
        }
    }
}
