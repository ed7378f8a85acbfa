//! The event *object* only: flags and legacy aliases, no dispatch or
//! propagation (those are out of scope per §1/§9).

use crate::node::NodeId;

/// An event record: `type`/`bubbles`/`cancelable`, optional target/
/// currentTarget, and the flag set legacy code reads through aliases like
/// `cancelBubble`/`returnValue`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub event_type: String,
    pub bubbles: bool,
    pub cancelable: bool,
    pub target: Option<NodeId>,
    pub current_target: Option<NodeId>,
    stop_propagation: bool,
    stop_immediate_propagation: bool,
    canceled: bool,
    in_passive_listener: bool,
    composed: bool,
    initialized: bool,
    dispatch: bool,
    is_trusted: bool,
}

impl Event {
    pub fn new(event_type: impl Into<String>, bubbles: bool, cancelable: bool) -> Self {
        Event {
            event_type: event_type.into(),
            bubbles,
            cancelable,
            target: None,
            current_target: None,
            stop_propagation: false,
            stop_immediate_propagation: false,
            canceled: false,
            in_passive_listener: false,
            composed: false,
            initialized: true,
            dispatch: false,
            is_trusted: false,
        }
    }

    pub fn stop_propagation(&mut self) {
        self.stop_propagation = true;
    }

    pub fn stop_immediate_propagation(&mut self) {
        self.stop_propagation = true;
        self.stop_immediate_propagation = true;
    }

    /// Sets `canceled` iff the event is cancelable and no passive listener
    /// is currently running.
    pub fn prevent_default(&mut self) {
        if self.cancelable && !self.in_passive_listener {
            self.canceled = true;
        }
    }

    pub fn src_element(&self) -> Option<NodeId> {
        self.target
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.stop_propagation
    }

    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.stop_immediate_propagation
    }

    pub fn is_canceled(&self) -> bool {
        self.canceled
    }

    pub fn is_trusted(&self) -> bool {
        self.is_trusted
    }

    /// Legacy alias for `stop_propagation`'s flag.
    pub fn get_cancel_bubble(&self) -> bool {
        self.stop_propagation
    }

    /// Legacy alias: sets stop-propagation when `true`, never clears it.
    pub fn set_cancel_bubble(&mut self, b: bool) {
        if b {
            self.stop_propagation = true;
        }
    }

    /// Legacy alias for "not canceled".
    pub fn get_return_value(&self) -> bool {
        !self.canceled
    }

    /// Legacy alias: `false` cancels (via `preventDefault`'s rules), `true`
    /// never un-cancels.
    pub fn set_return_value(&mut self, b: bool) {
        if !b {
            self.prevent_default();
        }
    }

    /// `initEvent(type, bubbles, cancelable)`: a no-op once dispatch has
    /// begun; otherwise resets the cancellation/trust/target state and
    /// re-initializes the three parameters.
    pub fn init_event(&mut self, event_type: impl Into<String>, bubbles: bool, cancelable: bool) {
        if self.dispatch {
            return;
        }
        self.stop_propagation = false;
        self.stop_immediate_propagation = false;
        self.canceled = false;
        self.is_trusted = false;
        self.target = None;
        self.event_type = event_type.into();
        self.bubbles = bubbles;
        self.cancelable = cancelable;
        self.initialized = true;
    }

    pub(crate) fn set_dispatch(&mut self, dispatch: bool) {
        self.dispatch = dispatch;
    }

    pub(crate) fn set_in_passive_listener(&mut self, in_passive: bool) {
        self.in_passive_listener = in_passive;
    }

    pub(crate) fn set_composed(&mut self, composed: bool) {
        self.composed = composed;
    }

    pub fn is_composed(&self) -> bool {
        self.composed
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}
