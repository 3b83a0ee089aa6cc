use super::{Dispatcher, Intent};
use std::cell::RefCell;

/// Records every intent instead of sending it anywhere.
#[derive(Debug, Default)]
pub struct RecordingDispatcher {
    intents: RefCell<Vec<Intent>>,
}

impl RecordingDispatcher {
    pub fn intents(&self) -> Vec<Intent> {
        self.intents.borrow().clone()
    }

    pub fn take(&self) -> Vec<Intent> {
        self.intents.take()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.borrow().is_empty()
    }
}

impl Dispatcher for RecordingDispatcher {
    fn dispatch(&self, intent: Intent) {
        self.intents.borrow_mut().push(intent);
    }
}
