use std::sync::{Arc, Mutex};

use prepwatch::notifier::Notifier;

/// One `push` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pushed {
    pub title: String,
    pub body: String,
    pub icon: String,
}

/// Notifier that remembers every push.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    pushed: Arc<Mutex<Vec<Pushed>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pushed(&self) -> Vec<Pushed> {
        self.pushed.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn push(&self, title: &str, body: &str, icon: &str) {
        self.pushed.lock().unwrap().push(Pushed {
            title: title.to_string(),
            body: body.to_string(),
            icon: icon.to_string(),
        });
    }
}
