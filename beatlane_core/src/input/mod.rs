pub mod dispatcher;
pub mod events;
pub mod keymap;

use self::events::KeyEvent;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Key events waiting for the next tick.
pub struct InputQueue {
    sender: Sender<KeyEvent>,
    receiver: Receiver<KeyEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Pushes an event into the queue.
    /// Can be called from the host's input thread through a cloned sender.
    pub fn push(&self, event: KeyEvent) {
        let _ = self.sender.send(event);
    }

    /// Non-blocking. Returns None if the queue is empty.
    pub fn pop(&self) -> Option<KeyEvent> {
        self.receiver.try_recv().ok()
    }

    /// Everything queued so far, oldest first.
    pub fn drain(&self) -> Vec<KeyEvent> {
        self.receiver.try_iter().collect()
    }

    pub fn sender(&self) -> Sender<KeyEvent> {
        self.sender.clone()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
