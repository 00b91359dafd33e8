//=========================================================================
// Event Collector
//=========================================================================
//
// Frame-side end of the key event channel, with bounded draining.
//
// Architecture:
//   WindowHost ──Sender<KeyEvent>──> collect_frame() → keys() → FrameInput
//
// Bounded draining keeps a flood of key messages from stalling a frame;
// anything left over is picked up next frame. Never sleeps.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use crate::core::input::KeyEvent;

//=== EventCollector ======================================================

/// Collects the key edges forwarded by the window host since last frame.
pub struct EventCollector {
    receiver: Receiver<KeyEvent>,
    keys: Vec<KeyEvent>,
}

impl EventCollector {
    pub const MAX_EVENTS_PER_FRAME: usize = 100;

    pub fn new(receiver: Receiver<KeyEvent>) -> Self {
        Self {
            receiver,
            keys: Vec::with_capacity(16),
        }
    }

    /// Replaces the previous frame's keys with whatever is queued now.
    pub fn collect_frame(&mut self) -> &[KeyEvent] {
        self.keys.clear();

        while self.keys.len() < Self::MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(event) => self.keys.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        if self.keys.len() >= Self::MAX_EVENTS_PER_FRAME {
            warn!(
                target: "platform::input",
                "Key event backlog: drained {} events this frame",
                self.keys.len()
            );
        }

        &self.keys
    }

    /// Keys collected by the last `collect_frame()`.
    pub fn keys(&self) -> &[KeyEvent] {
        &self.keys
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::KeyCode;
    use crossbeam_channel::unbounded;

    fn press(key: KeyCode) -> KeyEvent {
        KeyEvent { key, was_down: false, is_down: true }
    }

    #[test]
    fn collect_handles_empty_queue() {
        let (_tx, rx) = unbounded::<KeyEvent>();
        let mut collector = EventCollector::new(rx);

        assert!(collector.collect_frame().is_empty());
    }

    #[test]
    fn collect_preserves_order() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(press(KeyCode::KeyW)).unwrap();
        tx.send(press(KeyCode::KeyA)).unwrap();

        let keys: Vec<KeyCode> = collector.collect_frame().iter().map(|e| e.key).collect();
        assert_eq!(keys, vec![KeyCode::KeyW, KeyCode::KeyA]);
    }

    #[test]
    fn collect_clears_previous_frame() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(press(KeyCode::Space)).unwrap();
        collector.collect_frame();
        assert_eq!(collector.keys().len(), 1);

        collector.collect_frame();
        assert!(collector.keys().is_empty());
    }

    #[test]
    fn collect_is_bounded_per_frame() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        for _ in 0..EventCollector::MAX_EVENTS_PER_FRAME + 5 {
            tx.send(press(KeyCode::KeyS)).unwrap();
        }

        assert_eq!(collector.collect_frame().len(), EventCollector::MAX_EVENTS_PER_FRAME);
        assert_eq!(collector.collect_frame().len(), 5, "Backlog carried to next frame");
    }

    #[test]
    fn collect_tolerates_disconnect() {
        let (tx, rx) = unbounded::<KeyEvent>();
        let mut collector = EventCollector::new(rx);

        drop(tx);

        assert!(collector.collect_frame().is_empty());
    }
}
