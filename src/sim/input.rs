//! Buffered control input
//!
//! Device listeners only push events; the frame loop drains the queue once
//! per frame and hands the batch to `Simulation::update`.

use std::collections::VecDeque;

use glam::Vec2;

/// Logical controls (keyboard arrows/WASD, space, P)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Left,
    Right,
    Up,
    Down,
    /// Space / tap
    Action,
    Pause,
}

impl Control {
    /// Map a DOM-style key name
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "arrowleft" | "a" => Some(Control::Left),
            "arrowright" | "d" => Some(Control::Right),
            "arrowup" | "w" => Some(Control::Up),
            "arrowdown" | "s" => Some(Control::Down),
            " " | "space" | "enter" => Some(Control::Action),
            "p" | "escape" => Some(Control::Pause),
            _ => None,
        }
    }
}

/// One control event, in canvas coordinates for pointers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    Press(Control),
    Release(Control),
    PointerDown(Vec2),
    PointerMove(Vec2),
    PointerUp,
}

/// FIFO of events waiting for the next frame
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    events: VecDeque<ControlEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ControlEvent) {
        self.events.push_back(event);
    }

    /// Take everything queued so far, oldest first
    pub fn drain(&mut self) -> Vec<ControlEvent> {
        self.events.drain(..).collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_preserves_order() {
        let mut queue = InputQueue::new();
        queue.push(ControlEvent::Press(Control::Left));
        queue.push(ControlEvent::Release(Control::Left));
        queue.push(ControlEvent::Press(Control::Action));
        let batch = queue.drain();
        assert_eq!(
            batch,
            vec![
                ControlEvent::Press(Control::Left),
                ControlEvent::Release(Control::Left),
                ControlEvent::Press(Control::Action),
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Control::from_key("ArrowUp"), Some(Control::Up));
        assert_eq!(Control::from_key("D"), Some(Control::Right));
        assert_eq!(Control::from_key(" "), Some(Control::Action));
        assert_eq!(Control::from_key("P"), Some(Control::Pause));
        assert_eq!(Control::from_key("x"), None);
    }
}
