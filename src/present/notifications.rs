use std::collections::VecDeque;

use crate::poll::ChangeEvent;

/// Pending "new order" notifications, newest first.
#[derive(Debug, Default, Clone)]
pub struct NotificationQueue {
    items: VecDeque<ChangeEvent>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Each event goes to the front, so a batch ends up reversed.
    pub fn push_all(&mut self, events: impl IntoIterator<Item = ChangeEvent>) {
        for ev in events {
            self.items.push_front(ev);
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChangeEvent> {
        self.items.iter()
    }

    /// Remove and return the notification at `position` (the "click to view" action).
    pub fn dismiss(&mut self, position: usize) -> Option<ChangeEvent> {
        self.items.remove(position)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::Record;
    use chrono::Local;

    fn event(index: usize, name: &str) -> ChangeEvent {
        ChangeEvent {
            index,
            record: Record::from([("Name", name)]),
            detected_at: Local::now(),
        }
    }

    #[test]
    fn newest_first_and_dismiss_by_position() {
        let mut q = NotificationQueue::new();
        q.push_all(vec![event(0, "a"), event(1, "b")]);
        q.push_all(vec![event(0, "c")]);

        let names: Vec<_> = q.iter().filter_map(|e| e.record.get("Name")).collect();
        assert_eq!(names, vec!["c", "b", "a"]);

        let opened = q.dismiss(1).unwrap();
        assert_eq!(opened.record.get("Name"), Some("b"));
        assert_eq!(opened.index, 1);
        assert_eq!(q.len(), 2);
        assert!(q.dismiss(5).is_none());
    }

    #[test]
    fn clear_empties_queue() {
        let mut q = NotificationQueue::new();
        q.push_all(vec![event(0, "a")]);
        q.clear();
        assert!(q.is_empty());
        assert!(q.dismiss(0).is_none());
    }
}
