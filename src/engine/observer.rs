use crate::types::GameSnapshot;

/// Receives a read-only snapshot after every state-changing engine call.
/// Observers have no engine handle, so they cannot re-enter it.
pub trait Observer {
    fn update(&mut self, snapshot: &GameSnapshot);
}

impl<F> Observer for F
where
    F: FnMut(&GameSnapshot),
{
    fn update(&mut self, snapshot: &GameSnapshot) {
        self(snapshot)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

#[derive(Default)]
pub(super) struct ObserverList {
    next_id: u64,
    entries: Vec<(ObserverId, Box<dyn Observer>)>,
}

impl ObserverList {
    pub(super) fn register(&mut self, observer: Box<dyn Observer>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, observer));
        id
    }

    pub(super) fn remove(&mut self, id: ObserverId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(super) fn notify(&mut self, snapshot: &GameSnapshot) {
        for (_, observer) in &mut self.entries {
            observer.update(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::types::GameStatus;

    fn snapshot(score: i32) -> GameSnapshot {
        GameSnapshot {
            status: GameStatus::Ready,
            score,
            num_lives: 3,
            level_no: 0,
            num_levels: 1,
            tick: 0,
            ghost_mode: None,
            pellets_remaining: 1,
        }
    }

    #[test]
    fn notifies_in_registration_order_until_removed() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut list = ObserverList::default();

        let first = Rc::clone(&seen);
        let first_id = list.register(Box::new(move |s: &GameSnapshot| {
            first.borrow_mut().push(("first", s.score))
        }));
        let second = Rc::clone(&seen);
        list.register(Box::new(move |s: &GameSnapshot| {
            second.borrow_mut().push(("second", s.score))
        }));

        list.notify(&snapshot(100));
        assert!(list.remove(first_id));
        assert!(!list.remove(first_id));
        list.notify(&snapshot(200));

        assert_eq!(
            *seen.borrow(),
            vec![("first", 100), ("second", 100), ("second", 200)]
        );
        assert_eq!(list.entries.len(), 1);
    }
}
