use std::collections::{BTreeMap, VecDeque};

pub struct Scheduled<T> {
    pub id: u64,
    pub tick: u64,
    pub task: T,
}

/// Tick-bucketed FIFO of deferred work. Tasks scheduled for the same tick run
/// in the order they were scheduled.
pub struct TickScheduler<T> {
    // map of tick -> FIFO queue of tasks
    by_tick: BTreeMap<u64, VecDeque<Scheduled<T>>>,
    now: u64,
    next_id: u64,
}

impl<T> Default for TickScheduler<T> {
    fn default() -> Self {
        Self {
            by_tick: BTreeMap::new(),
            now: 0,
            next_id: 1,
        }
    }
}

impl<T> TickScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn now(&self) -> u64 {
        self.now
    }

    #[inline]
    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    pub fn schedule_now(&mut self, task: T) -> u64 {
        self.schedule_at(self.now, task)
    }

    /// Past ticks are clamped to the current one so nothing is stranded.
    pub fn schedule_at(&mut self, tick: u64, task: T) -> u64 {
        let tick = tick.max(self.now);
        let id = self.alloc_id();
        self.by_tick
            .entry(tick)
            .or_default()
            .push_back(Scheduled { id, tick, task });
        id
    }

    pub fn schedule_after(&mut self, delta: u64, task: T) -> u64 {
        self.schedule_at(self.now.saturating_add(delta), task)
    }

    /// Next task due at the current tick. Work scheduled for later ticks while
    /// draining is not returned until the clock reaches it.
    pub fn pop_ready(&mut self) -> Option<Scheduled<T>> {
        let q = self.by_tick.get_mut(&self.now)?;
        let task = q.pop_front();
        if q.is_empty() {
            self.by_tick.remove(&self.now);
        }
        task
    }

    pub fn advance_tick(&mut self) {
        if self.by_tick.get(&self.now).is_some_and(|q| q.is_empty()) {
            self.by_tick.remove(&self.now);
        }
        self.now = self.now.wrapping_add(1);
    }

    pub fn len(&self) -> usize {
        self.by_tick.values().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tick.values().all(VecDeque::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_tick_is_fifo() {
        let mut s = TickScheduler::new();
        s.schedule_now("a");
        s.schedule_now("b");
        s.schedule_after(1, "c");
        assert_eq!(s.pop_ready().map(|t| t.task), Some("a"));
        assert_eq!(s.pop_ready().map(|t| t.task), Some("b"));
        assert!(s.pop_ready().is_none());
        s.advance_tick();
        assert_eq!(s.pop_ready().map(|t| t.task), Some("c"));
        assert!(s.is_empty());
    }

    #[test]
    fn work_scheduled_while_draining_waits_a_tick() {
        let mut s = TickScheduler::new();
        s.schedule_now(0u32);
        let mut ran = Vec::new();
        for _ in 0..3 {
            while let Some(t) = s.pop_ready() {
                ran.push((s.now(), t.task));
                s.schedule_after(1, t.task + 1);
            }
            s.advance_tick();
        }
        assert_eq!(ran, vec![(0, 0), (1, 1), (2, 2)]);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn past_ticks_are_clamped_to_now() {
        let mut s = TickScheduler::new();
        s.advance_tick();
        s.advance_tick();
        s.schedule_at(0, ());
        let t = s.pop_ready().unwrap();
        assert_eq!(t.tick, 2);
    }

    #[test]
    fn ids_are_unique() {
        let mut s = TickScheduler::new();
        let a = s.schedule_now(());
        let b = s.schedule_after(4, ());
        assert_ne!(a, b);
    }
}
