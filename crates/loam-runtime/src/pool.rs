use loam_chunk::Step;

#[derive(Default, Debug, Clone, Copy)]
pub struct PoolStats {
    pub available: usize,
    pub active: usize,
    pub pending_warm: usize,
}

/// Reusable-instance pool with a LIFO free list.
///
/// `acquire` never fails; when the free list is empty a fresh instance is
/// constructed on the spot. `warm_up` only queues work — each call adds its
/// full count again, so callers decide when pre-allocation is worth it and
/// how fast it proceeds via `step_warm_up`.
pub struct InstancePool<T> {
    make: Box<dyn FnMut() -> T>,
    free: Vec<T>,
    pending_warm: usize,
    active: usize,
}

impl<T> InstancePool<T> {
    pub fn new(make: impl FnMut() -> T + 'static) -> Self {
        Self {
            make: Box::new(make),
            free: Vec::new(),
            pending_warm: 0,
            active: 0,
        }
    }

    /// Queues `n` more instances for construction by `step_warm_up`.
    pub fn warm_up(&mut self, n: usize) {
        self.pending_warm += n;
    }

    /// Constructs up to `budget` queued instances into the free list.
    pub fn step_warm_up(&mut self, budget: usize) -> Step {
        let n = self.pending_warm.min(budget);
        for _ in 0..n {
            let instance = (self.make)();
            self.free.push(instance);
        }
        self.pending_warm -= n;
        if self.pending_warm == 0 {
            Step::Done
        } else {
            Step::Yielded
        }
    }

    /// Pops a recycled instance, or constructs one when the list is empty.
    pub fn acquire(&mut self) -> T {
        self.active += 1;
        match self.free.pop() {
            Some(t) => t,
            None => (self.make)(),
        }
    }

    /// Returns an instance to the free list.
    pub fn release(&mut self, t: T) {
        self.active = self.active.saturating_sub(1);
        self.free.push(t);
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            available: self.free.len(),
            active: self.active,
            pending_warm: self.pending_warm,
        }
    }
}
