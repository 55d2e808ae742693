// src/model/queues.rs

use std::collections::VecDeque;

/// Fixed-length pipeline: whatever is pushed today pops out `delay` steps later.
#[derive(Debug, Clone)]
pub struct TimeDelayQueue {
    buffer: VecDeque<f64>,
}

impl TimeDelayQueue {
    /// A delay below one step is treated as one step.
    pub fn new(delay: usize) -> Self {
        // Pre-fill with empty slots so the first real arrival waits the full delay.
        let buffer = std::iter::repeat(0.0).take(delay.max(1)).collect();
        Self { buffer }
    }

    /// Pops today's arrival. Call at the START of a step.
    pub fn pop_arrival(&mut self) -> f64 {
        self.buffer.pop_front().unwrap_or(0.0)
    }

    /// Pushes a departure into the pipe. Call at the END of a step.
    pub fn push_departure(&mut self, quantity: f64) {
        self.buffer.push_back(quantity);
    }

    /// Total quantity still travelling through the pipe.
    pub fn in_transit(&self) -> f64 {
        self.buffer.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrival_after_delay() {
        let mut q = TimeDelayQueue::new(3);
        assert_eq!(q.pop_arrival(), 0.0);
        q.push_departure(40.0);
        assert_eq!(q.in_transit(), 40.0);
        for _ in 0..2 {
            assert_eq!(q.pop_arrival(), 0.0);
            q.push_departure(0.0);
        }
        assert_eq!(q.pop_arrival(), 40.0);
        assert_eq!(q.in_transit(), 0.0);
    }

    #[test]
    fn zero_delay_waits_one_step() {
        let mut q = TimeDelayQueue::new(0);
        assert_eq!(q.pop_arrival(), 0.0);
        q.push_departure(5.0);
        assert_eq!(q.pop_arrival(), 5.0);
    }
}
