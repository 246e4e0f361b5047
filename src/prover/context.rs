use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Per-worker scratch state for one VC's proof search
///
/// Built when a worker picks up a VC and dropped when it finishes; nothing in
/// it is shared between threads.
#[derive(Debug)]
pub struct ReasoningContext {
    started: Instant,
    deadline: Instant,
    steps: usize,
    max_steps: usize,
    visited: HashSet<String>,
    /// Upper bound on the applications a single transformation may propose
    pub match_limit: usize,
}

impl ReasoningContext {
    pub fn new(timeout: Duration, max_steps: usize) -> Self {
        let started = Instant::now();
        Self {
            started,
            deadline: started + timeout,
            steps: 0,
            max_steps,
            visited: HashSet::new(),
            match_limit: 16,
        }
    }

    pub fn is_timed_out(&self) -> bool {
        Instant::now() >= self.deadline
    }

    pub fn is_out_of_steps(&self) -> bool {
        self.steps >= self.max_steps
    }

    pub fn record_step(&mut self) {
        self.steps += 1;
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Remember a model state; `false` if it was seen before
    pub fn visit(&mut self, state: String) -> bool {
        self.visited.insert(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_timeout_expires() {
        let ctx = ReasoningContext::new(Duration::ZERO, 10);
        assert!(ctx.is_timed_out());
    }

    #[test]
    fn test_step_budget() {
        let mut ctx = ReasoningContext::new(Duration::from_secs(5), 2);
        ctx.record_step();
        assert!(!ctx.is_out_of_steps());
        ctx.record_step();
        assert!(ctx.is_out_of_steps());
        assert!(ctx.visit("a".to_string()));
        assert!(!ctx.visit("a".to_string()));
    }
}
