/// Start/stop bookkeeping for the requestAnimationFrame chain
///
/// Every `start` opens a new generation. A callback only draws while its
/// generation is current, so a frame requested before a stop can never keep
/// an old chain alive next to the new one.
use cubes_core::FrameTimer;

#[derive(Debug, Default)]
pub struct FrameLoop {
    generation: u64,
    running: bool,
    /// Outstanding `requestAnimationFrame` handle
    pending: Option<i32>,
    timer: FrameTimer,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pending(&self) -> Option<i32> {
        self.pending
    }

    /// Open a new chain. The timer is rebaselined so the stopped interval
    /// does not show up as elapsed time.
    pub fn start(&mut self) -> u64 {
        self.generation = self.generation.wrapping_add(1);
        self.running = true;
        self.pending = None;
        self.timer = FrameTimer::new();
        self.generation
    }

    /// Close the current chain, handing back the request to cancel
    pub fn stop(&mut self) -> Option<i32> {
        self.running = false;
        self.pending.take()
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.running && generation == self.generation
    }

    /// Record the request made for `generation`; stale requests are dropped
    pub fn scheduled(&mut self, generation: u64, handle: i32) {
        if self.is_current(generation) {
            self.pending = Some(handle);
        }
    }

    /// Elapsed seconds for a callback of `generation`, or `None` if it is stale
    pub fn fire(&mut self, generation: u64, timestamp_ms: f64) -> Option<f32> {
        if !self.is_current(generation) {
            return None;
        }
        self.pending = None;
        Some(self.timer.delta(timestamp_ms * 0.001))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_only_sets_baseline() {
        let mut frames = FrameLoop::new();
        let generation = frames.start();
        assert_eq!(frames.fire(generation, 1000.0), Some(0.0));
        let elapsed = frames.fire(generation, 1500.0).unwrap();
        assert!((elapsed - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_restart_before_pending_frame_fires() {
        let mut frames = FrameLoop::new();
        let first = frames.start();
        frames.scheduled(first, 1);
        assert_eq!(frames.stop(), Some(1));

        let second = frames.start();
        frames.scheduled(second, 2);
        assert_eq!(frames.fire(first, 16.0), None);
        assert_eq!(frames.pending(), Some(2));
        assert_eq!(frames.fire(second, 32.0), Some(0.0));

        // The stale chain cannot re-register itself
        frames.scheduled(first, 3);
        assert_eq!(frames.pending(), None);
    }

    #[test]
    fn test_restart_rebaselines_timer() {
        let mut frames = FrameLoop::new();
        let first = frames.start();
        frames.fire(first, 0.0);
        frames.fire(first, 100.0);
        frames.stop();

        let second = frames.start();
        assert_eq!(frames.fire(second, 60_000.0), Some(0.0));
        let elapsed = frames.fire(second, 60_016.0).unwrap();
        assert!((elapsed - 0.016).abs() < 1e-4);
    }

    #[test]
    fn test_stopped_loop_ignores_callbacks() {
        let mut frames = FrameLoop::new();
        let generation = frames.start();
        frames.scheduled(generation, 7);
        frames.stop();
        assert!(!frames.is_running());
        assert_eq!(frames.fire(generation, 16.0), None);
        assert_eq!(frames.stop(), None);
    }
}
