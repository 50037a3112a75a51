//! Tick timing statistics
//!
//! Each sample pairs the wall-clock cost of a tick with the simulated time it
//! advanced and the number of vehicles it updated, so a run can report both
//! per-vehicle cost and how far ahead of real time it is running.

use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
struct TickSample {
    wall: Duration,
    simulated: f32,
    vehicles: usize,
}

/// Sliding-window statistics over recent simulation ticks
#[derive(Debug)]
pub struct TickStats {
    window: VecDeque<TickSample>,
    capacity: usize,
    total_ticks: u64,
    simulated_seconds: f64,
}

impl TickStats {
    /// Create a tracker over the last `window` ticks (at least one)
    pub fn new(window: usize) -> Self {
        let capacity = window.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            total_ticks: 0,
            simulated_seconds: 0.0,
        }
    }

    /// Record one tick: its wall-clock cost, the simulated `dt` it covered and
    /// how many vehicles it updated
    pub fn record_tick(&mut self, wall: Duration, simulated: f32, vehicles: usize) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(TickSample {
            wall,
            simulated,
            vehicles,
        });

        self.total_ticks += 1;
        self.simulated_seconds += f64::from(simulated);
    }

    fn window_wall(&self) -> Duration {
        self.window.iter().map(|sample| sample.wall).sum()
    }

    /// Mean wall-clock cost of a tick in the window, in milliseconds
    pub fn avg_tick_ms(&self) -> f32 {
        if self.window.is_empty() {
            return 0.0;
        }
        self.window_wall().as_secs_f32() * 1000.0 / self.window.len() as f32
    }

    /// Most expensive tick in the window, in milliseconds
    pub fn worst_tick_ms(&self) -> f32 {
        self.window
            .iter()
            .map(|sample| sample.wall)
            .max()
            .map_or(0.0, |wall| wall.as_secs_f32() * 1000.0)
    }

    /// Mean cost of updating one vehicle, in microseconds
    pub fn per_vehicle_us(&self) -> f32 {
        let updates: usize = self.window.iter().map(|sample| sample.vehicles).sum();
        if updates == 0 {
            return 0.0;
        }
        self.window_wall().as_secs_f32() * 1.0e6 / updates as f32
    }

    /// Simulated seconds advanced per wall-clock second over the window
    ///
    /// Zero while no measurable wall time has passed.
    pub fn real_time_factor(&self) -> f32 {
        let wall = self.window_wall().as_secs_f32();
        if wall <= 0.0 {
            return 0.0;
        }
        let simulated: f32 = self.window.iter().map(|sample| sample.simulated).sum();
        simulated / wall
    }

    /// Vehicles updated by the most recent tick
    pub fn vehicles(&self) -> usize {
        self.window.back().map_or(0, |sample| sample.vehicles)
    }

    pub fn total_ticks(&self) -> u64 {
        self.total_ticks
    }

    /// Simulated time covered since creation
    pub fn simulated_seconds(&self) -> f64 {
        self.simulated_seconds
    }

    /// Samples currently in the window
    pub fn samples(&self) -> usize {
        self.window.len()
    }

    /// One-line summary for logs
    pub fn format_stats(&self) -> String {
        format!(
            "Tick {} | t = {:.2}s | {} vehicles | {:.3}ms/tick (worst {:.3}) | {:.2}us/vehicle | {:.1}x real time",
            self.total_ticks,
            self.simulated_seconds,
            self.vehicles(),
            self.avg_tick_ms(),
            self.worst_tick_ms(),
            self.per_vehicle_us(),
            self.real_time_factor()
        )
    }
}

impl Default for TickStats {
    fn default() -> Self {
        Self::new(120)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats() {
        let stats = TickStats::default();
        assert_eq!(stats.total_ticks(), 0);
        assert_eq!(stats.avg_tick_ms(), 0.0);
        assert_eq!(stats.per_vehicle_us(), 0.0);
        assert_eq!(stats.real_time_factor(), 0.0);
    }

    #[test]
    fn test_window_is_bounded_but_totals_are_not() {
        let mut stats = TickStats::new(3);
        for ms in [1, 2, 3, 4, 5] {
            stats.record_tick(Duration::from_millis(ms), 0.5, 2);
        }

        assert_eq!(stats.samples(), 3);
        assert_eq!(stats.total_ticks(), 5);
        assert!((stats.simulated_seconds() - 2.5).abs() < 1e-9);
        assert!((stats.avg_tick_ms() - 4.0).abs() < 1e-3);
        assert!((stats.worst_tick_ms() - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_per_vehicle_cost() {
        let mut stats = TickStats::new(10);
        stats.record_tick(Duration::from_millis(1), 0.1, 4);
        stats.record_tick(Duration::from_millis(1), 0.1, 6);

        // 2ms over 10 vehicle updates
        assert!((stats.per_vehicle_us() - 200.0).abs() < 0.1);
        assert_eq!(stats.vehicles(), 6);
    }

    #[test]
    fn test_real_time_factor() {
        let mut stats = TickStats::new(10);
        stats.record_tick(Duration::from_millis(10), 1.0 / 60.0, 1);
        stats.record_tick(Duration::from_millis(10), 1.0 / 60.0, 1);

        // 1/30s simulated in 20ms of wall time
        assert!((stats.real_time_factor() - (1.0 / 30.0) / 0.02).abs() < 1e-3);
    }

    #[test]
    fn test_zero_duration_ticks() {
        let mut stats = TickStats::new(4);
        stats.record_tick(Duration::ZERO, 0.1, 3);

        assert_eq!(stats.real_time_factor(), 0.0);
        assert_eq!(stats.per_vehicle_us(), 0.0);
    }

    #[test]
    fn test_zero_window_keeps_one_sample() {
        let mut stats = TickStats::new(0);
        stats.record_tick(Duration::from_millis(1), 0.1, 1);
        stats.record_tick(Duration::from_millis(2), 0.1, 1);
        assert_eq!(stats.samples(), 1);
    }

    #[test]
    fn test_format_mentions_tick_count() {
        let mut stats = TickStats::default();
        stats.record_tick(Duration::from_millis(2), 0.5, 3);
        let line = stats.format_stats();
        assert!(line.starts_with("Tick 1 |"));
        assert!(line.contains("3 vehicles"));
    }
}
