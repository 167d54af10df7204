use std::time::Duration;

/// Timing and capacity knobs shared across the engine's actors.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Interval between heartbeat `Tick` broadcasts on the event bus.
    pub tick_interval: Duration,
    /// Interval between damage-resolution ticks in the combat resolver.
    pub combat_interval: Duration,
    /// Minimum spacing between accepted input lines per session (anti-flood).
    pub input_throttle: Duration,
    /// Capacity of each listener's event queue. A listener that lets its
    /// queue fill up is dropped by the bus.
    pub event_queue_capacity: usize,
    /// Capacity of the combat resolver's command queue.
    pub command_buffer_size: usize,
    /// Hit points restored per heartbeat tick while out of combat.
    pub regen_per_tick: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            combat_interval: Duration::from_secs(3),
            input_throttle: Duration::from_millis(200),
            event_queue_capacity: 64,
            command_buffer_size: 32,
            regen_per_tick: 5,
        }
    }
}
