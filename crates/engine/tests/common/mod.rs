#![allow(dead_code)]

use std::time::Duration;

use tokio::sync::mpsc;

use mud_engine::{CombatResolver, EngineConfig, Event, EventBus};
use mud_model::{CharRef, Id, PlayerChar};

/// Config with both timers effectively disabled, for tests that drive the
/// actors directly.
pub fn quiet_config() -> EngineConfig {
    EngineConfig {
        tick_interval: Duration::from_secs(3600),
        combat_interval: Duration::from_secs(3600),
        input_throttle: Duration::from_millis(1),
        ..EngineConfig::default()
    }
}

pub fn character(id: u64, room: u64) -> CharRef {
    PlayerChar::new(Id(id), format!("char-{id}"), Id(room), 100)
}

pub fn named(id: u64, name: &str, room: u64, health: i32) -> CharRef {
    PlayerChar::new(Id(id), name, Id(room), health)
}

pub fn actors(config: &EngineConfig) -> (EventBus, CombatResolver) {
    let bus = EventBus::spawn(config);
    let resolver = CombatResolver::spawn(config, bus.handle());
    (bus, resolver)
}

/// Next non-tick event within the timeout, or `None` on timeout/closure.
pub async fn next_event(rx: &mut mpsc::Receiver<Event>, wait: Duration) -> Option<Event> {
    loop {
        match tokio::time::timeout(wait, rx.recv()).await {
            Ok(Some(Event::Tick)) => continue,
            Ok(Some(event)) => return Some(event),
            Ok(None) | Err(_) => return None,
        }
    }
}
