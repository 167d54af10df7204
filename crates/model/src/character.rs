use std::sync::{Arc, RwLock};

use crate::types::Id;

/// Capability set the engine needs from a character.
///
/// Characters are created, stored, and destroyed by the model layer; the
/// engine only holds [`CharRef`]s for as long as the character participates
/// in an event subscription or a fight, and always keys maps by [`id`].
///
/// Attribute accessors may block briefly on the implementation's own
/// per-object lock.
///
/// [`id`]: Character::id
pub trait Character: Send + Sync {
    fn id(&self) -> Id;
    fn name(&self) -> String;

    fn room_id(&self) -> Id;
    fn set_room_id(&self, room_id: Id);

    /// Current hit points. May be negative after lethal damage.
    fn hit_points(&self) -> i32;

    /// Sets current hit points, clamped to [`health`](Character::health).
    fn set_hit_points(&self, hit_points: i32);

    /// Maximum hit points.
    fn health(&self) -> i32;

    fn cash(&self) -> i32;
    fn set_cash(&self, cash: i32);

    /// Applies damage. Intentionally allowed to drive hit points negative;
    /// the death check elsewhere is `<= 0`, not `== 0`.
    fn hit(&self, damage: i32) {
        let hp = self.hit_points();
        self.set_hit_points(hp - damage);
    }

    /// Restores hit points, clamped to [`health`](Character::health).
    fn heal(&self, amount: i32) {
        let hp = self.hit_points();
        self.set_hit_points(hp + amount);
    }
}

/// Shared character reference held by the engine. Identity is `id()`.
pub type CharRef = Arc<dyn Character>;

#[derive(Debug)]
struct Attributes {
    name: String,
    room_id: Id,
    hit_points: i32,
    health: i32,
    cash: i32,
}

/// Reference [`Character`] implementation with `RwLock`-guarded attributes.
///
/// The lock is per-object and only held for the duration of a single
/// accessor, so concurrent readers (session loop, combat resolver) contend
/// at most briefly.
#[derive(Debug)]
pub struct PlayerChar {
    id: Id,
    attrs: RwLock<Attributes>,
}

impl PlayerChar {
    pub fn new(id: Id, name: impl Into<String>, room_id: Id, health: i32) -> Arc<Self> {
        Arc::new(Self {
            id,
            attrs: RwLock::new(Attributes {
                name: name.into(),
                room_id,
                hit_points: health,
                health,
                cash: 0,
            }),
        })
    }

    fn read<T>(&self, f: impl FnOnce(&Attributes) -> T) -> T {
        let attrs = self.attrs.read().unwrap_or_else(|e| e.into_inner());
        f(&attrs)
    }

    fn write(&self, f: impl FnOnce(&mut Attributes)) {
        let mut attrs = self.attrs.write().unwrap_or_else(|e| e.into_inner());
        f(&mut attrs);
    }
}

impl Character for PlayerChar {
    fn id(&self) -> Id {
        self.id
    }

    fn name(&self) -> String {
        self.read(|a| a.name.clone())
    }

    fn room_id(&self) -> Id {
        self.read(|a| a.room_id)
    }

    fn set_room_id(&self, room_id: Id) {
        self.write(|a| a.room_id = room_id);
    }

    fn hit_points(&self) -> i32 {
        self.read(|a| a.hit_points)
    }

    fn set_hit_points(&self, hit_points: i32) {
        self.write(|a| a.hit_points = hit_points.min(a.health));
    }

    fn health(&self) -> i32 {
        self.read(|a| a.health)
    }

    fn cash(&self) -> i32 {
        self.read(|a| a.cash)
    }

    fn set_cash(&self, cash: i32) {
        self.write(|a| a.cash = cash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_can_go_negative() {
        let pc = PlayerChar::new(Id(1), "Grunt", Id(10), 20);
        pc.hit(25);
        assert_eq!(pc.hit_points(), -5);
    }

    #[test]
    fn heal_clamps_at_health() {
        let pc = PlayerChar::new(Id(1), "Grunt", Id(10), 20);
        pc.hit(5);
        pc.heal(50);
        assert_eq!(pc.hit_points(), 20);
    }

    #[test]
    fn set_hit_points_clamps_at_health() {
        let pc = PlayerChar::new(Id(1), "Grunt", Id(10), 20);
        pc.set_hit_points(100);
        assert_eq!(pc.hit_points(), 20);
    }
}
