use std::collections::HashMap;

use rand::Rng;
use tokio::sync::{mpsc, oneshot};

use mud_model::{CharRef, Id, Skill, SkillRef};

use crate::events::{Event, EventBusHandle};

/// Messages consumed by the combat worker. Closed set, matched exhaustively.
pub(super) enum Command {
    Start {
        attacker: CharRef,
        skill: Option<SkillRef>,
        defender: CharRef,
    },
    Stop {
        attacker: Id,
    },
    Query {
        character: Id,
        reply: oneshot::Sender<bool>,
    },
    Tick,
    Shutdown,
}

struct Fight {
    attacker: CharRef,
    defender: CharRef,
    skill: Option<SkillRef>,
}

/// Background task owning all fight pairings, keyed by attacker.
///
/// The skill entry lives and dies with the pairing; removing a fight always
/// removes both.
pub(super) struct CombatWorker {
    fights: HashMap<Id, Fight>,
    command_rx: mpsc::Receiver<Command>,
    bus: EventBusHandle,
}

impl CombatWorker {
    pub(super) fn new(command_rx: mpsc::Receiver<Command>, bus: EventBusHandle) -> Self {
        Self {
            fights: HashMap::new(),
            command_rx,
            bus,
        }
    }

    pub(super) async fn run(mut self) {
        tracing::debug!(target: "mud::combat", "combat resolver started");
        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                Command::Start {
                    attacker,
                    skill,
                    defender,
                } => self.handle_start(attacker, skill, defender),
                Command::Stop { attacker } => self.stop_fight(attacker),
                Command::Query { character, reply } => {
                    if reply.send(self.in_combat(character)).is_err() {
                        tracing::debug!(target: "mud::combat", "query reply channel closed (caller dropped)");
                    }
                }
                Command::Tick => self.handle_tick(),
                Command::Shutdown => break,
            }
        }
        tracing::debug!(target: "mud::combat", "combat resolver stopped");
    }

    fn handle_start(&mut self, attacker: CharRef, skill: Option<SkillRef>, defender: CharRef) {
        let id = attacker.id();
        if let Some(existing) = self.fights.get(&id) {
            if existing.defender.id() == defender.id() {
                // Already fighting this defender; no duplicate start event.
                return;
            }
            // Re-target: the old fight stops before the new one starts.
            self.stop_fight(id);
        }

        tracing::debug!(
            target: "mud::combat",
            attacker = %id,
            defender = %defender.id(),
            "fight started"
        );
        self.fights.insert(
            id,
            Fight {
                attacker: attacker.clone(),
                defender: defender.clone(),
                skill,
            },
        );
        self.bus.broadcast(Event::CombatStart { attacker, defender });
    }

    fn stop_fight(&mut self, attacker: Id) {
        if let Some(fight) = self.fights.remove(&attacker) {
            self.bus.broadcast(Event::CombatStop {
                attacker: fight.attacker,
                defender: fight.defender,
            });
        }
    }

    fn in_combat(&self, id: Id) -> bool {
        self.fights.contains_key(&id) || self.fights.values().any(|f| f.defender.id() == id)
    }

    fn handle_tick(&mut self) {
        let attackers: Vec<Id> = self.fights.keys().copied().collect();
        for id in attackers {
            // A death cascade earlier in this tick may have removed it.
            let Some(fight) = self.fights.get(&id) else {
                continue;
            };

            if fight.attacker.room_id() != fight.defender.room_id() {
                // One side left the room: implicit stop instead of damage.
                self.stop_fight(id);
                continue;
            }

            let damage = roll_damage(fight.skill.as_deref());
            let attacker = fight.attacker.clone();
            let defender = fight.defender.clone();

            defender.hit(damage);
            self.bus.broadcast(Event::CombatHit {
                attacker,
                defender: defender.clone(),
                damage,
            });

            if defender.hit_points() <= 0 {
                self.handle_death(defender);
            }
        }
    }

    /// Removes every pairing the dead character appears in, then announces
    /// the death exactly once.
    fn handle_death(&mut self, dead: CharRef) {
        let id = dead.id();
        self.stop_fight(id);

        let attackers: Vec<Id> = self
            .fights
            .iter()
            .filter(|(_, f)| f.defender.id() == id)
            .map(|(attacker, _)| *attacker)
            .collect();
        for attacker in attackers {
            self.stop_fight(attacker);
        }

        tracing::info!(target: "mud::combat", character = %id, "character died");
        self.bus.broadcast(Event::Death { character: dead });
    }
}

/// Damage for one combat tick: skill power plus uniform variance, or the
/// unarmed 1-10 roll.
fn roll_damage(skill: Option<&dyn Skill>) -> i32 {
    let mut rng = rand::thread_rng();
    match skill {
        Some(skill) => {
            let power = skill.power();
            let variance = skill.variance();
            rng.gen_range(power - variance..=power + variance)
        }
        None => rng.gen_range(1..=10),
    }
}
