use std::fmt;

use mud_model::{CharRef, Character, Id};

/// Closed set of things that can happen in the world.
///
/// Instances are cheap to clone (character references are shared) and never
/// mutated after construction. [`render`](Event::render) and
/// [`is_for`](Event::is_for) must stay pure and fast: the bus evaluates
/// them inline on its single worker task for every registered listener.
#[derive(Clone)]
pub enum Event {
    /// An entity came into existence in the model layer.
    CharacterCreated { id: Id },
    /// An entity was removed from the model layer.
    CharacterDestroyed { id: Id },
    /// Server-wide shout, unfiltered.
    Announce { from: CharRef, message: String },
    Say { speaker: CharRef, message: String },
    Emote { character: CharRef, action: String },
    Tell { from: CharRef, to: CharRef, message: String },
    /// A character entered the given room.
    Enter { character: CharRef, room_id: Id },
    /// A character left the given room.
    Leave { character: CharRef, room_id: Id },
    RoomUpdate { room_id: Id },
    Login { character: CharRef },
    Logout { character: CharRef },
    CombatStart { attacker: CharRef, defender: CharRef },
    CombatStop { attacker: CharRef, defender: CharRef },
    CombatHit { attacker: CharRef, defender: CharRef, damage: i32 },
    Death { character: CharRef },
    /// Periodic heartbeat, used for passive regeneration and UI refresh.
    Tick,
}

impl Event {
    pub fn kind(&self) -> &'static str {
        match self {
            Event::CharacterCreated { .. } => "CharacterCreated",
            Event::CharacterDestroyed { .. } => "CharacterDestroyed",
            Event::Announce { .. } => "Announce",
            Event::Say { .. } => "Say",
            Event::Emote { .. } => "Emote",
            Event::Tell { .. } => "Tell",
            Event::Enter { .. } => "Enter",
            Event::Leave { .. } => "Leave",
            Event::RoomUpdate { .. } => "RoomUpdate",
            Event::Login { .. } => "Login",
            Event::Logout { .. } => "Logout",
            Event::CombatStart { .. } => "CombatStart",
            Event::CombatStop { .. } => "CombatStop",
            Event::CombatHit { .. } => "CombatHit",
            Event::Death { .. } => "Death",
            Event::Tick => "Tick",
        }
    }

    /// Renders the event as a line of text for the given receiver.
    ///
    /// An empty string means there is nothing to show (e.g. heartbeat
    /// ticks, or combat events seen by a bystander).
    pub fn render(&self, receiver: &dyn Character) -> String {
        match self {
            Event::CharacterCreated { .. } | Event::CharacterDestroyed { .. } => String::new(),
            Event::Announce { from, message } => {
                format!("Announcement from {}: {}", from.name(), message)
            }
            Event::Say { speaker, message } => {
                let who = if receiver.id() == speaker.id() {
                    "You say".to_string()
                } else {
                    format!("{} says", speaker.name())
                };
                format!("{}, \"{}\"", who, message)
            }
            Event::Emote { character, action } => {
                format!("{} {}", character.name(), action)
            }
            Event::Tell { from, message, .. } => {
                format!("Message from {}: {}", from.name(), message)
            }
            Event::Enter { character, .. } => {
                format!("{} has entered the room", character.name())
            }
            Event::Leave { character, .. } => {
                format!("{} has left the room", character.name())
            }
            Event::RoomUpdate { .. } => "This room has been modified".to_string(),
            Event::Login { character } => format!("{} has connected", character.name()),
            Event::Logout { character } => format!("{} has disconnected", character.name()),
            Event::CombatStart { attacker, defender } => {
                if receiver.id() == attacker.id() {
                    format!("You are attacking {}!", defender.name())
                } else if receiver.id() == defender.id() {
                    format!("{} is attacking you!", attacker.name())
                } else {
                    String::new()
                }
            }
            Event::CombatStop { attacker, defender } => {
                if receiver.id() == attacker.id() {
                    format!("You stopped attacking {}", defender.name())
                } else if receiver.id() == defender.id() {
                    format!("{} has stopped attacking you", attacker.name())
                } else {
                    String::new()
                }
            }
            Event::CombatHit {
                attacker,
                defender,
                damage,
            } => {
                if receiver.id() == attacker.id() {
                    format!("You hit {} for {} damage", defender.name(), damage)
                } else if receiver.id() == defender.id() {
                    format!("{} hits you for {} damage", attacker.name(), damage)
                } else {
                    String::new()
                }
            }
            Event::Death { character } => {
                if receiver.id() == character.id() {
                    "You have died!".to_string()
                } else {
                    format!("{} has died", character.name())
                }
            }
            Event::Tick => String::new(),
        }
    }

    /// Relevance filter: should the given receiver see this event at all?
    pub fn is_for(&self, receiver: &dyn Character) -> bool {
        match self {
            Event::CharacterCreated { .. }
            | Event::CharacterDestroyed { .. }
            | Event::Announce { .. }
            | Event::Tick => true,
            Event::Say { speaker, .. } => receiver.room_id() == speaker.room_id(),
            Event::Emote { character, .. } => receiver.room_id() == character.room_id(),
            Event::Tell { to, .. } => receiver.id() == to.id(),
            Event::Enter { character, room_id } | Event::Leave { character, room_id } => {
                receiver.room_id() == *room_id && receiver.id() != character.id()
            }
            Event::RoomUpdate { room_id } => receiver.room_id() == *room_id,
            Event::Login { character } => receiver.id() != character.id(),
            Event::Logout { .. } => true,
            Event::CombatStart { attacker, defender }
            | Event::CombatStop { attacker, defender }
            | Event::CombatHit {
                attacker, defender, ..
            } => receiver.id() == attacker.id() || receiver.id() == defender.id(),
            Event::Death { character } => receiver.room_id() == character.room_id(),
        }
    }
}

// Character references are trait objects, so Debug is by kind and ids only.
impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Say { speaker, .. } => write!(f, "Say({})", speaker.id()),
            Event::Emote { character, .. } => write!(f, "Emote({})", character.id()),
            Event::Tell { from, to, .. } => write!(f, "Tell({} -> {})", from.id(), to.id()),
            Event::Announce { from, .. } => write!(f, "Announce({})", from.id()),
            Event::Enter { character, room_id } => {
                write!(f, "Enter({} -> {})", character.id(), room_id)
            }
            Event::Leave { character, room_id } => {
                write!(f, "Leave({} <- {})", character.id(), room_id)
            }
            Event::RoomUpdate { room_id } => write!(f, "RoomUpdate({room_id})"),
            Event::Login { character } => write!(f, "Login({})", character.id()),
            Event::Logout { character } => write!(f, "Logout({})", character.id()),
            Event::CombatStart { attacker, defender } => {
                write!(f, "CombatStart({} vs {})", attacker.id(), defender.id())
            }
            Event::CombatStop { attacker, defender } => {
                write!(f, "CombatStop({} vs {})", attacker.id(), defender.id())
            }
            Event::CombatHit {
                attacker,
                defender,
                damage,
            } => write!(
                f,
                "CombatHit({} hits {} for {})",
                attacker.id(),
                defender.id(),
                damage
            ),
            Event::Death { character } => write!(f, "Death({})", character.id()),
            Event::CharacterCreated { id } => write!(f, "CharacterCreated({id})"),
            Event::CharacterDestroyed { id } => write!(f, "CharacterDestroyed({id})"),
            Event::Tick => write!(f, "Tick"),
        }
    }
}
