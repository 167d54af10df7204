//! The slice of the world model the concurrency core depends on.
//!
//! The full model layer (rooms, zones, persistence) lives outside this
//! workspace; the engine only ever sees entity ids and the [`Character`] /
//! [`Skill`] capability traits re-exported here. [`PlayerChar`] and
//! [`SkillDef`] are the reference implementations used by hosts and tests.
pub mod character;
pub mod skill;
pub mod types;

pub use character::{CharRef, Character, PlayerChar};
pub use skill::{Skill, SkillDef, SkillRef};
pub use types::Id;
