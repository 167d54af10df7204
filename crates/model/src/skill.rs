use std::sync::Arc;

/// Capability set for a combat skill or weapon.
///
/// Damage dealt with a skill is `power()` plus a uniform variance in
/// `[-variance(), +variance()]`. A fight with no skill attached falls back
/// to the unarmed damage roll.
pub trait Skill: Send + Sync {
    fn name(&self) -> String;
    fn power(&self) -> i32;
    fn variance(&self) -> i32;
}

/// Shared skill reference.
pub type SkillRef = Arc<dyn Skill>;

/// Plain value implementation of [`Skill`].
#[derive(Debug, Clone)]
pub struct SkillDef {
    name: String,
    power: i32,
    variance: i32,
}

impl SkillDef {
    pub fn new(name: impl Into<String>, power: i32, variance: i32) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            power,
            variance,
        })
    }
}

impl Skill for SkillDef {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn power(&self) -> i32 {
        self.power
    }

    fn variance(&self) -> i32 {
        self.variance
    }
}
