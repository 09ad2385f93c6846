//! The fixed skill catalog. Players hold `&'static Skill` references into it.

#[derive(Debug, PartialEq)]
pub struct Skill {
    pub name: &'static str,
    /// SP spent per use
    pub cost: i32,
    /// Applied to the attacker's rolled base damage
    pub multiplier: f64,
    pub description: &'static str,
    /// A hit that leaves the target alive stuns it for one turn
    pub stun: bool,
}

pub static ALL_SKILLS: [Skill; 3] = [
    Skill {
        name: "Power Strike",
        cost: 3,
        multiplier: 2.0,
        description: "A strong blow (x2 damage).",
        stun: false,
    },
    Skill {
        name: "Double Slash",
        cost: 5,
        multiplier: 4.0,
        description: "Two quick slashes (x4 damage).",
        stun: false,
    },
    Skill {
        name: "Guard Break",
        cost: 4,
        multiplier: 0.6,
        description: "Less damage (x0.6) but stuns the enemy.",
        stun: true,
    },
];

pub fn all_skills() -> Vec<&'static Skill> {
    ALL_SKILLS.iter().collect()
}

pub fn skill_by_name(name: &str) -> Option<&'static Skill> {
    ALL_SKILLS.iter().find(|s| s.name == name)
}
