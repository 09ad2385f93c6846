//! Monster templates and encounter generation.

use super::types::Monster;
use crate::core::constants::{
    ELITE_ATK_MULTIPLIER, ELITE_CHANCE, ELITE_HP_MULTIPLIER, MONSTER_ATK_MAX_PER_LEVEL,
    MONSTER_HP_PER_LEVEL,
};
use crate::core::dice::Dice;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonsterTemplate {
    pub name: &'static str,
    pub base_hp: i32,
    pub base_atk_min: i32,
    pub base_atk_max: i32,
    /// Floors this template may appear on
    pub floors: &'static [u32],
    pub weight: f64,
}

pub static MONSTER_TABLE: [MonsterTemplate; 5] = [
    MonsterTemplate {
        name: "Cute Slime",
        base_hp: 6,
        base_atk_min: 1,
        base_atk_max: 3,
        floors: &[1, 2],
        weight: 5.0,
    },
    MonsterTemplate {
        name: "Bat Ghost",
        base_hp: 7,
        base_atk_min: 1,
        base_atk_max: 4,
        floors: &[1, 2, 3],
        weight: 4.0,
    },
    MonsterTemplate {
        name: "Skeleton",
        base_hp: 10,
        base_atk_min: 2,
        base_atk_max: 5,
        floors: &[2, 3, 4],
        weight: 4.0,
    },
    MonsterTemplate {
        name: "Huge Goblin",
        base_hp: 12,
        base_atk_min: 2,
        base_atk_max: 6,
        floors: &[3, 4, 5],
        weight: 3.0,
    },
    MonsterTemplate {
        name: "Specter",
        base_hp: 14,
        base_atk_min: 3,
        base_atk_max: 7,
        floors: &[4, 5],
        weight: 2.0,
    },
];

/// Weighted pick among templates allowed on `floor`; the whole table
/// when none are.
pub fn pick_template(floor: u32, dice: &mut impl Dice) -> &'static MonsterTemplate {
    let mut pool: Vec<&'static MonsterTemplate> = MONSTER_TABLE
        .iter()
        .filter(|t| t.floors.contains(&floor))
        .collect();
    if pool.is_empty() {
        pool = MONSTER_TABLE.iter().collect();
    }
    let weights: Vec<f64> = pool.iter().map(|t| t.weight).collect();
    let idx = dice.weighted_index(&weights).unwrap_or(pool.len() - 1);
    pool[idx]
}

/// `(hp, atk_min, atk_max)` for a template at `level`.
///
/// Linear growth; elites get truncating multipliers with attack floored
/// at 1 and max attack kept above min attack.
pub fn scale_stats(template: &MonsterTemplate, level: u32, elite: bool) -> (i32, i32, i32) {
    let level = level as i32;
    let mut hp = template.base_hp + MONSTER_HP_PER_LEVEL * level;
    let mut atk_min = template.base_atk_min + (level - 1).max(0);
    let mut atk_max = template.base_atk_max + MONSTER_ATK_MAX_PER_LEVEL * level;
    if elite {
        hp = (hp as f64 * ELITE_HP_MULTIPLIER) as i32;
        atk_min = ((atk_min as f64 * ELITE_ATK_MULTIPLIER) as i32).max(1);
        atk_max = ((atk_max as f64 * ELITE_ATK_MULTIPLIER) as i32).max(atk_min + 1);
    }
    (hp, atk_min, atk_max)
}

fn roll_level(floor: u32, dice: &mut impl Dice) -> u32 {
    let lo = floor.max(1) as i32;
    let hi = (floor + 1).max(1) as i32;
    dice.roll_range(lo, hi) as u32
}

/// Random encounter for `floor`. `force_elite` skips the elite roll.
pub fn generate_monster(floor: u32, force_elite: bool, dice: &mut impl Dice) -> Monster {
    let template = pick_template(floor, dice);
    let level = roll_level(floor, dice);
    let elite = force_elite || dice.chance(ELITE_CHANCE);
    let (hp, atk_min, atk_max) = scale_stats(template, level, elite);
    Monster {
        name: template.name.to_string(),
        level,
        hp,
        atk_min,
        atk_max,
        elite,
    }
}

/// A chest that bites back: always elite, named "<template> Mimic".
pub fn generate_mimic(floor: u32, dice: &mut impl Dice) -> Monster {
    let mut monster = generate_monster(floor, true, dice);
    monster.name = format!("{} Mimic", monster.name);
    monster
}
