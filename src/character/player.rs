//! The player's stats, resources and progression.

use super::skills::{all_skills, Skill};
use crate::core::constants::*;
use crate::core::dice::Dice;

/// Attributes a permanent boost can touch, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKind {
    HpMax,
    SpMax,
    AtkMin,
    AtkMax,
    CritChance,
}

impl StatKind {
    pub const ALL: [StatKind; 5] = [
        StatKind::HpMax,
        StatKind::SpMax,
        StatKind::AtkMin,
        StatKind::AtkMax,
        StatKind::CritChance,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            StatKind::HpMax => "Max HP",
            StatKind::SpMax => "Max SP",
            StatKind::AtkMin => "Min ATK",
            StatKind::AtkMax => "Max ATK",
            StatKind::CritChance => "Crit",
        }
    }
}

/// A permanent, additive change to one attribute. Negative is backlash.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatDelta {
    HpMax(i32),
    SpMax(i32),
    AtkMin(i32),
    AtkMax(i32),
    CritChance(f64),
}

impl StatDelta {
    pub fn kind(&self) -> StatKind {
        match self {
            StatDelta::HpMax(_) => StatKind::HpMax,
            StatDelta::SpMax(_) => StatKind::SpMax,
            StatDelta::AtkMin(_) => StatKind::AtkMin,
            StatDelta::AtkMax(_) => StatKind::AtkMax,
            StatDelta::CritChance(_) => StatKind::CritChance,
        }
    }

    pub fn is_positive(&self) -> bool {
        match *self {
            StatDelta::HpMax(v)
            | StatDelta::SpMax(v)
            | StatDelta::AtkMin(v)
            | StatDelta::AtkMax(v) => v >= 0,
            StatDelta::CritChance(v) => v >= 0.0,
        }
    }

    /// e.g. "Max HP +5" or "Crit -2%"
    pub fn describe(&self) -> String {
        let sign = if self.is_positive() { "+" } else { "" };
        match *self {
            StatDelta::HpMax(v)
            | StatDelta::SpMax(v)
            | StatDelta::AtkMin(v)
            | StatDelta::AtkMax(v) => format!("{} {}{}", self.kind().label(), sign, v),
            StatDelta::CritChance(v) => {
                format!("{} {}{}%", self.kind().label(), sign, (v * 100.0) as i32)
            }
        }
    }
}

/// Before/after stats of a single level-up.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelUp {
    pub new_level: u32,
    pub hp_max: (i32, i32),
    pub sp_max: (i32, i32),
    pub attack: ((i32, i32), (i32, i32)),
    pub crit_chance: (f64, f64),
}

impl LevelUp {
    pub fn describe(&self) -> Vec<String> {
        let ((a1, a2), (b1, b2)) = self.attack;
        vec![
            format!("*** Level Up! You are now Level {}! ***", self.new_level),
            format!("HP: {} -> {}", self.hp_max.0, self.hp_max.1),
            format!("SP: {} -> {}", self.sp_max.0, self.sp_max.1),
            format!("ATK: {}-{} -> {}-{}", a1, a2, b1, b2),
            format!("Crit: {:.2} -> {:.2}", self.crit_chance.0, self.crit_chance.1),
            "You have recovered your HP and SP!".to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub row: usize,
    pub col: usize,
    pub hp: i32,
    pub hp_max: i32,
    pub sp: i32,
    pub sp_max: i32,
    pub atk_min: i32,
    pub atk_max: i32,
    pub level: u32,
    pub exp: u32,
    pub potions: u32,
    pub sp_potions: u32,
    pub crit_chance: f64,
    pub crit_multiplier: f64,
    pub skills: Vec<&'static Skill>,
}

impl Player {
    /// Fresh level 1 character knowing every catalog skill.
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            hp: PLAYER_START_HP,
            hp_max: PLAYER_START_HP,
            sp: PLAYER_START_SP,
            sp_max: PLAYER_START_SP,
            atk_min: PLAYER_START_ATK_MIN,
            atk_max: PLAYER_START_ATK_MAX,
            level: 1,
            exp: 0,
            potions: PLAYER_START_POTIONS,
            sp_potions: PLAYER_START_SP_POTIONS,
            crit_chance: PLAYER_START_CRIT_CHANCE,
            crit_multiplier: CRIT_MULTIPLIER,
            skills: all_skills(),
        }
    }

    pub fn position(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn set_position(&mut self, (row, col): (usize, usize)) {
        self.row = row;
        self.col = col;
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn exp_to_next(&self) -> u32 {
        EXP_PER_LEVEL * self.level
    }

    /// Adds experience, levelling up as many times as it pays for.
    pub fn gain_exp(&mut self, amount: u32) -> Vec<LevelUp> {
        self.exp += amount;
        let mut level_ups = Vec::new();
        while self.exp >= self.exp_to_next() {
            self.exp -= self.exp_to_next();
            level_ups.push(self.level_up());
        }
        level_ups
    }

    /// Raises every stat and fully restores HP and SP.
    pub fn level_up(&mut self) -> LevelUp {
        let before = (
            self.hp_max,
            self.sp_max,
            (self.atk_min, self.atk_max),
            self.crit_chance,
        );

        self.level += 1;
        self.hp_max += LEVEL_UP_HP_MAX;
        self.sp_max += LEVEL_UP_SP_MAX;
        self.atk_min += LEVEL_UP_ATK_MIN;
        self.atk_max += LEVEL_UP_ATK_MAX;
        self.crit_chance = (self.crit_chance + LEVEL_UP_CRIT_CHANCE).min(LEVEL_UP_CRIT_CAP);
        self.hp = self.hp_max;
        self.sp = self.sp_max;

        LevelUp {
            new_level: self.level,
            hp_max: (before.0, self.hp_max),
            sp_max: (before.1, self.sp_max),
            attack: (before.2, (self.atk_min, self.atk_max)),
            crit_chance: (before.3, self.crit_chance),
        }
    }

    /// Returns `(damage, was_crit)`. Crits truncate toward zero.
    pub fn roll_damage(&self, dice: &mut impl Dice) -> (i32, bool) {
        let base = dice.roll_range(self.atk_min, self.atk_max);
        let is_crit = dice.chance(self.crit_chance);
        if is_crit {
            ((base as f64 * self.crit_multiplier) as i32, true)
        } else {
            (base, false)
        }
    }

    /// Restores `rate` of max HP and SP (at least 1 each), clamped to max.
    /// Returns the nominal `(hp_gain, sp_gain)`.
    pub fn heal_percent(&mut self, rate: f64) -> (i32, i32) {
        let hp_gain = ((self.hp_max as f64 * rate).ceil() as i32).max(1);
        let sp_gain = ((self.sp_max as f64 * rate).ceil() as i32).max(1);
        self.hp = (self.hp + hp_gain).min(self.hp_max);
        self.sp = (self.sp + sp_gain).min(self.sp_max);
        (hp_gain, sp_gain)
    }

    /// Uses an HP potion. `None` when there are none left.
    pub fn drink_hp_potion(&mut self) -> Option<i32> {
        if self.potions == 0 {
            return None;
        }
        self.potions -= 1;
        let before = self.hp;
        self.hp = (self.hp + HP_POTION_RESTORE).min(self.hp_max);
        Some(self.hp - before)
    }

    /// Uses an SP potion. `None` when there are none left.
    pub fn drink_sp_potion(&mut self) -> Option<i32> {
        if self.sp_potions == 0 {
            return None;
        }
        self.sp_potions -= 1;
        let before = self.sp;
        self.sp = (self.sp + SP_POTION_RESTORE).min(self.sp_max);
        Some(self.sp - before)
    }

    pub fn can_use(&self, skill: &Skill) -> bool {
        self.sp >= skill.cost
    }

    pub fn spend_sp(&mut self, skill: &Skill) {
        self.sp -= skill.cost;
    }

    /// Applies permanent changes in a fixed attribute order.
    ///
    /// Max HP/SP never drop below 1 (current values shrink with them),
    /// min attack never below 1, max attack stays above min attack, and a
    /// crit change lands in `[0, 0.8]`.
    pub fn apply_permanent_boosts(&mut self, deltas: &[StatDelta]) {
        let mut ordered: Vec<StatDelta> = deltas.to_vec();
        ordered.sort_by_key(|d| StatKind::ALL.iter().position(|k| *k == d.kind()));

        for delta in ordered {
            match delta {
                StatDelta::HpMax(v) => {
                    self.hp_max = (self.hp_max + v).max(1);
                    self.hp = self.hp.min(self.hp_max);
                }
                StatDelta::SpMax(v) => {
                    self.sp_max = (self.sp_max + v).max(1);
                    self.sp = self.sp.min(self.sp_max);
                }
                StatDelta::AtkMin(v) => {
                    self.atk_min = (self.atk_min + v).max(1);
                }
                StatDelta::AtkMax(v) => {
                    self.atk_max += v;
                }
                StatDelta::CritChance(v) => {
                    self.crit_chance = (self.crit_chance + v).clamp(0.0, BOOST_CRIT_CAP);
                }
            }
        }
        self.atk_max = self.atk_max.max(self.atk_min + 1);
    }

    pub fn status_line(&self) -> String {
        format!(
            "HP {}/{} | SP {}/{} | ATK {}-{} | Crit {:.2} | LV {} EXP {}/{}",
            self.hp.max(0),
            self.hp_max,
            self.sp,
            self.sp_max,
            self.atk_min,
            self.atk_max,
            self.crit_chance,
            self.level,
            self.exp,
            self.exp_to_next()
        )
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(1, 1)
    }
}
