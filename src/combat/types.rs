use crate::core::constants::{ELITE_EXP_MULTIPLIER, EXP_REWARD_BASE, EXP_REWARD_PER_LEVEL};

/// An enemy for a single battle. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Monster {
    pub name: String,
    pub level: u32,
    pub hp: i32,
    pub atk_min: i32,
    pub atk_max: i32,
    pub elite: bool,
}

impl Monster {
    pub fn new(name: impl Into<String>, level: u32, hp: i32, atk_min: i32, atk_max: i32) -> Self {
        Self {
            name: name.into(),
            level,
            hp,
            atk_min,
            atk_max,
            elite: false,
        }
    }

    pub fn elite(mut self) -> Self {
        self.elite = true;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Name with the "Elite" prefix when it applies.
    pub fn display_name(&self) -> String {
        if self.elite {
            format!("Elite {}", self.name)
        } else {
            self.name.clone()
        }
    }

    /// Experience for defeating this monster.
    pub fn exp_reward(&self) -> u32 {
        let base = EXP_REWARD_BASE + EXP_REWARD_PER_LEVEL * self.level;
        if self.elite {
            (base as f64 * ELITE_EXP_MULTIPLIER) as u32
        } else {
            base
        }
    }
}

/// Battle state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleState {
    Ongoing,
    PlayerWon,
    PlayerLost,
    PlayerEscaped,
}

impl BattleState {
    pub fn outcome(&self) -> Option<BattleOutcome> {
        match self {
            BattleState::Ongoing => None,
            BattleState::PlayerWon => Some(BattleOutcome::Win),
            BattleState::PlayerLost => Some(BattleOutcome::Lose),
            BattleState::PlayerEscaped => Some(BattleOutcome::Escape),
        }
    }
}

/// How a finished battle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    Win,
    Lose,
    Escape,
}

/// Top-level battle menu choice, parsed from a raw input token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleCommand {
    Attack,
    Skill,
    Heal,
    SpPotion,
    Info,
    Run,
}

impl BattleCommand {
    /// Case-insensitive; accepts the menu letter or the full word.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "a" | "attack" => Some(BattleCommand::Attack),
            "s" | "skill" => Some(BattleCommand::Skill),
            "h" | "heal" => Some(BattleCommand::Heal),
            "p" | "potion" => Some(BattleCommand::SpPotion),
            "i" | "info" | "information" => Some(BattleCommand::Info),
            "r" | "run" => Some(BattleCommand::Run),
            _ => None,
        }
    }
}

/// A fully resolved player action, ready for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    Attack,
    /// 0-based index into the player's skill list
    UseSkill(usize),
    Heal,
    SpPotion,
    Info,
    Run,
}

/// Whether an action used up the player's turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnCost {
    /// The monster replies (if alive and not stunned)
    Consumed,
    /// Re-prompt without a monster reply
    Free,
}
