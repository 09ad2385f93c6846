use crate::character::{Player, StatDelta, StatKind};
use crate::combat::{generate_mimic, run_battle, BattleOutcome};
use crate::core::config::{TreasureConfig, GAMBLE_ATTRIBUTE_POOL};
use crate::core::console::Console;
use crate::core::constants::{
    GAMBLE_ATK_MAX_RANGE, GAMBLE_ATK_MIN_RANGE, GAMBLE_CRIT_STEP, GAMBLE_HP_MAX_RANGE,
    GAMBLE_SP_MAX_RANGE,
};
use crate::core::dice::Dice;
use crate::dungeon::{Grid, Pos, Tile};
use log::debug;

pub const CHEST_PROMPT: &str = "Select [1/2] > ";

/// What opening a chest amounted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChestResult {
    pub message: String,
    /// The chest tile was turned into floor
    pub consumed: bool,
}

impl ChestResult {
    fn new(message: &str, consumed: bool) -> Self {
        Self {
            message: message.to_string(),
            consumed,
        }
    }
}

/// Player's pick at a plain chest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChestChoice {
    Heal,
    Gamble,
}

impl ChestChoice {
    /// "1" heals; any other answer gambles. Closed input heals.
    pub fn parse(input: Option<&str>) -> Self {
        match input.map(str::trim) {
            None | Some("1") => ChestChoice::Heal,
            Some(_) => ChestChoice::Gamble,
        }
    }
}

/// Resolves chest tiles against a fixed treasure configuration.
pub struct TreasureResolver<'c> {
    config: &'c TreasureConfig,
}

impl<'c> TreasureResolver<'c> {
    pub fn new(config: &'c TreasureConfig) -> Self {
        Self { config }
    }

    /// Opens the chest at `pos`. The tile becomes floor only when
    /// `consumed` is set on the result.
    pub fn open_chest(
        &self,
        player: &mut Player,
        floor: u32,
        grid: &mut Grid,
        pos: Pos,
        dice: &mut impl Dice,
        console: &mut impl Console,
    ) -> ChestResult {
        if dice.chance(self.config.mimic_chance) {
            return self.fight_mimic(player, floor, grid, pos, dice, console);
        }

        console.clear_screen();
        console.narrate("You found a chest! Choose one:");
        console.narrate(&format!(
            "1) Restore {}% HP & SP now",
            (self.config.heal_rate * 100.0) as i32
        ));
        console.narrate("2) Gamble: permanent random stat boosts (each pick may backfire)");

        let answer = console.read_line(CHEST_PROMPT);
        let result = match ChestChoice::parse(answer.as_deref()) {
            ChestChoice::Heal => {
                player.heal_percent(self.config.heal_rate);
                ChestResult::new("You feel refreshed.", true)
            }
            ChestChoice::Gamble => {
                let deltas = self.roll_permanent_boosts(false, dice);
                apply_and_report(player, &deltas, console);
                ChestResult::new("You opened the chest and accepted its fate.", true)
            }
        };
        grid.set(pos, Tile::Floor);
        result
    }

    fn fight_mimic(
        &self,
        player: &mut Player,
        floor: u32,
        grid: &mut Grid,
        pos: Pos,
        dice: &mut impl Dice,
        console: &mut impl Console,
    ) -> ChestResult {
        console.clear_screen();
        console.narrate("The chest was a Mimic!");
        let mimic = generate_mimic(floor, dice);
        match run_battle(player, mimic, dice, console) {
            BattleOutcome::Lose => ChestResult::new("You were defeated by the Mimic.", false),
            BattleOutcome::Escape => {
                ChestResult::new("You escaped from the Mimic. The chest remains...", false)
            }
            BattleOutcome::Win => {
                player.heal_percent(self.config.heal_rate);
                let deltas = self.roll_permanent_boosts(true, dice);
                apply_and_report(player, &deltas, console);
                grid.set(pos, Tile::Floor);
                ChestResult::new("You defeated the Mimic and feel empowered!", true)
            }
        }
    }

    /// Picks which attributes change and by how much.
    ///
    /// Mimic rewards are scaled up by the configured bias and never
    /// backfire. Plain gambles flip each pick negative with the backfire
    /// probability.
    pub fn roll_permanent_boosts(&self, is_mimic: bool, dice: &mut impl Dice) -> Vec<StatDelta> {
        let bias = if is_mimic {
            1.0 + self.config.mimic_boost_bias
        } else {
            1.0
        };
        let k = dice.roll_range(
            self.config.gamble_attr_count_min as i32,
            self.config.gamble_attr_count_max as i32,
        );
        let picks = dice.sample_indices(GAMBLE_ATTRIBUTE_POOL as usize, k.max(0) as usize);

        let mut deltas = Vec::with_capacity(picks.len());
        for index in picks {
            let Some(kind) = StatKind::ALL.get(index).copied() else {
                continue;
            };
            let delta = match kind {
                StatKind::HpMax => {
                    let (lo, hi) = GAMBLE_HP_MAX_RANGE;
                    let base = scaled(dice.roll_range(lo, hi), bias);
                    StatDelta::HpMax(self.roll_sign(is_mimic, dice) * base)
                }
                StatKind::SpMax => {
                    let (lo, hi) = GAMBLE_SP_MAX_RANGE;
                    let base = scaled(dice.roll_range(lo, hi), bias);
                    StatDelta::SpMax(self.roll_sign(is_mimic, dice) * base)
                }
                StatKind::AtkMin => {
                    let (lo, hi) = GAMBLE_ATK_MIN_RANGE;
                    let base = scaled(dice.roll_range(lo, hi), bias).max(1);
                    StatDelta::AtkMin(self.roll_sign(is_mimic, dice) * base)
                }
                StatKind::AtkMax => {
                    let (lo, hi) = GAMBLE_ATK_MAX_RANGE;
                    let base = scaled(dice.roll_range(lo, hi), bias).max(1);
                    StatDelta::AtkMax(self.roll_sign(is_mimic, dice) * base)
                }
                StatKind::CritChance => {
                    let base = GAMBLE_CRIT_STEP * bias;
                    StatDelta::CritChance(self.roll_sign(is_mimic, dice) as f64 * base)
                }
            };
            deltas.push(delta);
        }
        debug!("chest rolled {:?} (mimic: {})", deltas, is_mimic);
        deltas
    }

    /// Mimic rewards skip the draw.
    fn roll_sign(&self, is_mimic: bool, dice: &mut impl Dice) -> i32 {
        if is_mimic || dice.roll_f64() > self.config.backfire_prob {
            1
        } else {
            -1
        }
    }
}

fn scaled(base: i32, bias: f64) -> i32 {
    (base as f64 * bias) as i32
}

fn apply_and_report(player: &mut Player, deltas: &[StatDelta], console: &mut impl Console) {
    if deltas.is_empty() {
        console.narrate("Nothing happens...");
        console.confirm();
        return;
    }
    player.apply_permanent_boosts(deltas);
    let parts: Vec<String> = deltas.iter().map(StatDelta::describe).collect();
    console.narrate(&format!("Permanent change: {}", parts.join(", ")));
    console.confirm();
}
