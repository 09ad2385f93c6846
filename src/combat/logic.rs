//! Turn-based battle engine.
//!
//! [`Battle`] is the state machine: one player action, then (if the action
//! cost the turn) one monster reply, until someone drops or the player
//! runs. [`run_battle`] drives it from console input.

use super::types::{BattleCommand, BattleOutcome, BattleState, Monster, PlayerAction, TurnCost};
use crate::character::Player;
use crate::core::console::Console;
use crate::core::constants::{ESCAPE_CHANCE, STUN_TURNS};
use crate::core::dice::Dice;
use log::debug;

pub const ACTION_PROMPT: &str =
    "Choose action: [A]ttack, [S]kill, [H]eal, [P]otion(SP), [I]nformation, [R]un > ";
pub const SKILL_PROMPT: &str = "Select skill number > ";

pub struct Battle<'p> {
    player: &'p mut Player,
    monster: Monster,
    /// Monster turns left to skip. Never above [`STUN_TURNS`].
    monster_stun: u8,
    state: BattleState,
}

impl<'p> Battle<'p> {
    pub fn new(player: &'p mut Player, monster: Monster) -> Self {
        let mut battle = Self {
            player,
            monster,
            monster_stun: 0,
            state: BattleState::Ongoing,
        };
        battle.update_state();
        battle
    }

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn player(&self) -> &Player {
        &*self.player
    }

    pub fn monster(&self) -> &Monster {
        &self.monster
    }

    pub fn monster_stun(&self) -> u8 {
        self.monster_stun
    }

    /// Resolves one player action plus the monster's reply when the action
    /// cost the turn. Does nothing once the battle is over.
    pub fn take_turn(
        &mut self,
        action: PlayerAction,
        dice: &mut impl Dice,
        console: &mut impl Console,
    ) -> TurnCost {
        if self.state != BattleState::Ongoing {
            return TurnCost::Free;
        }

        let cost = self.player_turn(action, dice, console);
        self.update_state();
        if cost == TurnCost::Consumed && self.state == BattleState::Ongoing {
            self.monster_turn(dice, console);
            self.update_state();
        }
        cost
    }

    fn player_turn(
        &mut self,
        action: PlayerAction,
        dice: &mut impl Dice,
        console: &mut impl Console,
    ) -> TurnCost {
        match action {
            PlayerAction::Attack => {
                let (damage, was_crit) = self.player.roll_damage(dice);
                self.monster.hp -= damage;
                if was_crit {
                    self.monster_stun = STUN_TURNS;
                    console.critical_flash("CRITICAL! MONSTER IS KNOCKED DOWN!");
                    console.narrate(&format!(
                        "You deal {} critical damage. ({} HP={})",
                        damage,
                        self.monster.name,
                        self.monster.hp.max(0)
                    ));
                } else {
                    console.narrate(&format!(
                        "You hit the {} for {} damage. ({} HP={})",
                        self.monster.name,
                        damage,
                        self.monster.name,
                        self.monster.hp.max(0)
                    ));
                }
                TurnCost::Consumed
            }

            PlayerAction::UseSkill(index) => {
                let Some(skill) = self.player.skills.get(index).copied() else {
                    console.narrate("Invalid selection.");
                    return TurnCost::Free;
                };
                if !self.player.can_use(skill) {
                    console.narrate("Not enough SP!");
                    return TurnCost::Free;
                }

                let (base, was_crit) = self.player.roll_damage(dice);
                let damage = (base as f64 * skill.multiplier) as i32;
                self.monster.hp -= damage;
                self.player.spend_sp(skill);

                if was_crit {
                    self.monster_stun = STUN_TURNS;
                    console.critical_flash(&format!(
                        "CRITICAL! {} IS KNOCKED DOWN!",
                        self.monster.name.to_uppercase()
                    ));
                    console.narrate(&format!(
                        "You used {} and dealt {} CRITICAL damage! ({} HP={})",
                        skill.name,
                        damage,
                        self.monster.name,
                        self.monster.hp.max(0)
                    ));
                } else {
                    console.narrate(&format!(
                        "You used {} and dealt {} damage. ({} HP={})",
                        skill.name,
                        damage,
                        self.monster.name,
                        self.monster.hp.max(0)
                    ));
                }

                // Independent of the crit; only lands on a survivor.
                if skill.stun && self.monster.is_alive() {
                    self.monster_stun = STUN_TURNS;
                    console.narrate(&format!(
                        "The {} is stunned by {}!",
                        self.monster.name, skill.name
                    ));
                }
                TurnCost::Consumed
            }

            PlayerAction::Heal => {
                match self.player.drink_hp_potion() {
                    Some(gained) => console.narrate(&format!(
                        "You used a potion and recovered {} HP. (Player HP={}) (HP potions left: {})",
                        gained, self.player.hp, self.player.potions
                    )),
                    None => console.narrate("No potions left!"),
                }
                TurnCost::Consumed
            }

            PlayerAction::SpPotion => {
                match self.player.drink_sp_potion() {
                    Some(gained) => console.narrate(&format!(
                        "You used an SP potion and restored {} SP. (SP={}/{}) (SP potions left: {})",
                        gained, self.player.sp, self.player.sp_max, self.player.sp_potions
                    )),
                    None => console.narrate("No SP potions left!"),
                }
                TurnCost::Consumed
            }

            PlayerAction::Info => {
                let p = &self.player;
                console.narrate(&format!("Your HP: {}/{}", p.hp, p.hp_max));
                console.narrate(&format!("Your SP: {}/{}", p.sp, p.sp_max));
                console.narrate(&format!("You have {} HP potions.", p.potions));
                console.narrate(&format!("You have {} SP potions.", p.sp_potions));
                TurnCost::Free
            }

            PlayerAction::Run => {
                if dice.chance(ESCAPE_CHANCE) {
                    console.narrate("You escaped successfully!");
                    self.state = BattleState::PlayerEscaped;
                } else {
                    console.narrate("Escape failed!");
                }
                TurnCost::Consumed
            }
        }
    }

    fn monster_turn(&mut self, dice: &mut impl Dice, console: &mut impl Console) {
        if !self.monster.is_alive() {
            return;
        }
        if self.monster_stun > 0 {
            self.monster_stun -= 1;
            console.narrate(&format!(
                "The {} is stunned and cannot act this turn!",
                self.monster.name
            ));
            return;
        }
        let damage = dice.roll_range(self.monster.atk_min, self.monster.atk_max);
        self.player.hp -= damage;
        console.narrate(&format!(
            "The {} hits you for {} damage. (Player HP={})",
            self.monster.name,
            damage,
            self.player.hp.max(0)
        ));
    }

    fn update_state(&mut self) {
        if self.state != BattleState::Ongoing {
            return;
        }
        if !self.player.is_alive() {
            self.state = BattleState::PlayerLost;
        } else if !self.monster.is_alive() {
            self.state = BattleState::PlayerWon;
        }
    }

    /// Settles a finished battle: experience on a win, defeat notice on a
    /// loss. Returns `None` while the battle is still going.
    pub fn finish(self, console: &mut impl Console) -> Option<BattleOutcome> {
        let outcome = self.state.outcome()?;
        match outcome {
            BattleOutcome::Win => {
                let exp = self.monster.exp_reward();
                for level_up in self.player.gain_exp(exp) {
                    for line in level_up.describe() {
                        console.narrate(&line);
                    }
                }
                console.narrate(&format!(
                    "You defeated the {}! +{} EXP.",
                    self.monster.name, exp
                ));
                console.confirm();
            }
            BattleOutcome::Lose => {
                console.narrate("You were defeated...");
                console.confirm();
            }
            BattleOutcome::Escape => {}
        }
        debug!("battle vs {} ended: {:?}", self.monster.name, outcome);
        Some(outcome)
    }
}

/// Shows the skill menu and reads a choice. `None` for cancel or a
/// rejected entry; neither costs a turn.
fn choose_skill(player: &Player, console: &mut impl Console) -> Option<usize> {
    console.narrate("== Skills ==");
    for (i, skill) in player.skills.iter().enumerate() {
        console.narrate(&format!(
            "{}) {}  Cost:{} SP  Mult:{}x  - {}",
            i + 1,
            skill.name,
            skill.cost,
            skill.multiplier,
            skill.description
        ));
    }
    console.narrate("0) Cancel");

    let input = console.read_line(SKILL_PROMPT)?;
    let input = input.trim();
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
        console.narrate("Invalid input.");
        return None;
    }
    let Ok(choice) = input.parse::<usize>() else {
        console.narrate("Invalid selection.");
        return None;
    };
    if choice == 0 {
        return None;
    }
    if choice > player.skills.len() {
        console.narrate("Invalid selection.");
        return None;
    }
    Some(choice - 1)
}

/// Runs a full battle against `monster` from console input.
///
/// Unknown input and rejected skill choices are narrated and re-prompted
/// without costing a turn. A closed input stream counts as trying to run.
pub fn run_battle(
    player: &mut Player,
    monster: Monster,
    dice: &mut impl Dice,
    console: &mut impl Console,
) -> BattleOutcome {
    console.narrate(&format!(
        "A wild {} (Lv {}) appeared! HP={}",
        monster.display_name(),
        monster.level,
        monster.hp
    ));

    let mut battle = Battle::new(player, monster);
    while battle.state() == BattleState::Ongoing {
        let Some(line) = console.read_line(ACTION_PROMPT) else {
            battle.take_turn(PlayerAction::Run, dice, console);
            continue;
        };
        let action = match BattleCommand::parse(&line) {
            None => {
                console.narrate("Invalid action.");
                continue;
            }
            Some(BattleCommand::Skill) => match choose_skill(battle.player(), console) {
                Some(index) => PlayerAction::UseSkill(index),
                None => continue,
            },
            Some(BattleCommand::Attack) => PlayerAction::Attack,
            Some(BattleCommand::Heal) => PlayerAction::Heal,
            Some(BattleCommand::SpPotion) => PlayerAction::SpPotion,
            Some(BattleCommand::Info) => PlayerAction::Info,
            Some(BattleCommand::Run) => PlayerAction::Run,
        };
        battle.take_turn(action, dice, console);
    }

    battle.finish(console).unwrap_or(BattleOutcome::Escape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::console::{ConsoleEntry, ScriptedConsole};
    use crate::core::dice::ScriptedDice;

    fn dummy(hp: i32, atk: i32) -> Monster {
        Monster::new("Dummy", 1, hp, atk, atk)
    }

    /// Base roll `base`, no crit.
    fn plain_hit(base: i32) -> ScriptedDice {
        ScriptedDice::new()
            .with_ints(&[base])
            .with_floats(&[0.99])
            .with_float_fallback(0.99)
    }

    #[test]
    fn test_attack_then_monster_replies() {
        let mut player = Player::default();
        let mut dice = plain_hit(4).with_ints(&[2]);
        let mut console = ScriptedConsole::new(&[]);
        let mut battle = Battle::new(&mut player, Monster::new("Rat", 1, 20, 2, 2));

        let cost = battle.take_turn(PlayerAction::Attack, &mut dice, &mut console);
        assert_eq!(cost, TurnCost::Consumed);
        assert_eq!(battle.monster().hp, 16);
        assert_eq!(battle.player().hp, 13);
        assert_eq!(battle.state(), BattleState::Ongoing);
    }

    #[test]
    fn test_crit_stuns_for_exactly_one_turn() {
        let mut player = Player::default();
        // Turn 1: base 4, crit (0.0) -> 6 damage, monster stunned.
        // Turn 2: base 3, no crit -> monster acts for 5.
        let mut dice = ScriptedDice::new()
            .with_ints(&[4, 3, 5])
            .with_floats(&[0.0, 0.99]);
        let mut console = ScriptedConsole::new(&[]);
        let mut battle = Battle::new(&mut player, Monster::new("Ogre", 3, 50, 5, 5));

        battle.take_turn(PlayerAction::Attack, &mut dice, &mut console);
        assert_eq!(battle.monster().hp, 44);
        assert_eq!(battle.player().hp, 15);
        assert_eq!(battle.monster_stun(), 0);

        battle.take_turn(PlayerAction::Attack, &mut dice, &mut console);
        assert_eq!(battle.monster().hp, 41);
        assert_eq!(battle.player().hp, 10);
    }

    #[test]
    fn test_crit_flash_comes_before_monster_reply() {
        let mut player = Player::default();
        let mut dice = ScriptedDice::new().with_ints(&[5]).with_floats(&[0.0]);
        let mut console = ScriptedConsole::new(&[]);
        let mut battle = Battle::new(&mut player, dummy(100, 1));
        battle.take_turn(PlayerAction::Attack, &mut dice, &mut console);

        let t = console.transcript();
        let flash = t
            .iter()
            .position(|e| matches!(e, ConsoleEntry::Flash(_)))
            .unwrap();
        let stunned = t
            .iter()
            .position(|e| matches!(e, ConsoleEntry::Line(l) if l.contains("stunned")))
            .unwrap();
        assert!(flash < stunned);
    }

    #[test]
    fn test_stun_skill_and_crit_do_not_stack() {
        let mut player = Player::default();
        // Guard Break (index 2) with a crit: both stun sources fire.
        let mut dice = ScriptedDice::new()
            .with_ints(&[5, 3, 7])
            .with_floats(&[0.0, 0.99]);
        let mut console = ScriptedConsole::new(&[]);
        let mut battle = Battle::new(&mut player, Monster::new("Golem", 2, 100, 7, 7));

        battle.take_turn(PlayerAction::UseSkill(2), &mut dice, &mut console);
        assert_eq!(battle.monster_stun(), 0, "stun spent on the reply");
        assert_eq!(battle.player().hp, 15);
        assert_eq!(battle.player().sp, 6);

        // Next turn the monster acts again.
        battle.take_turn(PlayerAction::Attack, &mut dice, &mut console);
        assert_eq!(battle.player().hp, 8);
    }

    #[test]
    fn test_stun_skill_without_crit_still_stuns() {
        let mut player = Player::default();
        let mut dice = plain_hit(5);
        let mut console = ScriptedConsole::new(&[]);
        let mut battle = Battle::new(&mut player, dummy(100, 9));

        battle.take_turn(PlayerAction::UseSkill(2), &mut dice, &mut console);
        // 5 * 0.6 = 3
        assert_eq!(battle.monster().hp, 97);
        assert_eq!(battle.player().hp, 15);
        assert!(console.output().contains("stunned by Guard Break"));
    }

    #[test]
    fn test_skill_damage_uses_multiplier() {
        let mut player = Player::default();
        let mut dice = plain_hit(4).with_ints(&[0]);
        let mut console = ScriptedConsole::new(&[]);
        let mut battle = Battle::new(&mut player, dummy(100, 0));

        battle.take_turn(PlayerAction::UseSkill(1), &mut dice, &mut console);
        assert_eq!(battle.monster().hp, 84);
        assert_eq!(battle.player().sp, 5);
    }

    #[test]
    fn test_rejected_skills_cost_nothing() {
        let mut player = Player::default();
        player.sp = 2;
        let mut dice = ScriptedDice::new();
        let mut console = ScriptedConsole::new(&[]);
        let mut battle = Battle::new(&mut player, dummy(10, 3));

        assert_eq!(
            battle.take_turn(PlayerAction::UseSkill(0), &mut dice, &mut console),
            TurnCost::Free
        );
        assert_eq!(
            battle.take_turn(PlayerAction::UseSkill(9), &mut dice, &mut console),
            TurnCost::Free
        );
        assert_eq!(battle.player().sp, 2);
        assert_eq!(battle.player().hp, 15);
        assert_eq!(battle.monster().hp, 10);
    }

    #[test]
    fn test_heal_without_potions_still_costs_turn() {
        let mut player = Player::default();
        player.potions = 0;
        player.hp = 10;
        let mut dice = ScriptedDice::new();
        let mut console = ScriptedConsole::new(&[]);
        let mut battle = Battle::new(&mut player, dummy(10, 2));

        let cost = battle.take_turn(PlayerAction::Heal, &mut dice, &mut console);
        assert_eq!(cost, TurnCost::Consumed);
        assert_eq!(battle.player().hp, 8);
        assert!(console.output().contains("No potions left!"));
    }

    #[test]
    fn test_info_is_free() {
        let mut player = Player::default();
        let mut dice = ScriptedDice::new();
        let mut console = ScriptedConsole::new(&[]);
        let mut battle = Battle::new(&mut player, dummy(10, 4));

        assert_eq!(
            battle.take_turn(PlayerAction::Info, &mut dice, &mut console),
            TurnCost::Free
        );
        assert_eq!(battle.player().hp, 15);
        assert!(console.output().contains("Your HP: 15/15"));
    }

    #[test]
    fn test_failed_run_lets_monster_act() {
        let mut player = Player::default();
        let mut dice = ScriptedDice::new().with_floats(&[0.9]).with_ints(&[3]);
        let mut console = ScriptedConsole::new(&[]);
        let mut battle = Battle::new(&mut player, dummy(10, 3));

        battle.take_turn(PlayerAction::Run, &mut dice, &mut console);
        assert_eq!(battle.state(), BattleState::Ongoing);
        assert_eq!(battle.player().hp, 12);
        assert!(console.output().contains("Escape failed!"));
    }

    #[test]
    fn test_killing_blow_skips_monster_turn() {
        let mut player = Player::default();
        player.hp = 1;
        let mut dice = plain_hit(5);
        let mut console = ScriptedConsole::new(&[]);
        let mut battle = Battle::new(&mut player, dummy(5, 99));

        battle.take_turn(PlayerAction::Attack, &mut dice, &mut console);
        assert_eq!(battle.state(), BattleState::PlayerWon);
        assert_eq!(battle.player().hp, 1);
    }

    #[test]
    fn test_run_battle_reprompts_on_bad_input() {
        let mut player = Player::default();
        let mut dice = plain_hit(3);
        let mut console = ScriptedConsole::new(&["zz", "s", "abc", "s", "0", "s", "7", "a"]);
        let outcome = run_battle(&mut player, dummy(1, 0), &mut dice, &mut console);

        assert_eq!(outcome, BattleOutcome::Win);
        assert_eq!(console.remaining_inputs(), 0);
        let out = console.output();
        assert!(out.contains("Invalid action."));
        assert!(out.contains("Invalid input."));
        assert!(out.contains("Invalid selection."));
        assert_eq!(player.sp, 10);
    }

    #[test]
    fn test_closed_input_tries_to_run() {
        let mut player = Player::default();
        let mut dice = ScriptedDice::new().with_floats(&[0.1]);
        let mut console = ScriptedConsole::new(&[]);
        let outcome = run_battle(&mut player, dummy(10, 1), &mut dice, &mut console);
        assert_eq!(outcome, BattleOutcome::Escape);
    }

    #[test]
    fn test_win_awards_elite_exp() {
        let mut player = Player::default();
        let mut dice = plain_hit(5);
        let mut console = ScriptedConsole::new(&["a"]);
        let monster = Monster::new("Boss", 2, 1, 0, 0).elite();
        let outcome = run_battle(&mut player, monster, &mut dice, &mut console);

        assert_eq!(outcome, BattleOutcome::Win);
        // (3 + 2 * 2) * 1.6 = 11.2 -> 11, one level-up (10), 1 left
        assert_eq!(player.level, 2);
        assert_eq!(player.exp, 1);
        assert!(console.transcript().contains(&ConsoleEntry::Confirm));
    }
}
