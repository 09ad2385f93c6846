//! Integration test: chest resolution against the grid and the player
//!
//! Mimic fights, plain chest choices and long gamble sequences.

use mazecrawl::character::Player;
use mazecrawl::core::config::{GameConfig, TreasureConfig};
use mazecrawl::core::console::ScriptedConsole;
use mazecrawl::core::dice::{RandDice, ScriptedDice};
use mazecrawl::dungeon::{Grid, Tile};
use mazecrawl::treasure::TreasureResolver;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn chest_grid() -> Grid {
    Grid::from_rows(&["###", "#C#", "###"]).unwrap()
}

fn always_mimic() -> TreasureConfig {
    TreasureConfig {
        mimic_chance: 1.0,
        ..TreasureConfig::default()
    }
}

#[test]
fn test_mimic_escape_preserves_chest() {
    let config = always_mimic();
    let resolver = TreasureResolver::new(&config);
    let mut player = Player::new(1, 1);
    let mut grid = chest_grid();
    let mut dice = ScriptedDice::new();
    let mut console = ScriptedConsole::new(&["r"]);

    let result = resolver.open_chest(&mut player, 1, &mut grid, (1, 1), &mut dice, &mut console);

    assert!(!result.consumed);
    assert_eq!(result.message, "You escaped from the Mimic. The chest remains...");
    assert_eq!(grid.get((1, 1)), Some(Tile::Chest));
}

#[test]
fn test_mimic_loss_preserves_chest() {
    let config = always_mimic();
    let resolver = TreasureResolver::new(&config);
    let mut player = Player::new(1, 1);
    player.hp = 1;
    let mut grid = chest_grid();
    // 0.2 triggers the mimic, picks the slime and misses the crit.
    let mut dice = ScriptedDice::new().with_float_fallback(0.2);
    let mut console = ScriptedConsole::new(&["a"]);

    let result = resolver.open_chest(&mut player, 1, &mut grid, (1, 1), &mut dice, &mut console);

    assert!(!result.consumed);
    assert_eq!(result.message, "You were defeated by the Mimic.");
    assert!(!player.is_alive());
    assert_eq!(grid.get((1, 1)), Some(Tile::Chest));
    assert!(console.output().contains("Elite Cute Slime Mimic"));
}

#[test]
fn test_closed_input_takes_the_heal() {
    let config = TreasureConfig {
        mimic_chance: 0.0,
        ..TreasureConfig::default()
    };
    let resolver = TreasureResolver::new(&config);
    let mut player = Player::new(1, 1);
    player.hp = 1;
    let mut grid = chest_grid();
    let mut dice = ScriptedDice::new();
    let mut console = ScriptedConsole::new(&[]);

    let result = resolver.open_chest(&mut player, 1, &mut grid, (1, 1), &mut dice, &mut console);

    assert!(result.consumed);
    assert_eq!(player.hp, 6);
    assert_eq!(grid.get((1, 1)), Some(Tile::Floor));
}

#[test]
fn test_repeated_gambles_keep_attribute_invariants() {
    let config = GameConfig::from_json(
        r#"{"treasure": {"mimic_chance": 0.0, "backfire_prob": 0.7,
            "gamble_attr_count_min": 1, "gamble_attr_count_max": 5}}"#,
    )
    .unwrap();
    let resolver = TreasureResolver::new(&config.treasure);
    let mut dice = RandDice::new(ChaCha8Rng::seed_from_u64(99));
    let mut player = Player::new(1, 1);

    for round in 0..400 {
        let mut grid = chest_grid();
        let mut console = ScriptedConsole::new(&["2"]);
        let result =
            resolver.open_chest(&mut player, 1, &mut grid, (1, 1), &mut dice, &mut console);

        assert!(result.consumed, "round {round}");
        assert!(player.hp_max >= 1 && player.sp_max >= 1, "round {round}");
        assert!(player.hp <= player.hp_max && player.sp <= player.sp_max);
        assert!(player.atk_min >= 1, "round {round}");
        assert!(player.atk_max > player.atk_min, "round {round}");
        assert!((0.0..=0.8).contains(&player.crit_chance), "round {round}");
    }
}
