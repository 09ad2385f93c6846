//! The exploration loop: moving between tiles, chests, random encounters
//! and floor transitions.

use crate::character::{GameSnapshot, Player, SaveManager};
use crate::combat::{generate_monster, run_battle, BattleOutcome};
use crate::core::config::GameConfig;
use crate::core::console::Console;
use crate::core::constants::{ENCOUNTER_CHANCE, FINAL_FLOOR, MAP_HEIGHT, MAP_WIDTH};
use crate::core::dice::Dice;
use crate::dungeon::{
    generate_floor, try_move, Direction, Floor, Grid, MoveResult, Tile, PLAYER_SYMBOL,
};
use crate::treasure::TreasureResolver;
use log::{error, info, warn};

pub const COMMAND_PROMPT: &str =
    "Command (WASD to move, Q to quit, L to learn the legend, T to save) > ";
pub const START_PROMPT: &str = "> ";

const ENTER_TIP: &str = "Enter the dungeon... Find 'E' to reach the next floor.";

/// One line of exploration input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Quit,
    Legend,
    Save,
}

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        let key = input.trim().to_lowercase();
        match key.as_str() {
            "q" => Some(Command::Quit),
            "l" => Some(Command::Legend),
            "t" => Some(Command::Save),
            other => Direction::from_key(other).map(Command::Move),
        }
    }
}

/// What a single step led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    GameOver,
    Victory,
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEnd {
    Quit,
    GameOver,
    Victory,
}

/// A run in progress.
pub struct Game<'c> {
    pub floor: u32,
    pub grid: Grid,
    pub player: Player,
    /// Tip shown under the map
    pub message: String,
    config: &'c GameConfig,
}

impl<'c> Game<'c> {
    /// Fresh player on a freshly generated first floor.
    pub fn new(config: &'c GameConfig, dice: &mut impl Dice) -> Self {
        let floor = build_floor(config, dice);
        let mut player = Player::default();
        player.set_position(floor.spawn);
        Self {
            floor: 1,
            grid: floor.grid,
            player,
            message: ENTER_TIP.to_string(),
            config,
        }
    }

    /// Resumes from restored save data.
    pub fn resume(config: &'c GameConfig, player: Player, floor: u32, grid: Grid) -> Self {
        Self {
            floor,
            grid,
            player,
            message: "Save loaded.".to_string(),
            config,
        }
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(&self.player, self.floor, &self.grid)
    }

    /// Map with the player overlay, a separator, status and the current tip.
    pub fn render(&self) -> String {
        let mut out = self.grid.render_with_player(self.player.position());
        out.push_str(&"-".repeat(self.grid.width()));
        out.push('\n');
        out.push_str(&format!("Floor {} | {}\n", self.floor, self.player.status_line()));
        if !self.message.is_empty() {
            out.push_str(&self.message);
            out.push('\n');
        }
        out.push_str("[WASD] move  [Q] quit  [L] legend [T] Save");
        out
    }

    /// Moves one tile and resolves whatever is there.
    ///
    /// A chest ends the step. Otherwise a random encounter may fire; an
    /// escape puts the player back where they came from and skips the
    /// exit check.
    pub fn step(
        &mut self,
        direction: Direction,
        dice: &mut impl Dice,
        console: &mut impl Console,
    ) -> StepOutcome {
        let previous = self.player.position();
        let moved = try_move(&self.grid, previous, direction);
        let (to, tile) = match moved {
            MoveResult::Blocked => {
                self.message = "You hit a wall.".to_string();
                return StepOutcome::Continue;
            }
            MoveResult::Moved { to, tile } => (to, tile),
        };
        self.player.set_position(to);
        self.message = "You moved one step.".to_string();

        if tile == Tile::Chest {
            let resolver = TreasureResolver::new(&self.config.treasure);
            let result = resolver.open_chest(
                &mut self.player,
                self.floor,
                &mut self.grid,
                to,
                dice,
                console,
            );
            self.message = result.message;
            if !self.player.is_alive() {
                console.narrate("Game Over. Thanks for playing!");
                return StepOutcome::GameOver;
            }
            return StepOutcome::Continue;
        }

        if dice.chance(ENCOUNTER_CHANCE) {
            let monster = generate_monster(self.floor, false, dice);
            match run_battle(&mut self.player, monster, dice, console) {
                BattleOutcome::Lose => {
                    console.narrate("Game Over. Thanks for playing!");
                    return StepOutcome::GameOver;
                }
                BattleOutcome::Escape => {
                    self.player.set_position(previous);
                    self.message =
                        "You escaped and returned to your previous position.".to_string();
                    return StepOutcome::Continue;
                }
                BattleOutcome::Win => {
                    self.message = "You won the battle.".to_string();
                }
            }
        }

        if moved.reached_exit() {
            if self.floor >= FINAL_FLOOR {
                console.narrate("Congratulations! You have reached the final exit. Victory!");
                return StepOutcome::Victory;
            }
            self.descend(dice);
        }
        StepOutcome::Continue
    }

    fn descend(&mut self, dice: &mut impl Dice) {
        self.floor += 1;
        let floor = build_floor(self.config, dice);
        self.grid = floor.grid;
        self.player.set_position(floor.spawn);
        self.message = format!("You have entered Floor {}.", self.floor);
        info!("entered floor {}", self.floor);
    }

    fn show_legend(console: &mut impl Console) {
        console.narrate("");
        for tile in [Tile::Wall, Tile::Floor] {
            console.narrate(&format!("{}: {}", tile.symbol(), tile.description()));
        }
        console.narrate(&format!("{}: You, this is your location.", PLAYER_SYMBOL));
        for tile in [Tile::Exit, Tile::Chest] {
            console.narrate(&format!("{}: {}", tile.symbol(), tile.description()));
        }
        console.confirm();
    }

    fn save(&mut self, saves: &SaveManager, console: &mut impl Console) {
        match saves.save(&self.snapshot()) {
            Ok(()) => self.message = "Game saved.".to_string(),
            Err(e) => {
                error!("save failed: {}", e);
                self.message = format!("Save failed: {}", e);
            }
        }
        console.confirm();
    }

    /// Reads and runs commands until the run ends or input closes.
    pub fn run(
        &mut self,
        saves: &SaveManager,
        dice: &mut impl Dice,
        console: &mut impl Console,
    ) -> GameEnd {
        loop {
            console.clear_screen();
            for line in self.render().lines() {
                console.narrate(line);
            }

            let Some(input) = console.read_line(COMMAND_PROMPT) else {
                info!("input closed, leaving the dungeon");
                return GameEnd::Quit;
            };
            let command = match Command::parse(&input) {
                Some(command) => command,
                None => {
                    self.message = "Invalid command.".to_string();
                    continue;
                }
            };

            match command {
                Command::Quit => {
                    console.narrate("You have quit the game. Goodbye!");
                    return GameEnd::Quit;
                }
                Command::Legend => Self::show_legend(console),
                Command::Save => self.save(saves, console),
                Command::Move(direction) => match self.step(direction, dice, console) {
                    StepOutcome::Continue => {}
                    StepOutcome::GameOver => return GameEnd::GameOver,
                    StepOutcome::Victory => return GameEnd::Victory,
                },
            }
        }
    }
}

/// Continue-or-new-game choice at startup.
///
/// A save that fails to load is deleted and a new game starts in its place.
pub fn start_game<'c>(
    config: &'c GameConfig,
    saves: &SaveManager,
    dice: &mut impl Dice,
    console: &mut impl Console,
) -> Game<'c> {
    if !saves.exists() {
        console.narrate("");
        console.narrate("No save file found, automatically starting a new game");
        console.confirm();
        return Game::new(config, dice);
    }

    loop {
        console.narrate("Save found. Choose:");
        console.narrate("[C] Continue (load save)");
        console.narrate("[N] New Game (overwrite existing save)");
        let choice = console
            .read_line(START_PROMPT)
            .map(|s| s.trim().to_lowercase());

        match choice.as_deref() {
            Some("c") => match saves.load() {
                Ok((player, floor, grid)) => {
                    info!("resumed save on floor {}", floor);
                    return Game::resume(config, player, floor, grid);
                }
                Err(e) => {
                    warn!("discarding unreadable save: {}", e);
                    console.narrate("Failed to load save. Starting a new game...");
                    discard_save(saves);
                    return Game::new(config, dice);
                }
            },
            Some("n") | None => {
                discard_save(saves);
                return Game::new(config, dice);
            }
            Some(_) => console.narrate("Invalid Input."),
        }
    }
}

fn discard_save(saves: &SaveManager) {
    if let Err(e) = saves.delete() {
        warn!("could not delete {}: {}", saves.path().display(), e);
    }
}

fn build_floor(config: &GameConfig, dice: &mut impl Dice) -> Floor {
    let chests = config.treasure.chest_per_floor as usize;
    generate_floor(MAP_WIDTH, MAP_HEIGHT, chests, dice).unwrap_or_else(|| {
        error!("generated floor has no room for spawn and exit, using an open room");
        open_room(MAP_WIDTH, MAP_HEIGHT)
    })
}

/// Walled rectangle with spawn and exit in opposite corners.
fn open_room(width: usize, height: usize) -> Floor {
    let mut grid = Grid::filled(width, height, Tile::Wall);
    for row in 1..height.saturating_sub(1) {
        for col in 1..width.saturating_sub(1) {
            grid.set((row, col), Tile::Floor);
        }
    }
    let spawn = (1, 1);
    let exit = (height.saturating_sub(2).max(1), width.saturating_sub(2).max(1));
    grid.set(exit, Tile::Exit);
    Floor {
        grid,
        spawn,
        exit,
        chests_placed: 0,
    }
}
