use log::{info, LevelFilter};
use mazecrawl::character::SaveManager;
use mazecrawl::core::config::{GameConfig, CONFIG_FILENAME};
use mazecrawl::core::console::Console;
use mazecrawl::core::dice::{Dice, RandDice};
use mazecrawl::core::game_loop::{start_game, GameEnd};
use mazecrawl::ui::TerminalConsole;
use mazecrawl::utils::persistence::data_path;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::process;

struct Options {
    seed: Option<u64>,
    config: Option<PathBuf>,
}

fn print_usage() {
    println!("Mazecrawl - Turn-Based Terminal Dungeon Crawler\n");
    println!("Usage: mazecrawl [options]\n");
    println!("Options:");
    println!("  --seed <n>       Seed the random source for a reproducible run");
    println!("  --config <path>  Read treasure settings from <path>");
    println!("  --version        Show version information");
    println!("  --help           Show this help message");
    println!("\nSet RUST_LOG (e.g. RUST_LOG=debug) for diagnostic logging.");
}

fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    eprintln!("Run 'mazecrawl --help' for usage.");
    process::exit(1);
}

fn parse_args() -> Options {
    let mut options = Options {
        seed: None,
        config: None,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-v" => {
                println!("mazecrawl {}", env!("CARGO_PKG_VERSION"));
                process::exit(0);
            }
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            "--seed" => match args.next().map(|v| v.parse::<u64>()) {
                Some(Ok(seed)) => options.seed = Some(seed),
                _ => fail("--seed needs a non-negative integer"),
            },
            "--config" => match args.next() {
                Some(path) => options.config = Some(PathBuf::from(path)),
                None => fail("--config needs a path"),
            },
            other => fail(&format!("Unknown argument: {}", other)),
        }
    }
    options
}

fn init_logging() {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Warn);
    builder.parse_default_env();
    builder.init();
}

fn load_config(explicit: Option<PathBuf>) -> GameConfig {
    let path = match explicit {
        Some(path) => path,
        None => match data_path(CONFIG_FILENAME) {
            Ok(path) if path.exists() => path,
            _ => return GameConfig::default(),
        },
    };
    GameConfig::load_or_default(&path)
}

fn play(config: &GameConfig, saves: &SaveManager, dice: &mut impl Dice) -> GameEnd {
    let mut console = TerminalConsole::stdio();
    console.clear_screen();
    let mut game = start_game(config, saves, dice, &mut console);
    game.run(saves, dice, &mut console)
}

fn main() {
    let options = parse_args();
    init_logging();

    let config = load_config(options.config);
    let saves = SaveManager::new();

    let end = match options.seed {
        Some(seed) => {
            info!("seeded run: {}", seed);
            play(&config, &saves, &mut RandDice::new(StdRng::seed_from_u64(seed)))
        }
        None => play(&config, &saves, &mut RandDice::thread()),
    };
    info!("run ended: {:?}", end);
}
