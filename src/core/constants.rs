// Floor layout (odd sizes so the carver's two-cell stride lands on cells)
pub const MAP_WIDTH: usize = 11;
pub const MAP_HEIGHT: usize = 11;
pub const FINAL_FLOOR: u32 = 5;
pub const CHEST_PLACEMENT_ATTEMPTS: u32 = 300;

// Exploration
pub const ENCOUNTER_CHANCE: f64 = 0.25;

// Player starting stats
pub const PLAYER_START_HP: i32 = 15;
pub const PLAYER_START_SP: i32 = 10;
pub const PLAYER_START_ATK_MIN: i32 = 3;
pub const PLAYER_START_ATK_MAX: i32 = 5;
pub const PLAYER_START_POTIONS: u32 = 5;
pub const PLAYER_START_SP_POTIONS: u32 = 5;
pub const PLAYER_START_CRIT_CHANCE: f64 = 0.15;
pub const CRIT_MULTIPLIER: f64 = 1.5;

// Consumables
pub const HP_POTION_RESTORE: i32 = 10;
pub const SP_POTION_RESTORE: i32 = 6;

// Leveling
pub const EXP_PER_LEVEL: u32 = 10;
pub const LEVEL_UP_HP_MAX: i32 = 5;
pub const LEVEL_UP_SP_MAX: i32 = 8;
pub const LEVEL_UP_ATK_MIN: i32 = 3;
pub const LEVEL_UP_ATK_MAX: i32 = 4;
pub const LEVEL_UP_CRIT_CHANCE: f64 = 0.03;
pub const LEVEL_UP_CRIT_CAP: f64 = 1.0;

// Permanent boost limits
pub const BOOST_CRIT_CAP: f64 = 0.8;

// Combat
pub const ESCAPE_CHANCE: f64 = 0.5;
pub const STUN_TURNS: u8 = 1;
pub const EXP_REWARD_BASE: u32 = 3;
pub const EXP_REWARD_PER_LEVEL: u32 = 2;
pub const ELITE_EXP_MULTIPLIER: f64 = 1.6;

// Monster generation
pub const ELITE_CHANCE: f64 = 0.4;
pub const ELITE_HP_MULTIPLIER: f64 = 1.35;
pub const ELITE_ATK_MULTIPLIER: f64 = 1.25;
pub const MONSTER_HP_PER_LEVEL: i32 = 4;
pub const MONSTER_ATK_MAX_PER_LEVEL: i32 = 2;

// Chest gamble magnitudes (before mimic bias)
pub const GAMBLE_HP_MAX_RANGE: (i32, i32) = (3, 7);
pub const GAMBLE_SP_MAX_RANGE: (i32, i32) = (2, 5);
pub const GAMBLE_ATK_MIN_RANGE: (i32, i32) = (1, 2);
pub const GAMBLE_ATK_MAX_RANGE: (i32, i32) = (1, 3);
pub const GAMBLE_CRIT_STEP: f64 = 0.02;
