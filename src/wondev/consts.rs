pub const NUM_PLAYERS: usize = 2;
pub const PAWNS_PER_PLAYER: usize = 2;
pub const NUM_PAWNS: usize = NUM_PLAYERS * PAWNS_PER_PLAYER;

/// A game ends after this many full turns regardless of who is still alive.
pub const MAX_TURNS: u32 = 200;

/// Height of a cell that is off the board.
pub const HOLE: i8 = -1;
/// Tallest tower a pawn can stand on.
pub const MAX_LEVEL: i8 = 3;
/// Height of a tower that received a build above level 3; unplayable from
/// then on.
pub const CAPPED: i8 = 4;
