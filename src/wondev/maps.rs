use rand::Rng;

use crate::wondev::prelude::*;

pub const SQUARE_WIDTH: usize = 5;
pub const RANDOM_WIDTH: usize = 6;
pub const DIAMOND_WIDTH: usize = 7;

/// The 5x5 map with every cell playable.
pub fn square() -> Grid {
    Grid::new(SQUARE_WIDTH, vec![0; SQUARE_WIDTH * SQUARE_WIDTH])
}

/// The fixed 7x7 diamond with holes in the corners.
pub fn diamond() -> Grid {
    const O: i8 = 0;
    const X: i8 = HOLE;
    #[rustfmt::skip]
    let heights = vec![
        X, X, X, O, X, X, X,
        X, X, O, O, O, X, X,
        X, O, O, O, O, O, X,
        O, O, O, O, O, O, O,
        X, O, O, O, O, O, X,
        X, X, O, O, O, X, X,
        X, X, X, O, X, X, X,
    ];
    Grid::new(DIAMOND_WIDTH, heights)
}

/// A random 6x6 map. Cells are opened together with their horizontal mirror
/// so neither starting side is favoured, until a drawn target count is
/// reached and the playable cells form a single 8-connected region.
pub fn random<R: Rng>(rng: &mut R) -> Grid {
    let w = RANDOM_WIDTH;
    let mut heights = vec![HOLE; w * w];
    let desired = rng.random_range(25..=34);
    loop {
        let playable = heights.iter().filter(|&&h| h != HOLE).count();
        if playable >= desired && Grid::new(w, heights.clone()).components() == 1 {
            return Grid::new(w, heights);
        }
        let r = Coord::new(rng.random_range(0..w as i32), rng.random_range(0..w as i32));
        let mirror = Coord::new(w as i32 - 1 - r.x, r.y);
        heights[r.idx(w)] = 0;
        heights[mirror.idx(w)] = 0;
    }
}

/// Draws four distinct playable spawn cells, assigned to pawns 0..3 in draw
/// order.
pub fn spawn_pawns<R: Rng>(grid: &Grid, rng: &mut R) -> [Coord; NUM_PAWNS] {
    let w = grid.width() as i32;
    let mut spawns = [Coord::new(-1, -1); NUM_PAWNS];
    for i in 0..NUM_PAWNS {
        loop {
            let r = Coord::new(rng.random_range(0..w), rng.random_range(0..w));
            if !spawns[..i].contains(&r) && grid.playable(&r) {
                spawns[i] = r;
                break;
            }
        }
    }
    spawns
}

/// A fresh position on one of the three maps, chosen uniformly.
pub fn random_state<R: Rng>(rng: &mut R) -> State {
    let grid = match rng.random_range(0..3) {
        0 => square(),
        1 => diamond(),
        _ => random(rng),
    };
    let pawns = spawn_pawns(&grid, rng);
    State::new(grid, pawns)
}
