use std::collections::VecDeque;

use itertools::Itertools;

use crate::wondev::prelude::*;

/// Square grid of tower heights. `-1` is a hole, `0..=3` are playable tower
/// levels, `4` is a capped tower.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    w: usize,
    heights: Vec<i8>,
}

impl Grid {
    /// Wraps a row-major height vector of length `w * w`.
    pub fn new(w: usize, heights: Vec<i8>) -> Grid {
        debug_assert_eq!(heights.len(), w * w);
        Grid { w, heights }
    }

    /// Raises the tower at `c` by one level, capping a level-3 tower.
    pub fn build(&mut self, c: &Coord) {
        let h = &mut self.heights[c.idx(self.w)];
        *h = if *h < MAX_LEVEL { *h + 1 } else { CAPPED };
    }

    /// Counts the 8-connected components of the non-hole cells.
    pub fn components(&self) -> usize {
        let mut visited = vec![false; self.heights.len()];
        let mut components = 0;
        for i in 0..self.heights.len() {
            if visited[i] || self.heights[i] == HOLE {
                continue;
            }
            components += 1;
            visited[i] = true;
            let mut frontier = VecDeque::from([Coord::new((i % self.w) as i32, (i / self.w) as i32)]);
            while let Some(r) = frontier.pop_front() {
                for dir in Direction::all() {
                    let t = r + dir.offset();
                    if t.valid(self.w) && !visited[t.idx(self.w)] && self.heights[t.idx(self.w)] != HOLE {
                        visited[t.idx(self.w)] = true;
                        frontier.push_back(t);
                    }
                }
            }
        }
        components
    }

    /// Height of the cell at `c`; the coord must be in bounds.
    pub fn height_at(&self, c: &Coord) -> i8 {
        self.heights[c.idx(self.w)]
    }

    /// Whether `c` is a hole. Out-of-bounds coords count as holes.
    pub fn hole(&self, c: &Coord) -> bool {
        !c.valid(self.w) || self.heights[c.idx(self.w)] == HOLE
    }

    /// The grid as the wire protocol renders it: one row per line, `.` for a
    /// hole and the height digit otherwise. Capped towers show as `4`.
    pub fn notate(&self) -> String {
        (0..self.w)
            .map(|y| {
                (0..self.w)
                    .map(|x| match self.heights[y * self.w + x] {
                        HOLE => ".".into(),
                        h => h.to_string(),
                    })
                    .join("")
            })
            .join("\n")
    }

    /// Whether a pawn may stand on `c`: in bounds, no hole, not capped.
    pub fn playable(&self, c: &Coord) -> bool {
        c.valid(self.w) && (0..=MAX_LEVEL).contains(&self.heights[c.idx(self.w)])
    }

    /// All coords a pawn may currently stand on.
    pub fn playable_cells(&self) -> Vec<Coord> {
        (0..self.heights.len())
            .map(|i| Coord::new((i % self.w) as i32, (i / self.w) as i32))
            .filter(|c| self.playable(c))
            .collect()
    }

    /// Side length of the grid.
    pub fn width(&self) -> usize {
        self.w
    }
}

/// A full game position: the grid, the four pawns and both scores. Pawns
/// `0, 1` belong to player 0 and pawns `2, 3` to player 1.
#[derive(Clone, Debug)]
pub struct State {
    pub grid: Grid,
    pub pawns: [Coord; NUM_PAWNS],
    pub scores: [u32; NUM_PLAYERS],
}

impl State {
    /// Assembles a fresh position with zeroed scores.
    pub fn new(grid: Grid, pawns: [Coord; NUM_PAWNS]) -> State {
        State { grid, pawns, scores: [0; NUM_PLAYERS] }
    }

    /// The pawn standing on `c`, if any. Linear scan; there are only four.
    pub fn occupant(&self, c: &Coord) -> Option<usize> {
        self.pawns.iter().position(|p| p == c)
    }

    /// Whether `player` is allowed to know what stands on `c`: true iff one
    /// of their own pawns is within king-move range of it.
    pub fn visible(&self, player: usize, c: &Coord) -> bool {
        (0..PAWNS_PER_PLAYER).any(|i| self.pawns[player * PAWNS_PER_PLAYER + i].chebyshev(c) <= 1)
    }
}

#[cfg(test)]
mod tests {
    use super::{Grid, State};
    use crate::wondev::prelude::*;

    fn flat(w: usize) -> Grid {
        Grid::new(w, vec![0; w * w])
    }

    #[test]
    fn build_climbs_then_caps() {
        let mut grid = flat(5);
        let c = Coord::new(2, 2);
        for expected in 1..=MAX_LEVEL {
            grid.build(&c);
            assert_eq!(grid.height_at(&c), expected);
        }
        assert!(grid.playable(&c));
        grid.build(&c);
        assert_eq!(grid.height_at(&c), CAPPED);
        assert!(!grid.playable(&c));
        assert!(!grid.hole(&c));
    }

    #[test]
    fn holes_block_play_but_render_as_dots() {
        let grid = Grid::new(2, vec![HOLE, 0, 1, 2]);
        assert!(grid.hole(&Coord::new(0, 0)));
        assert!(!grid.playable(&Coord::new(0, 0)));
        assert!(grid.playable(&Coord::new(1, 1)));
        assert!(!grid.playable(&Coord::new(2, 0)));
        assert_eq!(grid.notate(), ".0\n12");
    }

    #[test]
    fn component_counting_ignores_holes() {
        // Two playable islands separated by a full column of holes.
        #[rustfmt::skip]
        let split = Grid::new(3, vec![
            0, HOLE, 0,
            0, HOLE, 0,
            0, HOLE, 0,
        ]);
        assert_eq!(split.components(), 2);

        // Diagonal contact counts: the centre joins all four corners.
        #[rustfmt::skip]
        let bridged = Grid::new(3, vec![
            0,    HOLE, 0,
            HOLE, 0,    HOLE,
            0,    HOLE, 0,
        ]);
        assert_eq!(bridged.components(), 1);
        assert_eq!(flat(5).components(), 1);
        assert_eq!(Grid::new(2, vec![HOLE; 4]).components(), 0);
    }

    #[test]
    fn occupant_and_visibility() {
        let pawns = [Coord::new(0, 0), Coord::new(4, 4), Coord::new(0, 4), Coord::new(4, 0)];
        let state = State::new(flat(5), pawns);
        assert_eq!(state.occupant(&Coord::new(4, 4)), Some(1));
        assert_eq!(state.occupant(&Coord::new(2, 2)), None);

        // Player 0 sees around (0,0) and (4,4); the far corners are dark.
        assert!(state.visible(0, &Coord::new(1, 1)));
        assert!(state.visible(0, &Coord::new(3, 3)));
        assert!(!state.visible(0, &Coord::new(0, 4)));
        assert!(state.visible(1, &Coord::new(0, 3)));
    }
}
