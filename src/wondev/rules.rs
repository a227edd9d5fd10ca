use crate::wondev::prelude::*;

/// Why a contestant forfeited its turn. Every kind disqualifies the bot that
/// produced it; the opponent plays on.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error("no complete move before the deadline")]
    Timeout,
    #[error("unparsable action `{0}`")]
    Malformed(String),
    #[error("push in illegal angle: {} is more than one step from {}", .1.notate(), .0.notate())]
    IllegalPushAngle(Direction, Direction),
    #[error("illegal move: {0}")]
    IllegalMove(String),
    #[error("contestant accepted defeat")]
    Resign,
    #[error("could not empty contestant pipe: {0}")]
    PipeRead(#[source] std::io::Error),
    #[error("short write while feeding contestant")]
    FeedFailed,
}

/// An action resolved against a position: absolute pawn index and concrete
/// target/build cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    MoveAndBuild { pawn: usize, target: Coord, build: Coord },
    PushAndBuild { pawn: usize, target: Coord, build: Coord },
    AcceptDefeat,
}

impl State {
    /// Anchors a parsed action to the acting player's pawns. The contestant
    /// speaks in relative pawn ids and directions; the referee works in
    /// absolute indices and cells.
    pub fn resolve(&self, raw: &RawAction, player: usize) -> Action {
        match *raw {
            RawAction::MoveAndBuild { pawn, step, build } => {
                let pawn = pawn + player * PAWNS_PER_PLAYER;
                let target = self.pawns[pawn] + step.offset();
                Action::MoveAndBuild { pawn, target, build: target + build.offset() }
            }
            RawAction::PushAndBuild { pawn, push, shove } => {
                let pawn = pawn + player * PAWNS_PER_PLAYER;
                let target = self.pawns[pawn] + push.offset();
                Action::PushAndBuild { pawn, target, build: target + shove.offset() }
            }
            RawAction::AcceptDefeat => Action::AcceptDefeat,
        }
    }

    /// Validates `mv` for `player` and, if legal, advances the position.
    /// On an error the position is untouched.
    pub fn apply(&mut self, mv: &Action, player: usize) -> Result<(), TurnError> {
        match *mv {
            Action::MoveAndBuild { pawn, target, build } => self.move_and_build(pawn, target, build, player),
            Action::PushAndBuild { target, build, .. } => self.push_and_build(target, build, player),
            Action::AcceptDefeat => Err(TurnError::Resign),
        }
    }

    fn check_cells(&self, target: &Coord, build: &Coord) -> Result<(), TurnError> {
        let w = self.grid.width();
        if !target.valid(w) || !build.valid(w) {
            return Err(TurnError::IllegalMove(format!(
                "action leaves the map, target {} build {}",
                target.notate(),
                build.notate()
            )));
        }
        if !self.grid.playable(target) || !self.grid.playable(build) {
            return Err(TurnError::IllegalMove("move or build on an unplayable cell".into()));
        }
        Ok(())
    }

    fn move_and_build(&mut self, pawn: usize, target: Coord, build: Coord, player: usize) -> Result<(), TurnError> {
        self.check_cells(&target, &build)?;
        if self.occupant(&target).is_some() {
            return Err(TurnError::IllegalMove("target cell is occupied by another pawn".into()));
        }
        if self.grid.height_at(&target) > self.grid.height_at(&self.pawns[pawn]) + 1 {
            return Err(TurnError::IllegalMove("target cell is too high to climb to".into()));
        }
        // Building under a foreign pawn is only illegal when the acting
        // player can see that pawn.
        if let Some(blocker) = self.occupant(&build) {
            if blocker != pawn && self.visible(player, &build) {
                return Err(TurnError::IllegalMove("build cell is occupied by a visible pawn".into()));
            }
        }

        self.pawns[pawn] = target;
        if self.grid.height_at(&target) == MAX_LEVEL {
            self.scores[player] += 1;
        }
        if self.occupant(&build).is_none() {
            self.grid.build(&build);
        }
        Ok(())
    }

    fn push_and_build(&mut self, target: Coord, build: Coord, player: usize) -> Result<(), TurnError> {
        self.check_cells(&target, &build)?;
        let Some(victim) = self.occupant(&target) else {
            return Err(TurnError::IllegalMove("no pawn to push on the target cell".into()));
        };
        if self.grid.height_at(&build) > self.grid.height_at(&target) + 1 {
            return Err(TurnError::IllegalMove("destination is too high for the pushed pawn".into()));
        }
        if self.occupant(&build).is_some() && self.visible(player, &build) {
            return Err(TurnError::IllegalMove("pushing onto a visible pawn".into()));
        }

        // A destination holding an invisible pawn validates but moves
        // nothing; the push is swallowed.
        if self.occupant(&build).is_none() {
            self.pawns[victim] = build;
            self.grid.build(&target);
        }
        Ok(())
    }
}
