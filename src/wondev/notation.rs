use regex::Regex;

use crate::wondev::prelude::*;

/// A contestant's turn line, parsed but not yet anchored to a position.
/// Pawn ids are relative to the acting player; directions still need a pawn
/// to resolve into cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawAction {
    MoveAndBuild { pawn: usize, step: Direction, build: Direction },
    PushAndBuild { pawn: usize, push: Direction, shove: Direction },
    AcceptDefeat,
}

impl std::str::FromStr for RawAction {
    type Err = TurnError;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        // The first newline-terminated line is the whole move; anything a
        // chatty bot printed after it is ignored.
        let line = s.lines().next().unwrap_or("").trim();
        let malformed = || TurnError::Malformed(line.to_owned());

        if line.split_whitespace().next() == Some("ACCEPT-DEFEAT") {
            return Ok(RawAction::AcceptDefeat);
        }

        let pattern = Regex::new("^(?<verb>MOVE&BUILD|PUSH&BUILD)\\s+(?<id>-?[0-9]+)\\s+(?<dir1>[A-Z]+)\\s+(?<dir2>[A-Z]+)")
            .map_err(|_| malformed())?;
        let Some(matches) = pattern.captures(line) else {
            return Err(malformed());
        };

        let pawn = matches["id"].parse::<usize>().map_err(|_| malformed())?;
        if pawn >= PAWNS_PER_PLAYER {
            return Err(malformed());
        }
        let dir1 = matches["dir1"].parse::<Direction>().map_err(|_| malformed())?;
        let dir2 = matches["dir2"].parse::<Direction>().map_err(|_| malformed())?;

        match &matches["verb"] {
            "MOVE&BUILD" => Ok(RawAction::MoveAndBuild { pawn, step: dir1, build: dir2 }),
            _ => {
                if !dir1.adjacent(dir2) {
                    return Err(TurnError::IllegalPushAngle(dir1, dir2));
                }
                Ok(RawAction::PushAndBuild { pawn, push: dir1, shove: dir2 })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RawAction;
    use crate::wondev::prelude::*;

    #[test]
    fn parses_both_build_verbs() {
        assert_eq!(
            "MOVE&BUILD 0 SE N\n".parse::<RawAction>().unwrap(),
            RawAction::MoveAndBuild { pawn: 0, step: Direction::SE, build: Direction::N }
        );
        assert_eq!(
            "PUSH&BUILD 1 W NW".parse::<RawAction>().unwrap(),
            RawAction::PushAndBuild { pawn: 1, push: Direction::W, shove: Direction::NW }
        );
    }

    #[test]
    fn first_line_wins_and_trailing_chatter_is_ignored() {
        assert_eq!(
            "MOVE&BUILD 1 N N extra words\nPUSH&BUILD 0 E E\n".parse::<RawAction>().unwrap(),
            RawAction::MoveAndBuild { pawn: 1, step: Direction::N, build: Direction::N }
        );
    }

    #[test]
    fn resignation_is_recognized() {
        assert_eq!("ACCEPT-DEFEAT\n".parse::<RawAction>().unwrap(), RawAction::AcceptDefeat);
    }

    #[test]
    fn garbage_is_malformed() {
        for line in ["", "\n", "JUMP&BUILD 0 N N", "MOVE&BUILD", "MOVE&BUILD 0 N", "MOVE&BUILD 0 UP DOWN", "move&build 0 n n"] {
            assert!(matches!(line.parse::<RawAction>(), Err(TurnError::Malformed(_))), "{line:?}");
        }
    }

    #[test]
    fn pawn_id_must_name_one_of_two_pawns() {
        assert!(matches!("MOVE&BUILD 2 N N".parse::<RawAction>(), Err(TurnError::Malformed(_))));
        assert!(matches!("MOVE&BUILD -1 N N".parse::<RawAction>(), Err(TurnError::Malformed(_))));
    }

    #[test]
    fn sideways_pushes_are_rejected_at_parse_time() {
        let err = "PUSH&BUILD 0 N S".parse::<RawAction>().unwrap_err();
        assert!(matches!(err, TurnError::IllegalPushAngle(Direction::N, Direction::S)));
        // One step around the compass, wrapping past north, is legal.
        assert!("PUSH&BUILD 0 NW N".parse::<RawAction>().is_ok());
        assert!("PUSH&BUILD 0 N NW".parse::<RawAction>().is_ok());
    }
}
