/*
 *  The Wondev Woman builder/pusher game as the referee sees it.
 */

pub mod board;
pub(crate) mod consts;
pub mod coords;
pub mod maps;
pub mod notation;
pub mod rules;

pub mod prelude {
    pub(crate) use crate::utils::prelude::*;

    pub use super::{
        board::{Grid, State},
        consts::*,
        coords::{Coord, Direction},
        maps,
        notation::RawAction,
        rules::{Action, TurnError},
    };
}
