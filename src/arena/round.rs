use std::sync::atomic::{AtomicBool, Ordering};

use rand::Rng;

use crate::prelude::*;

/// Result of one game, in the numbering of whoever supplied the contestant
/// paths.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Winner(usize),
    Draw,
    /// The shutdown flag interrupted the game; nobody gets the point.
    Aborted,
}

impl Outcome {
    /// Re-expresses the outcome after a side-swap.
    fn swapped(self) -> Outcome {
        match self {
            Outcome::Winner(winner) => Outcome::Winner(1 - winner),
            other => other,
        }
    }
}

/// One complete round: coin-flip the seats, roll a fresh map, play a game,
/// and report the winner in the caller's numbering.
pub fn play_round(
    names: &[String; NUM_PLAYERS],
    deadlines: &Deadlines,
    debug_ai: bool,
    stop: &AtomicBool,
) -> Result<Outcome> {
    let mut rng = rand::rng();
    let swap = rng.random_bool(0.5);
    let mut seats = [names[0].as_str(), names[1].as_str()];
    if swap {
        seats.swap(0, 1);
    }
    let state = maps::random_state(&mut rng);
    let outcome = play_game(&seats, state, deadlines, debug_ai, stop)?;
    Ok(if swap { outcome.swapped() } else { outcome })
}

/// Drives a single game from `state` to its end. Contestant failures only
/// ever disqualify the bot that caused them; the opponent plays on and may
/// still win on score.
pub fn play_game(
    seats: &[&str; NUM_PLAYERS],
    mut state: State,
    deadlines: &Deadlines,
    debug_ai: bool,
    stop: &AtomicBool,
) -> Result<Outcome> {
    let w = state.grid.width();
    let mut bots = [Contestant::start(seats[0])?, Contestant::start(seats[1])?];
    for bot in bots.iter_mut() {
        if let Err(e) = bot.feed(&format!("{w}\n{PAWNS_PER_PLAYER}\n")) {
            log::warn!("{} died before receiving the preamble: {e}", bot.name());
            bot.stop(Some(0));
        }
    }

    let mut turn = 0;
    loop {
        turn += 1;
        if stop.load(Ordering::Relaxed) {
            return Ok(Outcome::Aborted);
        }
        for id in 0..NUM_PLAYERS {
            if bots[id].alive() {
                if let Err(e) = take_turn(&mut state, &mut bots[id], id, turn, deadlines, debug_ai) {
                    log::warn!("disqualifying player {id} ({}) on turn {turn}: {e}", bots[id].name());
                    bots[id].stop(Some(turn));
                }
            } else if state.scores[id] < state.scores[1 - id] {
                // The dead player can no longer catch up.
                return Ok(Outcome::Winner(1 - id));
            }
        }
        let all_dead = {
            let dead0 = !bots[0].alive();
            dead0 && !bots[1].alive()
        };
        if all_dead || turn == MAX_TURNS {
            return Ok(decide_on_score(&state));
        }
    }
}

/// Feeds one turn packet, collects the reply under the deadline and applies
/// the move to the shared state.
fn take_turn(
    state: &mut State,
    bot: &mut Contestant,
    player: usize,
    turn: u32,
    deadlines: &Deadlines,
    debug_ai: bool,
) -> Result<(), TurnError> {
    bot.feed(&turn_packet(state, player))?;
    let line = bot.read_move(turn, deadlines)?;
    let chatter = bot.drain_stderr()?;
    if debug_ai && !chatter.is_empty() {
        log::debug!("{} stderr:\n{}", bot.name(), chatter.trim_end());
    }
    let raw = line.parse::<RawAction>()?;
    let action = state.resolve(&raw, player);
    state.apply(&action, player)
}

/// The player-relative view for one turn: the grid, the player's own pawns,
/// the opponent pawns they are allowed to see, and the legal-move count the
/// referee never bothers to compute.
fn turn_packet(state: &State, player: usize) -> String {
    let mut packet = state.grid.notate();
    packet.push('\n');
    for i in 0..PAWNS_PER_PLAYER {
        packet.push_str(&state.pawns[player * PAWNS_PER_PLAYER + i].notate());
        packet.push('\n');
    }
    let opponent = 1 - player;
    for i in 0..PAWNS_PER_PLAYER {
        let pawn = state.pawns[opponent * PAWNS_PER_PLAYER + i];
        let shown = if state.visible(player, &pawn) { pawn } else { Coord::new(-1, -1) };
        packet.push_str(&shown.notate());
        packet.push('\n');
    }
    packet.push_str("0\n");
    packet
}

fn decide_on_score(state: &State) -> Outcome {
    if state.scores[0] > state.scores[1] {
        Outcome::Winner(0)
    } else if state.scores[1] > state.scores[0] {
        Outcome::Winner(1)
    } else {
        Outcome::Draw
    }
}
