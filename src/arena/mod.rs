mod options;
mod round;

use std::{
    path::Path,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    },
    thread,
};

use statrs::function::erf::erf;

pub use options::ArenaOptions;
pub use round::{Outcome, play_game, play_round};

use crate::prelude::*;

/// Aggregated results across all workers. A win is worth two half-points,
/// a draw one for each side; aborted rounds count nothing.
#[derive(Debug, Default)]
pub struct Counters {
    started: AtomicUsize,
    games: AtomicU64,
    draws: AtomicU64,
    half_points: [AtomicU64; NUM_PLAYERS],
}

impl Counters {
    /// Folds one finished round into the totals.
    pub fn record(&self, outcome: Outcome) {
        match outcome {
            Outcome::Winner(winner) => {
                self.half_points[winner].fetch_add(2, Ordering::Relaxed);
            }
            Outcome::Draw => {
                self.draws.fetch_add(1, Ordering::Relaxed);
                self.half_points[0].fetch_add(1, Ordering::Relaxed);
                self.half_points[1].fetch_add(1, Ordering::Relaxed);
            }
            Outcome::Aborted => return,
        }
        self.games.fetch_add(1, Ordering::Relaxed);
    }

    pub fn games(&self) -> u64 {
        self.games.load(Ordering::Relaxed)
    }

    fn snapshot(&self) -> (u64, u64, u64) {
        (
            self.games.load(Ordering::Relaxed),
            self.draws.load(Ordering::Relaxed),
            self.half_points[0].load(Ordering::Relaxed),
        )
    }
}

/// Bot 0's running win rate, its binomial standard error, and the one-sided
/// normal confidence that bot 0 is the stronger contestant.
pub fn win_stats(half_points: u64, games: u64) -> (f64, f64, f64) {
    let p = half_points as f64 / (2 * games) as f64;
    let sigma = (p * (1.0 - p) / games as f64).sqrt();
    let better = if sigma > 0.0 {
        0.5 + 0.5 * erf((p - 0.5) / (sigma * std::f64::consts::SQRT_2))
    } else if p > 0.5 {
        1.0
    } else if p < 0.5 {
        0.0
    } else {
        0.5
    };
    (p, sigma, better)
}

/// The match orchestrator: a fixed pool of workers playing rounds until a
/// termination signal or the round budget runs out.
pub struct Arena {
    options: ArenaOptions,
    names: [String; NUM_PLAYERS],
    counters: Counters,
    stop: Arc<AtomicBool>,
    progress: Mutex<()>,
}

impl Arena {
    /// Validates both contestant paths up front. A missing executable is an
    /// argument problem, not an arena failure: the diagnostic goes to stderr
    /// and the process leaves cleanly with status 0 before any game starts.
    pub fn new(options: ArenaOptions) -> Arena {
        let names = [options.bot0.clone(), options.bot1.clone()];
        for name in names.iter() {
            if !Path::new(name).exists() {
                eprintln!("{name} couldn't be found");
                std::process::exit(0);
            }
        }
        Arena {
            options,
            names,
            counters: Counters::default(),
            stop: Arc::new(AtomicBool::new(false)),
            progress: Mutex::new(()),
        }
    }

    /// Runs rounds on the worker pool until stopped. A contestant crashing
    /// mid-write must not take the arena down with it, so the broken-pipe
    /// signal is ignored process-wide.
    pub fn run(&self) -> Result<()> {
        let stop = Arc::clone(&self.stop);
        ctrlc::set_handler(move || stop.store(true, Ordering::Relaxed))?;
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_IGN);
        }

        println!("Testing AI {} vs {}", self.names[0], self.names[1]);
        let workers = self.options.worker_count();
        log::info!("running {workers} arena worker(s)");
        thread::scope(|scope| {
            for _ in 0..workers {
                scope.spawn(|| self.worker());
            }
        });
        Ok(())
    }

    fn worker(&self) {
        while !self.stop.load(Ordering::Relaxed) {
            if let Some(limit) = self.options.rounds {
                if self.counters.started.fetch_add(1, Ordering::Relaxed) >= limit {
                    break;
                }
            }
            let played = round::play_round(&self.names, &self.options.deadlines(), self.options.debug_ai, &self.stop);
            match played {
                Ok(Outcome::Aborted) => break,
                Ok(outcome) => {
                    self.counters.record(outcome);
                    self.report();
                }
                Err(e) => {
                    log::error!("round could not be played: {e:#}");
                    break;
                }
            }
        }
    }

    /// Prints the running estimate. One line per finished round, serialized
    /// so parallel workers never interleave output.
    fn report(&self) {
        let (games, draws, half_points) = self.counters.snapshot();
        let (p, sigma, better) = win_stats(half_points, games);
        let _lock = self.progress.lock().unwrap_or_else(PoisonError::into_inner);
        println!(
            "Wins:{:.2}+-{:.2}% Rounds:{} Draws:{} {:.2}% chance that {} is better",
            100.0 * p,
            100.0 * sigma,
            games,
            draws,
            100.0 * better,
            self.names[0]
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{Counters, Outcome, win_stats};

    #[test]
    fn counters_score_wins_and_draws() {
        let counters = Counters::default();
        counters.record(Outcome::Winner(0));
        counters.record(Outcome::Winner(0));
        counters.record(Outcome::Winner(1));
        counters.record(Outcome::Draw);
        counters.record(Outcome::Aborted);
        let (games, draws, half_points) = counters.snapshot();
        assert_eq!(games, 4);
        assert_eq!(draws, 1);
        assert_eq!(half_points, 5);
    }

    #[test]
    fn a_balanced_match_is_a_coin_flip() {
        let (p, sigma, better) = win_stats(10, 10);
        assert_eq!(p, 0.5);
        assert!(sigma > 0.0);
        assert!((better - 0.5).abs() < 1e-9);
    }

    #[test]
    fn a_sweep_is_certain() {
        let (p, sigma, better) = win_stats(20, 10);
        assert_eq!(p, 1.0);
        assert_eq!(sigma, 0.0);
        assert_eq!(better, 1.0);

        let (p, _, better) = win_stats(0, 10);
        assert_eq!(p, 0.0);
        assert_eq!(better, 0.0);
    }

    #[test]
    fn confidence_grows_with_the_sample() {
        let (_, _, few) = win_stats(12, 10);
        let (_, _, many) = win_stats(120, 100);
        assert!(many > few);
        assert!(few > 0.5);
    }
}
