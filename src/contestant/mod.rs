mod pipes;

use std::{
    io::Write,
    os::fd::AsRawFd,
    path::Path,
    process::{Child, ChildStderr, ChildStdin, ChildStdout, Command, Stdio},
    thread,
};

use crate::prelude::*;

/// Wall-clock budgets for collecting a move. The first turn gets a larger
/// allowance so bots can warm up.
#[derive(Clone, Copy, Debug)]
pub struct Deadlines {
    pub first_turn: Duration,
    pub per_turn: Duration,
}

impl Deadlines {
    /// The competitive budgets: 1s for the first turn, 100ms after.
    pub fn strict() -> Deadlines {
        Deadlines { first_turn: Duration::from_secs(1), per_turn: Duration::from_millis(100) }
    }

    /// The default budgets, ten times the competitive ones.
    pub fn relaxed() -> Deadlines {
        Deadlines { first_turn: Duration::from_secs(10), per_turn: Duration::from_secs(1) }
    }

    /// The budget that applies on a given turn.
    pub fn for_turn(&self, turn: u32) -> Duration {
        if turn == 1 { self.first_turn } else { self.per_turn }
    }
}

/// A contestant process behind its three pipes. The handle owns the child:
/// dropping it terminates the process and closes every pipe, whatever path
/// the round took.
pub struct Contestant {
    name: String,
    child: Child,
    stdin: ChildStdin,
    stdout: ChildStdout,
    stderr: ChildStderr,
    alive: bool,
    turn_of_death: Option<u32>,
}

impl Contestant {
    /// Spawns the executable at `path` with all three standard streams
    /// piped. The path is checked before any process is created.
    pub fn start(path: &str) -> Result<Contestant> {
        if !Path::new(path).exists() {
            return Err(anyhow!("contestant {path} couldn't be found"));
        }
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawning contestant {path}"))?;
        let stdin = child.stdin.take().context("child stdin was not piped")?;
        let stdout = child.stdout.take().context("child stdout was not piped")?;
        let stderr = child.stderr.take().context("child stderr was not piped")?;
        Ok(Contestant {
            name: path.to_owned(),
            child,
            stdin,
            stdout,
            stderr,
            alive: true,
            turn_of_death: None,
        })
    }

    /// Whether the process is still running. A contestant that exited on its
    /// own is noticed here and flagged dead.
    pub fn alive(&mut self) -> bool {
        if self.alive && matches!(self.child.try_wait(), Ok(Some(_))) {
            self.alive = false;
        }
        self.alive
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn turn_of_death(&self) -> Option<u32> {
        self.turn_of_death
    }

    /// Writes `text` to the contestant's stdin in one call. Anything short
    /// of the full byte length means the bot is not accepting input.
    pub fn feed(&mut self, text: &str) -> Result<(), TurnError> {
        match self.stdin.write(text.as_bytes()) {
            Ok(written) if written == text.len() => Ok(()),
            _ => Err(TurnError::FeedFailed),
        }
    }

    /// Collects one move line under the turn's deadline. Polls the stdout
    /// pipe with the remaining budget and drains whatever has arrived on
    /// each readable edge; the move is complete at the first newline.
    pub fn read_move(&mut self, turn: u32, deadlines: &Deadlines) -> Result<String, TurnError> {
        let budget = deadlines.for_turn(turn);
        let start = Instant::now();
        let mut out = String::new();
        while !out.contains('\n') {
            let Some(remaining) = budget.checked_sub(start.elapsed()) else {
                return Err(TurnError::Timeout);
            };
            if pipes::poll_readable(self.stdout.as_raw_fd(), remaining).map_err(TurnError::PipeRead)? {
                let chunk = pipes::drain(&mut self.stdout).map_err(TurnError::PipeRead)?;
                if chunk.is_empty() {
                    // Readable with nothing buffered: the bot closed its
                    // stdout without finishing a move.
                    return Err(TurnError::Timeout);
                }
                out.push_str(&chunk);
            }
        }
        Ok(out)
    }

    /// Empties whatever the contestant has written to stderr so far,
    /// without blocking.
    pub fn drain_stderr(&mut self) -> Result<String, TurnError> {
        pipes::drain(&mut self.stderr).map_err(TurnError::PipeRead)
    }

    /// Stops the contestant, recording the turn it died on. Termination is
    /// escalated to an unconditional kill if the process ignores the polite
    /// signal. Idempotent: stopping a dead bot does nothing.
    pub fn stop(&mut self, turn: Option<u32>) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.turn_of_death = turn;
        if matches!(self.child.try_wait(), Ok(Some(_))) {
            return;
        }
        unsafe {
            libc::kill(self.child.id() as libc::pid_t, libc::SIGTERM);
        }
        let grace = Instant::now() + Duration::from_millis(500);
        loop {
            match self.child.try_wait() {
                Ok(Some(_)) => return,
                Ok(None) if Instant::now() < grace => thread::sleep(Duration::from_millis(5)),
                _ => break,
            }
        }
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl Drop for Contestant {
    fn drop(&mut self) {
        self.stop(None);
    }
}

#[cfg(test)]
mod tests {
    use std::{
        path::PathBuf,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use super::{Contestant, Deadlines};
    use crate::prelude::*;

    /// Writes a tiny executable shell script into the temp dir.
    fn script_bot(body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let path = std::env::temp_dir().join(format!(
            "wondev-bot-{}-{}.sh",
            std::process::id(),
            COUNTER.fetch_add(1, Ordering::Relaxed)
        ));
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn start(path: &PathBuf) -> Contestant {
        Contestant::start(path.to_str().unwrap()).unwrap()
    }

    #[test]
    fn missing_executables_are_rejected_before_spawning() {
        assert!(Contestant::start("/no/such/bot").is_err());
    }

    #[test]
    fn feeds_and_reads_a_move() {
        let path = script_bot("read w; read pawns; echo \"MOVE&BUILD 0 N N\"; sleep 5");
        let mut bot = start(&path);
        bot.feed("5\n2\n").unwrap();
        let line = bot.read_move(1, &Deadlines::relaxed()).unwrap();
        assert!(line.starts_with("MOVE&BUILD 0 N N"));
        assert!(bot.alive());
        bot.stop(Some(1));
        assert!(!bot.alive());
    }

    #[test]
    fn silence_times_out() {
        let path = script_bot("sleep 5");
        let mut bot = start(&path);
        let start_time = Instant::now();
        let err = bot.read_move(2, &Deadlines::strict()).unwrap_err();
        assert!(matches!(err, TurnError::Timeout));
        assert!(start_time.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn closed_stdout_without_a_newline_times_out() {
        let path = script_bot("printf 'MOVE'");
        let mut bot = start(&path);
        let err = bot.read_move(2, &Deadlines::strict()).unwrap_err();
        assert!(matches!(err, TurnError::Timeout));
    }

    #[test]
    fn stderr_is_drained_without_blocking() {
        let path = script_bot("echo pondering >&2; echo \"ACCEPT-DEFEAT\"; sleep 5");
        let mut bot = start(&path);
        let _ = bot.read_move(1, &Deadlines::relaxed()).unwrap();
        let chatter = bot.drain_stderr().unwrap();
        assert!(chatter.contains("pondering"));
        assert!(bot.drain_stderr().unwrap().is_empty());
    }

    #[test]
    fn stop_is_idempotent_and_keeps_the_first_death_turn() {
        let path = script_bot("sleep 5");
        let mut bot = start(&path);
        bot.stop(Some(4));
        bot.stop(Some(9));
        assert_eq!(bot.turn_of_death(), Some(4));
        assert!(!bot.alive());
    }

    #[test]
    fn self_exit_is_noticed() {
        let path = script_bot("true");
        let mut bot = start(&path);
        std::thread::sleep(Duration::from_millis(200));
        assert!(!bot.alive());
    }
}
