//! Oracle backed by an external UCI engine process.
//!
//! A fresh engine process is spawned for every consultation and torn down
//! afterwards, so concurrent requests never share a process handle. The
//! position is always sent as FEN; move history (which may contain passes)
//! is never sent.

use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::errors::OracleError;
use crate::oracle::oracle_trait::Oracle;
use crate::rules::chess_move::Move;
use crate::rules::position::Position;

/// Extra time granted on top of the search budget for process start-up and
/// the protocol handshake.
pub const HANDSHAKE_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct UciOracle {
    path: PathBuf,
    args: Vec<String>,
    name: String,
    grace: Duration,
}

impl UciOracle {
    /// Verify the executable exists and completes a `uci`/`uciok` handshake.
    pub fn establish(path: &Path) -> Result<Self, OracleError> {
        Self::establish_with_args(path, Vec::new())
    }

    pub fn establish_with_args(path: &Path, args: Vec<String>) -> Result<Self, OracleError> {
        if !path.is_file() {
            return Err(OracleError::Unavailable(format!(
                "engine executable not found: {}",
                path.display()
            )));
        }

        let mut oracle = Self {
            path: path.to_path_buf(),
            args,
            name: path.display().to_string(),
            grace: HANDSHAKE_GRACE,
        };

        let deadline = Instant::now() + oracle.grace;
        let mut session = UciSession::spawn(&oracle.path, &oracle.args)?;
        if let Some(id_name) = session.handshake(deadline, oracle.grace)? {
            oracle.name = id_name;
        }
        session.quit();

        Ok(oracle)
    }

    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }
}

impl Oracle for UciOracle {
    fn name(&self) -> &str {
        &self.name
    }

    fn best_move(&self, snapshot: &Position, budget: Duration) -> Result<Move, OracleError> {
        let allowed = budget + self.grace;
        let deadline = Instant::now() + allowed;

        let mut session = UciSession::spawn(&self.path, &self.args)?;
        session.handshake(deadline, allowed)?;
        session.send("ucinewgame")?;
        session.send("isready")?;
        session.wait_for(|line| line == "readyok", deadline, allowed)?;
        session.send(&format!("position fen {}", snapshot.fen()))?;
        session.send(&format!("go movetime {}", budget.as_millis()))?;
        let line = session.wait_for(|line| line.starts_with("bestmove"), deadline, allowed)?;
        session.quit();

        let mv = parse_bestmove(&line)?;
        if !snapshot.is_legal(&mv) {
            return Err(OracleError::Protocol(format!(
                "engine proposed {mv}, which is illegal in {}",
                snapshot.fen()
            )));
        }
        Ok(mv)
    }
}

/// Parse `bestmove <lan> [ponder <lan>]`.
pub fn parse_bestmove(line: &str) -> Result<Move, OracleError> {
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some("bestmove") {
        return Err(OracleError::Protocol(format!(
            "expected bestmove, got '{line}'"
        )));
    }

    match tokens.next() {
        None | Some("0000") | Some("(none)") => Err(OracleError::NoMove),
        Some(text) => text.parse::<Move>().map_err(OracleError::Protocol),
    }
}

/// One running engine process with a line-reader thread on its stdout.
struct UciSession {
    child: Child,
    stdin: ChildStdin,
    lines: Receiver<String>,
}

impl UciSession {
    fn spawn(path: &Path, args: &[String]) -> Result<Self, OracleError> {
        let mut child = Command::new(path)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                OracleError::Unavailable(format!("failed to start {}: {e}", path.display()))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| OracleError::Unavailable("engine stdin unavailable".to_owned()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| OracleError::Unavailable("engine stdout unavailable".to_owned()))?;

        let (sender, lines) = mpsc::channel::<String>();
        thread::Builder::new()
            .name("uci-reader".to_owned())
            .spawn(move || {
                for line in BufReader::new(stdout).lines().map_while(Result::ok) {
                    if sender.send(line).is_err() {
                        break;
                    }
                }
            })
            .map_err(|e| OracleError::Unavailable(format!("failed to spawn reader: {e}")))?;

        Ok(Self {
            child,
            stdin,
            lines,
        })
    }

    /// `uci` until `uciok`; returns the engine's `id name` if announced.
    fn handshake(
        &mut self,
        deadline: Instant,
        allowed: Duration,
    ) -> Result<Option<String>, OracleError> {
        self.send("uci")?;
        let mut id_name = None;
        loop {
            let line = self.next_line(deadline, allowed)?;
            if line == "uciok" {
                return Ok(id_name);
            }
            if let Some(name) = line.strip_prefix("id name ") {
                id_name = Some(name.trim().to_owned());
            }
        }
    }

    fn send(&mut self, command: &str) -> Result<(), OracleError> {
        trace!(command, "uci >");
        writeln!(self.stdin, "{command}")
            .and_then(|_| self.stdin.flush())
            .map_err(|e| OracleError::Unavailable(format!("engine input closed: {e}")))
    }

    fn wait_for(
        &mut self,
        accept: impl Fn(&str) -> bool,
        deadline: Instant,
        allowed: Duration,
    ) -> Result<String, OracleError> {
        loop {
            let line = self.next_line(deadline, allowed)?;
            if accept(&line) {
                return Ok(line);
            }
        }
    }

    fn next_line(&mut self, deadline: Instant, allowed: Duration) -> Result<String, OracleError> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(OracleError::Timeout(allowed));
        }
        match self.lines.recv_timeout(remaining) {
            Ok(line) => {
                let line = line.trim().to_owned();
                trace!(line = %line, "uci <");
                Ok(line)
            }
            Err(RecvTimeoutError::Timeout) => Err(OracleError::Timeout(allowed)),
            Err(RecvTimeoutError::Disconnected) => Err(OracleError::Unavailable(
                "engine closed its output".to_owned(),
            )),
        }
    }

    fn quit(&mut self) {
        let _ = self.send("quit");
    }
}

impl Drop for UciSession {
    fn drop(&mut self) {
        match self.child.try_wait() {
            Ok(Some(_)) => {}
            _ => {
                debug!(pid = self.child.id(), "terminating engine process");
                let _ = self.child.kill();
                let _ = self.child.wait();
            }
        }
    }
}
