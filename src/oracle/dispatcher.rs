//! Background oracle consultations with typed one-shot result channels.
//!
//! Each request runs on its own worker thread with a position snapshot
//! moved in by value. The worker reports back through a bounded channel of
//! capacity one; the owning loop drains it with `try_recv` and never blocks.
//! At most one request per kind is outstanding: dispatching again replaces
//! (and thereby abandons) the previous receiver of that kind.

use std::fmt;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error, warn};

use crate::errors::OracleError;
use crate::oracle::oracle_trait::Oracle;
use crate::rules::chess_move::Move;
use crate::rules::position::Position;

/// Default time budget per consultation.
pub const DEFAULT_THINK_TIME: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// The automated opponent's move, applied to the position.
    Play,
    /// An advisory move for the human, only displayed.
    Suggest,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::Play => f.write_str("play"),
            RequestKind::Suggest => f.write_str("suggest"),
        }
    }
}

/// A successful consultation, tagged with the position epoch it answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OracleReply {
    pub kind: RequestKind,
    pub epoch: u64,
    pub mv: Move,
}

#[derive(Debug)]
struct PendingRequest {
    epoch: u64,
    dispatched_at: Instant,
    receiver: Receiver<OracleReply>,
}

pub struct Dispatcher {
    oracle: Arc<dyn Oracle>,
    budget: Duration,
    play: Option<PendingRequest>,
    suggest: Option<PendingRequest>,
}

impl Dispatcher {
    pub fn new(oracle: Arc<dyn Oracle>, budget: Duration) -> Self {
        Self {
            oracle,
            budget,
            play: None,
            suggest: None,
        }
    }

    #[inline]
    pub fn is_pending(&self, kind: RequestKind) -> bool {
        self.slot(kind).is_some()
    }

    /// Start one consultation for `snapshot`. Failures inside the worker are
    /// logged and publish nothing.
    pub fn dispatch(&mut self, kind: RequestKind, snapshot: Position, epoch: u64) {
        let (sender, receiver) = mpsc::sync_channel::<OracleReply>(1);
        let oracle = Arc::clone(&self.oracle);
        let budget = self.budget;

        debug!(request = %kind, epoch, budget_ms = budget.as_millis() as u64, "dispatching oracle request");

        let spawned = thread::Builder::new()
            .name(format!("oracle-{kind}"))
            .spawn(move || match oracle.best_move(&snapshot, budget) {
                Ok(mv) => {
                    // The receiver is gone when the request was superseded.
                    let _ = sender.send(OracleReply { kind, epoch, mv });
                }
                Err(err) => log_oracle_failure(kind, epoch, &err),
            });

        match spawned {
            Ok(_) => {
                let previous = self.slot_mut(kind).replace(PendingRequest {
                    epoch,
                    dispatched_at: Instant::now(),
                    receiver,
                });
                if let Some(previous) = previous {
                    debug!(request = %kind, epoch = previous.epoch, "superseded outstanding request");
                }
            }
            Err(err) => {
                error!(request = %kind, epoch, error = %err, "failed to spawn oracle worker; request dropped");
            }
        }
    }

    /// Non-blocking check for the result of the outstanding request of
    /// `kind`. A worker that exited without publishing clears the slot.
    pub fn try_take(&mut self, kind: RequestKind) -> Option<OracleReply> {
        let slot = self.slot_mut(kind);
        let result = match slot.as_ref() {
            Some(pending) => pending.receiver.try_recv(),
            None => return None,
        };

        match result {
            Ok(reply) => {
                if let Some(pending) = slot.take() {
                    debug!(
                        request = %kind,
                        epoch = pending.epoch,
                        elapsed_ms = pending.dispatched_at.elapsed().as_millis() as u64,
                        mv = %reply.mv,
                        "oracle result received"
                    );
                }
                Some(reply)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                slot.take();
                None
            }
        }
    }

    /// Forget the outstanding request of `kind`; its result will never be
    /// drained.
    pub fn abandon(&mut self, kind: RequestKind) {
        if let Some(pending) = self.slot_mut(kind).take() {
            debug!(request = %kind, epoch = pending.epoch, "abandoned outstanding request");
        }
    }

    fn slot(&self, kind: RequestKind) -> &Option<PendingRequest> {
        match kind {
            RequestKind::Play => &self.play,
            RequestKind::Suggest => &self.suggest,
        }
    }

    fn slot_mut(&mut self, kind: RequestKind) -> &mut Option<PendingRequest> {
        match kind {
            RequestKind::Play => &mut self.play,
            RequestKind::Suggest => &mut self.suggest,
        }
    }
}

fn log_oracle_failure(kind: RequestKind, epoch: u64, err: &OracleError) {
    match err {
        OracleError::Unavailable(_) => {
            warn!(request = %kind, epoch, error = %err, "OracleUnavailable: request dropped")
        }
        OracleError::Timeout(_) => {
            warn!(request = %kind, epoch, error = %err, "OracleTimeout: request dropped")
        }
        OracleError::Protocol(_) | OracleError::NoMove => {
            warn!(request = %kind, epoch, error = %err, "oracle consultation failed: request dropped")
        }
    }
}
