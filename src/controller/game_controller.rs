//! The single owner of all interactive game state.
//!
//! `GameController` is driven by one loop: user events go through
//! `handle_event`, background results are merged by `poll_results` on every
//! tick, and the frontend pulls frames with `take_frame` and transient
//! messages with `drain_notices`. Nothing else writes the position.
//!
//! Every committed position bumps `epoch`. Oracle requests carry the epoch
//! of their snapshot and a reply whose epoch no longer matches is rejected
//! before it can touch the live position.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use crate::controller::color_resolution::{resolve_board, ColorContext, SquareColor};
use crate::controller::confirmation::{ConfirmationGate, GateDecision, GatedAction};
use crate::controller::events::{Flow, Notice, UiEvent};
use crate::controller::game_over::GameOverDetector;
use crate::controller::selection::{ClickOutcome, Selection};
use crate::controller::view::{
    BoardView, CellView, ControlsView, BOT_LABEL, PLAYER_ONE_LABEL, PLAYER_TWO_LABEL,
};
use crate::oracle::dispatcher::{Dispatcher, OracleReply, RequestKind};
use crate::rules::chess_move::Move;
use crate::rules::chess_types::Side;
use crate::rules::outcome::GameOutcome;
use crate::rules::position::Position;
use crate::rules::square::Square;

/// The automated opponent always plays Black.
pub const BOT_SIDE: Side = Side::Black;

#[derive(Debug, Clone, Default)]
pub struct ControllerSettings {
    pub bot_enabled: bool,
    pub assistant_enabled: bool,
    /// Position for the first game. Resets always return to the standard
    /// starting position.
    pub start_position: Position,
}

pub struct GameController {
    position: Position,
    epoch: u64,
    selection: Selection,
    suggestion: Option<Move>,
    gate: ConfirmationGate,
    bot_enabled: bool,
    assistant_enabled: bool,
    game_over: GameOverDetector,
    dispatcher: Dispatcher,
    notices: VecDeque<Notice>,
    flash: Option<Square>,
    needs_redraw: bool,
}

impl GameController {
    pub fn new(settings: ControllerSettings, dispatcher: Dispatcher) -> Self {
        Self {
            position: settings.start_position,
            epoch: 0,
            selection: Selection::Idle,
            suggestion: None,
            gate: ConfirmationGate::default(),
            bot_enabled: settings.bot_enabled,
            assistant_enabled: settings.assistant_enabled,
            game_over: GameOverDetector::default(),
            dispatcher,
            notices: VecDeque::new(),
            flash: None,
            needs_redraw: true,
        }
    }

    /// Issue the requests the initial position calls for.
    pub fn start(&mut self) {
        self.request_follow_up();
    }

    pub fn handle_event(&mut self, event: UiEvent) -> Flow {
        self.needs_redraw = true;

        let gated = match event {
            UiEvent::Reset => Some(GatedAction::Reset),
            UiEvent::Exit => Some(GatedAction::Exit),
            UiEvent::ToggleBot => Some(GatedAction::ToggleBot),
            _ => None,
        };
        if let Some(action) = gated {
            return self.trigger_gated(action);
        }

        if let Some(disarmed) = self.gate.cancel() {
            debug!(action = %disarmed, "confirmation cancelled by another control");
        }

        match event {
            UiEvent::CellClicked { row, col } => self.on_cell_clicked(row, col),
            UiEvent::ToggleAssistant => self.on_toggle_assistant(),
            UiEvent::LoadPosition(text) => self.on_load_position(&text),
            UiEvent::PassTurn => self.on_pass_turn(),
            UiEvent::Reset | UiEvent::Exit | UiEvent::ToggleBot => {}
        }
        Flow::Continue
    }

    /// Drain at most one result per request kind, then merge. Play results go
    /// first so a suggestion is never shown for a position the bot just left.
    pub fn poll_results(&mut self) {
        let busy_before = self.busy();
        let play = self.dispatcher.try_take(RequestKind::Play);
        let suggest = self.dispatcher.try_take(RequestKind::Suggest);
        if let Some(reply) = play {
            self.merge_play(reply);
        }
        if let Some(reply) = suggest {
            self.merge_suggestion(reply);
        }
        if self.busy() != busy_before {
            self.needs_redraw = true;
        }
    }

    fn busy(&self) -> (bool, bool) {
        (
            self.dispatcher.is_pending(RequestKind::Play),
            self.dispatcher.is_pending(RequestKind::Suggest),
        )
    }

    /// A frame if anything changed since the last one. The illegal-move
    /// flash is shown in exactly one frame.
    pub fn take_frame(&mut self) -> Option<BoardView> {
        if !self.needs_redraw {
            return None;
        }
        let frame = self.view();
        self.needs_redraw = false;
        self.flash = None;
        Some(frame)
    }

    pub fn view(&self) -> BoardView {
        let ctx = ColorContext {
            position: &self.position,
            selection: &self.selection,
            suggestion: self.suggestion.as_ref(),
            assistant_enabled: self.assistant_enabled,
            bot_to_move: self.bot_to_move(),
        };
        let colors = resolve_board(&ctx);

        let cells = Square::all()
            .map(|square| CellView {
                square,
                piece: self.position.piece_at(square),
                color: if self.flash == Some(square) {
                    SquareColor::Error
                } else {
                    colors[usize::from(square.index())]
                },
            })
            .collect();

        BoardView {
            cells,
            controls: ControlsView {
                player_one_label: PLAYER_ONE_LABEL,
                player_two_label: self.opponent_label(),
                side_to_move: self.position.side_to_move(),
                reset_armed: self.gate.is_armed(GatedAction::Reset),
                exit_armed: self.gate.is_armed(GatedAction::Exit),
                toggle_bot_armed: self.gate.is_armed(GatedAction::ToggleBot),
                bot_enabled: self.bot_enabled,
                assistant_enabled: self.assistant_enabled,
                pass_enabled: self.pass_enabled(),
                bot_thinking: self.dispatcher.is_pending(RequestKind::Play),
                assistant_thinking: self.dispatcher.is_pending(RequestKind::Suggest),
            },
            fen: self.position.fen(),
        }
    }

    /// Report the outcome the first time the game is observed to be over.
    pub fn check_game_over(&mut self) -> Option<GameOutcome> {
        let outcome = self.game_over.observe(&self.position)?;
        info!(
            winner = ?outcome.winner,
            termination = %outcome.termination,
            fen = %self.position.fen(),
            "game over"
        );
        self.needs_redraw = true;
        self.notices.push_back(Notice::GameOver {
            outcome,
            opponent_label: self.opponent_label(),
        });
        Some(outcome)
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    #[inline]
    pub fn position(&self) -> &Position {
        &self.position
    }

    #[inline]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[inline]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[inline]
    pub fn suggestion(&self) -> Option<Move> {
        self.suggestion
    }

    #[inline]
    pub fn pending_confirmation(&self) -> Option<GatedAction> {
        self.gate.pending()
    }

    #[inline]
    pub fn bot_enabled(&self) -> bool {
        self.bot_enabled
    }

    #[inline]
    pub fn assistant_enabled(&self) -> bool {
        self.assistant_enabled
    }

    #[inline]
    pub fn game_over_notified(&self) -> bool {
        self.game_over.notified()
    }

    #[inline]
    pub fn is_request_pending(&self, kind: RequestKind) -> bool {
        self.dispatcher.is_pending(kind)
    }

    pub fn bot_to_move(&self) -> bool {
        self.bot_enabled && self.position.side_to_move() == BOT_SIDE
    }

    pub fn pass_enabled(&self) -> bool {
        !self.bot_to_move() && !self.position.is_terminal()
    }

    fn opponent_label(&self) -> &'static str {
        if self.bot_enabled {
            BOT_LABEL
        } else {
            PLAYER_TWO_LABEL
        }
    }

    fn trigger_gated(&mut self, action: GatedAction) -> Flow {
        match self.gate.trigger(action) {
            GateDecision::Armed => {
                debug!(action = %action, "confirmation armed");
                Flow::Continue
            }
            GateDecision::Confirmed => self.execute(action),
        }
    }

    fn execute(&mut self, action: GatedAction) -> Flow {
        info!(action = %action, "confirmed action executed");
        match action {
            GatedAction::Exit => return Flow::Exit,
            GatedAction::Reset => {}
            GatedAction::ToggleBot => self.bot_enabled = !self.bot_enabled,
        }
        self.start_new_game(Position::new_game());
        Flow::Continue
    }

    fn start_new_game(&mut self, position: Position) {
        self.commit_position(position);
        self.clear_suggestion();
        self.game_over.reset();
        self.request_follow_up();
    }

    fn on_cell_clicked(&mut self, row: u8, col: u8) {
        let Some(square) = Square::from_row_col(row, col) else {
            warn!(row, col, "click outside the board ignored");
            return;
        };
        if self.bot_to_move() || self.position.is_terminal() {
            debug!(square = %square, "click ignored");
            return;
        }

        match self.selection.click(square, &self.position) {
            ClickOutcome::Selected(_) | ClickOutcome::Deselected | ClickOutcome::Ignored => {}
            ClickOutcome::WrongTurn(square) => {
                self.notices.push_back(Notice::WrongTurn { square });
            }
            ClickOutcome::IllegalMove(square) => {
                self.flash = Some(square);
                self.notices.push_back(Notice::IllegalMove { square });
            }
            ClickOutcome::Moved(mv) => self.apply_human_move(mv),
        }
    }

    fn apply_human_move(&mut self, mv: Move) {
        let mover = self.position.side_to_move();
        match self.position.play(&mv) {
            Ok(next) => {
                debug!(mv = %mv, side = %mover, "human move applied");
                if self.suggestion == Some(mv) {
                    self.clear_suggestion();
                }
                self.commit_position(next);
                self.request_follow_up();
            }
            Err(err) => {
                warn!(mv = %mv, error = %err, "selected move rejected by the rules");
                self.clear_selection();
                self.flash = Some(mv.to);
                self.notices.push_back(Notice::IllegalMove { square: mv.to });
            }
        }
    }

    fn on_toggle_assistant(&mut self) {
        self.assistant_enabled = !self.assistant_enabled;
        debug!(enabled = self.assistant_enabled, "assistant toggled");
        if self.assistant_enabled {
            if !self.bot_to_move() && !self.position.is_terminal() {
                self.dispatch(RequestKind::Suggest);
            }
        } else {
            self.clear_suggestion();
            self.dispatcher.abandon(RequestKind::Suggest);
        }
    }

    fn on_load_position(&mut self, text: &str) {
        match Position::from_fen(text) {
            Ok(position) => {
                info!(fen = %position.fen(), "position loaded");
                self.start_new_game(position);
            }
            Err(err) => {
                info!(fen = text, error = %err, "invalid FEN rejected");
                self.notices.push_back(Notice::InvalidPosition {
                    reason: err.to_string(),
                });
            }
        }
    }

    fn on_pass_turn(&mut self) {
        if !self.pass_enabled() {
            debug!("pass ignored");
            return;
        }
        match self.position.pass_turn() {
            Ok(next) => {
                debug!(side = %self.position.side_to_move(), "turn passed");
                self.commit_position(next);
                self.request_follow_up();
            }
            Err(err) => {
                info!(error = %err, "pass rejected");
                self.notices.push_back(Notice::PassRejected {
                    reason: err.to_string(),
                });
            }
        }
    }

    fn merge_play(&mut self, reply: OracleReply) {
        if let Some(reason) = self.staleness(&reply) {
            reject_stale(&reply, self.epoch, reason);
            return;
        }
        if !self.bot_to_move() {
            reject_stale(&reply, self.epoch, "not the bot's turn");
            return;
        }

        match self.position.play(&reply.mv) {
            Ok(next) => {
                debug!(mv = %reply.mv, side = %BOT_SIDE, "bot move applied");
                self.commit_position(next);
                self.clear_suggestion();
                self.request_follow_up();
            }
            Err(_) => reject_stale(&reply, self.epoch, "illegal in current position"),
        }
    }

    fn merge_suggestion(&mut self, reply: OracleReply) {
        if let Some(reason) = self.staleness(&reply) {
            reject_stale(&reply, self.epoch, reason);
            return;
        }
        if !self.assistant_enabled || self.bot_to_move() {
            reject_stale(&reply, self.epoch, "assistant not advising");
            return;
        }

        debug!(mv = %reply.mv, "suggestion installed");
        self.suggestion = Some(reply.mv);
        self.needs_redraw = true;
    }

    fn staleness(&self, reply: &OracleReply) -> Option<&'static str> {
        if reply.epoch != self.epoch {
            Some("position changed since dispatch")
        } else if !self.position.is_legal(&reply.mv) {
            Some("illegal in current position")
        } else {
            None
        }
    }

    /// Dispatch whatever the current position needs: the bot's move when it
    /// is the bot's turn, otherwise a suggestion if the assistant is on.
    fn request_follow_up(&mut self) {
        if self.position.is_terminal() {
            return;
        }
        if self.bot_to_move() {
            self.dispatch(RequestKind::Play);
        } else if self.assistant_enabled {
            self.dispatch(RequestKind::Suggest);
        }
    }

    fn dispatch(&mut self, kind: RequestKind) {
        self.dispatcher
            .dispatch(kind, self.position.clone(), self.epoch);
        self.needs_redraw = true;
    }

    fn commit_position(&mut self, next: Position) {
        self.position = next;
        self.epoch += 1;
        self.clear_selection();
        self.drop_illegal_suggestion();
        self.needs_redraw = true;
    }

    fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn clear_suggestion(&mut self) {
        self.suggestion = None;
    }

    fn drop_illegal_suggestion(&mut self) {
        if let Some(mv) = self.suggestion {
            if !self.position.is_legal(&mv) {
                debug!(mv = %mv, "suggestion no longer legal");
                self.suggestion = None;
            }
        }
    }
}

fn reject_stale(reply: &OracleReply, current_epoch: u64, reason: &str) {
    info!(
        request = %reply.kind,
        epoch = reply.epoch,
        current_epoch,
        mv = %reply.mv,
        reason,
        "StaleResultRejected"
    );
}
