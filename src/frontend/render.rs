//! Text rendering of controller frames.
//!
//! The board is drawn White at the bottom with rank and file labels. With
//! colors enabled every cell gets its resolved background color; without,
//! a one-character marker in front of the piece carries the same
//! information.

use crossterm::style::{Color, Stylize};

use crate::controller::color_resolution::SquareColor;
use crate::controller::events::Notice;
use crate::controller::view::{BoardView, CellView, ControlsView, PLAYER_ONE_LABEL};
use crate::rules::chess_types::Side;
use crate::rules::square::Square;

const ARMED_LABEL: &str = "SURE?";

/// Render the board. Assumes square indexing where `0 == a1` and `63 == h8`.
pub fn render_board(view: &BoardView, colored: bool) -> String {
    let mut out = String::new();

    out.push_str("   a  b  c  d  e  f  g  h\n");

    for rank in (0..8u8).rev() {
        out.push(char::from(b'1' + rank));
        out.push(' ');

        for file in 0..8u8 {
            let Some(square) = Square::from_rank_file(rank, file) else {
                continue;
            };
            out.push_str(&render_cell(view.cell(square), colored));
        }

        out.push(' ');
        out.push(char::from(b'1' + rank));
        out.push('\n');
    }

    out.push_str("   a  b  c  d  e  f  g  h");

    out
}

fn render_cell(cell: &CellView, colored: bool) -> String {
    let glyph = cell.piece.map(|p| p.to_unicode()).unwrap_or('·');
    if colored {
        let (r, g, b) = cell.color.rgb();
        format!(" {glyph} ")
            .with(Color::Black)
            .on(Color::Rgb { r, g, b })
            .to_string()
    } else {
        format!("{}{glyph} ", marker(cell.color))
    }
}

fn marker(color: SquareColor) -> char {
    match color {
        SquareColor::Light | SquareColor::Dark => ' ',
        SquareColor::Selected => '>',
        SquareColor::ValidLight | SquareColor::ValidDark => '*',
        SquareColor::Capture => 'x',
        SquareColor::Special => '+',
        SquareColor::SuggestedWhite | SquareColor::SuggestedBlack => '?',
        SquareColor::Error => '!',
    }
}

pub fn render_controls(controls: &ControlsView) -> String {
    let to_move = match controls.side_to_move {
        Side::White => controls.player_one_label,
        Side::Black => controls.player_two_label,
    };

    let mut line = format!(
        "{} (White) vs {} (Black) | to move: {to_move}",
        controls.player_one_label, controls.player_two_label
    );
    if controls.bot_thinking {
        line.push_str(" (thinking)");
    }
    line.push('\n');

    let armed = |armed: bool, label: &'static str| if armed { ARMED_LABEL } else { label };
    line.push_str(&format!(
        "[{}] [{}] [{}: {}] [assist: {}{}] [pass{}]",
        armed(controls.reset_armed, "reset"),
        armed(controls.exit_armed, "exit"),
        armed(controls.toggle_bot_armed, "bot"),
        on_off(controls.bot_enabled),
        on_off(controls.assistant_enabled),
        if controls.assistant_thinking { "..." } else { "" },
        if controls.pass_enabled { "" } else { ": disabled" },
    ));
    line
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

pub fn render_notice(notice: &Notice) -> String {
    match notice {
        Notice::WrongTurn { square } => {
            format!("Not your turn: the piece on {square} cannot move now")
        }
        Notice::IllegalMove { square } => format!("Illegal move to {square}"),
        Notice::InvalidPosition { reason } => format!("Invalid FEN: {reason}"),
        Notice::PassRejected { reason } => format!("Cannot pass: {reason}"),
        Notice::GameOver {
            outcome,
            opponent_label,
        } => match outcome.winner {
            Some(Side::White) => {
                format!("Game over: {PLAYER_ONE_LABEL} wins by {}", outcome.termination)
            }
            Some(Side::Black) => {
                format!("Game over: {opponent_label} wins by {}", outcome.termination)
            }
            None => format!("Game over: draw by {}", outcome.termination),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::{render_board, render_controls, render_notice};
    use crate::controller::color_resolution::SquareColor;
    use crate::controller::events::Notice;
    use crate::controller::view::{BoardView, CellView, ControlsView};
    use crate::rules::chess_types::Side;
    use crate::rules::outcome::{GameOutcome, Termination};
    use crate::rules::position::Position;
    use crate::rules::square::Square;

    fn start_view() -> BoardView {
        let position = Position::new_game();
        BoardView {
            cells: Square::all()
                .map(|square| CellView {
                    square,
                    piece: position.piece_at(square),
                    color: SquareColor::base(square),
                })
                .collect(),
            controls: controls(),
            fen: position.fen(),
        }
    }

    fn controls() -> ControlsView {
        ControlsView {
            player_one_label: "PLAYER 1",
            player_two_label: "BOT",
            side_to_move: Side::White,
            reset_armed: true,
            exit_armed: false,
            toggle_bot_armed: false,
            bot_enabled: true,
            assistant_enabled: false,
            pass_enabled: true,
            bot_thinking: false,
            assistant_thinking: false,
        }
    }

    #[test]
    fn plain_board_has_black_on_top() {
        let text = render_board(&start_view(), false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert!(lines[1].starts_with("8 "));
        assert!(lines[1].contains('♜'));
        assert!(lines[8].starts_with("1 "));
        assert!(lines[8].contains('♔'));
        assert!(lines[4].contains('·'));
    }

    #[test]
    fn plain_board_marks_highlighted_cells() {
        let mut view = start_view();
        let e2: Square = "e2".parse().expect("square should parse");
        view.cells[usize::from(e2.index())].color = SquareColor::Selected;
        let text = render_board(&view, false);
        assert!(text.contains(">♙"));
    }

    #[test]
    fn armed_control_reads_sure() {
        let text = render_controls(&controls());
        assert!(text.contains("[SURE?]"));
        assert!(text.contains("PLAYER 1 (White) vs BOT (Black)"));
        assert!(text.contains("[bot: on]"));
    }

    #[test]
    fn game_over_names_the_winner() {
        let notice = Notice::GameOver {
            outcome: GameOutcome {
                winner: Some(Side::Black),
                termination: Termination::Checkmate,
            },
            opponent_label: "BOT",
        };
        assert_eq!(render_notice(&notice), "Game over: BOT wins by checkmate");

        let draw = Notice::GameOver {
            outcome: GameOutcome {
                winner: None,
                termination: Termination::Stalemate,
            },
            opponent_label: "PLAYER 2",
        };
        assert_eq!(render_notice(&draw), "Game over: draw by stalemate");
    }
}
