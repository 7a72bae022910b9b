//! Console command parsing.
//!
//! Each line of input becomes zero or more `UiEvent`s. Squares can be named
//! (`e2`), addressed by grid cell (`click 1 4`), or given as a from-to pair
//! (`e2e4`) which expands to two clicks.

use crate::controller::events::UiEvent;
use crate::rules::square::Square;

pub const HELP_TEXT: &str = "\
commands:
  <square>         click a square, e.g. e2
  <from><to>       click two squares, e.g. e2e4
  click <row> <col> click a grid cell (row 0 = rank 1, col 0 = file a)
  pass             pass the turn
  assist           toggle the move assistant
  bot              toggle the bot (asks for confirmation, resets the game)
  reset            new game (asks for confirmation)
  fen <text>       load a position
  exit             leave (asks for confirmation)
  help             show this text";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Events(Vec<UiEvent>),
    Help,
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };

    let single = |event: UiEvent| -> Result<Command, String> {
        Ok(Command::Events(vec![event]))
    };
    match keyword.to_ascii_lowercase().as_str() {
        "" => Ok(Command::Events(Vec::new())),
        "help" | "?" => Ok(Command::Help),
        "reset" => single(UiEvent::Reset),
        "exit" | "quit" => single(UiEvent::Exit),
        "bot" => single(UiEvent::ToggleBot),
        "assist" | "assistant" => single(UiEvent::ToggleAssistant),
        "pass" => single(UiEvent::PassTurn),
        "fen" => {
            if rest.is_empty() {
                Err("fen needs a position, e.g. fen 8/8/8/8/8/8/8/K6k w - - 0 1".to_owned())
            } else {
                single(UiEvent::LoadPosition(rest.to_owned()))
            }
        }
        "click" => parse_click(rest).map(|event| Command::Events(vec![event])),
        word if rest.is_empty() => parse_squares(word),
        _ => Err(format!("unknown command '{line}', try 'help'")),
    }
}

fn parse_click(rest: &str) -> Result<UiEvent, String> {
    let mut parts = rest.split_whitespace();
    let (Some(row), Some(col), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err("click needs <row> <col>".to_owned());
    };
    let row: u8 = row.parse().map_err(|_| format!("bad row '{row}'"))?;
    let col: u8 = col.parse().map_err(|_| format!("bad column '{col}'"))?;
    if row > 7 || col > 7 {
        return Err("row and column must be within 0..=7".to_owned());
    }
    Ok(UiEvent::CellClicked { row, col })
}

fn parse_squares(word: &str) -> Result<Command, String> {
    let unknown = || format!("unknown command '{word}', try 'help'");
    if !word.is_ascii() {
        return Err(unknown());
    }
    match word.len() {
        2 => {
            let square: Square = word.parse().map_err(|_| unknown())?;
            Ok(Command::Events(vec![click_event(square)]))
        }
        4 => {
            let from: Square = word[..2].parse().map_err(|_| unknown())?;
            let to: Square = word[2..].parse().map_err(|_| unknown())?;
            Ok(Command::Events(vec![click_event(from), click_event(to)]))
        }
        _ => Err(unknown()),
    }
}

fn click_event(square: Square) -> UiEvent {
    UiEvent::CellClicked {
        row: square.rank(),
        col: square.file(),
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_command, Command};
    use crate::controller::events::UiEvent;

    fn events(line: &str) -> Vec<UiEvent> {
        match parse_command(line).expect("command should parse") {
            Command::Events(events) => events,
            Command::Help => panic!("unexpected help for '{line}'"),
        }
    }

    #[test]
    fn square_name_is_a_click() {
        assert_eq!(events("e2"), vec![UiEvent::CellClicked { row: 1, col: 4 }]);
    }

    #[test]
    fn move_text_is_two_clicks() {
        assert_eq!(
            events("e2e4"),
            vec![
                UiEvent::CellClicked { row: 1, col: 4 },
                UiEvent::CellClicked { row: 3, col: 4 },
            ]
        );
    }

    #[test]
    fn grid_click_is_bounds_checked() {
        assert_eq!(
            events("click 0 7"),
            vec![UiEvent::CellClicked { row: 0, col: 7 }]
        );
        assert!(parse_command("click 8 0").is_err());
        assert!(parse_command("click 1").is_err());
    }

    #[test]
    fn fen_keeps_the_whole_rest_of_the_line() {
        assert_eq!(
            events("fen 8/8/8/8/8/8/8/K6k w - - 0 1"),
            vec![UiEvent::LoadPosition("8/8/8/8/8/8/8/K6k w - - 0 1".to_owned())]
        );
        assert!(parse_command("fen").is_err());
    }

    #[test]
    fn controls_map_to_events() {
        assert_eq!(events("RESET"), vec![UiEvent::Reset]);
        assert_eq!(events("bot"), vec![UiEvent::ToggleBot]);
        assert_eq!(events("assist"), vec![UiEvent::ToggleAssistant]);
        assert_eq!(events("pass"), vec![UiEvent::PassTurn]);
        assert_eq!(events("exit"), vec![UiEvent::Exit]);
        assert_eq!(parse_command("help"), Ok(Command::Help));
        assert!(events("   ").is_empty());
    }

    #[test]
    fn unknown_words_are_errors() {
        assert!(parse_command("castle").is_err());
        assert!(parse_command("z9").is_err());
        assert!(parse_command("e2 e4").is_err());
    }
}
