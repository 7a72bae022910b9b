//! Interactive console loop.
//!
//! A reader thread forwards stdin lines over a channel. The loop waits on
//! that channel for at most one tick, so oracle results are merged and the
//! board redrawn at a steady rate whether or not the user types.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use tracing::{info, warn};

use crate::controller::events::Flow;
use crate::controller::game_controller::GameController;
use crate::controller::view::BoardView;
use crate::frontend::command_parser::{parse_command, Command, HELP_TEXT};
use crate::frontend::render::{render_board, render_controls, render_notice};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleOptions {
    pub tick: Duration,
    /// Colored cells; also clears the screen before each frame.
    pub colored: bool,
}

/// Run against the process's stdin and stdout until the user exits or
/// input closes.
pub fn run(controller: &mut GameController, options: &ConsoleOptions) -> io::Result<()> {
    let input = spawn_stdin_reader()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{HELP_TEXT}")?;
    run_with(controller, &input, &mut out, options)
}

pub fn spawn_stdin_reader() -> io::Result<Receiver<String>> {
    let (sender, receiver) = mpsc::channel::<String>();
    thread::Builder::new()
        .name("stdin-reader".to_owned())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        if sender.send(line).is_err() {
                            break;
                        }
                    }
                    Err(err) => {
                        warn!(error = %err, "stdin read failed");
                        break;
                    }
                }
            }
        })?;
    Ok(receiver)
}

pub fn run_with<W: Write>(
    controller: &mut GameController,
    input: &Receiver<String>,
    out: &mut W,
    options: &ConsoleOptions,
) -> io::Result<()> {
    controller.start();

    loop {
        controller.poll_results();

        if let Some(frame) = controller.take_frame() {
            draw(out, &frame, options)?;
            if controller.check_game_over().is_some() {
                if let Some(frame) = controller.take_frame() {
                    draw(out, &frame, options)?;
                }
            }
        }
        for notice in controller.drain_notices() {
            writeln!(out, "{}", render_notice(&notice))?;
        }
        out.flush()?;

        match input.recv_timeout(options.tick) {
            Ok(line) => match parse_command(&line) {
                Ok(Command::Help) => writeln!(out, "{HELP_TEXT}")?,
                Ok(Command::Events(events)) => {
                    for event in events {
                        if controller.handle_event(event) == Flow::Exit {
                            info!("session ended by user");
                            return Ok(());
                        }
                    }
                }
                Err(message) => writeln!(out, "{message}")?,
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                info!("input closed; session ended");
                return Ok(());
            }
        }
    }
}

fn draw<W: Write>(out: &mut W, frame: &BoardView, options: &ConsoleOptions) -> io::Result<()> {
    if options.colored {
        queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    }
    writeln!(out, "{}", render_board(frame, options.colored))?;
    writeln!(out, "{}", render_controls(&frame.controls))?;
    writeln!(out, "{}", frame.fen)
}
