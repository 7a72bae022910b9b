//! Crate root module declarations for the Plum Board interactive chess
//! controller.
//!
//! This file exposes all top-level subsystems (rules adapter, interaction
//! controller, move oracles, in-process engines, console frontend, and the
//! ambient config/error/logging modules) so the binary, tests, and benches
//! can import stable module paths.

pub mod rules {
    pub mod chess_move;
    pub mod chess_rules;
    pub mod chess_types;
    pub mod outcome;
    pub mod position;
    pub mod square;
}

pub mod controller {
    pub mod color_resolution;
    pub mod confirmation;
    pub mod events;
    pub mod game_controller;
    pub mod game_over;
    pub mod selection;
    pub mod view;
}

pub mod oracle {
    pub mod builtin_oracle;
    pub mod dispatcher;
    pub mod oracle_trait;
    pub mod uci_oracle;
}

pub mod engines {
    pub mod engine_greedy;
    pub mod engine_random;
    pub mod engine_search;
    pub mod engine_trait;
}

pub mod frontend {
    pub mod command_parser;
    pub mod console;
    pub mod render;
}

pub mod config;
pub mod errors;
pub mod logging;
