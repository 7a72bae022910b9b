#![cfg(unix)]

use std::path::Path;
use std::time::Duration;

use plum_board::errors::OracleError;
use plum_board::oracle::oracle_trait::Oracle;
use plum_board::oracle::uci_oracle::UciOracle;
use plum_board::rules::position::Position;

const SHELL: &str = "/bin/sh";

/// A shell script speaking just enough UCI; `{go}` is the reply to `go`.
fn fake_engine(go: &str) -> Vec<String> {
    let script = format!(
        r#"while read -r line; do
  case "$line" in
    uci) echo "id name FakeFish"; echo "uciok" ;;
    isready) echo "readyok" ;;
    go*) {go} ;;
    quit) exit 0 ;;
  esac
done"#
    );
    vec!["-c".to_owned(), script]
}

fn establish(go: &str) -> UciOracle {
    UciOracle::establish_with_args(Path::new(SHELL), fake_engine(go))
        .expect("fake engine should complete the handshake")
        .with_grace(Duration::from_millis(1500))
}

#[test]
fn handshake_picks_up_the_engine_name() {
    let oracle = establish(r#"echo "bestmove e2e4""#);
    assert_eq!(oracle.name(), "FakeFish");
}

#[test]
fn bestmove_is_returned() {
    let oracle = establish(r#"echo "info depth 1"; echo "bestmove e2e4 ponder e7e5""#);
    let mv = oracle
        .best_move(&Position::new_game(), Duration::from_millis(50))
        .expect("engine should answer");
    assert_eq!(mv.to_string(), "e2e4");
}

#[test]
fn null_bestmove_is_no_move() {
    let oracle = establish(r#"echo "bestmove 0000""#);
    assert_eq!(
        oracle.best_move(&Position::new_game(), Duration::from_millis(50)),
        Err(OracleError::NoMove)
    );
}

#[test]
fn illegal_bestmove_is_a_protocol_error() {
    let oracle = establish(r#"echo "bestmove e7e5""#);
    assert!(matches!(
        oracle.best_move(&Position::new_game(), Duration::from_millis(50)),
        Err(OracleError::Protocol(_))
    ));
}

#[test]
fn silent_engine_times_out() {
    let oracle = establish(":").with_grace(Duration::from_millis(300));
    assert!(matches!(
        oracle.best_move(&Position::new_game(), Duration::from_millis(50)),
        Err(OracleError::Timeout(_))
    ));
}

#[test]
fn missing_executable_is_unavailable() {
    assert!(matches!(
        UciOracle::establish(Path::new("/definitely/not/an/engine")),
        Err(OracleError::Unavailable(_))
    ));
}

#[test]
fn engine_that_exits_fails_the_handshake() {
    let args = vec!["-c".to_owned(), "exit 0".to_owned()];
    assert!(matches!(
        UciOracle::establish_with_args(Path::new(SHELL), args),
        Err(OracleError::Unavailable(_))
    ));
}
