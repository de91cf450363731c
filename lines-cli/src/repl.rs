//! Interactive game session
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - the read-eval-print loop
//! - Level 2: execute() - one command against the session
//! - Level 3: command handlers and gateway plumbing
//! - Level 4: parsing and rendering utilities

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use lines_core::{Board, BoardConfig, BoardError, Pos, SavedGame};
use lines_store::{saves, LoadError, RecordsStore};

// ============================================================================
// COMMAND SURFACE (Level 4 - Parsing)
// ============================================================================

/// Rows shown by the `records` command
const RECORD_ROWS: usize = 8;

const HELP_TEXT: &str = "\
Commands:
  make_step x0 y0 x1 y1   move the token at (x0, y0) to (x1, y1)
  reset                   start a new game
  save FILE               write the game to FILE
  load FILE               read a game back from FILE
  records                 show the best scores
  help                    show this message
  end                     record the score and quit";

/// Everything the console accepts
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    MakeStep { from: Pos, to: Pos },
    Reset,
    End,
    Save { path: PathBuf },
    Load { path: PathBuf },
    Records,
}

/// Rejected input, worded the way the prompt reports it
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// Unknown verb or wrong argument shape
    #[error("Incorrect command")]
    IncorrectCommand,

    /// Arguments that do not name a playable step
    #[error("Incorrect step")]
    IncorrectStep,
}

/// Split a line into a command; whitespace between words is free-form
pub fn parse_command(line: &str) -> Result<Command, InputError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["help"] => Ok(Command::Help),
        ["reset"] => Ok(Command::Reset),
        ["end"] => Ok(Command::End),
        ["records"] => Ok(Command::Records),
        ["save", path] => Ok(Command::Save { path: PathBuf::from(path) }),
        ["load", path] => Ok(Command::Load { path: PathBuf::from(path) }),
        ["make_step", x0, y0, x1, y1] => Ok(Command::MakeStep {
            from: parse_pos(x0, y0)?,
            to: parse_pos(x1, y1)?,
        }),
        _ => Err(InputError::IncorrectCommand),
    }
}

fn parse_pos(x: &str, y: &str) -> Result<Pos, InputError> {
    let x = x.parse().map_err(|_| InputError::IncorrectStep)?;
    let y = y.parse().map_err(|_| InputError::IncorrectStep)?;
    Ok(Pos::new(x, y))
}

// ============================================================================
// SESSION (Levels 1-3)
// ============================================================================

/// One game session: a board, the record table, and the seed the
/// session was started with
pub struct Session {
    board: Board,
    records: RecordsStore,
    seed: Option<u64>,
}

/// Whether the loop keeps going after a command
enum Flow {
    Continue,
    Quit,
}

impl Session {
    pub fn new(name: &str, size: i16, seed: Option<u64>, records: RecordsStore) -> Self {
        let mut board = Board::new(size, name, create_rng(seed));
        // Opening injection so the player never faces an empty board
        board.inject_pending().expect("Fresh board cannot be full");

        tracing::info!("Starting game for {} on a {}x{} board", name, size, size);
        Self { board, records, seed }
    }

    /// Drive the session from stdin until the player quits or the board
    /// fills up
    pub fn run(&mut self) -> Result<()> {
        println!("Welcome to Lines!");
        println!("{HELP_TEXT}");
        print!("{}", render_board(&self.board));

        let mut input = String::new();
        loop {
            print!("> ");
            io::stdout().flush().context("failed to flush the prompt")?;

            input.clear();
            let read = io::stdin()
                .read_line(&mut input)
                .context("failed to read a command")?;
            if read == 0 {
                // stdin closed; wrap up like an explicit end
                self.finish();
                return Ok(());
            }

            match self.execute(&input) {
                Flow::Continue => {}
                Flow::Quit => return Ok(()),
            }
        }
    }

    /// Run one command line against the session
    fn execute(&mut self, line: &str) -> Flow {
        match parse_command(line) {
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                Flow::Continue
            }
            Ok(Command::MakeStep { from, to }) => self.make_step(from, to),
            Ok(Command::Reset) => {
                self.reset();
                Flow::Continue
            }
            Ok(Command::End) => self.finish(),
            Ok(Command::Save { path }) => {
                self.save(&path);
                Flow::Continue
            }
            Ok(Command::Load { path }) => {
                self.load(&path);
                Flow::Continue
            }
            Ok(Command::Records) => {
                self.print_records();
                Flow::Continue
            }
            Err(err) => {
                println!("{err}");
                Flow::Continue
            }
        }
    }

    // ========================================================================
    // COMMAND HANDLERS (Level 3)
    // ========================================================================

    fn make_step(&mut self, from: Pos, to: Pos) -> Flow {
        if !self.board.in_bounds(from) || !self.board.in_bounds(to) {
            println!("{}", InputError::IncorrectStep);
            return Flow::Continue;
        }

        match self.board.play_turn(from, to) {
            Ok(report) => {
                tracing::info!("Step {} -> {}", report.from, report.to);
                if !report.cleared.is_empty() {
                    tracing::info!(
                        "Cleared {} cells, score is now {}",
                        report.cleared.len(),
                        self.board.score()
                    );
                }
                print!("{}", render_board(&self.board));
                Flow::Continue
            }
            Err(BoardError::IllegalMove { .. }) => {
                println!("{}", InputError::IncorrectStep);
                Flow::Continue
            }
            Err(BoardError::BoardFull) => {
                print!("{}", render_board(&self.board));
                println!("No room left for new tokens.");
                self.finish()
            }
            Err(err) => {
                tracing::warn!("unexpected board error: {err}");
                Flow::Continue
            }
        }
    }

    fn reset(&mut self) {
        self.board.reset();
        self.board.inject_pending().expect("Fresh board cannot be full");
        tracing::info!("Board reset for {}", self.board.player());
        print!("{}", render_board(&self.board));
    }

    /// Record the score and stop the session
    fn finish(&mut self) -> Flow {
        tracing::info!(
            "Game over for {} with score {}",
            self.board.player(),
            self.board.score()
        );
        println!("Final score: {}", self.board.score());
        if let Err(err) = self.records.add_record(self.board.player(), self.board.score()) {
            tracing::warn!("could not update the record table: {err}");
        }
        self.print_records();
        Flow::Quit
    }

    fn save(&self, path: &Path) {
        let saved = SavedGame::capture(&self.board);
        match saves::save_game(&saved, path) {
            Ok(()) => println!("Saved to {}", path.display()),
            Err(err) => println!("Could not save: {err}"),
        }
    }

    fn load(&mut self, path: &Path) {
        match self.load_board(path) {
            Ok(board) => {
                self.board = board;
                tracing::info!(
                    "Loaded game for {} from {}",
                    self.board.player(),
                    path.display()
                );
                print!("{}", render_board(&self.board));
            }
            // The current board stays untouched
            Err(err) => println!("Could not load: {err}"),
        }
    }

    fn load_board(&self, path: &Path) -> Result<Board, LoadError> {
        let saved = saves::load_game(path)?;
        let board = saved.restore(BoardConfig::default(), create_rng(self.seed))?;
        Ok(board)
    }

    fn print_records(&self) {
        match self.records.records() {
            Ok(rows) => print!("{}", render_records(&rows)),
            Err(err) => println!("Could not read records: {err}"),
        }
    }
}

// ============================================================================
// UTILITIES (Level 4)
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Board as text: column header, one line per row, score and the
/// upcoming colors underneath
fn render_board(board: &Board) -> String {
    let mut out = String::new();

    out.push_str("   ");
    for x in 0..board.width() {
        out.push_str(&format!("{x:>2}"));
    }
    out.push('\n');

    for y in 0..board.height() {
        out.push_str(&format!("{y:>3}"));
        for x in 0..board.width() {
            match board.color_at(Pos::new(x, y)) {
                Some(color) => out.push_str(&format!("{color:>2}")),
                None => out.push_str(" ."),
            }
        }
        out.push('\n');
    }

    let next: Vec<String> = board
        .pending()
        .iter()
        .map(|token| token.color().to_string())
        .collect();
    out.push_str(&format!("Score: {}  Next: {}\n", board.score(), next.join(" ")));
    out
}

fn render_records(rows: &[(String, u32)]) -> String {
    let mut out = String::new();
    out.push_str("=== Records ===\n");
    if rows.is_empty() {
        out.push_str("(no records yet)\n");
    }
    for (name, score) in rows.iter().take(RECORD_ROWS) {
        out.push_str(&format!("{name:<12} {score:>6}\n"));
    }
    out
}

// ============================================================================
// TESTS
// ============================================================================
