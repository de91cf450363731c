//! Board state, move legality and the turn protocol

use crate::grid::{Pos, LINE_AXES, ORTHO_STEPS};
use crate::token::{ColorId, Token};
use rand::seq::IteratorRandom;
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Tokens injected per non-clearing turn
const DEFAULT_QUEUE_LEN: usize = 3;

/// Number of distinct token colors
const DEFAULT_PALETTE_SIZE: ColorId = 7;

/// Run length required to clear a line
const DEFAULT_RUN_THRESHOLD: usize = 5;

/// Points per cleared cell
const POINTS_PER_CELL: u32 = 10;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Rule parameters for a board
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Tokens injected per non-clearing turn
    pub queue_len: usize,
    /// Number of distinct token colors
    pub palette_size: ColorId,
    /// Run length required to clear a line
    pub run_threshold: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            queue_len: DEFAULT_QUEUE_LEN,
            palette_size: DEFAULT_PALETTE_SIZE,
            run_threshold: DEFAULT_RUN_THRESHOLD,
        }
    }
}

/// Error types for board operations
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("cell {0} is already occupied")]
    CellOccupied(Pos),

    #[error("cell {0} is empty")]
    CellEmpty(Pos),

    #[error("no free cell left on the board")]
    BoardFull,

    #[error("no open path from {from} to {to}")]
    IllegalMove { from: Pos, to: Pos },
}

/// What a completed turn did, for rendering and logging
#[derive(Clone, Debug)]
pub struct TurnReport {
    pub from: Pos,
    pub to: Pos,
    /// Cells emptied by run clearing this turn
    pub cleared: BTreeSet<Pos>,
    /// Cells written by injection this turn
    pub injected: Vec<Pos>,
}

// ============================================================================
// BOARD STATE
// ============================================================================

/// Board state; one mutation at a time, driven by the frontend
#[derive(Clone, Debug)]
pub struct Board {
    /// Columns
    width: i16,

    /// Rows
    height: i16,

    /// Cell storage, addressed grid[y][x]
    grid: Vec<Vec<Option<Token>>>,

    /// Every currently empty coordinate
    free_cells: FxHashSet<Pos>,

    /// Tokens queued for the next injection round
    pending: Vec<Token>,

    /// Cells written by the most recent injection round
    last_placed: Vec<Pos>,

    /// Accumulated score
    score: u32,

    /// Player name carried into saves and records
    player: String,

    /// Rule parameters
    config: BoardConfig,

    /// Color and placement randomness, injected at construction
    rng: ChaCha8Rng,
}

impl Board {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Create a square board with default rules
    pub fn new(size: i16, player: &str, rng: ChaCha8Rng) -> Self {
        Self::with_config(size, size, player, BoardConfig::default(), rng)
    }

    /// Create a board with explicit dimensions and rules
    pub fn with_config(
        width: i16,
        height: i16,
        player: &str,
        config: BoardConfig,
        rng: ChaCha8Rng,
    ) -> Self {
        assert!(width > 0 && height > 0, "board dimensions must be positive");

        let grid = vec![vec![None; width as usize]; height as usize];
        let mut free_cells = FxHashSet::default();
        for y in 0..height {
            for x in 0..width {
                free_cells.insert(Pos::new(x, y));
            }
        }

        let mut board = Self {
            width,
            height,
            grid,
            free_cells,
            pending: Vec::with_capacity(config.queue_len),
            last_placed: Vec::new(),
            score: 0,
            player: player.to_string(),
            config,
            rng,
        };
        board.refill_pending();
        board
    }

    /// Rebuild a board from previously captured state.
    /// The caller has validated dimensions, colors and the pending queue.
    pub(crate) fn from_parts(
        width: i16,
        height: i16,
        player: String,
        score: u32,
        grid: Vec<Vec<Option<Token>>>,
        pending: Vec<Token>,
        config: BoardConfig,
        rng: ChaCha8Rng,
    ) -> Self {
        let mut free_cells = FxHashSet::default();
        for y in 0..height {
            for x in 0..width {
                if grid[y as usize][x as usize].is_none() {
                    free_cells.insert(Pos::new(x, y));
                }
            }
        }

        Self {
            width,
            height,
            grid,
            free_cells,
            pending,
            last_placed: Vec::new(),
            score,
            player,
            config,
            rng,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn width(&self) -> i16 {
        self.width
    }

    pub fn height(&self) -> i16 {
        self.height
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn config(&self) -> BoardConfig {
        self.config
    }

    /// Tokens waiting for the next injection round
    pub fn pending(&self) -> &[Token] {
        &self.pending
    }

    /// Cells written by the most recent injection round
    pub fn last_placed(&self) -> &[Pos] {
        &self.last_placed
    }

    pub fn free_cell_count(&self) -> usize {
        self.free_cells.len()
    }

    /// Grid rows, addressed rows()[y][x]
    pub fn rows(&self) -> &[Vec<Option<Token>>] {
        &self.grid
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Empty every cell; score and pending queue are untouched
    pub fn clear(&mut self) {
        for row in self.grid.iter_mut() {
            for cell in row.iter_mut() {
                *cell = None;
            }
        }
        self.free_cells.clear();
        for y in 0..self.height {
            for x in 0..self.width {
                self.free_cells.insert(Pos::new(x, y));
            }
        }
        self.last_placed.clear();
    }

    /// Start over: empty board, zero score, fresh pending queue
    pub fn reset(&mut self) {
        self.clear();
        self.score = 0;
        self.refill_pending();
    }

    // ========================================================================
    // CELL ACCESS
    // ========================================================================

    /// Token at `pos`; out-of-range positions read as empty
    pub fn get(&self, pos: Pos) -> Option<Token> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.grid[pos.y as usize][pos.x as usize]
    }

    /// Color at `pos`, if occupied
    pub fn color_at(&self, pos: Pos) -> Option<ColorId> {
        self.get(pos).map(|token| token.color())
    }

    /// Put a token on an empty cell
    pub fn place(&mut self, pos: Pos, token: Token) -> Result<(), BoardError> {
        let cell = &mut self.grid[pos.y as usize][pos.x as usize];
        if cell.is_some() {
            return Err(BoardError::CellOccupied(pos));
        }
        *cell = Some(token);
        self.free_cells.remove(&pos);
        Ok(())
    }

    /// Take the token off an occupied cell
    pub fn remove(&mut self, pos: Pos) -> Result<Token, BoardError> {
        match self.grid[pos.y as usize][pos.x as usize].take() {
            Some(token) => {
                self.free_cells.insert(pos);
                Ok(token)
            }
            None => Err(BoardError::CellEmpty(pos)),
        }
    }

    // ========================================================================
    // PENDING QUEUE
    // ========================================================================

    /// Refill the pending queue with freshly colored tokens
    pub fn refill_pending(&mut self) {
        let palette = self.config.palette_size;
        self.pending.clear();
        for _ in 0..self.config.queue_len {
            let token = Token::random(&mut self.rng, palette);
            self.pending.push(token);
        }
    }

    /// Drop every pending token onto a random free cell.
    ///
    /// Runs out of room mid-round: tokens already placed stay placed, the
    /// queue is left as is, and `BoardFull` signals the end of the game.
    pub fn inject_pending(&mut self) -> Result<(), BoardError> {
        self.last_placed.clear();

        for i in 0..self.pending.len() {
            let pos = match self.free_cells.iter().choose(&mut self.rng).copied() {
                Some(pos) => pos,
                None => return Err(BoardError::BoardFull),
            };
            let token = self.pending[i];
            self.place(pos, token).expect("Drawn cell is not free");
            self.last_placed.push(pos);
        }

        self.refill_pending();
        Ok(())
    }

    // ========================================================================
    // MOVEMENT
    // ========================================================================

    /// True when a token at `from` can reach the empty cell `to` along
    /// 4-directionally-adjacent empty cells
    pub fn can_move(&self, from: Pos, to: Pos) -> bool {
        if self.get(from).is_none() || !self.free_cells.contains(&to) {
            return false;
        }

        // Breadth-first search over free cells, starting from the
        // occupied origin
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::new();
        visited.insert(from);
        queue.push_back(from);

        while let Some(current) = queue.pop_front() {
            if current == to {
                return true;
            }
            for &(dx, dy) in &ORTHO_STEPS {
                let next = current.offset(dx, dy);
                if self.free_cells.contains(&next) && visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        false
    }

    /// Relocate a token; legality is the caller's concern
    pub fn move_token(&mut self, from: Pos, to: Pos) {
        let token = self.remove(from).expect("No token at move origin");
        self.place(to, token).expect("Move destination is occupied");
    }

    // ========================================================================
    // RUNS & SCORING
    // ========================================================================

    /// Cells of every qualifying run through `pos`.
    ///
    /// All four axes are scanned both ways from the seed; an axis whose
    /// contiguous same-color run reaches the threshold contributes its
    /// cells. None when the seed is empty or no axis qualifies.
    pub fn find_line(&self, pos: Pos) -> Option<BTreeSet<Pos>> {
        let color = self.color_at(pos)?;
        let mut run = BTreeSet::new();

        for &(dx, dy) in &LINE_AXES {
            let mut axis = vec![pos];

            let mut current = pos.offset(dx, dy);
            while self.color_at(current) == Some(color) {
                axis.push(current);
                current = current.offset(dx, dy);
            }

            let mut current = pos.offset(-dx, -dy);
            while self.color_at(current) == Some(color) {
                axis.push(current);
                current = current.offset(-dx, -dy);
            }

            if axis.len() >= self.config.run_threshold {
                run.extend(axis);
            }
        }

        if run.is_empty() {
            None
        } else {
            Some(run)
        }
    }

    /// Empty every cell of a detected run and score it
    pub fn clear_line(&mut self, line: &BTreeSet<Pos>) {
        for &pos in line {
            self.remove(pos).expect("Cleared cell is already empty");
        }
        self.add_score(line.len());
    }

    /// Score `cells` cleared cells
    pub fn add_score(&mut self, cells: usize) {
        self.score += cells as u32 * POINTS_PER_CELL;
    }

    // ========================================================================
    // TURN PROTOCOL
    // ========================================================================

    /// Play one full turn: move, then either clear the moved-token run or
    /// inject pending tokens and clear any runs they complete.
    ///
    /// A run made by the move itself ends the turn before any injection.
    /// `BoardFull` from the injection round is the game-over signal.
    pub fn play_turn(&mut self, from: Pos, to: Pos) -> Result<TurnReport, BoardError> {
        if !self.can_move(from, to) {
            return Err(BoardError::IllegalMove { from, to });
        }
        self.move_token(from, to);

        let mut report = TurnReport {
            from,
            to,
            cleared: BTreeSet::new(),
            injected: Vec::new(),
        };

        if let Some(line) = self.find_line(to) {
            self.clear_line(&line);
            report.cleared = line;
            return Ok(report);
        }

        self.inject_pending()?;
        report.injected = self.last_placed.clone();

        for &pos in &report.injected {
            // A cell emptied by an earlier clear in this sweep reads as
            // no-run
            if let Some(line) = self.find_line(pos) {
                self.clear_line(&line);
                report.cleared.extend(line);
            }
        }

        Ok(report)
    }
}

// ============================================================================
// TESTS
// ============================================================================
