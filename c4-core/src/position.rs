//! Bit-packed Connect Four position with O(1) move/undo.
//!
//! Cell `(row, col)` maps to bit `row * 7 + col` with row 0 at the bottom:
//!
//! ```text
//! 35 36 37 38 39 40 41   row 5
//! 28 29 30 31 32 33 34   row 4
//! 21 22 23 24 25 26 27   row 3
//! 14 15 16 17 18 19 20   row 2
//!  7  8  9 10 11 12 13   row 1
//!  0  1  2  3  4  5  6   row 0
//! ```

pub const COLS: usize = 7;
pub const ROWS: usize = 6;
pub const CELLS: usize = 42;

/// The side whose turn it is. X always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    X,
    O,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::X => Side::O,
            Side::O => Side::X,
        }
    }
}

/// A game position plus enough history to undo back to where it was set.
///
/// Invariants: the two masks are disjoint and occupy only the low 42 bits;
/// columns fill bottom-up; `move_n == popcount(x) + popcount(o)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    x_mask: u64,
    o_mask: u64,
    move_n: u8,
    /// Ply at which the position was externally set; undo stops here.
    start_n: u8,
    /// Absolute cell index of each move since the start of the game.
    history: [u8; CELLS],
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    pub fn new() -> Self {
        Self {
            x_mask: 0,
            o_mask: 0,
            move_n: 0,
            start_n: 0,
            history: [0; CELLS],
        }
    }

    /// Build a position from a board diagram, read top row first, left to
    /// right: a digit skips that many cells, `x`/`o` (any case) place a
    /// stone, and a row separator is only legal on column 0. Any structural
    /// error resets the board to empty. The resulting stone count becomes
    /// the undo floor.
    pub fn from_diagram(s: &str) -> Self {
        let mut pos = Self::new();
        let mut grid_n = 0usize;
        let mut bad = false;
        for raw in s.chars() {
            if grid_n >= CELLS {
                bad = true;
                break;
            }
            let ch = raw.to_ascii_lowercase();
            if let Some(d) = ch.to_digit(10) {
                grid_n += d as usize;
            } else if ch == 'x' || ch == 'o' {
                let col = grid_n % COLS;
                let row = ROWS - 1 - grid_n / COLS;
                let bit = 1u64 << (row * COLS + col);
                if ch == 'x' {
                    pos.x_mask |= bit;
                } else {
                    pos.o_mask |= bit;
                }
                grid_n += 1;
                pos.move_n += 1;
            } else {
                // row separator; must land on column 0
                if grid_n % COLS != 0 {
                    bad = true;
                    break;
                }
            }
        }
        if bad {
            pos = Self::new();
        }
        pos.start_n = pos.move_n;
        pos
    }

    pub fn x_mask(&self) -> u64 {
        self.x_mask
    }

    pub fn o_mask(&self) -> u64 {
        self.o_mask
    }

    pub fn move_count(&self) -> u32 {
        self.move_n as u32
    }

    pub fn start_count(&self) -> u32 {
        self.start_n as u32
    }

    pub fn side_to_move(&self) -> Side {
        if self.move_n % 2 == 0 {
            Side::X
        } else {
            Side::O
        }
    }

    /// Columns whose top cell is empty.
    pub fn legal_moves(&self) -> [bool; COLS] {
        let occupied = self.x_mask | self.o_mask;
        let mut legal = [false; COLS];
        for (col, slot) in legal.iter_mut().enumerate() {
            *slot = occupied & (1u64 << (35 + col)) == 0;
        }
        legal
    }

    fn drop_cell(&self, col: usize) -> Option<u8> {
        let occupied = self.x_mask | self.o_mask;
        for row in 0..ROWS {
            let cell = (row * COLS + col) as u8;
            if occupied & (1u64 << cell) == 0 {
                return Some(cell);
            }
        }
        None
    }

    /// Drop the side-to-move's stone into `col`.
    ///
    /// `col` must be legal; a full column is ignored rather than checked in
    /// the hot path.
    pub fn play(&mut self, col: usize) {
        debug_assert!(col < COLS, "column out of range");
        debug_assert!(self.legal_moves()[col], "illegal move {col}");
        let Some(cell) = self.drop_cell(col) else {
            return;
        };
        let bit = 1u64 << cell;
        if self.move_n % 2 == 0 {
            self.x_mask |= bit;
        } else {
            self.o_mask |= bit;
        }
        self.history[self.move_n as usize] = cell;
        self.move_n += 1;
    }

    /// Take back the last move. No-op at the undo floor.
    pub fn undo(&mut self) {
        if self.move_n == self.start_n {
            return;
        }
        self.move_n -= 1;
        let bit = 1u64 << self.history[self.move_n as usize];
        if self.move_n % 2 == 0 {
            self.x_mask &= !bit;
        } else {
            self.o_mask &= !bit;
        }
        self.history[self.move_n as usize] = 0;
    }

    /// Win detection anchored at the last played cell. Only a freshly
    /// created four can exist after legal play, so scanning the four lines
    /// through that cell is exhaustive. Without a known last move (nothing
    /// played since the position was set) no win is claimed.
    fn check_win(&self) -> bool {
        if self.move_n == self.start_n {
            return false;
        }
        if self.start_n == 0 && self.move_n < 7 {
            return false;
        }
        // the side that just moved
        let pcs = if self.move_n % 2 == 1 {
            self.x_mask
        } else {
            self.o_mask
        };
        let last = self.history[self.move_n as usize - 1] as i32;
        let row = last / COLS as i32;
        let col = last % COLS as i32;

        let run = |dr: i32, dc: i32| -> i32 {
            let mut n = 0;
            let mut r = row + dr;
            let mut c = col + dc;
            while (0..ROWS as i32).contains(&r)
                && (0..COLS as i32).contains(&c)
                && pcs & (1u64 << (r * COLS as i32 + c)) != 0
            {
                n += 1;
                r += dr;
                c += dc;
            }
            n
        };

        for (dr, dc) in [(1, 0), (0, 1), (1, 1), (1, -1)] {
            if run(dr, dc) + run(-dr, -dc) >= 3 {
                return true;
            }
        }
        false
    }

    /// `Some(1)` if the side that just moved has four in a row, `Some(0)`
    /// for a full-board draw, `None` while the game is in progress.
    pub fn outcome(&self) -> Option<i8> {
        if self.check_win() {
            return Some(1);
        }
        if self.move_n as usize == CELLS {
            return Some(0);
        }
        None
    }

    /// ASCII board, top row first, with a column footer.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for row in (0..ROWS).rev() {
            for col in 0..COLS {
                let bit = 1u64 << (row * COLS + col);
                if self.x_mask & bit != 0 {
                    out.push_str("| X ");
                } else if self.o_mask & bit != 0 {
                    out.push_str("| O ");
                } else {
                    out.push_str("|   ");
                }
            }
            out.push_str("|\n");
        }
        out.push_str("-----------------------------\n  0   1   2   3   4   5   6\n");
        out
    }
}
