//! Move-by-move self-play: search, blend the visit distribution with
//! Dirichlet noise, sample through a temperature, commit, recycle.

use c4_core::{Config, Position, Side, COLS};
use c4_logging::{now_ms, NdjsonWriter, SelfplayGameEventV1, SelfplayMoveEventV1};
use c4_mcts::{Evaluator, SearchEngine, SearchError};
use rand::Rng;
use rand_distr::{Distribution, Gamma};
use thiserror::Error;

/// Fraction of the search distribution kept when mixing in root noise.
const NOISE_MIX: f64 = 0.84;

#[derive(Debug, Error)]
pub enum SelfplayError {
    #[error("invalid self-play parameters: {msg}")]
    InvalidParams { msg: &'static str },
    #[error(transparent)]
    Search(#[from] SearchError),
    #[error("failed to write event log: {0}")]
    Log(#[from] c4_logging::NdjsonError),
}

/// Tunables for one self-play game.
#[derive(Debug, Clone, Copy)]
pub struct SelfplayParams {
    /// PUCT exploration constant.
    pub c_puct: f32,
    /// Dirichlet concentration for the root noise.
    pub dir_alpha: f64,
    /// Ply at which sampling switches from temperature 1.0 to near-greedy.
    pub temp_cutoff: u32,
    /// Playout budget per move.
    pub playouts: u64,
}

impl Default for SelfplayParams {
    fn default() -> Self {
        Self {
            c_puct: 3.0,
            dir_alpha: 1.3,
            temp_cutoff: 12,
            playouts: 800,
        }
    }
}

impl SelfplayParams {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            c_puct: cfg.engine.c_puct,
            dir_alpha: cfg.selfplay.dir_alpha,
            temp_cutoff: cfg.selfplay.temp_cutoff,
            playouts: cfg.engine.playouts,
        }
    }

    fn validate(&self) -> Result<(), SelfplayError> {
        if !(self.c_puct.is_finite() && self.c_puct > 0.0) {
            return Err(SelfplayError::InvalidParams {
                msg: "c_puct must be finite and > 0",
            });
        }
        if !(self.dir_alpha.is_finite() && self.dir_alpha > 0.0) {
            return Err(SelfplayError::InvalidParams {
                msg: "dir_alpha must be finite and > 0",
            });
        }
        if self.playouts < 2 {
            return Err(SelfplayError::InvalidParams {
                msg: "playouts must be >= 2",
            });
        }
        Ok(())
    }
}

/// One committed move with its search distribution (the training target).
#[derive(Debug, Clone)]
pub struct MoveRecord {
    pub ply: u32,
    pub col: u8,
    pub search_probs: [f32; COLS],
}

/// A finished game: the training sample stream plus its outcome.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub moves: Vec<MoveRecord>,
    /// `None` for a draw.
    pub winner: Option<Side>,
}

/// Play one full game from the empty board, committing one sampled move
/// per search and recycling the tree so each search reuses the chosen
/// subtree. Every move optionally emits an NDJSON event.
pub fn play_game(
    eval: &impl Evaluator,
    params: &SelfplayParams,
    rng: &mut impl Rng,
    game_id: u64,
    mut log: Option<&mut NdjsonWriter>,
) -> Result<GameRecord, SelfplayError> {
    params.validate()?;
    let gamma = Gamma::new(params.dir_alpha, 1.0).map_err(|_| SelfplayError::InvalidParams {
        msg: "dir_alpha is not a valid Gamma shape",
    })?;

    let mut board = Position::new();
    let mut engine = SearchEngine::new(board, params.c_puct, params.playouts);
    let mut moves = Vec::new();
    let mut ply = 0u32;

    while board.outcome().is_none() {
        let probs = engine.move_probs(eval)?;
        let legal = board.legal_moves();

        let noisy = mix_root_noise(&probs, &legal, &gamma, rng);
        let tau = if ply < params.temp_cutoff { 1.0 } else { 0.05 };
        let exec = apply_temperature(&noisy, &legal, tau);
        let col = sample_column(&exec, &legal, rng.gen::<f64>());

        if let Some(w) = log.as_deref_mut() {
            w.write_event(&SelfplayMoveEventV1 {
                event: "selfplay_move",
                ts_ms: now_ms(),
                game_id,
                ply,
                chosen_col: col as u8,
                search_probs: probs,
                root_visits: engine.root().visits,
            })?;
        }
        moves.push(MoveRecord {
            ply,
            col: col as u8,
            search_probs: probs,
        });

        board.play(col);
        engine.recycle_tree(col)?;
        ply += 1;
    }

    let winner = match board.outcome() {
        Some(1) => Some(board.side_to_move().opponent()),
        _ => None,
    };
    if let Some(w) = log.as_deref_mut() {
        w.write_event(&SelfplayGameEventV1 {
            event: "selfplay_game",
            ts_ms: now_ms(),
            game_id,
            plies: ply,
            winner: match winner {
                Some(Side::X) => "x",
                Some(Side::O) => "o",
                None => "draw",
            },
        })?;
        w.flush()?;
    }

    Ok(GameRecord { moves, winner })
}

/// Draw Dirichlet noise over the legal columns (normalized Gamma samples)
/// and blend it into the search distribution at the fixed 84/16 mix.
pub(crate) fn mix_root_noise(
    probs: &[f32; COLS],
    legal: &[bool; COLS],
    gamma: &Gamma<f64>,
    rng: &mut impl Rng,
) -> [f64; COLS] {
    let mut eta = [0.0f64; COLS];
    let mut sum = 0.0f64;
    for (i, &ok) in legal.iter().enumerate() {
        if ok {
            let x = gamma.sample(rng);
            eta[i] = x;
            sum += x;
        }
    }
    let mut out = [0.0f64; COLS];
    for (i, &ok) in legal.iter().enumerate() {
        if !ok {
            continue;
        }
        out[i] = if sum > 0.0 {
            NOISE_MIX * probs[i] as f64 + (1.0 - NOISE_MIX) * eta[i] / sum
        } else {
            probs[i] as f64
        };
    }
    out
}

/// Temperature-shape the distribution: `exp(ln(p + eps) / tau)` over legal
/// columns, renormalized. `eps` is the smallest positive double, so zero
/// entries stay effectively unreachable at low temperature.
pub fn apply_temperature(probs: &[f64; COLS], legal: &[bool; COLS], tau: f64) -> [f64; COLS] {
    let mut out = [0.0f64; COLS];
    let mut sum = 0.0f64;
    for (i, &ok) in legal.iter().enumerate() {
        if ok {
            let w = ((probs[i] + f64::MIN_POSITIVE).ln() / tau).exp();
            out[i] = w;
            sum += w;
        }
    }
    if sum > 0.0 && sum.is_finite() {
        for v in &mut out {
            *v /= sum;
        }
        return out;
    }
    // every weight underflowed: fall back to uniform over legal
    let n = legal.iter().filter(|&&ok| ok).count().max(1);
    let u = 1.0 / n as f64;
    for (i, &ok) in legal.iter().enumerate() {
        out[i] = if ok { u } else { 0.0 };
    }
    out
}

/// Inverse-CDF draw against a uniform sample; falls back to the last legal
/// column if rounding keeps the accumulator at or below `u`.
pub(crate) fn sample_column(probs: &[f64; COLS], legal: &[bool; COLS], u: f64) -> usize {
    let mut acc = 0.0f64;
    for (i, &p) in probs.iter().enumerate() {
        acc += p;
        if acc > u {
            return i;
        }
    }
    legal.iter().rposition(|&ok| ok).unwrap_or(0)
}
