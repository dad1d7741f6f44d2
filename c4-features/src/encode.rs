//! Feature encoding for FeatureSchema v1.

use crate::schema::{tensor_index, CH_O, CH_TO_MOVE, CH_X, F};
use c4_core::{Position, Side, COLS, ROWS};

/// Encode a position into the 7x6x3 network input, `(col, row, channel)`
/// order. Channel 0 broadcasts the side-to-move indicator (1.0 when X is to
/// move), channels 1 and 2 are the X and O occupancy masks.
pub fn encode_position_v1(pos: &Position, out: &mut [f32; F]) {
    let to_move = if pos.side_to_move() == Side::X {
        1.0
    } else {
        0.0
    };
    for col in 0..COLS {
        for row in 0..ROWS {
            let bit = 1u64 << (row * COLS + col);
            out[tensor_index(col, row, CH_TO_MOVE)] = to_move;
            out[tensor_index(col, row, CH_X)] = if pos.x_mask() & bit != 0 { 1.0 } else { 0.0 };
            out[tensor_index(col, row, CH_O)] = if pos.o_mask() & bit != 0 { 1.0 } else { 0.0 };
        }
    }
}
