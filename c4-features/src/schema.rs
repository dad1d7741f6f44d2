//! Feature schema constants for the network input.

/// Tensor channels, innermost dimension.
pub const CH_TO_MOVE: usize = 0;
pub const CH_X: usize = 1;
pub const CH_O: usize = 2;
pub const CHANNELS: usize = 3;

/// Total feature length: 7 columns x 6 rows x 3 channels.
pub const F: usize = c4_core::COLS * c4_core::ROWS * CHANNELS;

/// Flat index of `(col, row, channel)` in the encoded tensor.
///
/// The tensor is laid out column-major: all six rows of column 0, then
/// column 1, and so on, with the three channels packed per cell.
pub fn tensor_index(col: usize, row: usize, channel: usize) -> usize {
    (col * c4_core::ROWS + row) * CHANNELS + channel
}
