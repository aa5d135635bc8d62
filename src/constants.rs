//! Board limits, engine defaults and scan directions.

// =============================================================================
// Board Geometry
// =============================================================================

/// Default board size (NxN). Classic Othello is played on 8x8.
pub const DEFAULT_SIZE: usize = 8;

/// Smallest playable board: the four opening pieces plus a ring around them.
pub const MIN_SIZE: usize = 4;

/// Largest board that can still be addressed with one column letter.
pub const MAX_SIZE: usize = 26;

/// The eight scan directions as (row, col) steps.
/// Order: W, SW, S, SE, E, NE, N, NW
pub const DIRECTIONS: [(isize, isize); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

// =============================================================================
// Monte Carlo Parameters
// =============================================================================

/// Default number of playouts per candidate move (summed over all workers).
pub const DEFAULT_SIMULATIONS: usize = 20_000;

/// Default number of parallel workers per move evaluation.
pub const DEFAULT_THREADS: usize = 4;
