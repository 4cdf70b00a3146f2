//! Single source of truth for shared solver constants.

/// Mask width used by the reference 8-bit solver. Pattern sets above this
/// need a wider `PatternMask` type.
pub const REFERENCE_MASK_BITS: u32 = 8;

/// Largest pattern count for which the exhaustive propagation matrix is built.
/// Each direction holds `2^N` masks, so 12 patterns = 4 * 4096 entries.
/// Larger sets fall back to ORing per-pattern neighbor masks at runtime.
pub const TABLE_MAX_PATTERNS: u32 = 12;

/// Default multiplier for the propagation safety valve:
/// `width * height * max(factor, pattern_count)` pops per `propagate_from` call.
pub const DEFAULT_ITERATION_BUDGET_FACTOR: u32 = 10;

/// Number of compass directions in a 2D grid.
pub const DIRECTION_COUNT: usize = 4;

/// Default number of solve attempts the generation layer makes before falling back.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 8;

/// Default chunk side length (cells) for chunked map generation.
pub const DEFAULT_CHUNK_SIZE: u32 = 64;
