/// Game configuration constants.

/// Token attributed to the first play after a game starts. Negated on every
/// accepted play, so marks alternate between +1 and -1.
pub const STARTING_PIECE: i8 = 1;
