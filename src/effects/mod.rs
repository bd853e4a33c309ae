//! Tick-driven collaborators of the reveal: impact pulse and title scramble.

pub(crate) mod ease;
pub(crate) mod pulse;
pub(crate) mod scramble;
