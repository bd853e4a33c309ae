//! Progressive curtain removal: erase-order policies, the batch scheduler, and the
//! engine that ties grid, surface and run state together.

pub(crate) mod engine;
pub(crate) mod order;
pub(crate) mod scheduler;
