//! Trigger handling and the impact → dissolve → title sequence.

pub(crate) mod orchestrator;
