//! Flat-top hexagon geometry shared by the grid builder and the renderers.

pub(crate) mod hex;
