//! Responsive hex grid covering the viewport plus an overscan margin.

pub(crate) mod builder;
