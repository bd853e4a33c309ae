//! Pixel surfaces and the CPU (`vello_cpu`) painters that draw on them.
//!
//! Surfaces are sized in device pixels but every painter draws in logical viewport
//! coordinates through a `scale(dpr)` transform.

pub(crate) mod composite;
pub(crate) mod curtain;
pub(crate) mod fx;
pub(crate) mod raster;
pub(crate) mod surface;
