//! Background image loading.

pub(crate) mod decode;
