//! JSON-loadable settings for the whole curtain: grid sizing, paint style, dissolve and
//! reveal timing.

pub(crate) mod schema;
