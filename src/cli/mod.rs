//! Command handlers for the `zeptovault` binary.

pub(crate) mod keys;
pub(crate) mod setup;
pub(crate) mod status;
