//! Subcommand implementations for the `embedscape` binary.

pub(crate) mod criteria;
pub(crate) mod embed;
pub(crate) mod layout;
pub(crate) mod serve;
