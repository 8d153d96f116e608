//! CLI command implementations

pub mod init;
pub mod prefill;
pub mod validate;
