//! Library half of the `keytree` operator CLI.

pub mod cmd;
pub mod config;
