//! Chess Engine Communication Protocol (CECP) front end.
//!
//! This crate owns all of the I/O: a non-blocking line reader over standard
//! input, a command parser, and the single-threaded dispatch loop that
//! drives [`riddari_engine::Engine`]. Responses go to standard output only;
//! the protocol communicates solely over the standard streams, so nothing
//! here ever writes to standard error.

pub mod command;
pub mod driver;
pub mod input;

#[cfg(test)]
pub(crate) mod test_utils;
