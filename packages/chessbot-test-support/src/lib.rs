//! Chessbot test support utilities
//!
//! Shared helpers for the test binaries. Unit tests inside the crate and the
//! integration binaries both install logging through [`test_logging::init`].

pub mod test_logging;
