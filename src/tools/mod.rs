//! The secondary tools of the `grade-maker-tools` binary.

pub mod annotate;
pub mod cleanup;
pub mod gen_autocompletion;
pub mod opt;
pub mod review;
pub mod tally;
pub mod unpack;
