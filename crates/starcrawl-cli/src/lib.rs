//! starcrawl CLI library.
//!
//! Rendering helpers shared by the `starcrawl` binary's subcommands.

pub mod output;
