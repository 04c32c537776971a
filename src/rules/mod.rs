//! Rule compilation module.
//!
//! Turns flow entries into the match-action rule records consumed by the
//! downstream simulator, including the bit-level prefix encoding.

pub mod prefix;
pub mod compiler;

pub use prefix::{Prefix, PrefixError};
pub use compiler::{compile_entry, compile_switch, encode_match, encode_prefix, MATCH_GROUPS};
