//! Engine module for `declarg`.
//! See [documentation root](https://docs.rs/declarg/latest/declarg/index.html) for full details.
#![deny(missing_docs)]
mod api;
mod completion;
mod constant;
mod matcher;
mod model;
mod parser;
mod tokens;

pub use api::*;
pub use completion::*;
pub use model::*;
pub use parser::{
    BadArgument, CompletionCommand, Completions, ConfigError, GeneralParser, HelpRequest,
    MatchError, Parsed, Parser, Signal,
};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
