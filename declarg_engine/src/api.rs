mod action;
mod argument;
mod command;
mod core;

pub use self::core::*;
pub use action::*;
pub use argument::*;
pub use command::*;
