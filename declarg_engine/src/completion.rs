mod bridge;
mod shell;

pub use bridge::*;
pub use shell::*;
