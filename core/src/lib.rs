#![no_std]

extern crate alloc;

pub use board::*;
pub use confetti::*;
pub use engine::*;
pub use error::*;
pub use session::*;
pub use tone::*;
pub use types::*;

mod board;
mod confetti;
mod engine;
mod error;
mod session;
mod tone;
mod types;
