pub mod common;
pub mod person;
pub mod roulette;

pub use common::*;
pub use person::*;
pub use roulette::*;
