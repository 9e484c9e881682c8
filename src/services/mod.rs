pub mod person_service;
pub mod roulette_service;

pub use person_service::*;
pub use roulette_service::*;
