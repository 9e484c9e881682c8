pub mod persons;
pub mod winners;

pub use persons as person_entity;
pub use winners as winner_entity;
