pub mod api;
pub mod draw;
pub mod error;
pub mod notice;
pub mod roster;

pub use api::{HttpRosterApi, RosterApi};
pub use draw::{DrawController, DrawOutcome};
pub use error::{ClientError, Operation};
pub use notice::{Notice, NoticeKind};
pub use roster::{Roster, RosterSnapshot};
