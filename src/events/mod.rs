pub mod models;
pub mod source;
pub mod view;

pub use models::{event_type, parse_events, MatchEvent, RawEventRecord, THROW_IN};
pub use source::{JsonDirectorySource, MatchSource};
pub use view::{EventLogView, EventSelection};
