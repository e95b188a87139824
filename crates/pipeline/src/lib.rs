//! Pipeline orchestration: queue-message parsing, the structured run
//! outcome, and the orchestrator that sequences every stage for one
//! topic.

pub mod message;
pub mod orchestrator;
pub mod outcome;

pub use message::parse_topic;
pub use orchestrator::Orchestrator;
pub use outcome::Outcome;
