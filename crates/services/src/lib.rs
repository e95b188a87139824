//! External-service clients: script generation, image search and
//! download, speech synthesis, object storage, metadata records, and
//! queue consumption.

pub mod images;
pub mod queue;
pub mod records;
pub mod script;
pub mod speech;
pub mod storage;

pub use images::ImageFetcher;
pub use queue::{QueueMessage, TopicQueue};
pub use records::MetadataRecorder;
pub use script::ScriptGenerator;
pub use speech::SpeechSynthesizer;
pub use storage::StorageUploader;
