//! Video assembly: ffprobe wrapper, image normalization, concat playlist
//! construction, the `Encoder` capability, and the `VideoAssembler`
//! state machine that ties them together.

pub mod assembler;
pub mod encoder;
pub mod ffmpeg;
pub mod playlist;
pub mod resize;

pub use assembler::VideoAssembler;
pub use encoder::{EncodeJob, Encoder, FfmpegEncoder, OutputSpec};
