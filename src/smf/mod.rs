pub mod header;
pub mod json;
pub mod reader;
pub mod track;
pub mod vlq;
pub mod writer;

pub use json::SmfJson;
pub use reader::{SmfEvent, SmfHeader, SmfReader, TrackEvent};
pub use track::TrackChunk;
pub use writer::SmfWriter;
