mod registry;

pub use registry::{ParticipantId, ParticipantRecord, ParticipantRegistry};
