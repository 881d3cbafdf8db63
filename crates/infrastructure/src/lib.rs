//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod channel_record_collaborator;
mod in_memory_record_repository;

pub use channel_record_collaborator::ChannelRecordCollaborator;
pub use in_memory_record_repository::InMemoryRecordRepository;
