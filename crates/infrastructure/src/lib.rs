//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod console_messaging_gateway;
mod in_memory_directory_store;
mod in_memory_member_lock_coordinator;

pub use console_messaging_gateway::{ConsoleMessagingGateway, PostedMessage};
pub use in_memory_directory_store::{
    CommunityRecord, DirectorySnapshot, InMemoryDirectoryStore, MemberRecord, RoleGroupRecord,
    RoleRecord,
};
pub use in_memory_member_lock_coordinator::InMemoryMemberLockCoordinator;
