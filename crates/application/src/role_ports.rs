mod directory;
mod gateway;
mod locks;

pub use directory::DirectoryStore;
pub use gateway::MessagingGateway;
pub use locks::MemberLockCoordinator;
