pub mod blacklist;
pub mod directory;

pub use blacklist::BlacklistService;
pub use directory::DirectoryService;
