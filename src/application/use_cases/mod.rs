pub mod sync_projects;

pub use sync_projects::{SyncProjectsConfig, SyncProjectsUseCase, SyncReport};
