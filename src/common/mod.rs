pub mod error;
pub mod result;

pub use error::SyncError;
pub use result::{OptionsExt, ResultExt, SyncResult};
