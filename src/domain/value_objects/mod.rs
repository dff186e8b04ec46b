pub mod project_type;

pub use project_type::{ProjectType, ProjectTypeError};
