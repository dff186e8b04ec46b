pub mod probe;
pub mod sync;

pub use probe::*;
pub use sync::*;
