pub mod format;
pub mod log;
pub mod record;
pub mod stats;
pub mod value;

pub use format::*;
pub use log::*;
pub use record::*;
pub use stats::*;
pub use value::*;
