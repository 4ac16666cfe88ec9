pub mod decoder;
pub mod main;
pub mod reader;
pub mod registry;
pub mod stream;
pub mod sync;

pub use decoder::*;
pub use main::*;
pub use reader::*;
pub use registry::*;
pub use stream::*;
pub use sync::*;
