pub mod has_gets;

pub use has_gets::*;
