pub mod macros;
pub mod time;
pub mod validate;

pub use time::*;
pub use validate::*;
