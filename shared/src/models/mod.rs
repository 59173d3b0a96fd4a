pub mod character;
pub mod error;

pub use character::*;
pub use error::*;
