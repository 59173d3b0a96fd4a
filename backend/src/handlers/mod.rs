pub mod characters;

pub use characters::*;
