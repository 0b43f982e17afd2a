pub mod resolver;

pub use resolver::{resolve, windows_for_day};
