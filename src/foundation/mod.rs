pub mod catalog;
pub mod utils;
