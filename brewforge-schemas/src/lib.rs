pub mod file_formats;
pub mod method;
pub mod recipe;
pub mod units;
