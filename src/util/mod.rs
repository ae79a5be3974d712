pub mod file;
pub mod glob;
pub mod sort;
