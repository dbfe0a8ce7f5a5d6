pub mod errors;
pub mod file_type;
pub mod size;
