pub mod file_service;
pub mod ports;
pub mod registry;
