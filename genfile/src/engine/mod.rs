pub mod cost_model;
pub mod padding;
pub mod planner;
pub mod zip;
