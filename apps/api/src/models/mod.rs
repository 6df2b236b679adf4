pub mod employee;
pub mod project;
