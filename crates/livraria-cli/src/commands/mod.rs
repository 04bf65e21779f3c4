pub mod backup;
pub mod catalog;
