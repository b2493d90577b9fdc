pub mod indicator;
pub mod report;
