pub mod analyze;
pub mod company;
pub mod compare;
pub mod report;
pub mod sales;
