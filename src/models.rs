pub mod dashboard;
pub mod sales;
