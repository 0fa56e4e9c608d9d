pub mod history;
pub mod human;
pub mod report;
