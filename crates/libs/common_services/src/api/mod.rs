pub mod forms;
pub mod items;
pub mod report;
pub mod search;
