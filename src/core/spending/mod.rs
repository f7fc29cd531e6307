pub mod daily;
pub mod report;
pub mod window;
