pub mod credits;
pub mod spending;
