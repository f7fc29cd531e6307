pub mod credits;
pub mod health;
