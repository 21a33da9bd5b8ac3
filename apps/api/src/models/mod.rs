pub mod application;
pub mod compatibility;
pub mod resume;
pub mod swipe;
pub mod user;
