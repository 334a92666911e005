pub mod health;
pub mod swipe;
