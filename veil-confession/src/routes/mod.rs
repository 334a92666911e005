pub mod comment;
pub mod confession;
pub mod health;
