pub mod photo_service;
pub mod profile_service;
