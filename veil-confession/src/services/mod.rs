pub mod comment_service;
pub mod confession_service;
pub mod member_service;
pub mod reaction_service;
