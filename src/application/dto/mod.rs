//! # Application DTOs
//!
//! レイヤ間で受け渡すData Transfer Object

pub mod upload_config;
