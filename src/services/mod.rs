//! 业务服务层

pub mod auth_service;
pub mod contact_service;

pub use auth_service::AuthService;
pub use contact_service::ContactService;
