//! 数据模型模块
//! 用户与认证模型、联系表单模型，以及对外返回的固定文案

pub mod auth;
pub mod contact;
pub mod messages;
pub mod user;
