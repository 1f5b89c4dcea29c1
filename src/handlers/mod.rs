//! HTTP 处理器模块

pub mod auth;
pub mod contact;
pub mod health;
