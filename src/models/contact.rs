//! 联系表单与报价单模型
//! 请求字段沿用前端表单的西班牙语键名

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{error::AppError, models::messages};

/// 报价单请求 (POST /api/contact)
#[derive(Debug, Default, Deserialize, Validate)]
pub struct QuotationRequest {
    #[serde(rename = "nombre", default)]
    #[validate(required, length(min = 1))]
    pub first_name: Option<String>,

    #[serde(rename = "apellido", default)]
    #[validate(required, length(min = 1))]
    pub last_name: Option<String>,

    #[serde(default)]
    #[validate(required, email)]
    pub email: Option<String>,

    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,

    #[serde(rename = "direccion", default)]
    pub address: Option<String>,

    #[serde(rename = "rol", default)]
    pub role: Option<String>,
}

/// 页脚联系留言请求 (POST /api/contact-footer)
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ContactMessageRequest {
    #[serde(rename = "nombre", default)]
    #[validate(required, length(min = 1))]
    pub first_name: Option<String>,

    #[serde(rename = "apellido", default)]
    #[validate(required, length(min = 1))]
    pub last_name: Option<String>,

    #[serde(default)]
    #[validate(required, email)]
    pub email: Option<String>,

    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,

    #[serde(rename = "mensaje", default)]
    #[validate(required, length(min = 1, max = 5000))]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quotation {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

/// 已校验的表单提交
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Submission {
    Quotation(Quotation),
    ContactMessage(ContactMessage),
}

impl Submission {
    pub fn kind(&self) -> &'static str {
        self.submission_kind().as_str()
    }

    pub fn submission_kind(&self) -> SubmissionKind {
        match self {
            Submission::Quotation(_) => SubmissionKind::Quotation,
            Submission::ContactMessage(_) => SubmissionKind::ContactMessage,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Submission::Quotation(q) => &q.email,
            Submission::ContactMessage(m) => &m.email,
        }
    }
}

impl TryFrom<QuotationRequest> for Submission {
    type Error = AppError;

    fn try_from(req: QuotationRequest) -> Result<Self, Self::Error> {
        req.validate().map_err(|e| {
            tracing::debug!(error = %e, "Quotation validation failed");
            AppError::bad_request(messages::QUOTATION_FIELDS_REQUIRED)
        })?;

        Ok(Submission::Quotation(Quotation {
            first_name: req.first_name.unwrap_or_default(),
            last_name: req.last_name.unwrap_or_default(),
            email: req.email.unwrap_or_default(),
            phone: req.phone.unwrap_or_default(),
            address: req.address.unwrap_or_default(),
            role: req.role.unwrap_or_default(),
        }))
    }
}

impl TryFrom<ContactMessageRequest> for Submission {
    type Error = AppError;

    fn try_from(req: ContactMessageRequest) -> Result<Self, Self::Error> {
        req.validate().map_err(|e| {
            tracing::debug!(error = %e, "Contact message validation failed");
            AppError::bad_request(messages::CONTACT_FIELDS_REQUIRED)
        })?;

        Ok(Submission::ContactMessage(ContactMessage {
            first_name: req.first_name.unwrap_or_default(),
            last_name: req.last_name.unwrap_or_default(),
            email: req.email.unwrap_or_default(),
            phone: req.phone.unwrap_or_default(),
            message: req.message.unwrap_or_default(),
        }))
    }
}

/// 提交类型（列表查询用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionKind {
    Quotation,
    ContactMessage,
}

impl SubmissionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionKind::Quotation => "quotation",
            SubmissionKind::ContactMessage => "contact_message",
        }
    }
}

/// 主存储返回的一条记录
#[derive(Debug, Clone)]
pub struct StoredSubmission {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub submission: Submission,
}

/// 存储位置标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageTag {
    Primary,
    Fallback,
}

/// 提交回执
#[derive(Debug, Serialize)]
pub struct SubmissionReceipt {
    pub message: String,
    pub id: String,
    pub storage: StorageTag,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// 备份文件中的一条记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackRecord {
    pub id: String,
    pub storage: StorageTag,
    pub created_at: DateTime<Utc>,
    pub submission: Submission,
}

/// 合并列表中的一条记录，source 标明来自主存储还是本地备份
#[derive(Debug, Serialize)]
pub struct ListedSubmission {
    pub id: String,
    pub source: StorageTag,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub submission: Submission,
}

#[derive(Debug, Default, Serialize)]
pub struct SourceCounts {
    pub primary: usize,
    pub fallback: usize,
}

/// 某一类提交的合并列表（按时间倒序）
#[derive(Debug, Serialize)]
pub struct SubmissionListing {
    pub total: usize,
    pub items: Vec<ListedSubmission>,
    pub sources: SourceCounts,
    /// 主存储读取失败时附带说明
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// 两类提交的存储概览
#[derive(Debug, Serialize)]
pub struct StorageSummary {
    pub quotations: SubmissionListing,
    pub contact_messages: SubmissionListing,
    pub fallback_path: String,
}
