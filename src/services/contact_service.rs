//! 联系表单服务
//!
//! 先持久化、后发邮件：主存储写入失败时写入本地备份并标记 storage = "fallback"；
//! 邮件在后台任务中发送，失败只记录告警。

use crate::{
    email::Mailer,
    error::AppError,
    models::{
        contact::{
            ListedSubmission, SourceCounts, StorageSummary, StorageTag, Submission,
            SubmissionKind, SubmissionListing, SubmissionReceipt,
        },
        messages,
    },
    repository::{FallbackSink, SubmissionStore},
};
use std::sync::Arc;

pub struct ContactService {
    primary: Option<Arc<dyn SubmissionStore>>,
    fallback: Arc<FallbackSink>,
    mailer: Arc<dyn Mailer>,
}

impl ContactService {
    /// `primary = None` 时所有提交直接写入备份（内存后端）
    pub fn new(
        primary: Option<Arc<dyn SubmissionStore>>,
        fallback: Arc<FallbackSink>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            primary,
            fallback,
            mailer,
        }
    }

    /// 保存一条已校验的提交并发送通知
    pub async fn submit(&self, submission: Submission) -> Result<SubmissionReceipt, AppError> {
        let receipt = self.persist(&submission).await?;

        metrics::counter!(
            "submissions_total",
            "kind" => submission.kind(),
            "storage" => match receipt.storage {
                StorageTag::Primary => "primary",
                StorageTag::Fallback => "fallback",
            }
        )
        .increment(1);

        // 邮件在后台发送，失败不回滚已保存的数据，也不阻塞响应
        let mailer = self.mailer.clone();
        let id = receipt.id.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer.send(&submission).await {
                tracing::warn!(
                    %id,
                    kind = submission.kind(),
                    error = %e,
                    "Failed to send notification email"
                );
            }
        });

        Ok(receipt)
    }

    /// 合并主存储与本地备份中的某类提交，按创建时间倒序
    ///
    /// 主存储不可读时只返回备份记录并附带 warning；备份文件不可读是服务端错误。
    pub async fn list(&self, kind: SubmissionKind) -> Result<SubmissionListing, AppError> {
        let mut items = Vec::new();
        let mut sources = SourceCounts::default();
        let mut warning = None;

        if let Some(primary) = &self.primary {
            match primary.list(kind).await {
                Ok(records) => {
                    sources.primary = records.len();
                    items.extend(records.into_iter().map(|r| ListedSubmission {
                        id: r.id,
                        source: StorageTag::Primary,
                        created_at: r.created_at,
                        submission: r.submission,
                    }));
                }
                Err(e) => {
                    tracing::warn!(
                        kind = kind.as_str(),
                        error = %e,
                        "Primary store unavailable, listing fallback records only"
                    );
                    warning = Some(messages::PRIMARY_UNAVAILABLE.to_string());
                }
            }
        }

        let fallback = self.fallback.read_all().await.map_err(|e| {
            AppError::Internal(format!(
                "Failed to read fallback sink {}: {}",
                self.fallback.path().display(),
                e
            ))
        })?;
        for record in fallback
            .into_iter()
            .filter(|r| r.submission.submission_kind() == kind)
        {
            sources.fallback += 1;
            items.push(ListedSubmission {
                id: record.id,
                source: StorageTag::Fallback,
                created_at: record.created_at,
                submission: record.submission,
            });
        }

        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(SubmissionListing {
            total: items.len(),
            items,
            sources,
            warning,
        })
    }

    /// 两类提交的合并概览
    pub async fn summary(&self) -> Result<StorageSummary, AppError> {
        Ok(StorageSummary {
            quotations: self.list(SubmissionKind::Quotation).await?,
            contact_messages: self.list(SubmissionKind::ContactMessage).await?,
            fallback_path: self.fallback.path().display().to_string(),
        })
    }

    async fn persist(&self, submission: &Submission) -> Result<SubmissionReceipt, AppError> {
        if let Some(primary) = &self.primary {
            match primary.insert(submission).await {
                Ok(id) => {
                    tracing::info!(%id, kind = submission.kind(), "Submission saved");
                    return Ok(SubmissionReceipt {
                        message: messages::CONTACT_SUCCESS.to_string(),
                        id,
                        storage: StorageTag::Primary,
                        warning: None,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        kind = submission.kind(),
                        error = %e,
                        path = %self.fallback.path().display(),
                        "Primary store unavailable, writing to fallback sink"
                    );
                }
            }
        }

        let record = self.fallback.write(submission).await.map_err(|e| {
            AppError::Internal(format!("Fallback write failed: {}", e))
        })?;

        Ok(SubmissionReceipt {
            message: messages::CONTACT_SAVED_LOCALLY.to_string(),
            id: record.id,
            storage: StorageTag::Fallback,
            warning: Some(messages::SYNC_PENDING.to_string()),
        })
    }
}
