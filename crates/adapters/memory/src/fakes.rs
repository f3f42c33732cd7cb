//! In-process stand-ins for the external collaborators.
//!
//! Each fake records what it was asked to do so tests can assert on it.

use async_trait::async_trait;
use coursebundler_core::error::{AppError, AppResult};
use coursebundler_core::traits::{ChangeNotifier, Mailer, MediaStorage, PaymentGateway};
use coursebundler_core::types::{Media, MediaKind, Upload};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Media storage that keeps nothing but the ids it handed out.
#[derive(Debug, Clone, Default)]
pub struct MemoryMediaStorage {
    stored: Arc<RwLock<Vec<String>>>,
    destroyed: Arc<RwLock<Vec<String>>>,
}

impl MemoryMediaStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids currently stored.
    pub async fn stored(&self) -> Vec<String> {
        self.stored.read().await.clone()
    }

    /// Ids destroyed so far, in order.
    pub async fn destroyed(&self) -> Vec<String> {
        self.destroyed.read().await.clone()
    }
}

#[async_trait]
impl MediaStorage for MemoryMediaStorage {
    async fn upload(&self, upload: &Upload, kind: MediaKind) -> AppResult<Media> {
        if upload.is_empty() {
            return Err(AppError::media(format!("empty upload '{}'", upload.file_name)));
        }

        let prefix = match kind {
            MediaKind::Image => "img",
            MediaKind::Video => "vid",
        };
        let public_id = format!("{prefix}_{}", uuid::Uuid::new_v4().simple());
        self.stored.write().await.push(public_id.clone());

        Ok(Media {
            url: format!("memory://{prefix}/{public_id}"),
            public_id,
        })
    }

    async fn destroy(&self, public_id: &str, _kind: MediaKind) -> AppResult<()> {
        self.stored.write().await.retain(|id| id != public_id);
        self.destroyed.write().await.push(public_id.to_string());
        Ok(())
    }
}

/// A message handed to [`RecordingMailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub text: String,
}

/// Mailer that records every message instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    outbox: Arc<RwLock<Vec<SentMail>>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far.
    pub async fn outbox(&self) -> Vec<SentMail> {
        self.outbox.read().await.clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, text: &str) -> AppResult<()> {
        tracing::debug!(to, subject, "Recorded outbound mail");
        self.outbox.write().await.push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}

/// Payment gateway that approves everything locally.
#[derive(Debug, Clone)]
pub struct StaticPaymentGateway {
    key_id: String,
    cancelled: Arc<RwLock<Vec<String>>>,
}

impl StaticPaymentGateway {
    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            cancelled: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Subscription ids cancelled so far.
    pub async fn cancelled(&self) -> Vec<String> {
        self.cancelled.read().await.clone()
    }
}

#[async_trait]
impl PaymentGateway for StaticPaymentGateway {
    fn key_id(&self) -> &str {
        &self.key_id
    }

    async fn create_subscription(&self, plan_id: &str) -> AppResult<String> {
        if plan_id.is_empty() {
            return Err(AppError::payment("no plan configured"));
        }
        Ok(format!("sub_{}", uuid::Uuid::new_v4().simple()))
    }

    async fn cancel_subscription(&self, subscription_id: &str) -> AppResult<()> {
        self.cancelled.write().await.push(subscription_id.to_string());
        Ok(())
    }
}

/// Change notifier that only counts signals.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    user_signals: AtomicUsize,
    course_signals: AtomicUsize,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_signals(&self) -> usize {
        self.user_signals.load(Ordering::SeqCst)
    }

    pub fn course_signals(&self) -> usize {
        self.course_signals.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChangeNotifier for RecordingNotifier {
    async fn notify_user_changed(&self) -> AppResult<()> {
        self.user_signals.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn notify_course_changed(&self) -> AppResult<()> {
        self.course_signals.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_media_upload_and_destroy() {
        let media = MemoryMediaStorage::new();
        let upload = Upload::new("intro.mp4", "video/mp4", vec![1, 2, 3]);

        let stored = media.upload(&upload, MediaKind::Video).await.unwrap();
        assert!(stored.public_id.starts_with("vid_"));
        assert_eq!(media.stored().await, vec![stored.public_id.clone()]);

        media.destroy(&stored.public_id, MediaKind::Video).await.unwrap();
        assert!(media.stored().await.is_empty());
        assert_eq!(media.destroyed().await, vec![stored.public_id]);
    }

    #[tokio::test]
    async fn test_empty_upload_rejected() {
        let media = MemoryMediaStorage::new();
        let result = media
            .upload(&Upload::new("x.png", "image/png", Vec::new()), MediaKind::Image)
            .await;
        assert!(matches!(result, Err(AppError::MediaError { .. })));
    }

    #[tokio::test]
    async fn test_notifier_counts() {
        let notifier = RecordingNotifier::new();
        notifier.notify_user_changed().await.unwrap();
        notifier.notify_user_changed().await.unwrap();
        notifier.notify_course_changed().await.unwrap();

        assert_eq!(notifier.user_signals(), 2);
        assert_eq!(notifier.course_signals(), 1);
    }
}
