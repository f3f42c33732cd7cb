//! Subscription purchase, payment verification and cancellation.

use coursebundler_core::error::{AppError, AppResult};
use coursebundler_core::traits::{CatalogStore, ChangeNotifier, PaymentGateway};
use coursebundler_core::types::{Payment, Subscription, SubscriptionStatus, User};
use serde::Deserialize;
use std::sync::Arc;

use crate::signature::PaymentSigner;
use crate::validation::required;

/// Payment callback fields as posted by the checkout widget.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentVerification {
    #[serde(alias = "razorpay_payment_id")]
    pub payment_id: Option<String>,
    #[serde(alias = "razorpay_subscription_id")]
    pub subscription_id: Option<String>,
    #[serde(alias = "razorpay_signature")]
    pub signature: Option<String>,
}

#[derive(Clone)]
pub struct SubscriptionService {
    store: Arc<dyn CatalogStore>,
    payments: Arc<dyn PaymentGateway>,
    notifier: Arc<dyn ChangeNotifier>,
    signer: PaymentSigner,
    plan_id: String,
}

impl SubscriptionService {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        payments: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn ChangeNotifier>,
        signer: PaymentSigner,
        plan_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            payments,
            notifier,
            signer,
            plan_id: plan_id.into(),
        }
    }

    /// Creates a gateway subscription in `created` state.
    pub async fn buy(&self, user_id: &str) -> AppResult<Subscription> {
        let mut user = self.user(user_id).await?;
        if user.is_admin() {
            return Err(AppError::invalid("role", "Admin can't buy subscription"));
        }

        let id = self.payments.create_subscription(&self.plan_id).await?;
        let subscription = Subscription {
            id,
            status: SubscriptionStatus::Created,
        };
        user.subscription = Some(subscription.clone());

        self.store.update_user(&user).await?;
        self.notifier.notify_user_changed().await?;

        tracing::info!(user_id = %user.id, subscription_id = %subscription.id, "Created subscription");
        Ok(subscription)
    }

    /// Verifies the gateway signature and activates the subscription.
    ///
    /// The signature covers the subscription stored on the user, not the
    /// one echoed back in the callback.
    pub async fn verify_payment(&self, user_id: &str, callback: PaymentVerification) -> AppResult<Payment> {
        let payment_id = required("razorpay_payment_id", callback.payment_id.as_deref())?;
        let signature = required("razorpay_signature", callback.signature.as_deref())?;
        let mut user = self.user(user_id).await?;

        let Some(subscription) = user.subscription.as_mut() else {
            return Err(AppError::invalid("subscription", "no subscription to verify"));
        };

        if !self.signer.verify(payment_id, &subscription.id, signature)? {
            tracing::warn!(user_id, payment_id, "Rejected payment signature");
            return Err(AppError::InvalidSignature);
        }

        let payment = self
            .store
            .create_payment(&Payment::new(
                user_id,
                payment_id,
                subscription.id.as_str(),
                signature,
            ))
            .await?;

        subscription.status = SubscriptionStatus::Active;
        self.store.update_user(&user).await?;
        self.notifier.notify_user_changed().await?;

        tracing::info!(user_id, payment_id, "Activated subscription");
        Ok(payment)
    }

    /// Cancels at the gateway and clears the user's subscription.
    pub async fn cancel(&self, user_id: &str) -> AppResult<()> {
        let mut user = self.user(user_id).await?;
        let Some(subscription) = user.subscription.take() else {
            return Err(AppError::invalid("subscription", "no subscription to cancel"));
        };

        self.payments.cancel_subscription(&subscription.id).await?;
        self.store.update_user(&user).await?;
        self.notifier.notify_user_changed().await?;

        tracing::info!(user_id, subscription_id = %subscription.id, "Cancelled subscription");
        Ok(())
    }

    /// Public gateway key for the checkout widget.
    pub fn public_key(&self) -> &str {
        self.payments.key_id()
    }

    async fn user(&self, id: &str) -> AppResult<User> {
        self.store
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("user", "id", id))
    }
}
