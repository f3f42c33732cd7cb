//! # CourseBundler Catalog
//!
//! Domain services behind the HTTP surface. Every committed user write
//! signals [`ChangeNotifier::notify_user_changed`] and every committed
//! course write signals [`ChangeNotifier::notify_course_changed`], which is
//! how the statistics snapshot stays current.

pub mod contact;
pub mod courses;
pub mod signature;
pub mod subscriptions;
pub mod users;
mod validation;

pub use contact::{ContactMessage, ContactService, CourseRequest};
pub use courses::{CourseFilter, CourseService, NewCourse, NewLecture};
pub use signature::PaymentSigner;
pub use subscriptions::{PaymentVerification, SubscriptionService};
pub use users::{ProfileUpdate, RegisterInput, UserService};

use coursebundler_core::traits::{CatalogStore, ChangeNotifier, Mailer, MediaStorage, PaymentGateway};
use std::sync::Arc;

/// Storage and collaborators shared by the services.
#[derive(Clone)]
pub struct CatalogDeps {
    pub store: Arc<dyn CatalogStore>,
    pub media: Arc<dyn MediaStorage>,
    pub payments: Arc<dyn PaymentGateway>,
    pub mailer: Arc<dyn Mailer>,
    pub notifier: Arc<dyn ChangeNotifier>,
}

/// Deployment settings the services need.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    /// Gateway plan used for new subscriptions.
    pub plan_id: String,
    /// Secret the gateway signs payment callbacks with.
    pub payment_secret: String,
    /// Address contact messages are delivered to.
    pub contact_inbox: String,
}

/// All catalog services, wired to the same dependencies.
#[derive(Clone)]
pub struct CatalogServices {
    pub users: UserService,
    pub courses: CourseService,
    pub subscriptions: SubscriptionService,
    pub contact: ContactService,
}

impl CatalogServices {
    pub fn new(deps: CatalogDeps, config: CatalogConfig) -> Self {
        Self {
            users: UserService::new(deps.store.clone(), deps.media.clone(), deps.notifier.clone()),
            courses: CourseService::new(deps.store.clone(), deps.media, deps.notifier.clone()),
            subscriptions: SubscriptionService::new(
                deps.store,
                deps.payments,
                deps.notifier,
                PaymentSigner::new(config.payment_secret),
                config.plan_id,
            ),
            contact: ContactService::new(deps.mailer, config.contact_inbox),
        }
    }
}
