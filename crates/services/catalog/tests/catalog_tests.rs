//! Tests for the catalog services
//!
//! Tests cover:
//! - Registration, profile updates and deletion
//! - Playlists
//! - Courses and lectures, including view counting
//! - Subscription purchase, payment verification and cancellation
//! - Contact mail
//! - Change signals after committed writes

use coursebundler_adapter_memory::*;
use coursebundler_catalog::*;
use coursebundler_core::*;
use std::sync::Arc;

struct Harness {
    store: Arc<MemoryAdapter>,
    media: Arc<MemoryMediaStorage>,
    payments: Arc<StaticPaymentGateway>,
    mailer: Arc<RecordingMailer>,
    notifier: Arc<RecordingNotifier>,
    services: CatalogServices,
}

const SECRET: &str = "gateway-secret";

fn harness() -> Harness {
    let store = Arc::new(MemoryAdapter::new());
    let media = Arc::new(MemoryMediaStorage::new());
    let payments = Arc::new(StaticPaymentGateway::new("rzp_test_key"));
    let mailer = Arc::new(RecordingMailer::new());
    let notifier = Arc::new(RecordingNotifier::new());

    let services = CatalogServices::new(
        CatalogDeps {
            store: store.clone(),
            media: media.clone(),
            payments: payments.clone(),
            mailer: mailer.clone(),
            notifier: notifier.clone(),
        },
        CatalogConfig {
            plan_id: "plan_monthly".to_string(),
            payment_secret: SECRET.to_string(),
            contact_inbox: "inbox@coursebundler.test".to_string(),
        },
    );

    Harness {
        store,
        media,
        payments,
        mailer,
        notifier,
        services,
    }
}

fn image() -> Upload {
    Upload::new("avatar.png", "image/png", vec![0x89, 0x50, 0x4e, 0x47])
}

fn video() -> Upload {
    Upload::new("lecture.mp4", "video/mp4", vec![0, 0, 0, 0x18])
}

async fn register(h: &Harness, email: &str) -> User {
    h.services
        .users
        .register(RegisterInput {
            name: Some("Asha".to_string()),
            email: Some(email.to_string()),
            avatar: Some(image()),
        })
        .await
        .unwrap()
}

async fn create_course(h: &Harness, title: &str, category: &str) -> Course {
    h.services
        .courses
        .create_course(NewCourse {
            title: Some(title.to_string()),
            description: Some("A practical course".to_string()),
            category: Some(category.to_string()),
            created_by: Some("Instructor".to_string()),
            poster: Some(image()),
        })
        .await
        .unwrap()
}

async fn add_lecture(h: &Harness, course_id: &str, title: &str) -> Course {
    h.services
        .courses
        .add_lecture(
            course_id,
            NewLecture {
                title: Some(title.to_string()),
                description: Some("Lecture notes".to_string()),
                video: Some(video()),
            },
        )
        .await
        .unwrap()
}

mod user_tests {
    use super::*;

    #[tokio::test]
    async fn test_register_uploads_avatar_and_signals() {
        let h = harness();
        let user = register(&h, "asha@example.com").await;

        assert_eq!(user.role, Role::User);
        assert!(user.avatar.public_id.starts_with("img_"));
        assert_eq!(h.media.stored().await, vec![user.avatar.public_id.clone()]);
        assert_eq!(h.store.user_count().await, 1);
        assert_eq!(h.notifier.user_signals(), 1);
    }

    #[tokio::test]
    async fn test_register_requires_all_fields() {
        let h = harness();

        let err = h
            .services
            .users
            .register(RegisterInput {
                name: Some("Asha".to_string()),
                email: Some("asha@example.com".to_string()),
                avatar: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::MissingField { ref field } if field == "file"));
        assert_eq!(err.status_code(), 400);
        assert_eq!(h.notifier.user_signals(), 0);
    }

    #[tokio::test]
    async fn test_register_rejects_bad_email() {
        let h = harness();
        let err = h
            .services
            .users
            .register(RegisterInput {
                name: Some("Asha".to_string()),
                email: Some("not-an-email".to_string()),
                avatar: Some(image()),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidEmail));
        assert!(h.media.stored().await.is_empty());
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let h = harness();
        register(&h, "asha@example.com").await;

        let err = h
            .services
            .users
            .register(RegisterInput {
                name: Some("Other".to_string()),
                email: Some("asha@example.com".to_string()),
                avatar: Some(image()),
            })
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 409);
        assert_eq!(h.store.user_count().await, 1);
    }

    #[tokio::test]
    async fn test_update_profile_keeps_blank_fields() {
        let h = harness();
        let user = register(&h, "asha@example.com").await;

        let updated = h
            .services
            .users
            .update_profile(
                &user.id,
                ProfileUpdate {
                    name: Some("Asha Rao".to_string()),
                    email: Some("  ".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Asha Rao");
        assert_eq!(updated.email, "asha@example.com");
        assert_eq!(h.notifier.user_signals(), 2);
    }

    #[tokio::test]
    async fn test_update_avatar_replaces_old_media() {
        let h = harness();
        let user = register(&h, "asha@example.com").await;
        let old = user.avatar.public_id.clone();

        let updated = h
            .services
            .users
            .update_avatar(&user.id, Some(image()))
            .await
            .unwrap();

        assert_ne!(updated.avatar.public_id, old);
        assert_eq!(h.media.destroyed().await, vec![old]);
        assert_eq!(h.media.stored().await, vec![updated.avatar.public_id]);
    }

    #[tokio::test]
    async fn test_toggle_role_round_trip() {
        let h = harness();
        let user = register(&h, "asha@example.com").await;

        let admin = h.services.users.toggle_role(&user.id).await.unwrap();
        assert_eq!(admin.role, Role::Admin);

        let back = h.services.users.toggle_role(&user.id).await.unwrap();
        assert_eq!(back.role, Role::User);
    }

    #[tokio::test]
    async fn test_delete_user_destroys_avatar() {
        let h = harness();
        let user = register(&h, "asha@example.com").await;

        h.services.users.delete_user(&user.id).await.unwrap();

        assert_eq!(h.store.user_count().await, 0);
        assert_eq!(h.media.destroyed().await, vec![user.avatar.public_id]);
        assert_eq!(h.notifier.user_signals(), 2);

        let err = h.services.users.delete_profile(&user.id).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}

mod playlist_tests {
    use super::*;

    #[tokio::test]
    async fn test_add_and_remove() {
        let h = harness();
        let user = register(&h, "asha@example.com").await;
        let course = create_course(&h, "Rust", "Programming").await;

        let with = h
            .services
            .users
            .add_to_playlist(&user.id, Some(&course.id))
            .await
            .unwrap();
        assert_eq!(with.playlist.len(), 1);
        assert_eq!(with.playlist[0].poster, course.poster.url);

        let without = h
            .services
            .users
            .remove_from_playlist(&user.id, Some(&course.id))
            .await
            .unwrap();
        assert!(without.playlist.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_rejected() {
        let h = harness();
        let user = register(&h, "asha@example.com").await;
        let course = create_course(&h, "Rust", "Programming").await;

        h.services
            .users
            .add_to_playlist(&user.id, Some(&course.id))
            .await
            .unwrap();
        let err = h
            .services
            .users
            .add_to_playlist(&user.id, Some(&course.id))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 409);
    }

    #[tokio::test]
    async fn test_unknown_course() {
        let h = harness();
        let user = register(&h, "asha@example.com").await;

        let err = h
            .services
            .users
            .add_to_playlist(&user.id, Some("missing"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);

        let err = h
            .services
            .users
            .remove_from_playlist(&user.id, Some("missing"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}

mod course_tests {
    use super::*;

    #[tokio::test]
    async fn test_listing_filters_and_hides_lectures() {
        let h = harness();
        let rust = create_course(&h, "Rust Fundamentals", "Programming").await;
        create_course(&h, "Color Theory", "Design").await;
        add_lecture(&h, &rust.id, "Ownership").await;

        let all = h
            .services
            .courses
            .list_courses(&CourseFilter::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let filtered = h
            .services
            .courses
            .list_courses(&CourseFilter {
                keyword: Some("rust".to_string()),
                category: Some("PROGRAM".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].num_of_videos, 1);
    }

    #[tokio::test]
    async fn test_create_requires_fields() {
        let h = harness();
        let err = h
            .services
            .courses
            .create_course(NewCourse {
                title: Some("Rust".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::MissingField { ref field } if field == "description"));
        assert_eq!(h.notifier.course_signals(), 0);
    }

    #[tokio::test]
    async fn test_lectures_count_views() {
        let h = harness();
        let course = create_course(&h, "Rust", "Programming").await;
        add_lecture(&h, &course.id, "Ownership").await;

        let lectures = h.services.courses.course_lectures(&course.id).await.unwrap();
        h.services.courses.course_lectures(&course.id).await.unwrap();

        assert_eq!(lectures.len(), 1);
        assert_eq!(h.services.courses.get_course(&course.id).await.unwrap().views, 2);
        assert_eq!(h.store.total_course_views().await.unwrap(), 2);
        // create, add lecture, two views
        assert_eq!(h.notifier.course_signals(), 4);
    }

    #[tokio::test]
    async fn test_delete_lecture() {
        let h = harness();
        let course = create_course(&h, "Rust", "Programming").await;
        add_lecture(&h, &course.id, "Ownership").await;
        let course = add_lecture(&h, &course.id, "Borrowing").await;
        assert_eq!(course.num_of_videos, 2);

        let removed = course.lectures[0].clone();
        let course = h
            .services
            .courses
            .delete_lecture(Some(&course.id), Some(&removed.id))
            .await
            .unwrap();

        assert_eq!(course.num_of_videos, 1);
        assert_eq!(course.lectures[0].title, "Borrowing");
        assert_eq!(h.media.destroyed().await, vec![removed.video.public_id]);

        let err = h
            .services
            .courses
            .delete_lecture(Some(&course.id), Some("missing"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_delete_course_destroys_media() {
        let h = harness();
        let course = create_course(&h, "Rust", "Programming").await;
        let course = add_lecture(&h, &course.id, "Ownership").await;

        h.services.courses.delete_course(&course.id).await.unwrap();

        let destroyed = h.media.destroyed().await;
        assert!(destroyed.contains(&course.poster.public_id));
        assert!(destroyed.contains(&course.lectures[0].video.public_id));
        assert!(h.media.stored().await.is_empty());
        assert_eq!(h.store.course_count().await, 0);
    }
}

mod subscription_tests {
    use super::*;

    #[tokio::test]
    async fn test_buy_then_verify() {
        let h = harness();
        let user = register(&h, "asha@example.com").await;

        let subscription = h.services.subscriptions.buy(&user.id).await.unwrap();
        assert_eq!(subscription.status, SubscriptionStatus::Created);
        assert_eq!(h.store.count_active_subscriptions().await.unwrap(), 0);

        let signature = PaymentSigner::new(SECRET)
            .sign("pay_001", &subscription.id)
            .unwrap();
        let payment = h
            .services
            .subscriptions
            .verify_payment(
                &user.id,
                PaymentVerification {
                    payment_id: Some("pay_001".to_string()),
                    subscription_id: Some(subscription.id.clone()),
                    signature: Some(signature),
                },
            )
            .await
            .unwrap();

        assert_eq!(payment.subscription_id, subscription.id);
        assert_eq!(h.store.count_active_subscriptions().await.unwrap(), 1);
        assert_eq!(h.store.get_payments_by_user_id(&user.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bad_signature_rejected() {
        let h = harness();
        let user = register(&h, "asha@example.com").await;
        let subscription = h.services.subscriptions.buy(&user.id).await.unwrap();

        let err = h
            .services
            .subscriptions
            .verify_payment(
                &user.id,
                PaymentVerification {
                    payment_id: Some("pay_001".to_string()),
                    subscription_id: Some(subscription.id),
                    signature: Some("0".repeat(64)),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::InvalidSignature));
        assert_eq!(h.store.count_active_subscriptions().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_admin_cannot_buy() {
        let h = harness();
        let user = register(&h, "admin@example.com").await;
        h.services.users.toggle_role(&user.id).await.unwrap();

        let err = h.services.subscriptions.buy(&user.id).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidField { .. }));
    }

    #[tokio::test]
    async fn test_cancel_clears_subscription() {
        let h = harness();
        let user = register(&h, "asha@example.com").await;
        let subscription = h.services.subscriptions.buy(&user.id).await.unwrap();

        h.services.subscriptions.cancel(&user.id).await.unwrap();

        let user = h.services.users.profile(&user.id).await.unwrap();
        assert!(user.subscription.is_none());
        assert_eq!(h.payments.cancelled().await, vec![subscription.id]);
    }

    #[tokio::test]
    async fn test_public_key() {
        let h = harness();
        assert_eq!(h.services.subscriptions.public_key(), "rzp_test_key");
    }
}

mod contact_tests {
    use super::*;

    #[tokio::test]
    async fn test_contact_mail() {
        let h = harness();
        h.services
            .contact
            .contact(ContactMessage {
                name: Some("Asha".to_string()),
                email: Some("asha@example.com".to_string()),
                message: Some("Hello".to_string()),
            })
            .await
            .unwrap();

        let outbox = h.mailer.outbox().await;
        assert_eq!(outbox.len(), 1);
        assert_eq!(outbox[0].to, "inbox@coursebundler.test");
        assert!(outbox[0].text.contains("asha@example.com"));
    }

    #[tokio::test]
    async fn test_course_request_requires_course() {
        let h = harness();
        let err = h
            .services
            .contact
            .course_request(CourseRequest {
                name: Some("Asha".to_string()),
                email: Some("asha@example.com".to_string()),
                course: None,
            })
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 400);
        assert!(h.mailer.outbox().await.is_empty());
    }
}
