#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use bson::oid::ObjectId;
use leadflow_backend::app::app::{Services, Stores};
use leadflow_backend::dto::inquiry_dto::CreateInquiryRequest;
use leadflow_backend::model::user::{Actor, Role, User};
use leadflow_backend::repository::memory::{
    InMemoryActivityRepository, InMemoryInquiryRepository, InMemoryNotificationRepository, InMemorySettingsRepository,
    InMemoryUserRepository,
};
use leadflow_backend::repository::user_repo::UserRepository;

/// Services wired to in-memory stores, with handles kept for assertions.
pub struct Harness {
    pub services: Services,
    pub users: InMemoryUserRepository,
    pub inquiries: InMemoryInquiryRepository,
    pub activity: InMemoryActivityRepository,
    pub notifications: InMemoryNotificationRepository,
}

impl Harness {
    pub async fn new() -> Self {
        let users = InMemoryUserRepository::new();
        let inquiries = InMemoryInquiryRepository::new();
        let activity = InMemoryActivityRepository::new();
        let notifications = InMemoryNotificationRepository::new();
        let stores = Stores {
            inquiries: Arc::new(inquiries.clone()),
            users: Arc::new(users.clone()),
            settings: Arc::new(InMemorySettingsRepository::new()),
            activity: Arc::new(activity.clone()),
            notifications: Arc::new(notifications.clone()),
        };
        let services = Services::build(&stores).await.expect("services");
        Harness {
            services,
            users,
            inquiries,
            activity,
            notifications,
        }
    }

    pub async fn user(&self, role: Role) -> Actor {
        self.user_with(role, true).await
    }

    pub async fn user_with(&self, role: Role, is_active: bool) -> Actor {
        let id = ObjectId::new();
        self.users
            .insert(User {
                id,
                first_name: "Test".to_string(),
                last_name: format!("{}-{}", role, &id.to_hex()[18..]),
                email: format!("{}@example.com", id.to_hex()),
                role,
                is_active,
                created_at: None,
                updated_at: None,
            })
            .await
            .expect("insert user");
        Actor::new(id, role)
    }
}

pub fn create_request(phone: &str) -> CreateInquiryRequest {
    CreateInquiryRequest {
        name: "Aarav Mehta".to_string(),
        phone: phone.to_string(),
        email: Some("Aarav@Example.com".to_string()),
        city: "Pune".to_string(),
        education: "B.Tech".to_string(),
        course: "Data Science".to_string(),
        preferred_location: "Pune".to_string(),
        medium: "Website".to_string(),
        message: None,
        status: None,
    }
}

/// Polls until `check` holds; side channels are written from spawned tasks.
pub async fn eventually<F: Fn() -> bool>(check: F) -> bool {
    for _ in 0..50 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
