use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use crate::config::{AppConfig, JwtConfig, MongoConfig, StoreBackend};
use crate::middlewares::auth_middleware::AuthState;
use crate::repository::activity_repo::{ActivityRepository, MongoActivityRepository};
use crate::repository::inquiry_repo::{InquiryRepository, MongoInquiryRepository};
use crate::repository::memory::{
    InMemoryActivityRepository, InMemoryInquiryRepository, InMemoryNotificationRepository, InMemorySettingsRepository,
    InMemoryUserRepository,
};
use crate::repository::notification_repo::{MongoNotificationRepository, NotificationRepository};
use crate::repository::settings_repo::{MongoSettingsRepository, SettingsRepository};
use crate::repository::user_repo::{MongoUserRepository, UserRepository};
use crate::router::dashboard_router::dashboard_router;
use crate::router::inquiry_router::inquiry_router;
use crate::router::settings_router::settings_router;
use crate::router::user_router::user_router;
use crate::service::dashboard_service::{DashboardService, DashboardServiceImpl};
use crate::service::inquiry_service::{InquiryService, InquiryServiceImpl};
use crate::service::settings_service::SettingsService;
use crate::service::user_service::{UserService, UserServiceImpl};
use crate::util::error::ServiceError;
use crate::util::jwt::JwtTokenUtilsImpl;
use crate::util::notifier::{InAppNotifier, Notifier};

/// Every persistence collaborator the services need.
#[derive(Clone)]
pub struct Stores {
    pub inquiries: Arc<dyn InquiryRepository>,
    pub users: Arc<dyn UserRepository>,
    pub settings: Arc<dyn SettingsRepository>,
    pub activity: Arc<dyn ActivityRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
}

impl Stores {
    pub async fn mongo(config: &MongoConfig) -> Result<Self, mongodb::error::Error> {
        let db = config.connect().await?;
        Ok(Stores {
            inquiries: Arc::new(MongoInquiryRepository::new(&db, config.inquiry_collection())),
            users: Arc::new(MongoUserRepository::new(&db)),
            settings: Arc::new(MongoSettingsRepository::new(&db)),
            activity: Arc::new(MongoActivityRepository::new(&db)),
            notifications: Arc::new(MongoNotificationRepository::new(&db)),
        })
    }

    pub fn memory() -> Self {
        Stores {
            inquiries: Arc::new(InMemoryInquiryRepository::new()),
            users: Arc::new(InMemoryUserRepository::new()),
            settings: Arc::new(InMemorySettingsRepository::new()),
            activity: Arc::new(InMemoryActivityRepository::new()),
            notifications: Arc::new(InMemoryNotificationRepository::new()),
        }
    }
}

#[derive(Clone)]
pub struct Services {
    pub inquiry: Arc<dyn InquiryService>,
    pub dashboard: Arc<dyn DashboardService>,
    pub settings: Arc<SettingsService>,
    pub users: Arc<dyn UserService>,
}

impl Services {
    /// Runs the one-time settings initialization, then wires the services.
    pub async fn build(stores: &Stores) -> Result<Self, ServiceError> {
        let settings = Arc::new(SettingsService::initialize(stores.settings.clone()).await?);
        let users: Arc<dyn UserService> = Arc::new(UserServiceImpl::new(stores.users.clone()));
        let notifier: Arc<dyn Notifier> = Arc::new(InAppNotifier::new(stores.notifications.clone()));
        let inquiry = Arc::new(InquiryServiceImpl::new(
            stores.inquiries.clone(),
            users.clone(),
            settings.clone(),
            stores.activity.clone(),
            notifier,
        ));
        let dashboard = Arc::new(DashboardServiceImpl::new(stores.inquiries.clone(), users.clone(), settings.clone()));
        Ok(Services {
            inquiry,
            dashboard,
            settings,
            users,
        })
    }
}

pub fn create_router(services: &Services, jwt_utils: Arc<JwtTokenUtilsImpl>) -> Router {
    let auth_state = Arc::new(AuthState {
        jwt_utils,
        user_service: services.users.clone(),
    });
    Router::new()
        .merge(inquiry_router(services.inquiry.clone(), auth_state.clone()))
        .merge(dashboard_router(services.dashboard.clone(), auth_state.clone()))
        .merge(settings_router(services.settings.clone(), auth_state.clone()))
        .merge(user_router(services.users.clone(), auth_state))
        .route("/health", get(|| async { "OK" }))
}

pub struct App {
    config: AppConfig,
    router: Router,
}

impl App {
    pub async fn new() -> Self {
        let config = AppConfig::from_env();
        let jwt_config = JwtConfig::from_env().expect("JWT config error");

        let stores = match config.store {
            StoreBackend::Mongo => {
                let mongo_config = MongoConfig::from_env().expect("Mongo config error");
                Stores::mongo(&mongo_config).await.expect("Failed to connect to MongoDB")
            }
            StoreBackend::Memory => {
                info!("Using in-memory stores, data is lost on restart");
                Stores::memory()
            }
        };
        let services = Services::build(&stores).await.expect("Failed to initialize services");
        let router = create_router(&services, Arc::new(JwtTokenUtilsImpl::new(jwt_config)));
        App { config, router }
    }

    pub async fn start(self) {
        let addr = SocketAddr::new(self.config.host.parse().expect("Invalid host"), self.config.port);
        info!("Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await.expect("Failed to bind address");
        axum::serve(listener, self.router).await.expect("Failed to start server");
    }
}
