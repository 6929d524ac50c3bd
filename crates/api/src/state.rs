use gatsishub_config::Settings;
use gatsishub_services::{
    AuthService,
    dao::{
        admin_notification::AdminNotificationDao, login_code::LoginCodeDao, material::MaterialDao,
        message::MessageDao, notification::NotificationDao, order::OrderDao, quota::QuotaDao,
        submission::SubmissionDao, team::TeamDao, user::UserDao,
    },
};
use mongodb::Database;
use std::sync::Arc;

use crate::ws::storage::WsStorage;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserDao>,
    pub messages: Arc<MessageDao>,
    pub notifications: Arc<NotificationDao>,
    pub admin_notifications: Arc<AdminNotificationDao>,
    pub orders: Arc<OrderDao>,
    pub materials: Arc<MaterialDao>,
    pub teams: Arc<TeamDao>,
    pub quotas: Arc<QuotaDao>,
    pub submissions: Arc<SubmissionDao>,
    pub login_codes: Arc<LoginCodeDao>,
    pub ws_storage: Arc<WsStorage>,
}

impl AppState {
    pub fn new(db: Database, settings: Settings) -> Self {
        let auth = Arc::new(AuthService::new(settings.jwt.clone()));
        let users = Arc::new(UserDao::new(&db));
        let messages = Arc::new(MessageDao::new(&db));
        let notifications = Arc::new(NotificationDao::new(&db));
        let admin_notifications = Arc::new(AdminNotificationDao::new(&db));
        let orders = Arc::new(OrderDao::new(&db));
        let materials = Arc::new(MaterialDao::new(&db));
        let teams = Arc::new(TeamDao::new(&db));
        let quotas = Arc::new(QuotaDao::new(&db));
        let submissions = Arc::new(SubmissionDao::new(&db));
        let login_codes = Arc::new(LoginCodeDao::new(&db));
        let ws_storage = Arc::new(WsStorage::new());

        Self {
            db,
            settings,
            auth,
            users,
            messages,
            notifications,
            admin_notifications,
            orders,
            materials,
            teams,
            quotas,
            submissions,
            login_codes,
            ws_storage,
        }
    }
}
