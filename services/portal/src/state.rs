use sea_orm::DatabaseConnection;

use portal_auth_types::session::SessionSecret;

use crate::infra::db::{DbEvaluationRequestRepository, DbUserRepository};
use crate::infra::mailer::HttpMailer;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub mailer: HttpMailer,
    pub jwt_secret: String,
    pub cookie_domain: String,
    pub public_base_url: String,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn request_repo(&self) -> DbEvaluationRequestRepository {
        DbEvaluationRequestRepository {
            db: self.db.clone(),
        }
    }

    pub fn notifier(&self) -> HttpMailer {
        self.mailer.clone()
    }
}

impl SessionSecret for AppState {
    fn session_secret(&self) -> &str {
        &self.jwt_secret
    }
}
