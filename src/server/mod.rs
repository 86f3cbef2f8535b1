//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::jwt::JwtManager;
use crate::queue::{run_worker, EmailQueue};
use crate::email::SmtpMailer;
use crate::repository::{
    invitation::InvitationRepositoryImpl, membership::MembershipRepositoryImpl,
    organization::OrganizationRepositoryImpl, user::UserRepositoryImpl,
};
use crate::service::{InvitationService, OrganizationService, UserService};
use crate::state::{HasInvitations, HasServices};
use anyhow::Result;
use axum::{
    routing::{delete, get, post},
    Router,
};
use sqlx::{mysql::MySqlPoolOptions, MySqlPool};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db_pool: MySqlPool,
    pub jwt_manager: JwtManager,
    pub email_queue: EmailQueue,
    pub organization_service: Arc<
        OrganizationService<
            OrganizationRepositoryImpl,
            MembershipRepositoryImpl,
            UserRepositoryImpl,
        >,
    >,
    pub user_service: Arc<UserService<UserRepositoryImpl>>,
    pub invitation_service: Arc<
        InvitationService<
            InvitationRepositoryImpl,
            OrganizationRepositoryImpl,
            MembershipRepositoryImpl,
            UserRepositoryImpl,
        >,
    >,
}

impl HasServices for AppState {
    type OrgRepo = OrganizationRepositoryImpl;
    type MemberRepo = MembershipRepositoryImpl;
    type UserRepo = UserRepositoryImpl;

    fn config(&self) -> &Config {
        &self.config
    }

    fn jwt_manager(&self) -> &JwtManager {
        &self.jwt_manager
    }

    fn organization_service(
        &self,
    ) -> &OrganizationService<Self::OrgRepo, Self::MemberRepo, Self::UserRepo> {
        &self.organization_service
    }

    fn user_service(&self) -> &UserService<Self::UserRepo> {
        &self.user_service
    }

    async fn check_ready(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.db_pool).await.is_ok()
    }
}

impl HasInvitations for AppState {
    type InvitationRepo = InvitationRepositoryImpl;

    fn invitation_service(
        &self,
    ) -> &InvitationService<Self::InvitationRepo, Self::OrgRepo, Self::MemberRepo, Self::UserRepo>
    {
        &self.invitation_service
    }
}

/// Run the server
pub async fn run(config: Config) -> Result<()> {
    // Create database connection pool
    let db_pool = MySqlPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    info!("Connected to database");

    // Create repositories
    let organization_repo = Arc::new(OrganizationRepositoryImpl::new(db_pool.clone()));
    let membership_repo = Arc::new(MembershipRepositoryImpl::new(db_pool.clone()));
    let user_repo = Arc::new(UserRepositoryImpl::new(db_pool.clone()));
    let invitation_repo = Arc::new(InvitationRepositoryImpl::new(db_pool.clone()));

    // Create JWT manager
    let jwt_manager = JwtManager::new(config.jwt.clone());

    // Create the email queue and spawn its worker
    let (email_queue, receiver) = EmailQueue::new(config.queue.capacity);
    let mailer = SmtpMailer::from_config(&config.smtp)
        .map_err(|e| anyhow::anyhow!("Failed to build SMTP mailer: {}", e))?;
    tokio::spawn(run_worker(receiver, Arc::new(mailer), config.queue.clone()));
    info!("Email queue worker started");

    // Create services
    let organization_service = Arc::new(OrganizationService::new(
        organization_repo.clone(),
        membership_repo.clone(),
        user_repo.clone(),
    ));
    let user_service = Arc::new(UserService::new(user_repo.clone()));
    let invitation_service = Arc::new(InvitationService::new(
        invitation_repo,
        organization_repo,
        membership_repo,
        user_repo,
        email_queue.clone(),
        config.app_base_url.clone(),
        config.smtp.from_email.clone(),
        config.invitations.expires_in_days,
    ));

    // Create app state
    let state = AppState {
        config: Arc::new(config.clone()),
        db_pool,
        jwt_manager,
        email_queue,
        organization_service,
        user_service,
        invitation_service,
    };

    let app = build_router(state);

    let http_addr = config.http_addr();
    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the HTTP router with a generic state type
///
/// Generic over the state so the same routes serve the production
/// `AppState` and test implementations.
pub fn build_router<S: HasInvitations>(state: S) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints
        .route("/health", get(api::health::health))
        .route("/ready", get(api::health::ready::<S>))
        // User endpoints
        .route("/api/v1/users", post(api::user::create::<S>))
        .route("/api/v1/users/{id}", get(api::user::get::<S>))
        .route(
            "/api/v1/users/{id}/organizations",
            get(api::user::list_organizations::<S>),
        )
        // Organization endpoints
        .route("/api/v1/organizations", post(api::organization::create::<S>))
        .route(
            "/api/v1/organizations/{org_id}",
            get(api::organization::get::<S>).delete(api::organization::delete::<S>),
        )
        .route(
            "/api/v1/organizations/{org_id}/users",
            get(api::organization::list_members::<S>),
        )
        .route(
            "/api/v1/organizations/{org_id}/users/{user_id}",
            delete(api::organization::remove_member::<S>),
        )
        // Invitation endpoints
        .route(
            "/api/v1/organizations/{org_id}/invitations",
            get(api::invitation::list::<S>).post(api::invitation::create::<S>),
        )
        .route(
            "/api/v1/organizations/{org_id}/invitations/link",
            post(api::invitation::create_link::<S>),
        )
        .route("/api/v1/invitations/{id}", delete(api::invitation::revoke::<S>))
        .route("/api/v1/invitations/accept", post(api::invitation::accept::<S>))
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
