//! Core application

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::api::{ApiServer, AuthManager};
use crate::core::banner;
use crate::core::cli::{self, CliConfig, Commands};
use crate::core::config::AppConfig;
use crate::core::constants::{
    APP_NAME_LOWER, DEFAULT_USER_ID, DEFAULT_USER_NAME, ENV_JWT_SECRET, ENV_LOG,
};
use crate::core::shutdown::ShutdownService;
use crate::core::storage::AppStorage;
use crate::data::TransactionalService;
use crate::data::types::{NewUser, Role};

pub struct CoreApp {
    pub shutdown: ShutdownService,
    pub config: AppConfig,
    pub storage: AppStorage,
    pub database: Arc<TransactionalService>,
    pub auth: Arc<AuthManager>,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        tracing::debug!("Application starting");

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        match command {
            Some(Commands::Token {
                user_id,
                name,
                email,
                admin,
            }) => {
                let user = NewUser {
                    id: user_id,
                    name,
                    email,
                    role: if admin { Role::Admin } else { Role::User },
                };
                Self::print_token(&cli_config, user).await
            }
            Some(Commands::Start) | None => {
                let app = Self::init(&cli_config).await?;
                Self::start_server(app).await
            }
        }
    }

    async fn init(cli: &CliConfig) -> Result<Self> {
        let config = AppConfig::load(cli)?;
        let storage = AppStorage::init().await?;

        let database = Arc::new(
            TransactionalService::init(&storage)
                .await
                .context("Failed to initialize database")?,
        );
        let auth = Arc::new(AuthManager::init(&config.auth));

        if !auth.is_enabled() {
            Self::ensure_local_user(&database).await?;
        }

        let shutdown = ShutdownService::new(database.clone());

        Ok(Self {
            shutdown,
            config,
            storage,
            database,
            auth,
        })
    }

    /// Keep a stored profile for the identity used when auth is disabled
    async fn ensure_local_user(database: &TransactionalService) -> Result<()> {
        let repo = database.repository();
        if repo.get_user(DEFAULT_USER_ID).await?.is_none() {
            repo.upsert_user(&NewUser {
                id: DEFAULT_USER_ID.to_string(),
                name: DEFAULT_USER_NAME.to_string(),
                email: None,
                role: Role::Admin,
            })
            .await?;
            tracing::debug!(user_id = DEFAULT_USER_ID, "Local user created");
        }
        Ok(())
    }

    /// Register the user, then print a token signed with the configured secret
    async fn print_token(cli: &CliConfig, user: NewUser) -> Result<()> {
        let config = AppConfig::load(cli)?;
        if config.auth.jwt_secret.is_none() {
            anyhow::bail!(
                "A JWT secret is required to issue tokens. Set {} or pass --jwt-secret",
                ENV_JWT_SECRET
            );
        }

        let storage = AppStorage::init().await?;
        let database = TransactionalService::init(&storage)
            .await
            .context("Failed to initialize database")?;
        let stored = database
            .repository()
            .upsert_user(&user)
            .await
            .context("Failed to register user")?;
        database.close().await;

        let auth = AuthManager::init(&config.auth);
        let token = auth
            .issue_token(&stored.id, &stored.name, stored.role)
            .context("Failed to sign token")?;

        tracing::debug!(user_id = %stored.id, role = %stored.role, "Token issued");
        println!("{}", token);
        Ok(())
    }

    fn init_logging() {
        let default_filter = format!("info,{}=info", APP_NAME_LOWER);

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start_server(app: Self) -> Result<()> {
        // Install signal handlers FIRST (before any blocking calls)
        app.shutdown.install_signal_handlers();

        app.start_background_tasks().await;

        banner::print_banner(
            &app.config.server.host,
            app.config.server.port,
            app.auth.is_enabled(),
            &app.storage.data_dir().display().to_string(),
        );

        let server = ApiServer::new(app);
        let app = server.start().await?;
        app.shutdown.shutdown().await;

        Ok(())
    }

    pub async fn start_background_tasks(&self) {
        self.shutdown
            .register(
                self.database
                    .start_checkpoint_task(self.shutdown.subscribe()),
            )
            .await;

        tracing::debug!("Background tasks started");
    }
}
