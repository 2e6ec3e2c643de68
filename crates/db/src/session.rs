//! Database session provider and unit-of-work scoping.
//!
//! A [`SessionProvider`] owns the process-wide connection pool. It is built
//! once at startup, initialized from a [`DatabaseConfig`], and shared with
//! every component that needs storage access.
//!
//! ```ignore
//! let sessions = Arc::new(SessionProvider::new());
//! sessions.initialize(&config.database).await?;
//!
//! let created = sessions
//!     .run_in_transaction::<_, _, ResourceError>(|uow| {
//!         Box::pin(async move { repository.create(Some(uow), input).await })
//!     })
//!     .await?;
//! ```

use std::sync::OnceLock;
use std::time::Duration;

use catalog_shared::DatabaseConfig;
use futures::future::BoxFuture;
use sea_orm::{
    AccessMode, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    DatabaseTransaction, DbBackend, DbErr, ExecResult, IsolationLevel, QueryResult, Statement,
    TransactionTrait,
};
use sea_orm_migration::MigratorTrait;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::migration::Migrator;

/// Errors raised by the session provider.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The database could not be reached or rejected the credentials.
    #[error("Failed to connect to database: {0}")]
    Connection(String),

    /// `initialize` has not completed yet.
    #[error("Database session provider is not initialized")]
    NotInitialized,

    /// `initialize` was called more than once.
    #[error("Database session provider is already initialized")]
    AlreadyInitialized,

    /// Pending migrations could not be applied.
    #[error("Failed to synchronize schema: {0}")]
    Migration(DbErr),

    /// A transaction could not be started or committed.
    #[error("Transaction failed: {0}")]
    Transaction(DbErr),
}

/// An open transaction that repository calls can be bound to.
///
/// Dropping a unit of work without committing rolls it back.
pub struct UnitOfWork {
    txn: DatabaseTransaction,
}

impl UnitOfWork {
    /// Returns the underlying transaction.
    #[must_use]
    pub fn transaction(&self) -> &DatabaseTransaction {
        &self.txn
    }

    /// Commits the transaction, persisting all changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails.
    pub async fn commit(self) -> Result<(), DbErr> {
        self.txn.commit().await
    }

    /// Rolls back the transaction, discarding all changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the rollback fails.
    pub async fn rollback(self) -> Result<(), DbErr> {
        self.txn.rollback().await
    }
}

/// Connection handle used by repository code.
///
/// Either the shared pool or the transaction of a unit of work. Both run
/// statements through the same [`ConnectionTrait`] surface.
pub enum Session<'a> {
    /// Standalone call on the shared pool.
    Shared(&'a DatabaseConnection),
    /// Call bound to an active unit of work.
    Scoped(&'a DatabaseTransaction),
}

impl Session<'_> {
    /// Returns true when bound to a unit of work.
    #[must_use]
    pub const fn is_scoped(&self) -> bool {
        matches!(self, Self::Scoped(_))
    }
}

#[async_trait::async_trait]
impl<'a> ConnectionTrait for Session<'a> {
    fn get_database_backend(&self) -> DbBackend {
        match self {
            Self::Shared(conn) => conn.get_database_backend(),
            Self::Scoped(txn) => txn.get_database_backend(),
        }
    }

    async fn execute(&self, stmt: Statement) -> Result<ExecResult, DbErr> {
        match self {
            Self::Shared(conn) => conn.execute(stmt).await,
            Self::Scoped(txn) => txn.execute(stmt).await,
        }
    }

    async fn execute_unprepared(&self, sql: &str) -> Result<ExecResult, DbErr> {
        match self {
            Self::Shared(conn) => conn.execute_unprepared(sql).await,
            Self::Scoped(txn) => txn.execute_unprepared(sql).await,
        }
    }

    async fn query_one(&self, stmt: Statement) -> Result<Option<QueryResult>, DbErr> {
        match self {
            Self::Shared(conn) => conn.query_one(stmt).await,
            Self::Scoped(txn) => txn.query_one(stmt).await,
        }
    }

    async fn query_all(&self, stmt: Statement) -> Result<Vec<QueryResult>, DbErr> {
        match self {
            Self::Shared(conn) => conn.query_all(stmt).await,
            Self::Scoped(txn) => txn.query_all(stmt).await,
        }
    }

    fn support_returning(&self) -> bool {
        match self {
            Self::Shared(conn) => conn.support_returning(),
            Self::Scoped(txn) => txn.support_returning(),
        }
    }

    fn is_mock_connection(&self) -> bool {
        match self {
            Self::Shared(conn) => conn.is_mock_connection(),
            Self::Scoped(txn) => txn.is_mock_connection(),
        }
    }
}

/// Process-lifetime holder of the database connection pool.
#[derive(Debug, Default)]
pub struct SessionProvider {
    connection: OnceLock<DatabaseConnection>,
}

impl SessionProvider {
    /// Creates an uninitialized provider.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            connection: OnceLock::new(),
        }
    }

    /// Opens the connection pool and, when `synchronize` is set, applies
    /// pending migrations.
    ///
    /// # Errors
    ///
    /// - [`SessionError::AlreadyInitialized`] on a second call
    /// - [`SessionError::Connection`] if the database is unreachable
    /// - [`SessionError::Migration`] if schema synchronization fails
    pub async fn initialize(&self, config: &DatabaseConfig) -> Result<(), SessionError> {
        if self.is_ready() {
            return Err(SessionError::AlreadyInitialized);
        }

        let mut options = ConnectOptions::new(config.connection_url());
        options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .sqlx_logging(false)
            // LIKE is case-insensitive on SQLite by default; applied to every pooled connection.
            .map_sqlx_sqlite_opts(|opts| opts.pragma("case_sensitive_like", "ON"));

        let conn = Database::connect(options)
            .await
            .map_err(|e| SessionError::Connection(e.to_string()))?;

        if config.synchronize {
            Migrator::up(&conn, None)
                .await
                .map_err(SessionError::Migration)?;
            debug!("Schema synchronized");
        }

        self.connection
            .set(conn)
            .map_err(|_| SessionError::AlreadyInitialized)?;

        info!(database = %config.redacted_target(), "Database session provider initialized");
        Ok(())
    }

    /// Reports whether initialization completed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.connection.get().is_some()
    }

    /// Returns the shared connection pool.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotInitialized`] before `initialize` succeeds.
    pub fn connection(&self) -> Result<&DatabaseConnection, SessionError> {
        self.connection.get().ok_or(SessionError::NotInitialized)
    }

    /// Returns the session for a call: the unit of work's transaction when
    /// one is supplied, the shared pool otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotInitialized`] for standalone calls before
    /// `initialize` succeeds.
    pub fn session<'a>(&'a self, uow: Option<&'a UnitOfWork>) -> Result<Session<'a>, SessionError> {
        match uow {
            Some(uow) => Ok(Session::Scoped(uow.transaction())),
            None => self.connection().map(Session::Shared),
        }
    }

    /// Begins a read-write unit of work.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is not initialized or the
    /// transaction cannot be started.
    pub async fn begin(&self) -> Result<UnitOfWork, SessionError> {
        let txn = self
            .connection()?
            .begin()
            .await
            .map_err(SessionError::Transaction)?;
        Ok(UnitOfWork { txn })
    }

    /// Begins a read-only unit of work whose reads share one snapshot.
    ///
    /// `PostgreSQL` gets `REPEATABLE READ, READ ONLY`. `SQLite` transactions
    /// are already serializable.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is not initialized or the
    /// transaction cannot be started.
    pub async fn begin_snapshot(&self) -> Result<UnitOfWork, SessionError> {
        let conn = self.connection()?;
        let txn = match conn.get_database_backend() {
            DbBackend::Postgres => {
                conn.begin_with_config(
                    Some(IsolationLevel::RepeatableRead),
                    Some(AccessMode::ReadOnly),
                )
                .await
            }
            _ => conn.begin().await,
        }
        .map_err(SessionError::Transaction)?;
        Ok(UnitOfWork { txn })
    }

    /// Runs `work` inside a read-write transaction.
    ///
    /// Commits when `work` succeeds. When it fails the transaction is rolled
    /// back and the error from `work` is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns the error from `work`, or a [`SessionError`] if the
    /// transaction cannot be started or committed.
    pub async fn run_in_transaction<F, T, E>(&self, work: F) -> Result<T, E>
    where
        F: for<'c> FnOnce(&'c UnitOfWork) -> BoxFuture<'c, Result<T, E>> + Send,
        T: Send,
        E: From<SessionError> + Send,
    {
        let uow = self.begin().await?;
        Self::complete(uow, work).await
    }

    /// Runs `work` inside a read-only snapshot transaction.
    ///
    /// # Errors
    ///
    /// Returns the error from `work`, or a [`SessionError`] if the
    /// transaction cannot be started or committed.
    pub async fn run_in_snapshot<F, T, E>(&self, work: F) -> Result<T, E>
    where
        F: for<'c> FnOnce(&'c UnitOfWork) -> BoxFuture<'c, Result<T, E>> + Send,
        T: Send,
        E: From<SessionError> + Send,
    {
        let uow = self.begin_snapshot().await?;
        Self::complete(uow, work).await
    }

    async fn complete<F, T, E>(uow: UnitOfWork, work: F) -> Result<T, E>
    where
        F: for<'c> FnOnce(&'c UnitOfWork) -> BoxFuture<'c, Result<T, E>> + Send,
        T: Send,
        E: From<SessionError> + Send,
    {
        let outcome = work(&uow).await;
        match outcome {
            Ok(value) => {
                uow.commit().await.map_err(SessionError::Transaction)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = uow.rollback().await {
                    warn!(error = %rollback_err, "Transaction rollback failed");
                }
                Err(err)
            }
        }
    }
}
