//! Principal and client storage operations.

use super::{query_err, Database};
use crate::authz::{OwnershipScope, ResourceKind, ScopeFilter};
use crate::models::{Client, Principal, Role, UpdateClient};
use crate::services::metrics::DB_QUERY_DURATION;
use service_core::error::AppError;
use tracing::{info, instrument};
use uuid::Uuid;

const CLIENT_COLS: &str = "id, principal_id, full_name, phone, created_utc";
const PRINCIPAL_COLS: &str =
    "id, username, email, password_hash, role, first_name, last_name, created_utc";

impl Database {
    // =========================================================================
    // Ownership resolution
    // =========================================================================

    /// Map a principal to its ownership scope. Doctors see everything; a
    /// client-role principal sees its own client subtree, or nothing at
    /// all when the linked client row is missing. The missing-row case is
    /// deliberately not an error: it must read as an empty world.
    #[instrument(skip(self), fields(principal_id = %principal_id))]
    pub async fn resolve_scope(
        &self,
        principal_id: Uuid,
        role: Role,
    ) -> Result<OwnershipScope, AppError> {
        match role {
            Role::Doctor => Ok(OwnershipScope::Global),
            Role::Client => {
                let client = self.find_client_by_principal(principal_id).await?;
                Ok(client
                    .map(|c| OwnershipScope::Owned(c.id))
                    .unwrap_or(OwnershipScope::None))
            }
        }
    }

    /// Look up the exactly-one client row linked to a principal.
    pub async fn find_client_by_principal(
        &self,
        principal_id: Uuid,
    ) -> Result<Option<Client>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_client_by_principal"])
            .start_timer();

        let sql = format!("SELECT {CLIENT_COLS} FROM clients WHERE principal_id = $1");
        let client = sqlx::query_as::<_, Client>(&sql)
            .bind(principal_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Client, "resolve", e))?;

        timer.observe_duration();
        Ok(client)
    }

    // =========================================================================
    // Principal Operations
    // =========================================================================

    pub async fn find_principal_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Principal>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_principal_by_username"])
            .start_timer();

        let sql = format!("SELECT {PRINCIPAL_COLS} FROM principals WHERE username = $1");
        let principal = sqlx::query_as::<_, Principal>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to look up principal: {}", e))
            })?;

        timer.observe_duration();
        Ok(principal)
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM principals WHERE username = $1)")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to check username: {}", e))
            })
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM principals WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to check email: {}", e)))
    }

    /// Create a client principal and its linked client record in one
    /// transaction: both rows exist afterwards or neither does. The unique
    /// constraints on username/email are the authoritative arbiter for
    /// concurrent registrations; the violation is mapped by constraint name.
    #[instrument(skip(self, password_hash))]
    pub async fn create_client_account(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        full_name: &str,
        phone: &str,
    ) -> Result<(Principal, Client), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_client_account"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to open transaction: {}", e))
        })?;

        let principal_sql = format!(
            "INSERT INTO principals (id, username, email, password_hash, role) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {PRINCIPAL_COLS}"
        );
        let principal = sqlx::query_as::<_, Principal>(&principal_sql)
            .bind(Uuid::new_v4())
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .bind(Role::Client.as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(registration_err)?;

        let client_sql = format!(
            "INSERT INTO clients (id, principal_id, full_name, phone) \
             VALUES ($1, $2, $3, $4) RETURNING {CLIENT_COLS}"
        );
        let client = sqlx::query_as::<_, Client>(&client_sql)
            .bind(Uuid::new_v4())
            .bind(principal.id)
            .bind(full_name)
            .bind(phone)
            .fetch_one(&mut *tx)
            .await
            .map_err(registration_err)?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit registration: {}", e))
        })?;

        timer.observe_duration();
        info!(principal_id = %principal.id, client_id = %client.id, "Client account created");

        Ok((principal, client))
    }

    /// Create a doctor principal. Doctors carry no client record; their
    /// name lives on the principal row.
    #[instrument(skip(self, password_hash))]
    pub async fn create_doctor_account(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Principal, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_doctor_account"])
            .start_timer();

        let sql = format!(
            "INSERT INTO principals (id, username, email, password_hash, role, \
             first_name, last_name) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {PRINCIPAL_COLS}"
        );
        let principal = sqlx::query_as::<_, Principal>(&sql)
            .bind(Uuid::new_v4())
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .bind(Role::Doctor.as_str())
            .bind(first_name)
            .bind(last_name)
            .fetch_one(&self.pool)
            .await
            .map_err(registration_err)?;

        timer.observe_duration();
        info!(principal_id = %principal.id, "Doctor account created");

        Ok(principal)
    }

    // =========================================================================
    // Client Operations
    // =========================================================================

    pub async fn list_clients(&self, scope: &OwnershipScope) -> Result<Vec<Client>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_clients"])
            .start_timer();

        let filter = ScopeFilter::for_kind(ResourceKind::Client, scope);
        let sql = format!(
            "SELECT {CLIENT_COLS} FROM clients WHERE {} ORDER BY created_utc",
            filter.clause
        );

        let mut query = sqlx::query_as::<_, Client>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        let clients = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Client, "list", e))?;

        timer.observe_duration();
        Ok(clients)
    }

    pub async fn get_client(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
    ) -> Result<Option<Client>, AppError> {
        let filter = ScopeFilter::for_kind(ResourceKind::Client, scope);
        let sql = format!(
            "SELECT {CLIENT_COLS} FROM clients WHERE ({}) AND id = {}",
            filter.clause,
            filter.next_placeholder()
        );

        let mut query = sqlx::query_as::<_, Client>(&sql);
        if let Some(client_id) = filter.client_id {
            query = query.bind(client_id);
        }

        query
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Client, "get", e))
    }

    pub async fn update_client(
        &self,
        scope: &OwnershipScope,
        id: Uuid,
        input: &UpdateClient,
    ) -> Result<Option<Client>, AppError> {
        if self.get_client(scope, id).await?.is_none() {
            return Ok(None);
        }

        let sql = format!(
            "UPDATE clients SET full_name = $1, phone = $2 WHERE id = $3 RETURNING {CLIENT_COLS}"
        );
        let client = sqlx::query_as::<_, Client>(&sql)
            .bind(&input.full_name)
            .bind(&input.phone)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Client, "update", e))?;

        Ok(Some(client))
    }

    /// Delete a client. Cascades through patients and their whole medical
    /// subtrees at the storage layer.
    pub async fn delete_client(&self, scope: &OwnershipScope, id: Uuid) -> Result<bool, AppError> {
        if self.get_client(scope, id).await?.is_none() {
            return Ok(false);
        }

        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| query_err(ResourceKind::Client, "delete", e))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Map registration insert failures. Unique violations are reported by
/// constraint so a username clash and an email clash stay distinguishable.
fn registration_err(e: sqlx::Error) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return duplicate_account_err(db_err.constraint());
        }
    }
    AppError::DatabaseError(anyhow::anyhow!("Failed to create account: {}", e))
}

/// Conflict mapping for a unique violation raised during registration.
/// The constraint names are the ones declared in the initial migration.
fn duplicate_account_err(constraint: Option<&str>) -> AppError {
    match constraint {
        Some("principals_username_key") => {
            AppError::Conflict(anyhow::anyhow!("Username already exists"))
        }
        Some("principals_email_key") => AppError::Conflict(anyhow::anyhow!("Email already exists")),
        _ => AppError::Conflict(anyhow::anyhow!("Account already exists")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_of(err: AppError) -> String {
        match err {
            AppError::Conflict(e) => e.to_string(),
            other => panic!("expected Conflict, got {:?}", other),
        }
    }

    #[test]
    fn username_constraint_maps_to_username_conflict() {
        assert_eq!(
            message_of(duplicate_account_err(Some("principals_username_key"))),
            "Username already exists"
        );
    }

    #[test]
    fn email_constraint_maps_to_email_conflict() {
        assert_eq!(
            message_of(duplicate_account_err(Some("principals_email_key"))),
            "Email already exists"
        );
    }

    #[test]
    fn unknown_constraint_still_conflicts() {
        assert_eq!(
            message_of(duplicate_account_err(None)),
            "Account already exists"
        );
        assert_eq!(
            message_of(duplicate_account_err(Some("clients_principal_id_key"))),
            "Account already exists"
        );
    }
}
