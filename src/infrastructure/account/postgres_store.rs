//! PostgreSQL account store implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::DomainError;
use crate::domain::account::{
    Account, AccountId, AccountRole, AccountStore, NewAccount, Transaction,
};

/// PostgreSQL implementation of the account store.
///
/// Email and username uniqueness is enforced by the `accounts_email_key`
/// and `accounts_username_key` unique indexes. A duplicate-key failure from
/// a racing insert is translated into the same conflict error the signup
/// pre-check produces.
#[derive(Debug, Clone)]
pub struct PostgresAccountStore {
    pool: PgPool,
}

impl PostgresAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccountStore for PostgresAccountStore {
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, role, is_verified,
                   money, present_money, profit, transactions,
                   created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("failed to get account: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, role, is_verified,
                   money, present_money, profit, transactions,
                   created_at, updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("failed to get account by email: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> Result<Option<Account>, DomainError> {
        // Email match first so a request conflicting on both fields reports
        // the email, matching the pre-check precedence.
        let row = sqlx::query(
            r#"
            SELECT id, username, email, password_hash, role, is_verified,
                   money, present_money, profit, transactions,
                   created_at, updated_at
            FROM accounts
            WHERE email = $1 OR username = $2
            ORDER BY (email = $1) DESC
            LIMIT 1
            "#,
        )
        .bind(email)
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::storage(format!("failed to get account by email or username: {}", e))
        })?;

        match row {
            Some(row) => Ok(Some(row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, draft: NewAccount) -> Result<Account, DomainError> {
        let id = AccountId::generate();
        let now = Utc::now();
        let transactions = serde_json::to_value(draft.transactions())
            .map_err(|e| DomainError::storage(format!("failed to encode transactions: {}", e)))?;

        let row = sqlx::query(
            r#"
            INSERT INTO accounts (id, username, email, password_hash, role, is_verified,
                                  money, present_money, profit, transactions,
                                  created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING id, username, email, password_hash, role, is_verified,
                      money, present_money, profit, transactions,
                      created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(draft.username())
        .bind(draft.email())
        .bind(draft.password_hash())
        .bind(draft.role().as_str())
        .bind(draft.is_verified())
        .bind(draft.money())
        .bind(draft.present_money())
        .bind(draft.profit())
        .bind(transactions)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(&e, draft.email(), draft.username()))?;

        row_to_account(&row)
    }

    async fn update(&self, account: &Account) -> Result<Account, DomainError> {
        let transactions = match account.transactions() {
            Some(list) => Some(serde_json::to_value(list).map_err(|e| {
                DomainError::storage(format!("failed to encode transactions: {}", e))
            })?),
            None => None,
        };

        let row = sqlx::query(
            r#"
            UPDATE accounts
            SET money = $2,
                present_money = $3,
                profit = $4,
                transactions = $5,
                updated_at = $6
            WHERE id = $1
            RETURNING id, username, email, password_hash, role, is_verified,
                      money, present_money, profit, transactions,
                      created_at, updated_at
            "#,
        )
        .bind(account.id().as_uuid())
        .bind(account.money())
        .bind(account.present_money())
        .bind(account.profit())
        .bind(transactions)
        .bind(account.updated_at())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("failed to update account: {}", e)))?;

        match row {
            Some(row) => row_to_account(&row),
            None => Err(DomainError::not_found(format!(
                "account '{}' not found",
                account.id()
            ))),
        }
    }
}

fn row_to_account(row: &PgRow) -> Result<Account, DomainError> {
    let id: Uuid = row.get("id");
    let username: String = row.get("username");
    let email: String = row.get("email");
    let password_hash: String = row.get("password_hash");
    let role: String = row.get("role");
    let is_verified: bool = row.get("is_verified");
    let money: Option<Decimal> = row.get("money");
    let present_money: Option<Decimal> = row.get("present_money");
    let profit: Option<Decimal> = row.get("profit");
    let transactions: Option<serde_json::Value> = row.get("transactions");
    let created_at: DateTime<Utc> = row.get("created_at");
    let updated_at: DateTime<Utc> = row.get("updated_at");

    let transactions = match transactions {
        Some(value) => Some(serde_json::from_value::<Vec<Transaction>>(value).map_err(|e| {
            DomainError::storage(format!("invalid transactions document: {}", e))
        })?),
        None => None,
    };

    Ok(Account::restore(
        AccountId::from(id),
        username,
        email,
        password_hash,
        str_to_role(&role),
        is_verified,
        money,
        present_money,
        profit,
        transactions,
        created_at,
        updated_at,
    ))
}

fn str_to_role(s: &str) -> AccountRole {
    match s {
        "admin" => AccountRole::Admin,
        _ => AccountRole::User,
    }
}

fn map_insert_error(error: &sqlx::Error, email: &str, username: &str) -> DomainError {
    match conflict_from_unique_violation(&error.to_string(), email, username) {
        Some(conflict) => conflict,
        None => DomainError::storage(format!("failed to insert account: {}", error)),
    }
}

/// Translate a duplicate-key message from the unique indexes into the same
/// conflict error the pre-check produces
fn conflict_from_unique_violation(
    message: &str,
    email: &str,
    username: &str,
) -> Option<DomainError> {
    if !message.contains("duplicate key") && !message.contains("unique constraint") {
        return None;
    }

    if message.contains("accounts_email_key") {
        return Some(DomainError::email_conflict(email));
    }

    if message.contains("accounts_username_key") {
        return Some(DomainError::username_conflict(username));
    }

    Some(DomainError::conflict(format!(
        "account with email '{}' or username '{}' already exists",
        email, username
    )))
}
