//! Account entity and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account identifier, assigned by the store when a draft is first persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(Uuid);

impl AccountId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for AccountId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Standard account, the only role signup hands out
    #[default]
    User,
    /// Operator account
    Admin,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

/// Direction of a portfolio transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Buy,
    Sell,
}

/// A single portfolio transaction. The transaction history preserves
/// insertion order; signup and login never append to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub symbol: String,
    pub kind: TransactionKind,
    pub quantity: Decimal,
    pub price: Decimal,
    pub executed_at: DateTime<Utc>,
}

/// Draft for a new account, built by the provisioning service once the
/// credentials are hashed. Carries the ledger defaults as concrete values so
/// the store always receives a complete record.
#[derive(Debug, Clone)]
pub struct NewAccount {
    username: String,
    email: String,
    password_hash: String,
    role: AccountRole,
    is_verified: bool,
    money: Decimal,
    present_money: Decimal,
    profit: Decimal,
    transactions: Vec<Transaction>,
}

impl NewAccount {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role: AccountRole::default(),
            is_verified: true,
            money: Decimal::ZERO,
            present_money: Decimal::ZERO,
            profit: Decimal::ZERO,
            transactions: Vec::new(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn role(&self) -> AccountRole {
        self.role
    }

    pub fn is_verified(&self) -> bool {
        self.is_verified
    }

    pub fn money(&self) -> Decimal {
        self.money
    }

    pub fn present_money(&self) -> Decimal {
        self.present_money
    }

    pub fn profit(&self) -> Decimal {
        self.profit
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }
}

/// A stored account as the store reports it.
///
/// The ledger fields come back as options: rows created before the ledger
/// columns existed read back as NULL, and a document backend may drop
/// zero-valued or empty-collection fields. [`Account::apply_ledger_defaults`]
/// restores the creation-time defaults without touching present values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    username: String,
    email: String,
    /// Bcrypt hash of the password - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    role: AccountRole,
    is_verified: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    money: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    present_money: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    profit: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    transactions: Option<Vec<Transaction>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Account {
    /// Materialize a draft into a stored account. Store implementations call
    /// this when they assign the identifier.
    pub fn new(id: AccountId, draft: NewAccount) -> Self {
        let now = Utc::now();

        Self {
            id,
            username: draft.username,
            email: draft.email,
            password_hash: draft.password_hash,
            role: draft.role,
            is_verified: draft.is_verified,
            money: Some(draft.money),
            present_money: Some(draft.present_money),
            profit: Some(draft.profit),
            transactions: Some(draft.transactions),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild an account from its stored parts
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: AccountId,
        username: String,
        email: String,
        password_hash: String,
        role: AccountRole,
        is_verified: bool,
        money: Option<Decimal>,
        present_money: Option<Decimal>,
        profit: Option<Decimal>,
        transactions: Option<Vec<Transaction>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            password_hash,
            role,
            is_verified,
            money,
            present_money,
            profit,
            transactions,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn role(&self) -> AccountRole {
        self.role
    }

    pub fn is_verified(&self) -> bool {
        self.is_verified
    }

    pub fn money(&self) -> Option<Decimal> {
        self.money
    }

    pub fn present_money(&self) -> Option<Decimal> {
        self.present_money
    }

    pub fn profit(&self) -> Option<Decimal> {
        self.profit
    }

    pub fn transactions(&self) -> Option<&[Transaction]> {
        self.transactions.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether every ledger field is present on this record
    pub fn has_complete_ledger(&self) -> bool {
        self.money.is_some()
            && self.present_money.is_some()
            && self.profit.is_some()
            && self.transactions.is_some()
    }

    /// Fill absent ledger fields with the creation-time defaults: zero for
    /// the money fields, an empty history for the transactions. Fields that
    /// already hold a value are left alone, so applying this twice yields
    /// the same record as applying it once.
    ///
    /// Returns `true` when any field was filled in.
    pub fn apply_ledger_defaults(&mut self) -> bool {
        let mut changed = false;

        if self.money.is_none() {
            self.money = Some(Decimal::ZERO);
            changed = true;
        }

        if self.present_money.is_none() {
            self.present_money = Some(Decimal::ZERO);
            changed = true;
        }

        if self.profit.is_none() {
            self.profit = Some(Decimal::ZERO);
            changed = true;
        }

        if self.transactions.is_none() {
            self.transactions = Some(Vec::new());
            changed = true;
        }

        if changed {
            self.touch();
        }

        changed
    }

    /// Update the last-modified timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Drop the ledger fields, imitating a storage layer that discards
    /// zero-valued and empty-collection fields
    #[cfg(test)]
    pub(crate) fn clear_ledger(&mut self) {
        self.money = None;
        self.present_money = None;
        self.profit = None;
        self.transactions = None;
    }
}
