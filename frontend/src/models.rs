//! The resources served by the finance API and the payloads sent to it.
//!
//! Money is `Decimal` throughout. The server serializes decimals as strings
//! and `rust_decimal` reads and writes that form directly.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::store::Cache;

/// Whether money comes in or goes out. Used by both categories and
/// transactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Income,
    Expense,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Income => "income",
            EntryType::Expense => "expense",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "income" => Some(EntryType::Income),
            "expense" => Some(EntryType::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A foreign key that the server may send either as a bare id or as the
/// embedded object. Read it through [Ref::id] so both forms behave the same.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ref<T> {
    Id(i64),
    Expanded(T),
}

impl<T: Resource> Ref<T> {
    pub fn id(&self) -> i64 {
        match self {
            Ref::Id(id) => *id,
            Ref::Expanded(item) => item.id(),
        }
    }

    pub fn expanded(&self) -> Option<&T> {
        match self {
            Ref::Id(_) => None,
            Ref::Expanded(item) => Some(item),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<i64>,
    pub name: String,
    /// Maintained by the server from transactions; never recomputed locally.
    pub balance: Decimal,
    pub currency: String,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<i64>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryType,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<i64>,
    pub account: Ref<Account>,
    pub category: Ref<Category>,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: EntryType,
    #[serde(default)]
    pub notes: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A spending limit for one category in one month.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<i64>,
    pub name: String,
    pub amount: Decimal,
    pub category: Ref<Category>,
    /// Always the first day of the month.
    pub month: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<i64>,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub target_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccountCreate {
    pub name: String,
    pub balance: Decimal,
    pub currency: String,
    pub notes: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AccountPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryType,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CategoryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntryType>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransactionCreate {
    pub account: i64,
    pub category: i64,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: EntryType,
    pub notes: String,
    pub date: NaiveDate,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TransactionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntryType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetCreate {
    pub name: String,
    pub amount: Decimal,
    pub category: i64,
    pub month: NaiveDate,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BudgetPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoalCreate {
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub target_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GoalPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_amount: Option<Decimal>,
    /// `Some(None)` clears the date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<Option<NaiveDate>>,
}

/// Query parameters accepted by the transaction list endpoint.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactionFilters {
    pub kind: Option<EntryType>,
    pub category_id: Option<i64>,
    pub date: Option<NaiveDate>,
}

impl TransactionFilters {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(kind) = self.kind {
            query.push(("type".to_string(), kind.as_str().to_string()));
        }
        if let Some(category_id) = self.category_id {
            query.push(("category__id".to_string(), category_id.to_string()));
        }
        if let Some(date) = self.date {
            query.push(("date".to_string(), date.format("%Y-%m-%d").to_string()));
        }
        query
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    pub username: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub access: String,
    pub refresh: String,
}

impl LoginResponse {
    pub fn user(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            email: self.email.clone(),
            username: self.username.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Collections that must be re-fetched after a resource is created because
/// the server changed them as a side effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FollowUp {
    pub accounts: bool,
    pub transactions: bool,
    pub current_budgets: bool,
}

impl FollowUp {
    pub const NONE: FollowUp = FollowUp {
        accounts: false,
        transactions: false,
        current_budgets: false,
    };
}

/// A REST collection mirrored in the [Cache].
pub trait Resource: DeserializeOwned + Serialize + Clone + PartialEq + 'static {
    /// Body for create (POST) and full replace (PUT).
    type Create: Serialize;
    /// Body for partial update (PATCH).
    type Patch: Serialize;

    /// Collection name, also the first path segment.
    const COLLECTION: &'static str;

    fn id(&self) -> i64;

    fn cached_mut(cache: &mut Cache) -> &mut Vec<Self>;

    /// A second cached collection that holds copies of some of the same
    /// entities and must see their edits and removals.
    fn mirror_mut(_cache: &mut Cache) -> Option<&mut Vec<Self>> {
        None
    }

    fn follow_up(&self) -> FollowUp {
        FollowUp::NONE
    }

    fn collection_path() -> String {
        format!("{}/", Self::COLLECTION)
    }

    fn item_path(id: i64) -> String {
        format!("{}/{}/", Self::COLLECTION, id)
    }
}

impl Resource for Account {
    type Create = AccountCreate;
    type Patch = AccountPatch;
    const COLLECTION: &'static str = "accounts";

    fn id(&self) -> i64 {
        self.id
    }

    fn cached_mut(cache: &mut Cache) -> &mut Vec<Self> {
        &mut cache.accounts
    }
}

impl Resource for Category {
    type Create = CategoryCreate;
    type Patch = CategoryPatch;
    const COLLECTION: &'static str = "categories";

    fn id(&self) -> i64 {
        self.id
    }

    fn cached_mut(cache: &mut Cache) -> &mut Vec<Self> {
        &mut cache.categories
    }
}

impl Resource for Transaction {
    type Create = TransactionCreate;
    type Patch = TransactionPatch;
    const COLLECTION: &'static str = "transactions";

    fn id(&self) -> i64 {
        self.id
    }

    fn cached_mut(cache: &mut Cache) -> &mut Vec<Self> {
        &mut cache.transactions
    }

    // Balances move with every transaction. Expenses also change what the
    // current month's budgets have left.
    fn follow_up(&self) -> FollowUp {
        let is_expense = self.kind == EntryType::Expense;
        FollowUp {
            accounts: true,
            transactions: is_expense,
            current_budgets: is_expense,
        }
    }
}

impl Resource for Budget {
    type Create = BudgetCreate;
    type Patch = BudgetPatch;
    const COLLECTION: &'static str = "budgets";

    fn id(&self) -> i64 {
        self.id
    }

    fn cached_mut(cache: &mut Cache) -> &mut Vec<Self> {
        &mut cache.budgets
    }

    fn mirror_mut(cache: &mut Cache) -> Option<&mut Vec<Self>> {
        Some(&mut cache.current_budgets)
    }
}

impl Resource for Goal {
    type Create = GoalCreate;
    type Patch = GoalPatch;
    const COLLECTION: &'static str = "goals";

    fn id(&self) -> i64 {
        self.id
    }

    fn cached_mut(cache: &mut Cache) -> &mut Vec<Self> {
        &mut cache.goals
    }
}
