//! Turns what the user typed into API payloads, or an inline message.

use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;

use crate::models::{
    AccountCreate, BudgetCreate, CategoryCreate, EntryType, Goal, GoalCreate, GoalPatch,
    LoginRequest, RegisterRequest, TransactionCreate,
};

pub const DEFAULT_ACCOUNT_CURRENCY: &str = "BDT";

/// A problem with form input, shown next to the form.
#[derive(Debug, thiserror::Error, PartialEq, Clone)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("Please select account and category")]
    MissingSelection,

    #[error("Please select a category")]
    MissingCategory,

    #[error("{0} must be a number")]
    InvalidAmount(&'static str),

    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),

    #[error("{0} is too large")]
    TooLarge(&'static str),

    #[error("{0} must be a date like 2025-09-01")]
    InvalidDate(&'static str),

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Username must be at least 3 characters")]
    UsernameTooShort,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// The id behind a `<select>` value; the empty placeholder option is `None`.
pub fn parse_selection(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

fn required(raw: &str, field: &'static str) -> Result<String, FormError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(FormError::Required(field));
    }
    Ok(value.to_string())
}

fn parse_amount(raw: &str, field: &'static str) -> Result<Decimal, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FormError::Required(field));
    }
    raw.parse::<Decimal>()
        .map_err(|_| FormError::InvalidAmount(field))
}

fn parse_positive(raw: &str, field: &'static str) -> Result<Decimal, FormError> {
    let amount = parse_amount(raw, field)?;
    if amount <= Decimal::ZERO {
        return Err(FormError::NotPositive(field));
    }
    Ok(amount)
}

fn parse_optional_date(raw: &str, field: &'static str) -> Result<Option<NaiveDate>, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| FormError::InvalidDate(field))
}

#[derive(Clone, Debug, PartialEq)]
pub struct TransactionDraft {
    pub amount: String,
    pub kind: EntryType,
    pub account: Option<i64>,
    pub category: Option<i64>,
    pub notes: String,
}

impl Default for TransactionDraft {
    fn default() -> Self {
        Self {
            amount: String::new(),
            kind: EntryType::Expense,
            account: None,
            category: None,
            notes: String::new(),
        }
    }
}

impl TransactionDraft {
    /// Dated `today`.
    pub fn validate(&self, today: NaiveDate) -> Result<TransactionCreate, FormError> {
        let (Some(account), Some(category)) = (self.account, self.category) else {
            return Err(FormError::MissingSelection);
        };
        let amount = parse_positive(&self.amount, "Amount")?;

        Ok(TransactionCreate {
            account,
            category,
            amount,
            kind: self.kind,
            notes: self.notes.trim().to_string(),
            date: today,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AccountDraft {
    pub name: String,
    pub currency: String,
    pub balance: String,
    pub notes: String,
}

impl Default for AccountDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            currency: DEFAULT_ACCOUNT_CURRENCY.to_string(),
            balance: "0".to_string(),
            notes: String::new(),
        }
    }
}

impl AccountDraft {
    pub fn validate(&self) -> Result<AccountCreate, FormError> {
        let name = required(&self.name, "Account name")?;
        let currency = required(&self.currency, "Currency")?.to_uppercase();
        let balance = if self.balance.trim().is_empty() {
            Decimal::ZERO
        } else {
            parse_amount(&self.balance, "Balance")?
        };

        Ok(AccountCreate {
            name,
            balance,
            currency,
            notes: self.notes.trim().to_string(),
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryDraft {
    pub name: String,
    pub kind: EntryType,
}

impl Default for CategoryDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: EntryType::Expense,
        }
    }
}

impl CategoryDraft {
    pub fn validate(&self) -> Result<CategoryCreate, FormError> {
        Ok(CategoryCreate {
            name: required(&self.name, "Category name")?,
            kind: self.kind,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BudgetDraft {
    pub name: String,
    pub amount: String,
    pub category: Option<i64>,
}

impl BudgetDraft {
    /// Budgets are always for the month containing `today`.
    pub fn validate(&self, today: NaiveDate) -> Result<BudgetCreate, FormError> {
        let name = required(&self.name, "Budget name")?;
        let amount = parse_positive(&self.amount, "Amount")?;
        let category = self.category.ok_or(FormError::MissingCategory)?;

        Ok(BudgetCreate {
            name,
            amount,
            category,
            month: first_of_month(today),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GoalDraft {
    pub name: String,
    pub target: String,
    pub current: String,
    pub target_date: String,
}

impl GoalDraft {
    pub fn validate(&self) -> Result<GoalCreate, FormError> {
        let name = required(&self.name, "Goal name")?;
        let target_amount = parse_positive(&self.target, "Target")?;
        let current_amount = if self.current.trim().is_empty() {
            Decimal::ZERO
        } else {
            parse_amount(&self.current, "Saved so far")?
        };
        let target_date = parse_optional_date(&self.target_date, "Target date")?;

        Ok(GoalCreate {
            name,
            target_amount,
            current_amount,
            target_date,
        })
    }
}

/// A partial update that adds `raw` to what the goal has saved.
pub fn contribution(goal: &Goal, raw: &str) -> Result<GoalPatch, FormError> {
    let amount = parse_positive(raw, "Contribution")?;
    let total = goal
        .current_amount
        .checked_add(amount)
        .ok_or(FormError::TooLarge("Contribution"))?;

    Ok(GoalPatch {
        current_amount: Some(total),
        ..GoalPatch::default()
    })
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoginDraft {
    pub username: String,
    pub password: String,
}

impl LoginDraft {
    pub fn validate(&self) -> Result<LoginRequest, FormError> {
        let username = required(&self.username, "Username")?;
        if self.password.is_empty() {
            return Err(FormError::Required("Password"));
        }

        Ok(LoginRequest {
            username,
            password: self.password.clone(),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegisterDraft {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl RegisterDraft {
    pub fn validate(&self) -> Result<RegisterRequest, FormError> {
        let email = self.email.trim();
        let valid_email = email
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid_email {
            return Err(FormError::InvalidEmail);
        }

        let username = self.username.trim();
        if username.chars().count() < 3 {
            return Err(FormError::UsernameTooShort);
        }
        if self.password.chars().count() < 6 {
            return Err(FormError::PasswordTooShort);
        }

        Ok(RegisterRequest {
            email: email.to_string(),
            username: username.to_string(),
            password: self.password.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::{
        contribution, first_of_month, parse_selection, AccountDraft, BudgetDraft, FormError,
        GoalDraft, LoginDraft, RegisterDraft, TransactionDraft,
    };
    use crate::models::{EntryType, Goal};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn transaction_needs_account_and_category() {
        let draft = TransactionDraft {
            amount: "12.50".to_string(),
            account: Some(1),
            ..TransactionDraft::default()
        };

        assert_eq!(draft.validate(day(2025, 9, 2)), Err(FormError::MissingSelection));
        assert_eq!(
            FormError::MissingSelection.to_string(),
            "Please select account and category"
        );
    }

    #[test]
    fn transaction_is_dated_today() {
        let draft = TransactionDraft {
            amount: " 12.50 ".to_string(),
            kind: EntryType::Income,
            account: Some(1),
            category: Some(4),
            notes: " salary ".to_string(),
        };

        let got = draft.validate(day(2025, 9, 2)).unwrap();

        assert_eq!(got.amount, "12.50".parse::<Decimal>().unwrap());
        assert_eq!(got.date, day(2025, 9, 2));
        assert_eq!(got.kind, EntryType::Income);
        assert_eq!(got.notes, "salary");
    }

    #[test]
    fn transaction_amount_must_be_positive_number() {
        let mut draft = TransactionDraft {
            account: Some(1),
            category: Some(4),
            ..TransactionDraft::default()
        };

        draft.amount = "abc".to_string();
        assert_eq!(draft.validate(day(2025, 9, 2)), Err(FormError::InvalidAmount("Amount")));
        draft.amount = "-3".to_string();
        assert_eq!(draft.validate(day(2025, 9, 2)), Err(FormError::NotPositive("Amount")));
        draft.amount = String::new();
        assert_eq!(draft.validate(day(2025, 9, 2)), Err(FormError::Required("Amount")));
    }

    #[test]
    fn account_defaults() {
        let draft = AccountDraft {
            name: "Savings".to_string(),
            currency: "usd".to_string(),
            balance: String::new(),
            notes: " joint ".to_string(),
        };

        let got = draft.validate().unwrap();

        assert_eq!(got.currency, "USD");
        assert_eq!(got.balance, Decimal::ZERO);
        assert_eq!(got.notes, "joint");
        assert_eq!(AccountDraft::default().currency, "BDT");
        assert_eq!(
            AccountDraft::default().validate(),
            Err(FormError::Required("Account name"))
        );
    }

    #[test]
    fn budget_is_for_first_of_current_month() {
        let draft = BudgetDraft {
            name: "Food".to_string(),
            amount: "5000".to_string(),
            category: Some(3),
        };

        let got = draft.validate(day(2025, 9, 17)).unwrap();

        assert_eq!(got.month, day(2025, 9, 1));
        assert_eq!(first_of_month(day(2024, 2, 29)), day(2024, 2, 1));
        assert_eq!(
            BudgetDraft { category: None, ..draft }.validate(day(2025, 9, 17)),
            Err(FormError::MissingCategory)
        );
    }

    #[test]
    fn goal_date_is_optional_but_checked() {
        let mut draft = GoalDraft {
            name: "Bike".to_string(),
            target: "800".to_string(),
            ..GoalDraft::default()
        };
        assert_eq!(draft.validate().unwrap().target_date, None);

        draft.target_date = "2026-01-31".to_string();
        assert_eq!(draft.validate().unwrap().target_date, Some(day(2026, 1, 31)));

        draft.target_date = "31/01/2026".to_string();
        assert_eq!(draft.validate(), Err(FormError::InvalidDate("Target date")));
    }

    #[test]
    fn contribution_adds_to_current_amount() {
        let stamp = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
        let goal = Goal {
            id: 1,
            user: None,
            name: "Bike".to_string(),
            target_amount: "800".parse().unwrap(),
            current_amount: "100.50".parse().unwrap(),
            target_date: None,
            created_at: stamp,
        };

        let patch = contribution(&goal, "49.50").unwrap();

        assert_eq!(patch.current_amount, Some("150".parse().unwrap()));
        assert_eq!(patch.name, None);
        assert_eq!(contribution(&goal, "0"), Err(FormError::NotPositive("Contribution")));
    }

    #[test]
    fn contribution_past_the_largest_amount_is_rejected() {
        let stamp = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
        let goal = Goal {
            id: 1,
            user: None,
            name: "Bike".to_string(),
            target_amount: "800".parse().unwrap(),
            current_amount: "1".parse().unwrap(),
            target_date: None,
            created_at: stamp,
        };

        let got = contribution(&goal, "79228162514264337593543950335");

        assert_eq!(got, Err(FormError::TooLarge("Contribution")));
        assert_eq!(
            got.unwrap_err().to_string(),
            "Contribution is too large"
        );
    }

    #[test]
    fn register_rules() {
        let good = RegisterDraft {
            email: "joy@example.com".to_string(),
            username: "joy".to_string(),
            password: "secret".to_string(),
        };
        assert!(good.validate().is_ok());

        let bad_email = RegisterDraft { email: "joy".to_string(), ..good.clone() };
        assert_eq!(bad_email.validate(), Err(FormError::InvalidEmail));

        let short_name = RegisterDraft { username: "jo".to_string(), ..good.clone() };
        assert_eq!(short_name.validate(), Err(FormError::UsernameTooShort));

        let short_password = RegisterDraft { password: "12345".to_string(), ..good };
        assert_eq!(short_password.validate(), Err(FormError::PasswordTooShort));
    }

    #[test]
    fn login_requires_both_fields() {
        let draft = LoginDraft {
            username: "joy".to_string(),
            password: String::new(),
        };

        assert_eq!(draft.validate(), Err(FormError::Required("Password")));
    }

    #[test]
    fn selection_placeholder_is_none() {
        assert_eq!(parse_selection(""), None);
        assert_eq!(parse_selection("12"), Some(12));
    }
}
