//! Figures derived from the cache for the dashboard cards.
//!
//! All arithmetic is on `Decimal`; rounding happens only when formatting.

use std::{cmp::Ordering, collections::HashMap};

use rust_decimal::Decimal;

use crate::{
    models::{Account, EntryType, Goal, Transaction},
    store::Cache,
};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// How much of a spending limit has been used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BudgetProgress {
    pub spent: Decimal,
    pub limit: Decimal,
    /// Negative once the limit is exceeded.
    pub left: Decimal,
    /// Share of the limit spent, in percent. Not clamped; zero when the
    /// limit is zero.
    pub pct: Decimal,
}

impl BudgetProgress {
    /// Results that do not fit in a `Decimal` saturate instead of
    /// overflowing.
    pub fn new(spent: Decimal, limit: Decimal) -> Self {
        let pct = if limit > Decimal::ZERO {
            percent_of(spent, limit)
        } else {
            Decimal::ZERO
        };

        Self {
            spent,
            limit,
            left: limit.saturating_sub(spent),
            pct,
        }
    }

    pub fn is_overspent(&self) -> bool {
        self.left < Decimal::ZERO
    }

    /// `pct` limited to what a progress bar can show.
    pub fn bar_width(&self) -> Decimal {
        self.pct.clamp(Decimal::ZERO, HUNDRED)
    }
}

/// `part / whole * 100`, saturating on overflow. `whole` must be positive.
fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    let saturated = if part.is_sign_negative() {
        Decimal::MIN
    } else {
        Decimal::MAX
    };
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(HUNDRED))
        .unwrap_or(saturated)
}

fn saturating_sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    amounts.fold(Decimal::ZERO, Decimal::saturating_add)
}

fn spent_in_category(transactions: &[Transaction], category_id: i64) -> Decimal {
    saturating_sum(
        transactions
            .iter()
            .filter(|t| t.kind == EntryType::Expense && t.category.id() == category_id)
            .map(|t| t.amount),
    )
}

/// Progress of one current-month budget against the cached expenses in its
/// category. A budget that is not in the current-month cache yields zeros.
pub fn budget_progress(cache: &Cache, budget_id: i64) -> BudgetProgress {
    let Some(budget) = cache.current_budgets.iter().find(|b| b.id == budget_id) else {
        return BudgetProgress::default();
    };

    let spent = spent_in_category(&cache.transactions, budget.category.id());
    BudgetProgress::new(spent, budget.amount)
}

/// All current-month budgets combined.
pub fn monthly_limit(cache: &Cache) -> BudgetProgress {
    let (spent, limit) = cache
        .current_budgets
        .iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(spent, limit), budget| {
            (
                spent.saturating_add(budget_progress(cache, budget.id).spent),
                limit.saturating_add(budget.amount),
            )
        });

    BudgetProgress::new(spent, limit)
}

/// Expense totals per category name, largest first.
pub fn expenses_by_category(cache: &Cache) -> Vec<(String, Decimal)> {
    let mut totals: HashMap<String, Decimal> = HashMap::new();
    for transaction in cache
        .transactions
        .iter()
        .filter(|t| t.kind == EntryType::Expense)
    {
        let name = cache
            .category_name(&transaction.category)
            .unwrap_or_else(|| "Other".to_string());
        let total = totals.entry(name).or_insert(Decimal::ZERO);
        *total = total.saturating_add(transaction.amount);
    }

    let mut summary: Vec<(String, Decimal)> = totals.into_iter().collect();
    summary.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    summary
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CashFlow {
    pub income: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

pub fn cash_flow(transactions: &[Transaction]) -> CashFlow {
    let mut flow = CashFlow::default();
    for transaction in transactions {
        match transaction.kind {
            EntryType::Income => flow.income = flow.income.saturating_add(transaction.amount),
            EntryType::Expense => {
                flow.expenses = flow.expenses.saturating_add(transaction.amount)
            }
        }
    }
    flow.net = flow.income.saturating_sub(flow.expenses);
    flow
}

pub fn total_balance(accounts: &[Account]) -> Decimal {
    saturating_sum(accounts.iter().map(|a| a.balance))
}

/// Percent of the target saved so far, clamped to 0..=100.
pub fn goal_progress(goal: &Goal) -> Decimal {
    if goal.target_amount <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    percent_of(goal.current_amount, goal.target_amount).clamp(Decimal::ZERO, HUNDRED)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortField {
    Date,
    Amount,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Ordering of the recent activity table. Newest first by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActivitySort {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for ActivitySort {
    fn default() -> Self {
        Self {
            field: SortField::Date,
            order: SortOrder::Desc,
        }
    }
}

impl ActivitySort {
    /// Clicking the active column flips its order; clicking another column
    /// sorts by it ascending.
    pub fn toggle(self, field: SortField) -> Self {
        if self.field == field {
            let order = match self.order {
                SortOrder::Asc => SortOrder::Desc,
                SortOrder::Desc => SortOrder::Asc,
            };
            Self { field, order }
        } else {
            Self {
                field,
                order: SortOrder::Asc,
            }
        }
    }

    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        let mut sorted = transactions.to_vec();
        sorted.sort_by(|a, b| {
            let ordering: Ordering = match self.field {
                SortField::Date => a.date.cmp(&b.date),
                SortField::Amount => a.amount.cmp(&b.amount),
            };
            match self.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        sorted
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::{
        budget_progress, cash_flow, expenses_by_category, goal_progress, monthly_limit,
        total_balance, ActivitySort, BudgetProgress, SortField, SortOrder,
    };
    use crate::{
        models::{Account, Budget, Category, EntryType, Goal, Ref, Transaction},
        store::Cache,
    };

    fn dec(raw: &str) -> Decimal {
        raw.parse().unwrap()
    }

    fn month() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
    }

    fn budget(id: i64, amount: &str, category: Ref<Category>) -> Budget {
        Budget {
            id,
            user: None,
            name: format!("budget {id}"),
            amount: dec(amount),
            category,
            month: month(),
        }
    }

    fn transaction(id: i64, kind: EntryType, category: Ref<Category>, amount: &str, day: u32) -> Transaction {
        let stamp = Utc.with_ymd_and_hms(2025, 9, day, 12, 0, 0).unwrap();
        Transaction {
            id,
            user: None,
            account: Ref::Id(1),
            category,
            amount: dec(amount),
            kind,
            notes: String::new(),
            date: NaiveDate::from_ymd_opt(2025, 9, day).unwrap(),
            created_at: stamp,
            updated_at: stamp,
        }
    }

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            user: None,
            name: name.to_string(),
            kind: EntryType::Expense,
        }
    }

    #[test]
    fn progress_of_budget_with_two_expenses() {
        let cache = Cache {
            current_budgets: vec![budget(1, "500", Ref::Id(10))],
            transactions: vec![
                transaction(1, EntryType::Expense, Ref::Id(10), "120", 1),
                transaction(2, EntryType::Expense, Ref::Id(10), "80", 2),
            ],
            ..Cache::default()
        };

        let got = budget_progress(&cache, 1);

        assert_eq!(got.spent, dec("200"));
        assert_eq!(got.limit, dec("500"));
        assert_eq!(got.left, dec("300"));
        assert_eq!(got.pct, dec("40"));
    }

    #[test]
    fn progress_ignores_income_and_other_categories() {
        let cache = Cache {
            current_budgets: vec![budget(1, "100", Ref::Expanded(category(10, "Food")))],
            transactions: vec![
                transaction(1, EntryType::Expense, Ref::Expanded(category(10, "Food")), "30", 1),
                transaction(2, EntryType::Income, Ref::Id(10), "500", 2),
                transaction(3, EntryType::Expense, Ref::Id(11), "70", 3),
            ],
            ..Cache::default()
        };

        let got = budget_progress(&cache, 1);

        assert_eq!(got.spent, dec("30"));
        assert_eq!(got.pct, dec("30"));
    }

    #[test]
    fn zero_limit_has_zero_percent() {
        let cache = Cache {
            current_budgets: vec![budget(1, "0.00", Ref::Id(10))],
            transactions: vec![transaction(1, EntryType::Expense, Ref::Id(10), "15", 1)],
            ..Cache::default()
        };

        let got = budget_progress(&cache, 1);

        assert_eq!(got.pct, Decimal::ZERO);
        assert_eq!(got.left, dec("-15"));
        assert!(got.is_overspent());
    }

    #[test]
    fn unknown_budget_is_all_zeros() {
        let cache = Cache {
            budgets: vec![budget(7, "100", Ref::Id(10))],
            ..Cache::default()
        };

        assert_eq!(budget_progress(&cache, 7), BudgetProgress::default());
        assert_eq!(budget_progress(&cache, 99), BudgetProgress::default());
    }

    #[test]
    fn bar_width_is_clamped() {
        let over = BudgetProgress::new(dec("150"), dec("100"));

        assert_eq!(over.pct, dec("150"));
        assert_eq!(over.bar_width(), dec("100"));
    }

    #[test]
    fn monthly_limit_combines_current_budgets() {
        let cache = Cache {
            current_budgets: vec![
                budget(1, "300", Ref::Id(10)),
                budget(2, "200", Ref::Id(11)),
            ],
            transactions: vec![
                transaction(1, EntryType::Expense, Ref::Id(10), "350", 1),
                transaction(2, EntryType::Expense, Ref::Id(11), "50", 2),
            ],
            ..Cache::default()
        };

        let got = monthly_limit(&cache);

        assert_eq!(got.limit, dec("500"));
        assert_eq!(got.spent, dec("400"));
        assert_eq!(got.left, dec("100"));
        assert_eq!(got.pct, dec("80"));
    }

    #[test]
    fn groups_expenses_by_name_largest_first() {
        let cache = Cache {
            categories: vec![category(10, "Food"), category(11, "Travel")],
            transactions: vec![
                transaction(1, EntryType::Expense, Ref::Id(10), "20.10", 1),
                transaction(2, EntryType::Expense, Ref::Expanded(category(11, "Travel")), "99", 2),
                transaction(3, EntryType::Expense, Ref::Id(10), "0.20", 3),
                transaction(4, EntryType::Expense, Ref::Id(77), "5", 4),
                transaction(5, EntryType::Income, Ref::Id(10), "1000", 5),
            ],
            ..Cache::default()
        };

        let got = expenses_by_category(&cache);

        assert_eq!(
            got,
            vec![
                ("Travel".to_string(), dec("99")),
                ("Food".to_string(), dec("20.30")),
                ("Other".to_string(), dec("5")),
            ]
        );
    }

    #[test]
    fn cash_flow_and_balance_use_exact_decimals() {
        let transactions = vec![
            transaction(1, EntryType::Income, Ref::Id(1), "0.10", 1),
            transaction(2, EntryType::Income, Ref::Id(1), "0.20", 2),
            transaction(3, EntryType::Expense, Ref::Id(2), "0.05", 3),
        ];
        let stamp = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
        let account = |id, balance: &str| Account {
            id,
            user: None,
            name: format!("account {id}"),
            balance: dec(balance),
            currency: "BDT".to_string(),
            notes: String::new(),
            created_at: stamp,
            updated_at: stamp,
        };

        let flow = cash_flow(&transactions);

        assert_eq!(flow.income, dec("0.30"));
        assert_eq!(flow.expenses, dec("0.05"));
        assert_eq!(flow.net, dec("0.25"));
        assert_eq!(
            total_balance(&[account(1, "10.10"), account(2, "-0.10")]),
            dec("10")
        );
    }

    #[test]
    fn goal_progress_is_clamped_and_safe() {
        let stamp = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
        let goal = |target: &str, current: &str| Goal {
            id: 1,
            user: None,
            name: "Bike".to_string(),
            target_amount: dec(target),
            current_amount: dec(current),
            target_date: None,
            created_at: stamp,
        };

        assert_eq!(goal_progress(&goal("800", "200")), dec("25"));
        assert_eq!(goal_progress(&goal("800", "1000")), dec("100"));
        assert_eq!(goal_progress(&goal("0", "10")), Decimal::ZERO);
    }

    #[test]
    fn huge_ratios_saturate_instead_of_overflowing() {
        let progress = BudgetProgress::new(dec("1000000000000000000000000000"), dec("0.001"));

        assert_eq!(progress.pct, Decimal::MAX);
        assert_eq!(progress.bar_width(), dec("100"));
        assert!(progress.is_overspent());

        let stamp = Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap();
        let goal = Goal {
            id: 1,
            user: None,
            name: "Moon".to_string(),
            target_amount: dec("0.001"),
            current_amount: dec("1000000000000000000000000000"),
            target_date: None,
            created_at: stamp,
        };
        assert_eq!(goal_progress(&goal), dec("100"));
    }

    #[test]
    fn totals_saturate_at_the_largest_amount() {
        let transactions = vec![
            transaction(1, EntryType::Expense, Ref::Id(10), "79228162514264337593543950335", 1),
            transaction(2, EntryType::Expense, Ref::Id(10), "1", 2),
            transaction(3, EntryType::Income, Ref::Id(10), "5", 3),
        ];
        let cache = Cache {
            current_budgets: vec![budget(1, "100", Ref::Id(10))],
            transactions: transactions.clone(),
            ..Cache::default()
        };

        let flow = cash_flow(&transactions);
        assert_eq!(flow.expenses, Decimal::MAX);
        assert_eq!(flow.net, dec("5") - Decimal::MAX);

        let progress = budget_progress(&cache, 1);
        assert_eq!(progress.spent, Decimal::MAX);
        assert_eq!(progress.left, dec("100") - Decimal::MAX);

        assert_eq!(
            expenses_by_category(&cache),
            vec![("Other".to_string(), Decimal::MAX)]
        );
    }

    #[test]
    fn sort_toggles_like_a_table_header() {
        let sort = ActivitySort::default();
        assert_eq!(sort.field, SortField::Date);
        assert_eq!(sort.order, SortOrder::Desc);

        let flipped = sort.toggle(SortField::Date);
        assert_eq!(flipped.order, SortOrder::Asc);

        let by_amount = flipped.toggle(SortField::Amount);
        assert_eq!(by_amount, ActivitySort { field: SortField::Amount, order: SortOrder::Asc });
    }

    #[test]
    fn sorts_by_date_and_amount() {
        let transactions = vec![
            transaction(1, EntryType::Expense, Ref::Id(10), "50", 3),
            transaction(2, EntryType::Expense, Ref::Id(10), "9.99", 1),
            transaction(3, EntryType::Income, Ref::Id(10), "100", 2),
        ];
        let ids = |sorted: Vec<Transaction>| sorted.iter().map(|t| t.id).collect::<Vec<_>>();

        assert_eq!(ids(ActivitySort::default().apply(&transactions)), vec![1, 3, 2]);
        assert_eq!(
            ids(ActivitySort { field: SortField::Amount, order: SortOrder::Asc }.apply(&transactions)),
            vec![2, 1, 3]
        );
    }
}
