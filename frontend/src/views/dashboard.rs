use rust_decimal::Decimal;
use yew::prelude::*;

use super::{
    error_banner, icons, page_shell, transactions::TransactionForm, AppContext,
    PRIMARY_BUTTON_CLASS,
};
use crate::{
    format::{format_currency, format_percent},
    models::{EntryType, Transaction},
    summary::{
        cash_flow, expenses_by_category, monthly_limit, total_balance, ActivitySort,
        BudgetProgress, SortField, SortOrder,
    },
};

const RECENT_ROWS: usize = 10;

#[derive(Clone, Copy, PartialEq)]
enum StatIcon {
    Wallet,
    TrendingUp,
    CreditCard,
}

#[derive(Properties, PartialEq)]
struct StatCardProps {
    title: &'static str,
    amount: Decimal,
    icon: StatIcon,
    currency_symbol: String,
}

#[function_component(StatCard)]
fn stat_card(props: &StatCardProps) -> Html {
    html! {
        <div class="bg-card p-6 rounded-[10px] shadow-sm border border-border flex justify-between items-start">
            <div>
                <p class="text-muted-foreground text-[10px] font-bold mb-1 tracking-widest">{ props.title }</p>
                <h3 class="text-2xl font-bold text-[#1D617A] tracking-tight">{ format_currency(props.amount, &props.currency_symbol) }</h3>
            </div>
            <div class="p-3 bg-[#eef4f9] rounded-[10px]">
                {
                    match props.icon {
                        StatIcon::Wallet => icons::wallet(),
                        StatIcon::TrendingUp => icons::trending_up(),
                        StatIcon::CreditCard => icons::credit_card(),
                    }
                }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct MonthlyLimitProps {
    progress: BudgetProgress,
    currency_symbol: String,
}

#[function_component(MonthlyLimitCard)]
fn monthly_limit_card(props: &MonthlyLimitProps) -> Html {
    let progress = &props.progress;
    let symbol = &props.currency_symbol;
    let (bar_color, remaining) = if progress.is_overspent() {
        (
            "bg-red-500",
            format!("{} over limit", format_currency(-progress.left, symbol)),
        )
    } else {
        (
            "bg-[#1D617A]",
            format!("{} left", format_currency(progress.left, symbol)),
        )
    };

    html! {
        <div class="bg-card p-6 rounded-[10px] shadow-sm border border-border">
            <div class="flex justify-between items-center mb-3">
                <p class="text-muted-foreground text-[10px] font-bold tracking-widest">{"MONTHLY LIMIT"}</p>
                <span class="text-xs font-semibold text-foreground">{ format_percent(progress.pct) }</span>
            </div>
            if progress.limit.is_zero() {
                <p class="text-sm text-muted-foreground">{"No budgets set for this month."}</p>
            } else {
                <>
                    <div class="w-full h-3 bg-muted rounded-full overflow-hidden">
                        <div class={classes!("h-3", "rounded-full", bar_color)} style={format!("width: {}%", progress.bar_width().round())}></div>
                    </div>
                    <div class="flex justify-between mt-3 text-sm">
                        <span class="text-foreground">
                            { format!("{} of {}", format_currency(progress.spent, symbol), format_currency(progress.limit, symbol)) }
                        </span>
                        <span class={if progress.is_overspent() { "text-red-500 font-semibold" } else { "text-muted-foreground" }}>
                            { remaining }
                        </span>
                    </div>
                </>
            }
        </div>
    }
}

#[function_component(DashboardPage)]
pub fn dashboard_page() -> Html {
    let ctx = use_context::<AppContext>();
    let Some(ctx) = ctx else {
        return html! {};
    };

    let sort = use_state(ActivitySort::default);
    let show_form = use_state(|| false);

    let symbol = ctx.currency_symbol();
    let cache = ctx.store.cache();
    let balance = total_balance(&cache.accounts);
    let flow = cash_flow(&cache.transactions);
    let limit = monthly_limit(&cache);
    let expenses = expenses_by_category(&cache);
    let recent: Vec<(Transaction, String)> = sort
        .apply(&cache.transactions)
        .into_iter()
        .take(RECENT_ROWS)
        .map(|t| {
            let category = cache
                .category_name(&t.category)
                .unwrap_or_else(|| format!("#{}", t.category.id()));
            (t, category)
        })
        .collect();
    let has_account = cache.has_account();
    let loading = cache.loading;
    let load_error = cache.error.clone();
    drop(cache);

    let sort_by = |field: SortField| {
        let sort = sort.clone();
        Callback::from(move |_: MouseEvent| sort.set(sort.toggle(field)))
    };
    let sort_marker = |field: SortField| {
        if sort.field != field {
            return html! {};
        }
        match sort.order {
            SortOrder::Asc => icons::arrow_up(),
            SortOrder::Desc => icons::arrow_down(),
        }
    };

    let toggle_form = {
        let show_form = show_form.clone();
        Callback::from(move |_| show_form.set(!*show_form))
    };
    let hide_form = {
        let show_form = show_form.clone();
        Callback::from(move |_: ()| show_form.set(false))
    };

    let actions = if has_account {
        html! {
            <button class={PRIMARY_BUTTON_CLASS} onclick={toggle_form}>
                { icons::plus() }
                { if *show_form { "Close" } else { "Add Transaction" } }
            </button>
        }
    } else {
        html! { <span class="text-sm text-muted-foreground">{"Create an account to start recording transactions."}</span> }
    };

    page_shell(
        "Dashboard",
        actions,
        html! {
            <>
                { error_banner(load_error.as_deref()) }
                if loading {
                    <p class="text-sm text-muted-foreground">{"Loading your data..."}</p>
                }
                if *show_form && has_account {
                    <TransactionForm on_saved={hide_form} />
                }

                <div class="grid grid-cols-1 md:grid-cols-3 gap-6">
                    <StatCard title="TOTAL BALANCE" amount={balance} icon={StatIcon::Wallet} currency_symbol={symbol.clone()} />
                    <StatCard title="INCOME" amount={flow.income} icon={StatIcon::TrendingUp} currency_symbol={symbol.clone()} />
                    <StatCard title="EXPENSES" amount={flow.expenses} icon={StatIcon::CreditCard} currency_symbol={symbol.clone()} />
                </div>

                <div class="grid grid-cols-1 lg:grid-cols-3 gap-6">
                    <MonthlyLimitCard progress={limit} currency_symbol={symbol.clone()} />

                    <div class="lg:col-span-2 bg-card rounded-[10px] border border-border overflow-hidden">
                        <div class="px-6 py-4 border-b border-border">
                            <h3 class="text-lg font-bold text-foreground">{"Expenses Summary"}</h3>
                        </div>
                        <table class="w-full text-left border-collapse">
                            <thead class="bg-secondary border-b border-border">
                                <tr>
                                    <th class="px-6 py-3 text-sm font-semibold text-secondary-foreground">{"Category"}</th>
                                    <th class="px-6 py-3 text-right text-sm font-semibold text-secondary-foreground">{"Spent"}</th>
                                </tr>
                            </thead>
                            <tbody class="divide-y divide-border">
                                if expenses.is_empty() {
                                    <tr><td colspan="2" class="px-6 py-6 text-center text-muted-foreground">{"No expenses yet."}</td></tr>
                                }
                                { for expenses.iter().map(|(name, total)| html! {
                                    <tr key={name.clone()} class="text-sm">
                                        <td class="px-6 py-3 text-foreground">{ name.clone() }</td>
                                        <td class="px-6 py-3 text-right font-semibold text-foreground">{ format_currency(*total, &symbol) }</td>
                                    </tr>
                                }) }
                            </tbody>
                        </table>
                    </div>
                </div>

                <div class="bg-card rounded-[10px] border border-border overflow-hidden">
                    <div class="px-6 py-4 border-b border-border">
                        <h3 class="text-lg font-bold text-foreground">{"Recent Activity"}</h3>
                    </div>
                    <div class="overflow-x-auto">
                        <table class="w-full text-left border-collapse">
                            <thead class="bg-secondary border-b border-border">
                                <tr>
                                    <th class="px-6 py-3 text-sm font-semibold text-secondary-foreground">
                                        <button class="flex items-center gap-1" onclick={sort_by(SortField::Date)}>
                                            {"Date"}{ sort_marker(SortField::Date) }
                                        </button>
                                    </th>
                                    <th class="px-6 py-3 text-sm font-semibold text-secondary-foreground">{"Category"}</th>
                                    <th class="px-6 py-3 text-sm font-semibold text-secondary-foreground">{"Notes"}</th>
                                    <th class="px-6 py-3 text-sm font-semibold text-secondary-foreground">
                                        <button class="flex items-center gap-1 ml-auto" onclick={sort_by(SortField::Amount)}>
                                            {"Amount"}{ sort_marker(SortField::Amount) }
                                        </button>
                                    </th>
                                </tr>
                            </thead>
                            <tbody class="divide-y divide-border">
                                if recent.is_empty() {
                                    <tr><td colspan="4" class="px-6 py-6 text-center text-muted-foreground">{"No transactions yet."}</td></tr>
                                }
                                { for recent.iter().map(|(tx, category)| {
                                    let (sign, tone) = match tx.kind {
                                        EntryType::Income => ("+", "text-green-600"),
                                        EntryType::Expense => ("-", "text-red-500"),
                                    };
                                    html! {
                                        <tr key={tx.id} class="text-sm hover:bg-muted/30 transition-colors">
                                            <td class="px-6 py-3 text-muted-foreground">{ tx.date.format("%Y-%m-%d").to_string() }</td>
                                            <td class="px-6 py-3 text-foreground">{ category.clone() }</td>
                                            <td class="px-6 py-3 text-muted-foreground">{ tx.notes.clone() }</td>
                                            <td class={classes!("px-6", "py-3", "text-right", "font-semibold", tone)}>
                                                { format!("{}{}", sign, format_currency(tx.amount, &symbol)) }
                                            </td>
                                        </tr>
                                    }
                                }) }
                            </tbody>
                        </table>
                    </div>
                </div>
            </>
        },
    )
}
