use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{
    bind_input, bind_select, error_banner, form_message, icons, page_shell, AppContext,
    CARD_CLASS, INPUT_CLASS, PRIMARY_BUTTON_CLASS,
};
use crate::{
    format::format_currency,
    forms::{self, parse_selection, TransactionDraft},
    models::{EntryType, Transaction, TransactionFilters},
};

#[derive(Properties, PartialEq)]
pub struct TransactionFormProps {
    #[prop_or_default]
    pub on_saved: Callback<()>,
}

/// Records a transaction dated today. Only categories of the chosen type are
/// offered.
#[function_component(TransactionForm)]
pub fn transaction_form(props: &TransactionFormProps) -> Html {
    let ctx = use_context::<AppContext>();
    let Some(ctx) = ctx else {
        return html! {};
    };

    let amount = use_state(String::new);
    let kind = use_state(|| EntryType::Expense.as_str().to_string());
    let account = use_state(String::new);
    let category = use_state(String::new);
    let notes = use_state(String::new);
    let error = use_state(|| None::<String>);
    let saving = use_state(|| false);

    let (accounts, categories) = {
        let cache = ctx.store.cache();
        (cache.accounts.clone(), cache.categories.clone())
    };
    let selected_kind = EntryType::parse(&kind).unwrap_or(EntryType::Expense);

    let on_kind = {
        let kind = kind.clone();
        let category = category.clone();
        Callback::from(move |e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            kind.set(select.value());
            category.set(String::new());
        })
    };

    let on_submit = {
        let amount = amount.clone();
        let account = account.clone();
        let category = category.clone();
        let notes = notes.clone();
        let error = error.clone();
        let saving = saving.clone();
        let on_saved = props.on_saved.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let draft = TransactionDraft {
                amount: (*amount).clone(),
                kind: selected_kind,
                account: parse_selection(&account),
                category: parse_selection(&category),
                notes: (*notes).clone(),
            };
            let payload = match draft.validate(forms::today()) {
                Ok(payload) => payload,
                Err(invalid) => {
                    error.set(Some(invalid.to_string()));
                    return;
                }
            };

            error.set(None);
            saving.set(true);
            let ctx = ctx.clone();
            let amount = amount.clone();
            let notes = notes.clone();
            let error = error.clone();
            let saving = saving.clone();
            let on_saved = on_saved.clone();
            spawn_local(async move {
                match ctx.store.add::<Transaction>(&payload).await {
                    Ok(_) => {
                        amount.set(String::new());
                        notes.set(String::new());
                        on_saved.emit(());
                    }
                    Err(failure) => error.set(Some(ctx.report(&failure))),
                }
                saving.set(false);
            });
        })
    };

    html! {
        <form class={classes!(CARD_CLASS, "space-y-4")} onsubmit={on_submit}>
            <h3 class="text-lg font-bold text-foreground">{"New Transaction"}</h3>
            <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                <input type="number" step="0.01" placeholder="Amount" class={INPUT_CLASS}
                    value={(*amount).clone()} oninput={bind_input(&amount)} />
                <select class={INPUT_CLASS} onchange={on_kind}>
                    <option value="expense" selected={selected_kind == EntryType::Expense}>{"Expense"}</option>
                    <option value="income" selected={selected_kind == EntryType::Income}>{"Income"}</option>
                </select>
                <select class={INPUT_CLASS} onchange={bind_select(&account)}>
                    <option value="" selected={account.is_empty()}>{"Select account"}</option>
                    { for accounts.iter().map(|a| html! {
                        <option value={a.id.to_string()} selected={*account == a.id.to_string()}>{ a.name.clone() }</option>
                    }) }
                </select>
                <select class={INPUT_CLASS} onchange={bind_select(&category)}>
                    <option value="" selected={category.is_empty()}>{"Select category"}</option>
                    { for categories.iter().filter(|c| c.kind == selected_kind).map(|c| html! {
                        <option value={c.id.to_string()} selected={*category == c.id.to_string()}>{ c.name.clone() }</option>
                    }) }
                </select>
            </div>
            <input type="text" placeholder="Notes" class={INPUT_CLASS}
                value={(*notes).clone()} oninput={bind_input(&notes)} />
            { form_message(&error) }
            <button type="submit" class={PRIMARY_BUTTON_CLASS} disabled={*saving}>
                { icons::plus() }
                { if *saving { "Saving..." } else { "Add Transaction" } }
            </button>
        </form>
    }
}

#[function_component(TransactionsPage)]
pub fn transactions_page() -> Html {
    let ctx = use_context::<AppContext>();
    let Some(ctx) = ctx else {
        return html! {};
    };

    let show_form = use_state(|| false);
    let filter_kind = use_state(String::new);
    let filter_category = use_state(String::new);
    let filter_date = use_state(String::new);
    let action_error = use_state(|| None::<String>);

    let symbol = ctx.currency_symbol();
    let cache = ctx.store.cache();
    let rows: Vec<(Transaction, String, String)> = cache
        .transactions
        .iter()
        .map(|t| {
            let category = cache
                .category_name(&t.category)
                .unwrap_or_else(|| format!("#{}", t.category.id()));
            let account = cache
                .account_name(&t.account)
                .unwrap_or_else(|| format!("#{}", t.account.id()));
            (t.clone(), category, account)
        })
        .collect();
    let categories = cache.categories.clone();
    let load_error = cache.error.clone();
    drop(cache);

    let toggle_form = {
        let show_form = show_form.clone();
        Callback::from(move |_| show_form.set(!*show_form))
    };

    let on_filter = {
        let ctx = ctx.clone();
        let filter_kind = filter_kind.clone();
        let filter_category = filter_category.clone();
        let filter_date = filter_date.clone();
        let action_error = action_error.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let date = filter_date.trim();
            let date = if date.is_empty() {
                None
            } else {
                match chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d") {
                    Ok(date) => Some(date),
                    Err(_) => {
                        action_error.set(Some("Date must look like 2025-09-01".to_string()));
                        return;
                    }
                }
            };
            let filters = TransactionFilters {
                kind: EntryType::parse(&filter_kind),
                category_id: parse_selection(&filter_category),
                date,
            };

            action_error.set(None);
            let ctx = ctx.clone();
            let action_error = action_error.clone();
            spawn_local(async move {
                if let Err(failure) = ctx.store.refresh_transactions(&filters).await {
                    action_error.set(Some(ctx.report(&failure)));
                }
            });
        })
    };

    let on_reset = {
        let ctx = ctx.clone();
        let filter_kind = filter_kind.clone();
        let filter_category = filter_category.clone();
        let filter_date = filter_date.clone();
        let action_error = action_error.clone();
        Callback::from(move |_| {
            filter_kind.set(String::new());
            filter_category.set(String::new());
            filter_date.set(String::new());
            let ctx = ctx.clone();
            let action_error = action_error.clone();
            spawn_local(async move {
                if let Err(failure) = ctx
                    .store
                    .refresh_transactions(&TransactionFilters::default())
                    .await
                {
                    action_error.set(Some(ctx.report(&failure)));
                }
            });
        })
    };

    let on_delete = {
        let ctx = ctx.clone();
        let action_error = action_error.clone();
        Callback::from(move |id: i64| {
            let ctx = ctx.clone();
            let action_error = action_error.clone();
            spawn_local(async move {
                if let Err(failure) = ctx.store.remove::<Transaction>(id).await {
                    action_error.set(Some(ctx.report(&failure)));
                }
            });
        })
    };

    let actions = html! {
        <button class={PRIMARY_BUTTON_CLASS} onclick={toggle_form}>
            { icons::plus() }
            { if *show_form { "Close" } else { "Add Transaction" } }
        </button>
    };

    let hide_form = {
        let show_form = show_form.clone();
        Callback::from(move |_: ()| show_form.set(false))
    };

    page_shell(
        "Transactions",
        actions,
        html! {
            <>
                { error_banner(load_error.as_deref()) }
                { error_banner(action_error.as_deref()) }
                if *show_form {
                    <TransactionForm on_saved={hide_form} />
                }

                <form class="flex flex-wrap items-end gap-3" onsubmit={on_filter}>
                    <select class="p-2 border rounded text-sm" onchange={bind_select(&filter_kind)}>
                        <option value="" selected={filter_kind.is_empty()}>{"All types"}</option>
                        <option value="income" selected={*filter_kind == "income"}>{"Income"}</option>
                        <option value="expense" selected={*filter_kind == "expense"}>{"Expense"}</option>
                    </select>
                    <select class="p-2 border rounded text-sm" onchange={bind_select(&filter_category)}>
                        <option value="" selected={filter_category.is_empty()}>{"All categories"}</option>
                        { for categories.iter().map(|c| html! {
                            <option value={c.id.to_string()} selected={*filter_category == c.id.to_string()}>{ c.name.clone() }</option>
                        }) }
                    </select>
                    <input type="date" class="p-2 border rounded text-sm"
                        value={(*filter_date).clone()} oninput={bind_input(&filter_date)} />
                    <button type="submit" class="px-3 py-2 rounded bg-secondary text-sm font-semibold">{"Filter"}</button>
                    <button type="button" class="px-3 py-2 rounded text-sm text-muted-foreground" onclick={on_reset}>{"Reset"}</button>
                </form>

                <div class="bg-card rounded-lg border border-border overflow-hidden">
                    <div class="overflow-x-auto">
                        <table class="w-full text-left border-collapse">
                            <thead class="bg-secondary border-b border-border">
                                <tr>
                                    <th class="px-6 py-3 text-sm font-semibold text-secondary-foreground">{"Date"}</th>
                                    <th class="px-6 py-3 text-sm font-semibold text-secondary-foreground">{"Category"}</th>
                                    <th class="px-6 py-3 text-sm font-semibold text-secondary-foreground">{"Account"}</th>
                                    <th class="px-6 py-3 text-sm font-semibold text-secondary-foreground">{"Notes"}</th>
                                    <th class="px-6 py-3 text-right text-sm font-semibold text-secondary-foreground">{"Amount"}</th>
                                    <th class="px-6 py-3"></th>
                                </tr>
                            </thead>
                            <tbody class="divide-y divide-border">
                                if rows.is_empty() {
                                    <tr><td colspan="6" class="px-6 py-6 text-center text-muted-foreground">{"No transactions yet."}</td></tr>
                                }
                                { for rows.iter().map(|(tx, category, account)| {
                                    let id = tx.id;
                                    let on_delete = on_delete.clone();
                                    let (sign, tone) = match tx.kind {
                                        EntryType::Income => ("+", "text-green-600"),
                                        EntryType::Expense => ("-", "text-red-500"),
                                    };
                                    html! {
                                        <tr key={id} class="text-sm hover:bg-muted/30 transition-colors">
                                            <td class="px-6 py-3 text-muted-foreground">{ tx.date.format("%Y-%m-%d").to_string() }</td>
                                            <td class="px-6 py-3 text-foreground">{ category.clone() }</td>
                                            <td class="px-6 py-3 text-foreground">{ account.clone() }</td>
                                            <td class="px-6 py-3 text-muted-foreground">{ tx.notes.clone() }</td>
                                            <td class={classes!("px-6", "py-3", "text-right", "font-semibold", tone)}>
                                                { format!("{}{}", sign, format_currency(tx.amount, &symbol)) }
                                            </td>
                                            <td class="px-6 py-3 text-right">
                                                <button class="text-muted-foreground hover:text-red-500" onclick={Callback::from(move |_| on_delete.emit(id))}>
                                                    { icons::trash() }
                                                </button>
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
