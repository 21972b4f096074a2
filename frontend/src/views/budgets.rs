use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{
    bind_input, bind_select, error_banner, form_message, icons, page_shell, AppContext,
    CARD_CLASS, INPUT_CLASS, PRIMARY_BUTTON_CLASS,
};
use crate::{
    format::{format_currency, format_percent},
    forms::{self, parse_selection, BudgetDraft},
    models::{Budget, EntryType},
    summary::BudgetProgress,
};

#[function_component(BudgetsPage)]
pub fn budgets_page() -> Html {
    let ctx = use_context::<AppContext>();
    let Some(ctx) = ctx else {
        return html! {};
    };

    let name = use_state(String::new);
    let amount = use_state(String::new);
    let category = use_state(String::new);
    let form_error = use_state(|| None::<String>);
    let action_error = use_state(|| None::<String>);

    let symbol = ctx.currency_symbol();
    let cache = ctx.store.cache();
    let current: Vec<(Budget, String, BudgetProgress)> = cache
        .current_budgets
        .iter()
        .map(|b| {
            let label = cache
                .category_name(&b.category)
                .unwrap_or_else(|| format!("#{}", b.category.id()));
            (b.clone(), label, cache.budget_progress(b.id))
        })
        .collect();
    let all: Vec<(Budget, String)> = cache
        .budgets
        .iter()
        .map(|b| {
            let label = cache
                .category_name(&b.category)
                .unwrap_or_else(|| format!("#{}", b.category.id()));
            (b.clone(), label)
        })
        .collect();
    let expense_categories: Vec<_> = cache
        .categories
        .iter()
        .filter(|c| c.kind == EntryType::Expense)
        .cloned()
        .collect();
    let load_error = cache.error.clone();
    drop(cache);

    let on_submit = {
        let ctx = ctx.clone();
        let name = name.clone();
        let amount = amount.clone();
        let category = category.clone();
        let form_error = form_error.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let draft = BudgetDraft {
                name: (*name).clone(),
                amount: (*amount).clone(),
                category: parse_selection(&category),
            };
            let payload = match draft.validate(forms::today()) {
                Ok(payload) => payload,
                Err(invalid) => {
                    form_error.set(Some(invalid.to_string()));
                    return;
                }
            };

            form_error.set(None);
            let ctx = ctx.clone();
            let name = name.clone();
            let amount = amount.clone();
            let form_error = form_error.clone();
            spawn_local(async move {
                match ctx.store.add::<Budget>(&payload).await {
                    // The new budget only shows progress once the server
                    // lists it for the current month.
                    Ok(_) => {
                        name.set(String::new());
                        amount.set(String::new());
                        if let Err(failure) = ctx.store.refresh_current_budgets().await {
                            form_error.set(Some(ctx.report(&failure)));
                        }
                    }
                    Err(failure) => form_error.set(Some(ctx.report(&failure))),
                }
            });
        })
    };

    let on_delete = {
        let action_error = action_error.clone();
        Callback::from(move |id: i64| {
            let ctx = ctx.clone();
            let action_error = action_error.clone();
            spawn_local(async move {
                if let Err(failure) = ctx.store.remove::<Budget>(id).await {
                    action_error.set(Some(ctx.report(&failure)));
                }
            });
        })
    };

    page_shell(
        "Budgets",
        html! {},
        html! {
            <>
                { error_banner(load_error.as_deref()) }
                { error_banner(action_error.as_deref()) }

                <form class={classes!(CARD_CLASS, "space-y-4")} onsubmit={on_submit}>
                    <h3 class="text-lg font-bold text-foreground">{"New Budget for this Month"}</h3>
                    <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                        <input type="text" placeholder="Budget name" class={INPUT_CLASS}
                            value={(*name).clone()} oninput={bind_input(&name)} />
                        <input type="number" step="0.01" placeholder="Limit" class={INPUT_CLASS}
                            value={(*amount).clone()} oninput={bind_input(&amount)} />
                        <select class={INPUT_CLASS} onchange={bind_select(&category)}>
                            <option value="" selected={category.is_empty()}>{"Select category"}</option>
                            { for expense_categories.iter().map(|c| html! {
                                <option value={c.id.to_string()} selected={*category == c.id.to_string()}>{ c.name.clone() }</option>
                            }) }
                        </select>
                    </div>
                    { form_message(&form_error) }
                    <button type="submit" class={PRIMARY_BUTTON_CLASS}>
                        { icons::plus() }{"Add Budget"}
                    </button>
                </form>

                <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
                    if current.is_empty() {
                        <p class="text-sm text-muted-foreground">{"No budgets for this month."}</p>
                    }
                    { for current.iter().map(|(budget, label, progress)| {
                        let bar_color = if progress.is_overspent() { "bg-red-500" } else { "bg-[#1D617A]" };
                        html! {
                            <div key={budget.id} class={CARD_CLASS}>
                                <div class="flex justify-between items-center mb-1">
                                    <p class="font-semibold text-foreground">{ budget.name.clone() }</p>
                                    <span class="text-xs font-semibold text-muted-foreground">{ format_percent(progress.pct) }</span>
                                </div>
                                <p class="text-xs text-muted-foreground mb-3">{ label.clone() }</p>
                                <div class="w-full h-2 bg-muted rounded-full overflow-hidden">
                                    <div class={classes!("h-2", "rounded-full", bar_color)} style={format!("width: {}%", progress.bar_width().round())}></div>
                                </div>
                                <div class="flex justify-between mt-2 text-xs">
                                    <span class="text-foreground">
                                        { format!("{} of {}", format_currency(progress.spent, &symbol), format_currency(progress.limit, &symbol)) }
                                    </span>
                                    if progress.is_overspent() {
                                        <span class="text-red-500 font-semibold">{ format!("{} over", format_currency(-progress.left, &symbol)) }</span>
                                    } else {
                                        <span class="text-muted-foreground">{ format!("{} left", format_currency(progress.left, &symbol)) }</span>
                                    }
                                </div>
                            </div>
                        }
                    }) }
                </div>

                <div class="bg-card rounded-lg border border-border overflow-hidden">
                    <div class="px-6 py-4 border-b border-border">
                        <h3 class="text-lg font-bold text-foreground">{"All Budgets"}</h3>
                    </div>
                    <table class="w-full text-left border-collapse">
                        <thead class="bg-secondary border-b border-border">
                            <tr>
                                <th class="px-6 py-3 text-sm font-semibold text-secondary-foreground">{"Month"}</th>
                                <th class="px-6 py-3 text-sm font-semibold text-secondary-foreground">{"Name"}</th>
                                <th class="px-6 py-3 text-sm font-semibold text-secondary-foreground">{"Category"}</th>
                                <th class="px-6 py-3 text-right text-sm font-semibold text-secondary-foreground">{"Limit"}</th>
                                <th class="px-6 py-3"></th>
                            </tr>
                        </thead>
                        <tbody class="divide-y divide-border">
                            { for all.iter().map(|(budget, label)| {
                                let id = budget.id;
                                let on_delete = on_delete.clone();
                                html! {
                                    <tr key={id} class="text-sm">
                                        <td class="px-6 py-3 text-muted-foreground">{ budget.month.format("%B %Y").to_string() }</td>
                                        <td class="px-6 py-3 text-foreground">{ budget.name.clone() }</td>
                                        <td class="px-6 py-3 text-foreground">{ label.clone() }</td>
                                        <td class="px-6 py-3 text-right font-semibold text-foreground">{ format_currency(budget.amount, &symbol) }</td>
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
            </>
        },
    )
}
