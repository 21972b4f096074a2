use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{
    bind_input, bind_select, error_banner, form_message, icons, page_shell, AppContext,
    CARD_CLASS, INPUT_CLASS, PRIMARY_BUTTON_CLASS,
};
use crate::{
    config::CURRENCY_CODES,
    format::format_plain,
    forms::{AccountDraft, DEFAULT_ACCOUNT_CURRENCY},
    models::Account,
    summary::total_balance,
};

#[function_component(AccountsPage)]
pub fn accounts_page() -> Html {
    let ctx = use_context::<AppContext>();
    let Some(ctx) = ctx else {
        return html! {};
    };

    let name = use_state(String::new);
    let currency = use_state(|| DEFAULT_ACCOUNT_CURRENCY.to_string());
    let balance = use_state(|| "0".to_string());
    let notes = use_state(String::new);
    let editing = use_state(|| None::<i64>);
    let form_error = use_state(|| None::<String>);
    let action_error = use_state(|| None::<String>);

    let (accounts, load_error) = {
        let cache = ctx.store.cache();
        (cache.accounts.clone(), cache.error.clone())
    };

    let reset_form = {
        let name = name.clone();
        let currency = currency.clone();
        let balance = balance.clone();
        let notes = notes.clone();
        let editing = editing.clone();
        Callback::from(move |_: ()| {
            name.set(String::new());
            currency.set(DEFAULT_ACCOUNT_CURRENCY.to_string());
            balance.set("0".to_string());
            notes.set(String::new());
            editing.set(None);
        })
    };

    let on_submit = {
        let ctx = ctx.clone();
        let name = name.clone();
        let currency = currency.clone();
        let balance = balance.clone();
        let notes = notes.clone();
        let editing = editing.clone();
        let form_error = form_error.clone();
        let reset_form = reset_form.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let draft = AccountDraft {
                name: (*name).clone(),
                currency: (*currency).clone(),
                balance: (*balance).clone(),
                notes: (*notes).clone(),
            };
            let payload = match draft.validate() {
                Ok(payload) => payload,
                Err(invalid) => {
                    form_error.set(Some(invalid.to_string()));
                    return;
                }
            };

            form_error.set(None);
            let ctx = ctx.clone();
            let editing = *editing;
            let form_error = form_error.clone();
            let reset_form = reset_form.clone();
            spawn_local(async move {
                let saved = match editing {
                    Some(id) => ctx.store.replace::<Account>(id, &payload).await,
                    None => ctx.store.add::<Account>(&payload).await,
                };
                match saved {
                    Ok(_) => reset_form.emit(()),
                    Err(failure) => form_error.set(Some(ctx.report(&failure))),
                }
            });
        })
    };

    // Edits start from the server's copy rather than the cached one.
    let on_edit = {
        let ctx = ctx.clone();
        let name = name.clone();
        let currency = currency.clone();
        let balance = balance.clone();
        let notes = notes.clone();
        let editing = editing.clone();
        let action_error = action_error.clone();
        Callback::from(move |id: i64| {
            let ctx = ctx.clone();
            let name = name.clone();
            let currency = currency.clone();
            let balance = balance.clone();
            let notes = notes.clone();
            let editing = editing.clone();
            let action_error = action_error.clone();
            spawn_local(async move {
                match ctx.store.get::<Account>(id).await {
                    Ok(account) => {
                        name.set(account.name);
                        currency.set(account.currency);
                        balance.set(account.balance.to_string());
                        notes.set(account.notes);
                        editing.set(Some(account.id));
                    }
                    Err(failure) => action_error.set(Some(ctx.report(&failure))),
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
                if let Err(failure) = ctx.store.remove::<Account>(id).await {
                    action_error.set(Some(ctx.report(&failure)));
                }
            });
        })
    };

    // Mixed currencies are summed as-is.
    let total = total_balance(&accounts);
    let symbol = ctx.currency_symbol();

    page_shell(
        "Accounts",
        html! {
            <span class="text-sm text-muted-foreground">
                { format!("Total {} {}", symbol, format_plain(total)) }
            </span>
        },
        html! {
            <>
                { error_banner(load_error.as_deref()) }
                { error_banner(action_error.as_deref()) }

                <form class={classes!(CARD_CLASS, "space-y-4")} onsubmit={on_submit}>
                    <h3 class="text-lg font-bold text-foreground">
                        { if editing.is_some() { "Edit Account" } else { "New Account" } }
                    </h3>
                    <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                        <input type="text" placeholder="Account name" class={INPUT_CLASS}
                            value={(*name).clone()} oninput={bind_input(&name)} />
                        <select class={INPUT_CLASS} onchange={bind_select(&currency)}>
                            { for CURRENCY_CODES.iter().map(|code| html! {
                                <option value={*code} selected={*currency == *code}>{ *code }</option>
                            }) }
                        </select>
                        <input type="number" step="0.01" placeholder="Opening balance" class={INPUT_CLASS}
                            value={(*balance).clone()} oninput={bind_input(&balance)} />
                    </div>
                    <input type="text" placeholder="Notes" class={INPUT_CLASS}
                        value={(*notes).clone()} oninput={bind_input(&notes)} />
                    { form_message(&form_error) }
                    <div class="flex gap-3">
                        <button type="submit" class={PRIMARY_BUTTON_CLASS}>
                            if editing.is_some() {
                                {"Save Changes"}
                            } else {
                                <>{ icons::plus() }{"Add Account"}</>
                            }
                        </button>
                        if editing.is_some() {
                            <button type="button" class="px-4 py-2 rounded-xl text-sm text-muted-foreground"
                                onclick={reset_form.reform(|_: MouseEvent| ())}>
                                {"Cancel"}
                            </button>
                        }
                    </div>
                </form>

                <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">
                    if accounts.is_empty() {
                        <p class="text-sm text-muted-foreground">{"No accounts yet."}</p>
                    }
                    { for accounts.iter().map(|account| {
                        let id = account.id;
                        let on_delete = on_delete.clone();
                        let on_edit = on_edit.clone();
                        html! {
                            <div key={id} class={classes!(CARD_CLASS, "flex", "justify-between", "items-start")}>
                                <div>
                                    <div class="flex items-center gap-2 mb-1">
                                        { icons::wallet() }
                                        <p class="font-semibold text-foreground">{ account.name.clone() }</p>
                                    </div>
                                    <h3 class="text-2xl font-bold text-[#1D617A] tracking-tight">
                                        { format!("{} {}", account.currency, format_plain(account.balance)) }
                                    </h3>
                                    if !account.notes.is_empty() {
                                        <p class="text-xs text-muted-foreground mt-1">{ account.notes.clone() }</p>
                                    }
                                </div>
                                <div class="flex gap-2">
                                    <button class="text-xs font-semibold text-primary" onclick={Callback::from(move |_| on_edit.emit(id))}>
                                        {"Edit"}
                                    </button>
                                    <button class="text-muted-foreground hover:text-red-500" onclick={Callback::from(move |_| on_delete.emit(id))}>
                                        { icons::trash() }
                                    </button>
                                </div>
                            </div>
                        }
                    }) }
                </div>
            </>
        },
    )
}
