use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{
    bind_input, error_banner, form_message, icons, page_shell, AppContext, CARD_CLASS,
    INPUT_CLASS, PRIMARY_BUTTON_CLASS,
};
use crate::{
    format::{format_currency, format_percent},
    forms::{contribution, GoalDraft},
    models::Goal,
    summary::goal_progress,
};

#[derive(Properties, PartialEq)]
struct GoalCardProps {
    goal: Goal,
    currency_symbol: String,
}

#[function_component(GoalCard)]
fn goal_card(props: &GoalCardProps) -> Html {
    let ctx = use_context::<AppContext>();
    let Some(ctx) = ctx else {
        return html! {};
    };

    let amount = use_state(String::new);
    let error = use_state(|| None::<String>);

    let goal = &props.goal;
    let symbol = &props.currency_symbol;
    let pct = goal_progress(goal);

    let on_contribute = {
        let ctx = ctx.clone();
        let goal = goal.clone();
        let amount = amount.clone();
        let error = error.clone();
        Callback::from(move |_| {
            let patch = match contribution(&goal, &amount) {
                Ok(patch) => patch,
                Err(invalid) => {
                    error.set(Some(invalid.to_string()));
                    return;
                }
            };

            error.set(None);
            let ctx = ctx.clone();
            let id = goal.id;
            let amount = amount.clone();
            let error = error.clone();
            spawn_local(async move {
                match ctx.store.edit::<Goal>(id, &patch).await {
                    Ok(_) => amount.set(String::new()),
                    Err(failure) => error.set(Some(ctx.report(&failure))),
                }
            });
        })
    };

    let on_delete = {
        let id = goal.id;
        let error = error.clone();
        Callback::from(move |_| {
            let ctx = ctx.clone();
            let error = error.clone();
            spawn_local(async move {
                if let Err(failure) = ctx.store.remove::<Goal>(id).await {
                    error.set(Some(ctx.report(&failure)));
                }
            });
        })
    };

    html! {
        <div class={CARD_CLASS}>
            <div class="flex justify-between items-start mb-3">
                <div class="flex items-center gap-2">
                    { icons::target() }
                    <div>
                        <p class="font-semibold text-foreground">{ goal.name.clone() }</p>
                        if let Some(date) = goal.target_date {
                            <p class="text-xs text-muted-foreground">{ format!("By {}", date.format("%Y-%m-%d")) }</p>
                        }
                    </div>
                </div>
                <button class="text-muted-foreground hover:text-red-500" onclick={on_delete}>
                    { icons::trash() }
                </button>
            </div>

            <div class="w-full h-2 bg-muted rounded-full overflow-hidden">
                <div class="h-2 rounded-full bg-[#1D617A]" style={format!("width: {}%", pct.round())}></div>
            </div>
            <div class="flex justify-between mt-2 text-xs">
                <span class="text-foreground">
                    { format!("{} of {}", format_currency(goal.current_amount, symbol), format_currency(goal.target_amount, symbol)) }
                </span>
                <span class="text-muted-foreground">{ format_percent(pct) }</span>
            </div>

            <div class="flex gap-2 mt-4">
                <input type="number" step="0.01" placeholder="Contribution"
                    class="flex-1 bg-[#f1f4f9] border-none rounded-xl p-3 text-xs font-bold text-[#173E63]"
                    value={(*amount).clone()} oninput={bind_input(&amount)} />
                <button onclick={on_contribute} class="bg-[#173E63] text-white px-4 rounded-[10px] text-[10px] font-bold">
                    {"Add Contribution"}
                </button>
            </div>
            { form_message(&error) }
        </div>
    }
}

#[function_component(GoalsPage)]
pub fn goals_page() -> Html {
    let ctx = use_context::<AppContext>();
    let Some(ctx) = ctx else {
        return html! {};
    };

    let name = use_state(String::new);
    let target = use_state(String::new);
    let current = use_state(String::new);
    let target_date = use_state(String::new);
    let form_error = use_state(|| None::<String>);

    let (goals, load_error) = {
        let cache = ctx.store.cache();
        (cache.goals.clone(), cache.error.clone())
    };
    let symbol = ctx.currency_symbol();

    let on_submit = {
        let name = name.clone();
        let target = target.clone();
        let current = current.clone();
        let target_date = target_date.clone();
        let form_error = form_error.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let draft = GoalDraft {
                name: (*name).clone(),
                target: (*target).clone(),
                current: (*current).clone(),
                target_date: (*target_date).clone(),
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
            let name = name.clone();
            let target = target.clone();
            let current = current.clone();
            let target_date = target_date.clone();
            let form_error = form_error.clone();
            spawn_local(async move {
                match ctx.store.add::<Goal>(&payload).await {
                    Ok(_) => {
                        name.set(String::new());
                        target.set(String::new());
                        current.set(String::new());
                        target_date.set(String::new());
                    }
                    Err(failure) => form_error.set(Some(ctx.report(&failure))),
                }
            });
        })
    };

    page_shell(
        "Saving Goals",
        html! {},
        html! {
            <>
                { error_banner(load_error.as_deref()) }

                <form class={classes!(CARD_CLASS, "space-y-4")} onsubmit={on_submit}>
                    <h3 class="text-lg font-bold text-foreground">{"New Goal"}</h3>
                    <div class="grid grid-cols-1 md:grid-cols-4 gap-4">
                        <input type="text" placeholder="Goal name" class={INPUT_CLASS}
                            value={(*name).clone()} oninput={bind_input(&name)} />
                        <input type="number" step="0.01" placeholder="Target amount" class={INPUT_CLASS}
                            value={(*target).clone()} oninput={bind_input(&target)} />
                        <input type="number" step="0.01" placeholder="Saved so far" class={INPUT_CLASS}
                            value={(*current).clone()} oninput={bind_input(&current)} />
                        <input type="date" class={INPUT_CLASS}
                            value={(*target_date).clone()} oninput={bind_input(&target_date)} />
                    </div>
                    { form_message(&form_error) }
                    <button type="submit" class={PRIMARY_BUTTON_CLASS}>
                        { icons::plus() }{"Add Goal"}
                    </button>
                </form>

                <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-6">
                    if goals.is_empty() {
                        <p class="text-sm text-muted-foreground">{"No goals yet."}</p>
                    }
                    { for goals.into_iter().map(|goal| {
                        let id = goal.id;
                        html! { <GoalCard key={id} goal={goal} currency_symbol={symbol.clone()} /> }
                    }) }
                </div>
            </>
        },
    )
}
