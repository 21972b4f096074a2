use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::{
    bind_input, error_banner, form_message, icons, page_shell, AppContext, CARD_CLASS,
    INPUT_CLASS, PRIMARY_BUTTON_CLASS,
};
use crate::{
    forms::CategoryDraft,
    models::{Category, EntryType},
};

#[function_component(CategoriesPage)]
pub fn categories_page() -> Html {
    let ctx = use_context::<AppContext>();
    let Some(ctx) = ctx else {
        return html! {};
    };

    let name = use_state(String::new);
    let kind = use_state(|| EntryType::Expense);
    let form_error = use_state(|| None::<String>);
    let action_error = use_state(|| None::<String>);

    let (categories, load_error) = {
        let cache = ctx.store.cache();
        (cache.categories.clone(), cache.error.clone())
    };

    let on_kind = {
        let kind = kind.clone();
        Callback::from(move |e: Event| {
            let select: web_sys::HtmlSelectElement = e.target_unchecked_into();
            if let Some(parsed) = EntryType::parse(&select.value()) {
                kind.set(parsed);
            }
        })
    };

    let on_submit = {
        let ctx = ctx.clone();
        let name = name.clone();
        let kind = kind.clone();
        let form_error = form_error.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let draft = CategoryDraft {
                name: (*name).clone(),
                kind: *kind,
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
            let form_error = form_error.clone();
            spawn_local(async move {
                match ctx.store.add::<Category>(&payload).await {
                    Ok(_) => name.set(String::new()),
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
                if let Err(failure) = ctx.store.remove::<Category>(id).await {
                    action_error.set(Some(ctx.report(&failure)));
                }
            });
        })
    };

    let column = |title: &'static str, wanted: EntryType| {
        let items: Vec<&Category> = categories.iter().filter(|c| c.kind == wanted).collect();
        html! {
            <div class={CARD_CLASS}>
                <h3 class="text-lg font-bold text-foreground mb-4">{ title }</h3>
                if items.is_empty() {
                    <p class="text-sm text-muted-foreground">{"None yet."}</p>
                }
                <ul class="divide-y divide-border">
                    { for items.into_iter().map(|category| {
                        let id = category.id;
                        let on_delete = on_delete.clone();
                        html! {
                            <li key={id} class="flex items-center justify-between py-2">
                                <span class="flex items-center gap-2 text-sm text-foreground">
                                    { icons::tag() }{ category.name.clone() }
                                </span>
                                <button class="text-muted-foreground hover:text-red-500" onclick={Callback::from(move |_| on_delete.emit(id))}>
                                    { icons::trash() }
                                </button>
                            </li>
                        }
                    }) }
                </ul>
            </div>
        }
    };

    page_shell(
        "Categories",
        html! {},
        html! {
            <>
                { error_banner(load_error.as_deref()) }
                { error_banner(action_error.as_deref()) }

                <form class={classes!(CARD_CLASS, "space-y-4")} onsubmit={on_submit}>
                    <h3 class="text-lg font-bold text-foreground">{"New Category"}</h3>
                    <div class="grid grid-cols-1 md:grid-cols-2 gap-4">
                        <input type="text" placeholder="Category name" class={INPUT_CLASS}
                            value={(*name).clone()} oninput={bind_input(&name)} />
                        <select class={INPUT_CLASS} onchange={on_kind}>
                            <option value="expense" selected={*kind == EntryType::Expense}>{"Expense"}</option>
                            <option value="income" selected={*kind == EntryType::Income}>{"Income"}</option>
                        </select>
                    </div>
                    { form_message(&form_error) }
                    <button type="submit" class={PRIMARY_BUTTON_CLASS}>
                        { icons::plus() }{"Add Category"}
                    </button>
                </form>

                <div class="grid grid-cols-1 md:grid-cols-2 gap-6">
                    { column("Income", EntryType::Income) }
                    { column("Expense", EntryType::Expense) }
                </div>
            </>
        },
    )
}
