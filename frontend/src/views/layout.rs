use web_sys::HtmlSelectElement;
use yew::prelude::*;

use super::{icons, AppContext, Page};
use crate::config::{save_display_settings, DisplaySettings, CURRENCY_CODES};

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub children: Children,
    pub active_page: Page,
    pub on_select: Callback<Page>,
}

#[function_component(Layout)]
pub fn layout(props: &LayoutProps) -> Html {
    html! {
        <div class="flex h-screen bg-background">
            <div class="hidden md:flex">
                <Sidebar active_page={props.active_page} on_select={props.on_select.clone()} />
            </div>

            <div class="flex-1 flex flex-col overflow-hidden">
                <Header />
                <main class="flex-1 overflow-y-auto">
                    { for props.children.iter() }
                </main>
            </div>
        </div>
    }
}

#[function_component(Header)]
fn header() -> Html {
    let ctx = use_context::<AppContext>();
    let Some(ctx) = ctx else {
        return html! {};
    };

    let on_currency = {
        let settings = ctx.settings.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let next = DisplaySettings::for_code(&select.value());
            save_display_settings(&next);
            settings.set(next);
        })
    };

    let (username, email) = ctx
        .session
        .user()
        .map(|user| (user.username.clone(), user.email.clone()))
        .unwrap_or_default();
    let initial = username
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_else(|| "U".to_string());

    html! {
        <header class="bg-[#D8E1E8] border-b border-border h-16 flex items-center justify-between px-6">
            <div class="flex-1"></div>
            <div class="flex items-center gap-4">
                <select class="p-2 border rounded text-sm" onchange={on_currency}>
                    { for CURRENCY_CODES.iter().map(|code| html! {
                        <option value={*code} selected={ctx.settings.currency_code == *code}>{ *code }</option>
                    }) }
                </select>
                <div class="flex items-center gap-2">
                    <div class="w-9 h-9 rounded-full bg-[#173E63] text-white flex items-center justify-center font-bold">
                        { initial }
                    </div>
                    <div class="hidden sm:flex flex-col leading-tight">
                        <span class="text-sm font-semibold text-foreground">{ username }</span>
                        <span class="text-xs text-muted-foreground">{ email }</span>
                    </div>
                </div>
            </div>
        </header>
    }
}

struct NavItem {
    label: &'static str,
    page: Page,
    icon: fn() -> Html,
}

#[derive(Properties, PartialEq)]
struct SidebarProps {
    active_page: Page,
    on_select: Callback<Page>,
}

#[function_component(Sidebar)]
fn sidebar(props: &SidebarProps) -> Html {
    let ctx = use_context::<AppContext>();

    let nav_items = vec![
        NavItem {
            label: "Dashboard",
            page: Page::Dashboard,
            icon: icons::layout_grid,
        },
        NavItem {
            label: "Accounts",
            page: Page::Accounts,
            icon: icons::wallet,
        },
        NavItem {
            label: "Categories",
            page: Page::Categories,
            icon: icons::tag,
        },
        NavItem {
            label: "Transactions",
            page: Page::Transactions,
            icon: icons::credit_card,
        },
        NavItem {
            label: "Budgets",
            page: Page::Budgets,
            icon: icons::bar_chart,
        },
        NavItem {
            label: "Saving Goals",
            page: Page::Goals,
            icon: icons::target,
        },
    ];

    let on_logout = Callback::from(move |_| {
        if let Some(ctx) = &ctx {
            ctx.log_out();
        }
    });

    html! {
        <div class="w-[220px] h-screen bg-[#D8E1E8] p-4 flex flex-col">
            <div class="flex items-center gap-3 px-2 mb-8">
                <span class="text-[#173E63] text-2xl font-black tracking-tight">{"FCS Finance"}</span>
            </div>

            <div class="flex-1 bg-[#173E63] rounded-[24px] flex flex-col py-6 px-3 shadow-lg">
                <nav class="flex-1 space-y-2">
                    { for nav_items.iter().map(|item| {
                        let is_active = item.page == props.active_page;
                        let class_name = if is_active {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium bg-[#B2CBDE] text-[#173E63] w-full"
                        } else {
                            "flex items-center gap-3 px-4 py-3 rounded-xl transition-all text-[13px] font-medium text-slate-300 hover:bg-white/5 hover:text-white w-full"
                        };
                        let on_select = props.on_select.clone();
                        let page = item.page;

                        html! {
                            <button type="button" class={class_name} onclick={Callback::from(move |_| on_select.emit(page))}>
                                <span class="shrink-0">{ (item.icon)() }</span>
                                <span class="truncate whitespace-nowrap text-left">{ item.label }</span>
                            </button>
                        }
                    }) }
                </nav>

                <div class="mt-auto pt-4">
                    <button onclick={on_logout} class="flex items-center gap-3 w-full px-4 py-3 rounded-xl hover:bg-white/10 transition-colors text-[13px] font-medium text-slate-300">
                        { icons::log_out() }
                        <span>{"Log Out"}</span>
                    </button>
                </div>
            </div>
        </div>
    }
}
