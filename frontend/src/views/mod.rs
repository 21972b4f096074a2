//! Yew components. Every page reads the shared [AppContext] and re-renders
//! when the store reports a change.

mod accounts;
mod auth;
mod budgets;
mod categories;
mod dashboard;
mod goals;
mod icons;
mod layout;
mod transactions;

use std::rc::Rc;

use tracing::warn;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::{
    api::ApiClient,
    config::{load_display_settings, ApiConfig, DisplaySettings},
    error::ApiError,
    http::GlooTransport,
    session::{restore_session, Session, SessionAction},
    storage::LocalStorageTokens,
    store::DataStore,
};

use self::{
    accounts::AccountsPage, auth::AuthScreen, budgets::BudgetsPage, categories::CategoriesPage,
    dashboard::DashboardPage, goals::GoalsPage, layout::Layout, transactions::TransactionsPage,
};

pub type AppStore = DataStore<GlooTransport, LocalStorageTokens>;

/// Everything a page needs: the shared store, the session and display
/// preferences. `revision` changes whenever the store does so that context
/// consumers re-render.
#[derive(Clone)]
pub struct AppContext {
    pub store: Rc<AppStore>,
    pub session: UseReducerHandle<Session>,
    pub settings: UseStateHandle<DisplaySettings>,
    pub revision: u64,
}

impl PartialEq for AppContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.store, &other.store)
            && self.revision == other.revision
            && *self.session == *other.session
            && *self.settings == *other.settings
    }
}

impl AppContext {
    pub fn currency_symbol(&self) -> String {
        self.settings.currency_symbol.clone()
    }

    /// Log a failed store call and return the message to show. An expired
    /// session drops the cached data and sends the user back to login.
    pub fn report(&self, error: &ApiError) -> String {
        warn!(%error, "store operation failed");
        if error.is_auth_expired() {
            self.store.clear();
            self.session.dispatch(SessionAction::Logout);
        }
        error.to_string()
    }

    pub fn log_out(&self) {
        self.store.logout();
        self.session.dispatch(SessionAction::Logout);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
struct Revision(u64);

impl Reducible for Revision {
    type Action = ();

    fn reduce(self: Rc<Self>, _action: Self::Action) -> Rc<Self> {
        Rc::new(Revision(self.0 + 1))
    }
}

#[derive(Clone, Copy, PartialEq)]
enum AuthStatus {
    Checking,
    Ready,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Page {
    Dashboard,
    Accounts,
    Categories,
    Transactions,
    Budgets,
    Goals,
}

fn build_store() -> AppStore {
    let config = ApiConfig::from_build_env().unwrap_or_else(|error| {
        warn!(%error, "invalid API configuration, using defaults");
        ApiConfig::default()
    });
    DataStore::new(ApiClient::new(GlooTransport::new(config), LocalStorageTokens))
}

#[function_component(App)]
pub fn app() -> Html {
    let store = use_memo(|_| build_store(), ());
    let revision = use_reducer(Revision::default);
    let session = use_reducer(Session::default);
    let settings = use_state(load_display_settings);
    let auth_status = use_state(|| AuthStatus::Checking);
    let active_page = use_state(|| Page::Dashboard);

    {
        let store = store.clone();
        let dispatcher = revision.dispatcher();
        use_effect_with_deps(
            move |_| {
                store.subscribe(Callback::from(move |_| dispatcher.dispatch(())));
                || ()
            },
            (),
        );
    }

    {
        let store = store.clone();
        let session = session.clone();
        let auth_status = auth_status.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    if let Session::Authenticated(user) = restore_session(store.api()).await {
                        session.dispatch(SessionAction::SetUser(user));
                    }
                    auth_status.set(AuthStatus::Ready);
                });
                || ()
            },
            (),
        );
    }

    let context = AppContext {
        store: store.clone(),
        session: session.clone(),
        settings,
        revision: revision.0,
    };

    {
        let context = context.clone();
        use_effect_with_deps(
            move |authenticated| {
                if *authenticated {
                    spawn_local(async move {
                        if let Err(error) = context.store.load_all().await {
                            context.report(&error);
                        }
                    });
                }
                || ()
            },
            session.is_authenticated(),
        );
    }

    if *auth_status == AuthStatus::Checking {
        return html! {
            <div class="min-h-screen flex items-center justify-center bg-background text-muted-foreground">
                {"Loading..."}
            </div>
        };
    }

    let content = if session.is_authenticated() {
        let on_select = {
            let active_page = active_page.clone();
            Callback::from(move |page: Page| active_page.set(page))
        };
        let page = match *active_page {
            Page::Dashboard => html! { <DashboardPage /> },
            Page::Accounts => html! { <AccountsPage /> },
            Page::Categories => html! { <CategoriesPage /> },
            Page::Transactions => html! { <TransactionsPage /> },
            Page::Budgets => html! { <BudgetsPage /> },
            Page::Goals => html! { <GoalsPage /> },
        };
        html! {
            <Layout active_page={*active_page} on_select={on_select}>
                { page }
            </Layout>
        }
    } else {
        html! { <AuthScreen /> }
    };

    html! {
        <ContextProvider<AppContext> context={context}>
            { content }
        </ContextProvider<AppContext>>
    }
}

fn page_shell(title: &'static str, actions: Html, children: Html) -> Html {
    html! {
        <div class="p-6 max-w-7xl mx-auto">
            <div class="flex items-center justify-between pb-4 border-b border-border">
                <h1 class="text-2xl font-bold text-foreground">{ title }</h1>
                { actions }
            </div>
            <div class="pt-5 space-y-6">
                { children }
            </div>
        </div>
    }
}

/// The page-level banner for the last failed bulk load or action.
fn error_banner(message: Option<&str>) -> Html {
    match message {
        Some(message) => html! {
            <div class="rounded-[10px] border border-red-200 bg-red-50 px-4 py-3 text-sm text-red-600">
                { message.to_string() }
            </div>
        },
        None => html! {},
    }
}

fn form_message(error: &Option<String>) -> Html {
    match error {
        Some(msg) => html! { <p class="text-sm text-red-500">{ msg.clone() }</p> },
        None => html! {},
    }
}

fn bind_input(state: &UseStateHandle<String>) -> Callback<InputEvent> {
    let state = state.clone();
    Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        state.set(input.value());
    })
}

fn bind_select(state: &UseStateHandle<String>) -> Callback<Event> {
    let state = state.clone();
    Callback::from(move |e: Event| {
        let select: HtmlSelectElement = e.target_unchecked_into();
        state.set(select.value());
    })
}

const INPUT_CLASS: &str = "w-full px-4 py-2 bg-input border border-input rounded-lg text-foreground focus:outline-none focus:ring-2 focus:ring-primary";
const PRIMARY_BUTTON_CLASS: &str = "flex items-center gap-2 bg-primary text-primary-foreground px-4 py-2 rounded-xl font-bold text-sm hover:opacity-90 transition-all";
const CARD_CLASS: &str = "bg-card rounded-[10px] p-6 border border-border";
