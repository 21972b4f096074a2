//! The client-side mirror of the user's collections.
//!
//! Every mutation goes through the API first and only touches the cache once
//! the server has answered successfully, so a failed call leaves the cache as
//! it was. Borrows of the cache never span an `.await`.

use std::cell::{Ref as CacheRef, RefCell};

use tracing::{info, warn};
use yew::Callback;

use crate::{
    api::ApiClient,
    error::ApiError,
    http::Transport,
    models::{
        Account, Budget, Category, FollowUp, Goal, Ref, Resource, Transaction, TransactionFilters,
    },
    storage::TokenStore,
    summary::{self, BudgetProgress},
};

/// Cached collections plus the outcome of the last bulk load.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cache {
    pub accounts: Vec<Account>,
    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<Budget>,
    /// Budgets for the present calendar month, as reported by the server.
    pub current_budgets: Vec<Budget>,
    pub goals: Vec<Goal>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Cache {
    pub fn has_account(&self) -> bool {
        !self.accounts.is_empty()
    }

    pub fn budget_progress(&self, budget_id: i64) -> BudgetProgress {
        summary::budget_progress(self, budget_id)
    }

    /// The display name for a category reference, whichever form it came in.
    pub fn category_name(&self, category: &Ref<Category>) -> Option<String> {
        category
            .expanded()
            .or_else(|| self.categories.iter().find(|c| c.id == category.id()))
            .map(|c| c.name.clone())
    }

    pub fn account_name(&self, account: &Ref<Account>) -> Option<String> {
        account
            .expanded()
            .or_else(|| self.accounts.iter().find(|a| a.id == account.id()))
            .map(|a| a.name.clone())
    }
}

fn replace_by_id<R: Resource>(items: &mut [R], item: &R) {
    let id = item.id();
    for slot in items.iter_mut().filter(|slot| slot.id() == id) {
        *slot = item.clone();
    }
}

/// Shared by every view through the app context.
pub struct DataStore<T, S> {
    api: ApiClient<T, S>,
    cache: RefCell<Cache>,
    listener: RefCell<Option<Callback<()>>>,
}

impl<T: Transport, S: TokenStore> DataStore<T, S> {
    pub fn new(api: ApiClient<T, S>) -> Self {
        Self {
            api,
            cache: RefCell::new(Cache::default()),
            listener: RefCell::new(None),
        }
    }

    pub fn api(&self) -> &ApiClient<T, S> {
        &self.api
    }

    pub fn cache(&self) -> CacheRef<'_, Cache> {
        self.cache.borrow()
    }

    /// Register the callback fired after every cache change. Replaces any
    /// earlier listener.
    pub fn subscribe(&self, listener: Callback<()>) {
        *self.listener.borrow_mut() = Some(listener);
    }

    fn update(&self, apply: impl FnOnce(&mut Cache)) {
        apply(&mut self.cache.borrow_mut());

        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener.emit(());
        }
    }

    /// Fetch all six collections at once and commit them together.
    ///
    /// If any fetch fails nothing is replaced: the previous contents stay and
    /// the error message is recorded in [Cache::error].
    pub async fn load_all(&self) -> Result<(), ApiError> {
        self.update(|cache| {
            cache.loading = true;
            cache.error = None;
        });

        let filters = TransactionFilters::default();
        let fetched = futures::try_join!(
            self.api.list::<Account>(),
            self.api.list::<Category>(),
            self.api.list_transactions(&filters),
            self.api.list::<Budget>(),
            self.api.list_current_budgets(),
            self.api.list::<Goal>(),
        );

        match fetched {
            Ok((accounts, categories, transactions, budgets, current_budgets, goals)) => {
                info!(
                    accounts = accounts.len(),
                    transactions = transactions.len(),
                    budgets = budgets.len(),
                    "loaded all collections"
                );
                self.update(|cache| {
                    cache.accounts = accounts;
                    cache.categories = categories;
                    cache.transactions = transactions;
                    cache.budgets = budgets;
                    cache.current_budgets = current_budgets;
                    cache.goals = goals;
                    cache.loading = false;
                });
                Ok(())
            }
            Err(error) => {
                warn!(%error, "bulk load failed, keeping cached data");
                let message = error.to_string();
                self.update(|cache| {
                    cache.loading = false;
                    cache.error = Some(message);
                });
                Err(error)
            }
        }
    }

    pub async fn refresh<R: Resource>(&self) -> Result<(), ApiError> {
        let items = self.api.list::<R>().await?;
        self.update(|cache| *R::cached_mut(cache) = items);
        Ok(())
    }

    pub async fn refresh_transactions(&self, filters: &TransactionFilters) -> Result<(), ApiError> {
        let transactions = self.api.list_transactions(filters).await?;
        self.update(|cache| cache.transactions = transactions);
        Ok(())
    }

    pub async fn refresh_current_budgets(&self) -> Result<(), ApiError> {
        let current_budgets = self.api.list_current_budgets().await?;
        self.update(|cache| cache.current_budgets = current_budgets);
        Ok(())
    }

    /// The server's copy. The cache is left alone.
    pub async fn get<R: Resource>(&self, id: i64) -> Result<R, ApiError> {
        self.api.retrieve::<R>(id).await
    }

    /// Create on the server, append the returned entry, then re-fetch
    /// whatever the creation changed server-side.
    pub async fn add<R: Resource>(&self, payload: &R::Create) -> Result<R, ApiError> {
        let created = self.api.create::<R>(payload).await?;
        self.update(|cache| R::cached_mut(cache).push(created.clone()));

        self.follow_up(created.follow_up()).await?;
        Ok(created)
    }

    async fn follow_up(&self, follow_up: FollowUp) -> Result<(), ApiError> {
        if follow_up.accounts {
            self.refresh::<Account>().await?;
        }
        if follow_up.transactions {
            self.refresh_transactions(&TransactionFilters::default())
                .await?;
        }
        if follow_up.current_budgets {
            self.refresh_current_budgets().await?;
        }
        Ok(())
    }

    /// Partial update.
    pub async fn edit<R: Resource>(&self, id: i64, patch: &R::Patch) -> Result<R, ApiError> {
        let updated = self.api.update::<R>(id, patch).await?;
        self.store_updated(&updated);
        Ok(updated)
    }

    /// Full replace.
    pub async fn replace<R: Resource>(&self, id: i64, payload: &R::Create) -> Result<R, ApiError> {
        let updated = self.api.replace::<R>(id, payload).await?;
        self.store_updated(&updated);
        Ok(updated)
    }

    fn store_updated<R: Resource>(&self, updated: &R) {
        self.update(|cache| {
            replace_by_id(R::cached_mut(cache), updated);
            if let Some(mirror) = R::mirror_mut(cache) {
                replace_by_id(mirror, updated);
            }
        });
    }

    pub async fn remove<R: Resource>(&self, id: i64) -> Result<(), ApiError> {
        self.api.delete::<R>(id).await?;
        self.update(|cache| {
            R::cached_mut(cache).retain(|item| item.id() != id);
            if let Some(mirror) = R::mirror_mut(cache) {
                mirror.retain(|item| item.id() != id);
            }
        });
        Ok(())
    }

    /// Forget every cached collection.
    pub fn clear(&self) {
        self.update(|cache| *cache = Cache::default());
    }

    /// Drop credentials and cached data.
    pub fn logout(&self) {
        self.api.logout();
        self.clear();
    }
}
