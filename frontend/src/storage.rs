//! Persisted credentials.
//!
//! The access and refresh tokens always travel together: they are written
//! together on login and removed together on logout or when the server
//! rejects the access token.

pub const ACCESS_TOKEN_KEY: &str = "access";
pub const REFRESH_TOKEN_KEY: &str = "refresh";

pub trait TokenStore {
    fn access_token(&self) -> Option<String>;

    fn refresh_token(&self) -> Option<String>;

    fn set_tokens(&self, access: &str, refresh: &str);

    fn clear(&self);

    fn has_access_token(&self) -> bool {
        self.access_token().is_some_and(|token| !token.is_empty())
    }
}

/// Tokens in the browser's `localStorage`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorageTokens;

impl LocalStorageTokens {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|window| window.local_storage().ok().flatten())
    }

    fn get(key: &str) -> Option<String> {
        Self::storage().and_then(|storage| storage.get_item(key).ok().flatten())
    }
}

impl TokenStore for LocalStorageTokens {
    fn access_token(&self) -> Option<String> {
        Self::get(ACCESS_TOKEN_KEY)
    }

    fn refresh_token(&self) -> Option<String> {
        Self::get(REFRESH_TOKEN_KEY)
    }

    fn set_tokens(&self, access: &str, refresh: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.set_item(ACCESS_TOKEN_KEY, access);
            let _ = storage.set_item(REFRESH_TOKEN_KEY, refresh);
        }
    }

    fn clear(&self) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(ACCESS_TOKEN_KEY);
            let _ = storage.remove_item(REFRESH_TOKEN_KEY);
        }
    }
}

/// Tokens held in memory for tests.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryTokens {
    tokens: std::cell::RefCell<Option<(String, String)>>,
}

#[cfg(test)]
impl MemoryTokens {
    pub fn with_tokens(access: &str, refresh: &str) -> Self {
        Self {
            tokens: std::cell::RefCell::new(Some((access.to_string(), refresh.to_string()))),
        }
    }
}

#[cfg(test)]
impl TokenStore for MemoryTokens {
    fn access_token(&self) -> Option<String> {
        self.tokens.borrow().as_ref().map(|(access, _)| access.clone())
    }

    fn refresh_token(&self) -> Option<String> {
        self.tokens.borrow().as_ref().map(|(_, refresh)| refresh.clone())
    }

    fn set_tokens(&self, access: &str, refresh: &str) {
        *self.tokens.borrow_mut() = Some((access.to_string(), refresh.to_string()));
    }

    fn clear(&self) {
        *self.tokens.borrow_mut() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryTokens, TokenStore};

    #[test]
    fn tokens_are_set_and_cleared_together() {
        let tokens = MemoryTokens::default();
        assert!(!tokens.has_access_token());

        tokens.set_tokens("a1", "r1");
        assert_eq!(tokens.access_token().as_deref(), Some("a1"));
        assert_eq!(tokens.refresh_token().as_deref(), Some("r1"));

        tokens.clear();
        assert_eq!(tokens.access_token(), None);
        assert_eq!(tokens.refresh_token(), None);
    }

    #[test]
    fn empty_access_token_does_not_count() {
        let tokens = MemoryTokens::with_tokens("", "r1");

        assert!(!tokens.has_access_token());
    }
}
