//! Who is logged in.

use std::rc::Rc;

use tracing::{info, warn};
use yew::Reducible;

use crate::{
    api::ApiClient, error::ApiError, http::Transport, models::{LoginRequest, UserInfo},
    storage::TokenStore,
};

/// At most one identity. Starts `Anonymous`; there is no terminal state.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(UserInfo),
}

pub enum SessionAction {
    SetUser(UserInfo),
    Logout,
}

impl Session {
    pub fn user(&self) -> Option<&UserInfo> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated(user) => Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    pub fn set_user(&mut self, user: UserInfo) {
        *self = Session::Authenticated(user);
    }

    pub fn logout(&mut self) {
        *self = Session::Anonymous;
    }
}

impl Reducible for Session {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            SessionAction::SetUser(user) => next.set_user(user),
            SessionAction::Logout => next.logout(),
        }
        Rc::new(next)
    }
}

/// Rebuild the session from a stored access token, if any.
///
/// Any failure to identify the user clears the stored tokens.
pub async fn restore_session<T: Transport, S: TokenStore>(api: &ApiClient<T, S>) -> Session {
    if !api.tokens().has_access_token() {
        return Session::Anonymous;
    }

    match api.me().await {
        Ok(user) => {
            info!(username = %user.username, "session restored");
            Session::Authenticated(user)
        }
        Err(error) => {
            warn!(%error, "could not restore session");
            api.tokens().clear();
            Session::Anonymous
        }
    }
}

/// Log in and return the identity to store in the session.
pub async fn log_in<T: Transport, S: TokenStore>(
    api: &ApiClient<T, S>,
    request: &LoginRequest,
) -> Result<UserInfo, ApiError> {
    api.login(request).await.map(|response| response.user())
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use futures::executor::block_on;
    use yew::Reducible;

    use super::{log_in, restore_session, Session, SessionAction};
    use crate::{
        api::ApiClient,
        error::ApiError,
        models::{LoginRequest, UserInfo},
        storage::{MemoryTokens, TokenStore},
        test_utils::{FakeServer, ACCESS_TOKEN, PASSWORD, REFRESH_TOKEN, USERNAME},
    };

    fn user() -> UserInfo {
        UserInfo {
            id: 1,
            email: "joy@example.com".to_string(),
            username: USERNAME.to_string(),
        }
    }

    #[test]
    fn cycles_between_anonymous_and_authenticated() {
        let session = Rc::new(Session::default());
        assert!(!session.is_authenticated());

        let session = session.reduce(SessionAction::SetUser(user()));
        assert_eq!(session.user(), Some(&user()));

        let session = session.reduce(SessionAction::Logout);
        assert_eq!(*session, Session::Anonymous);

        let session = session.reduce(SessionAction::SetUser(user()));
        assert!(session.is_authenticated());
    }

    #[test]
    fn set_user_replaces_unconditionally() {
        let mut session = Session::Authenticated(user());
        let other = UserInfo {
            id: 2,
            email: "sam@example.com".to_string(),
            username: "sam".to_string(),
        };

        session.set_user(other.clone());

        assert_eq!(session.user(), Some(&other));
    }

    #[test]
    fn restores_from_valid_token() {
        let api = ApiClient::new(
            FakeServer::new(),
            MemoryTokens::with_tokens(ACCESS_TOKEN, REFRESH_TOKEN),
        );

        let session = block_on(restore_session(&api));

        assert_eq!(session, Session::Authenticated(user()));
    }

    #[test]
    fn failed_restore_clears_tokens() {
        let api = ApiClient::new(
            FakeServer::new(),
            MemoryTokens::with_tokens(ACCESS_TOKEN, REFRESH_TOKEN),
        );
        api.transport().fail_path("auth/me/", 502);

        let session = block_on(restore_session(&api));

        assert_eq!(session, Session::Anonymous);
        assert_eq!(api.tokens().access_token(), None);
        assert_eq!(api.tokens().refresh_token(), None);
    }

    #[test]
    fn no_token_means_no_request() {
        let api = ApiClient::new(FakeServer::new(), MemoryTokens::default());

        let session = block_on(restore_session(&api));

        assert_eq!(session, Session::Anonymous);
        assert!(api.transport().requests().is_empty());
    }

    #[test]
    fn log_in_returns_identity() {
        let api = ApiClient::new(FakeServer::new(), MemoryTokens::default());

        let got = block_on(log_in(
            &api,
            &LoginRequest {
                username: USERNAME.to_string(),
                password: PASSWORD.to_string(),
            },
        ));
        let wrong = block_on(log_in(
            &api,
            &LoginRequest {
                username: "nobody".to_string(),
                password: PASSWORD.to_string(),
            },
        ));

        assert_eq!(got, Ok(user()));
        assert_eq!(wrong, Err(ApiError::InvalidCredentials));
    }
}
