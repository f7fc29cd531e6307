use thiserror::Error;
use tracing::warn;

use crate::core::config::UserConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Viewer,
}

impl Role {
    pub fn from_id(id: &str) -> Option<Self> {
        match id.to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "viewer" | "user" => Some(Self::Viewer),
            _ => None,
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,
    #[error("Invalid bearer token")]
    InvalidToken,
    #[error("Admin access required")]
    NotAdmin,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub uid: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
struct TokenEntry {
    uid: String,
    token: String,
    role: Role,
}

/// Resolves bearer tokens against the users listed in the config file.
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    users: Vec<TokenEntry>,
}

impl Authenticator {
    /// Users with an empty token or an unknown role are skipped.
    pub fn new(users: &[UserConfig]) -> Self {
        let users = users
            .iter()
            .filter(|u| !u.token.is_empty())
            .filter_map(|u| match Role::from_id(&u.role) {
                Some(role) => Some(TokenEntry {
                    uid: u.uid.clone(),
                    token: u.token.clone(),
                    role,
                }),
                None => {
                    warn!("Ignoring user '{}' with unknown role '{}'", u.uid, u.role);
                    None
                }
            })
            .collect();
        Self { users }
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    /// Resolve the caller from the raw `Authorization` header value.
    pub fn authenticate(&self, authorization: Option<&str>) -> Result<AuthUser, AuthError> {
        let token = authorization
            .and_then(bearer_token)
            .ok_or(AuthError::MissingToken)?;

        let user = self
            .users
            .iter()
            .find(|u| constant_time_eq(u.token.as_bytes(), token.as_bytes()))
            .ok_or(AuthError::InvalidToken)?;

        Ok(AuthUser {
            uid: user.uid.clone(),
            role: user.role,
        })
    }

    /// Like [`Self::authenticate`], but rejects non-admin callers.
    pub fn require_admin(&self, authorization: Option<&str>) -> Result<AuthUser, AuthError> {
        let user = self.authenticate(authorization)?;
        if user.role != Role::Admin {
            return Err(AuthError::NotAdmin);
        }
        Ok(user)
    }
}

/// Extract the token from a `Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> Vec<UserConfig> {
        vec![
            UserConfig {
                uid: "alice".to_string(),
                token: "admin-token".to_string(),
                role: "admin".to_string(),
            },
            UserConfig {
                uid: "bob".to_string(),
                token: "viewer-token".to_string(),
                role: "viewer".to_string(),
            },
            UserConfig {
                uid: "ghost".to_string(),
                token: String::new(),
                role: "admin".to_string(),
            },
            UserConfig {
                uid: "mallory".to_string(),
                token: "odd-token".to_string(),
                role: "root".to_string(),
            },
        ]
    }

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer   abc  "), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc"), None);
    }

    #[test]
    fn missing_header_is_missing_token() {
        let auth = Authenticator::new(&users());
        assert_eq!(auth.authenticate(None), Err(AuthError::MissingToken));
        assert_eq!(auth.authenticate(Some("Token x")), Err(AuthError::MissingToken));
    }

    #[test]
    fn unknown_token_is_invalid() {
        let auth = Authenticator::new(&users());
        assert_eq!(
            auth.authenticate(Some("Bearer nope")),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn admin_passes_require_admin() {
        let auth = Authenticator::new(&users());
        let user = auth.require_admin(Some("Bearer admin-token")).unwrap();
        assert_eq!(user.uid, "alice");
        assert_eq!(user.role, Role::Admin);
    }

    #[test]
    fn viewer_is_rejected_by_require_admin() {
        let auth = Authenticator::new(&users());
        assert!(auth.authenticate(Some("Bearer viewer-token")).is_ok());
        assert_eq!(
            auth.require_admin(Some("Bearer viewer-token")),
            Err(AuthError::NotAdmin)
        );
    }

    #[test]
    fn users_without_token_never_match() {
        let auth = Authenticator::new(&users());
        assert_eq!(auth.authenticate(Some("Bearer ")), Err(AuthError::MissingToken));
    }

    #[test]
    fn unknown_roles_are_skipped() {
        let auth = Authenticator::new(&users());
        assert_eq!(auth.user_count(), 2);
        assert_eq!(
            auth.authenticate(Some("Bearer odd-token")),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn role_from_id() {
        assert_eq!(Role::from_id("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::from_id("user"), Some(Role::Viewer));
        assert_eq!(Role::from_id("root"), None);
    }
}
