use serde::Deserialize;

pub use ratingsapp_auth::TokenPair;

/// Form body of `POST /oauth/token/`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TokenRequest {
    pub grant_type: String,
    pub email: String,
    pub password: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantType {
    Password,
    RefreshToken,
}

impl TokenRequest {
    pub fn grant(&self) -> Option<GrantType> {
        match self.grant_type.as_str() {
            "password" => Some(GrantType::Password),
            "refresh_token" => Some(GrantType::RefreshToken),
            _ => None,
        }
    }
}
