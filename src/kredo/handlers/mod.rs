pub mod health;
pub use self::health::health;

pub mod root;
pub use self::root::root;

pub mod create_user;
pub use self::create_user::create_user;

pub mod login;
pub use self::login::login;

// common request payload for the handlers
use secrecy::SecretString;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(ToSchema, Deserialize, Debug)]
pub struct UserRequest {
    pub username: String,
    // Debug prints REDACTED instead of the plaintext
    #[schema(value_type = String)]
    pub password: SecretString,
}
