mod auth;

pub use self::auth::catch_token;
