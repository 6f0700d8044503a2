use error::Error;

pub mod auth;
pub mod error;
pub mod upn;

pub const NOT_FOUND_MESSAGE: &str = "User Not Found";

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
pub(crate) mod tests {
    pub const LOCAL_ACCOUNT: &str = "upn-reader";
    pub const LOCAL_API_KEY: &str = "local-api-key-8c1e";
    pub const ACCOUNT_ID: &str = "5b10ac8d82e05b22cc7d4ef5";
}
