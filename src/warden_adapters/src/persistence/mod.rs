pub mod hashmap_account_store;
pub mod hashmap_refresh_token_store;
pub mod postgres_account_store;
pub mod postgres_refresh_token_store;
