pub mod env {
    pub const PREFIX: &str = "WARDEN";
    pub const APP_ENVIRONMENT_ENV_VAR: &str = "APP_ENVIRONMENT";
    pub const CONFIG_DIR_ENV_VAR: &str = "WARDEN_CONFIG_DIR";
    pub const JWT_SECRET_ENV_VAR: &str = "JWT_SECRET";
    pub const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";
}

pub mod defaults {
    pub const APP_ADDRESS: &str = "0.0.0.0:3000";
    pub const APP_ENVIRONMENT: &str = "local";
    pub const CONFIG_DIR: &str = "config";

    pub const JWT_ISSUER: &str = "warden";
    pub const JWT_AUDIENCE: &str = "warden-clients";
    pub const ACCESS_TOKEN_TTL_SECONDS: i64 = 15 * 60;
    pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

    pub const HASH_MEMORY_KIB: u32 = 15000;
    pub const HASH_ITERATIONS: u32 = 2;
    pub const HASH_PARALLELISM: u32 = 1;

    pub const PG_MAX_CONNECTIONS: i64 = 5;
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";
    pub const JWT_SECRET: &str = "test-secret-with-at-least-thirty-two-bytes";
    pub const JWT_ISSUER: &str = "warden-test";
    pub const JWT_AUDIENCE: &str = "warden-test-clients";

    /// Cheap Argon2 parameters so test suites do not spend seconds hashing.
    pub const HASH_MEMORY_KIB: u32 = 1024;
    pub const HASH_ITERATIONS: u32 = 1;
    pub const HASH_PARALLELISM: u32 = 1;
}
