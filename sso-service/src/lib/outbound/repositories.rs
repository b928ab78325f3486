pub mod apps;
pub mod credentials;
pub mod in_memory;

pub use apps::PostgresAppRegistry;
pub use credentials::PostgresCredentialStore;
pub use in_memory::InMemoryAppRegistry;
pub use in_memory::InMemoryCredentialStore;
