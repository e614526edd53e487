pub mod builder;
pub mod dbs;
pub mod error;
pub mod models;
pub mod trait_client;

pub use builder::SupabaseStoreBuilder;
pub use dbs::memory::InMemoryProjectStore;
#[cfg(feature = "supabase")]
pub use dbs::supabase::SupabaseProjectStore;
pub use error::{PersistError, Result};
pub use models::{Project, ProjectRoutes};
pub use trait_client::ProjectStore;
