pub mod db;
pub mod sqlite_store;
pub mod store;

pub use sqlite_store::SqliteDataStore;
pub use store::{DataFetchError, DataStore};
