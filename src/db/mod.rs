pub mod error;
pub mod memory_store;
pub mod models;
pub mod mongo_store;
pub mod services;
pub mod store;

pub use error::StoreError;
pub use memory_store::MemoryStore;
pub use mongo_store::MongoStore;
pub use store::{Collection, DocumentStore};
