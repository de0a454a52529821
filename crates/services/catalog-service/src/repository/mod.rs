//! Repository layer for data access.

mod context;
pub mod entities;
mod generic_repository;
mod query;
mod stored;

pub use context::StoreContext;
pub use generic_repository::{Change, GenericRepository, Repository};
pub use query::{EntitySelect, ProjectedSelect};
pub use stored::{ColumnOf, StoredEntity};
