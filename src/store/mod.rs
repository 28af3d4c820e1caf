//! Content store backends.

pub mod memory;
pub mod postgres;

pub use self::memory::MemoryContentStore;
pub use self::postgres::PgContentStore;

use crate::gate::{ContentStore, PostId};
use anyhow::Result;

/// Backend selected at startup.
#[derive(Debug, Clone)]
pub enum Store {
    Postgres(PgContentStore),
    Memory(MemoryContentStore),
}

impl Store {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }
}

impl ContentStore for Store {
    async fn random_published(&self) -> Result<Option<PostId>> {
        match self {
            Self::Postgres(store) => store.random_published().await,
            Self::Memory(store) => store.random_published().await,
        }
    }

    async fn ping(&self) -> Result<()> {
        match self {
            Self::Postgres(store) => store.ping().await,
            Self::Memory(store) => store.ping().await,
        }
    }
}
