use crate::gate::{ContentStore, PostId};
use anyhow::Result;
use rand::seq::SliceRandom;
use std::future::{ready, Future};

/// Fixed set of published posts held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    published: Vec<PostId>,
}

impl MemoryContentStore {
    #[must_use]
    pub fn new(published: impl IntoIterator<Item = PostId>) -> Self {
        Self {
            published: published.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.published.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.published.is_empty()
    }
}

impl ContentStore for MemoryContentStore {
    fn random_published(&self) -> impl Future<Output = Result<Option<PostId>>> + Send {
        let choice = self.published.choose(&mut rand::thread_rng()).copied();
        ready(Ok(choice))
    }

    fn ping(&self) -> impl Future<Output = Result<()>> + Send {
        ready(Ok(()))
    }
}
