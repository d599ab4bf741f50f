//! Fetch Module
//!
//! Resource fetchers: the operations an [`InstrumentedCache`] wraps.
//!
//! [`InstrumentedCache`]: crate::instrument::InstrumentedCache

mod func;
mod http;

use std::sync::Arc;

use async_trait::async_trait;

pub use func::FnFetcher;
pub use http::{HttpFetcher, PAGE_OPERATION};

// == Resource Fetcher Trait ==
/// A named operation that produces the content of a resource.
///
/// The name identifies the operation in call counters and histories.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Operation identity.
    fn name(&self) -> &str;

    /// Produces the content for `identity`. May be slow or fail.
    async fn fetch(&self, identity: &str) -> anyhow::Result<String>;
}

#[async_trait]
impl<T: ResourceFetcher + ?Sized> ResourceFetcher for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn fetch(&self, identity: &str) -> anyhow::Result<String> {
        (**self).fetch(identity).await
    }
}
