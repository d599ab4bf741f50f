//! Closure-backed fetcher.

use std::fmt;

use async_trait::async_trait;

use super::ResourceFetcher;

/// Adapts a plain function into a [`ResourceFetcher`].
pub struct FnFetcher<F> {
    name: String,
    f: F,
}

impl<F> FnFetcher<F>
where
    F: Fn(&str) -> anyhow::Result<String> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> fmt::Debug for FnFetcher<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFetcher").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<F> ResourceFetcher for FnFetcher<F>
where
    F: Fn(&str) -> anyhow::Result<String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch(&self, identity: &str) -> anyhow::Result<String> {
        (self.f)(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fn_fetcher_calls_function() {
        let fetcher = FnFetcher::new("upper", |id: &str| Ok(id.to_uppercase()));

        assert_eq!(fetcher.name(), "upper");
        assert_eq!(fetcher.fetch("abc").await.unwrap(), "ABC");
    }

    #[tokio::test]
    async fn test_fn_fetcher_propagates_error() {
        let fetcher = FnFetcher::new("broken", |id: &str| -> anyhow::Result<String> {
            anyhow::bail!("no resource named {}", id)
        });

        let err = fetcher.fetch("x").await.unwrap_err();
        assert_eq!(err.to_string(), "no resource named x");
    }
}
