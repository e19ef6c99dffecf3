use async_trait::async_trait;
use std::sync::Arc;
use tinylink_core::{
    AllocateParams, Link, LinkStore, Registry, RegistryError, ShortCode, StorageError,
};
use tinylink_generator::Generator;
use tracing::{debug, info, trace, warn};
use url::Url;

/// How many generated codes are tried before allocation gives up.
pub const MAX_GENERATION_ATTEMPTS: usize = 10;

type Result<T> = std::result::Result<T, RegistryError>;

/// A concrete implementation of the [`Registry`] trait.
///
/// This service wraps a [`LinkStore`] and a [`Generator`] to handle:
/// - URL and short code validation
/// - Caller-chosen codes, rejected when already taken
/// - Generated codes, retried on collision up to [`MAX_GENERATION_ATTEMPTS`]
///
/// Uniqueness is always decided by the store's `create`; the existence check
/// for caller-chosen codes only produces an early, friendlier error.
#[derive(Debug)]
pub struct LinkRegistry<S, G> {
    store: Arc<S>,
    generator: Arc<G>,
}

impl<S, G> Clone for LinkRegistry<S, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            generator: Arc::clone(&self.generator),
        }
    }
}

impl<S: LinkStore, G: Generator> LinkRegistry<S, G> {
    /// Creates a registry that owns the store.
    pub fn new(store: S, generator: G) -> Self {
        Self::with_shared_store(Arc::new(store), generator)
    }

    /// Creates a registry over a store that other components also hold.
    pub fn with_shared_store(store: Arc<S>, generator: G) -> Self {
        Self {
            store,
            generator: Arc::new(generator),
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Validates that the target is an absolute http(s) URL with a host.
    fn validate_url(target_url: &str) -> Result<()> {
        if target_url.is_empty() {
            return Err(RegistryError::InvalidUrl(
                "URL cannot be empty".to_string(),
            ));
        }

        // The parser silently strips tabs and newlines, so the raw string is
        // checked before it is stored as given.
        if target_url
            .chars()
            .any(|c| c.is_ascii_control() || c.is_whitespace())
        {
            return Err(RegistryError::InvalidUrl(format!(
                "URL must not contain whitespace or control characters: {:?}",
                target_url
            )));
        }

        let parsed = Url::parse(target_url)
            .map_err(|e| RegistryError::InvalidUrl(format!("{}: {e}", target_url)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(RegistryError::InvalidUrl(format!(
                "URL scheme must be http or https: {}",
                parsed.scheme()
            )));
        }

        let has_authority = target_url
            .get(parsed.scheme().len()..)
            .is_some_and(|rest| rest.starts_with("://"));
        if !has_authority {
            return Err(RegistryError::InvalidUrl(format!(
                "URL must be absolute with '//' after the scheme: {}",
                target_url
            )));
        }

        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(RegistryError::InvalidUrl(format!(
                "URL must have a host: {}",
                target_url
            )));
        }

        Ok(())
    }

    async fn allocate_custom(&self, target_url: &str, desired: String) -> Result<Link> {
        let code = ShortCode::new(desired)?;

        if self.store.exists(&code).await? {
            return Err(RegistryError::CodeTaken(code.to_string()));
        }

        match self.store.create(&code, target_url).await {
            Ok(link) => {
                info!(code = %link.code, target_url = %link.target_url, "allocated custom short code");
                Ok(link)
            }
            // Lost a race with a concurrent allocation of the same code.
            Err(StorageError::Conflict(_)) => Err(RegistryError::CodeTaken(code.to_string())),
            Err(err) => Err(err.into()),
        }
    }

    async fn allocate_generated(&self, target_url: &str) -> Result<Link> {
        for attempt in 1..=MAX_GENERATION_ATTEMPTS {
            let code: ShortCode = self.generator.generate().into();

            match self.store.create(&code, target_url).await {
                Ok(link) => {
                    info!(code = %link.code, target_url = %link.target_url, attempt, "allocated short code");
                    return Ok(link);
                }
                Err(StorageError::Conflict(_)) => {
                    debug!(code = %code, attempt, "generated short code collided");
                }
                Err(err) => return Err(err.into()),
            }
        }

        warn!(
            attempts = MAX_GENERATION_ATTEMPTS,
            "short code generation exhausted"
        );
        Err(RegistryError::GenerationExhausted {
            attempts: MAX_GENERATION_ATTEMPTS,
        })
    }

    /// Parses a code received from a caller for a lookup. Strings that can
    /// never be stored codes are reported as missing.
    fn lookup_code(code: &str) -> Result<ShortCode> {
        ShortCode::new(code).map_err(|_| RegistryError::NotFound(code.to_string()))
    }
}

#[async_trait]
impl<S: LinkStore, G: Generator> Registry for LinkRegistry<S, G> {
    async fn allocate(&self, params: AllocateParams) -> Result<Link> {
        Self::validate_url(&params.target_url)?;

        // An empty desired code means none was supplied.
        match params.desired_code.filter(|code| !code.is_empty()) {
            Some(desired) => self.allocate_custom(&params.target_url, desired).await,
            None => self.allocate_generated(&params.target_url).await,
        }
    }

    async fn resolve(&self, code: &str) -> Result<Link> {
        trace!(code = %code, "resolving short code");

        let short_code = Self::lookup_code(code)?;
        self.store
            .get(&short_code)
            .await?
            .ok_or_else(|| RegistryError::NotFound(code.to_string()))
    }

    async fn list(&self) -> Result<Vec<Link>> {
        Ok(self.store.list().await?)
    }

    async fn remove(&self, code: &str) -> Result<()> {
        let short_code = Self::lookup_code(code)?;

        if self.store.delete(&short_code).await? {
            info!(code = %code, "removed short code");
            Ok(())
        } else {
            Err(RegistryError::NotFound(code.to_string()))
        }
    }

    async fn record_click(&self, code: &str) -> Result<()> {
        let Ok(short_code) = ShortCode::new(code) else {
            return Ok(());
        };

        match self.store.increment_click(&short_code).await? {
            Some(at) => trace!(code = %code, at = %at, "recorded click"),
            None => debug!(code = %code, "click for unknown short code ignored"),
        }
        Ok(())
    }
}
