use crate::error::Result;
use crate::link::Link;
use async_trait::async_trait;
use tracing::warn;

/// Parameters for allocating a short link.
#[derive(Debug, Clone, Default)]
pub struct AllocateParams {
    /// The URL the short code should redirect to.
    pub target_url: String,
    /// Optional caller-chosen code. A random code is generated when absent.
    pub desired_code: Option<String>,
}

impl AllocateParams {
    /// Allocate with a generated code.
    pub fn new(target_url: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            desired_code: None,
        }
    }

    /// Allocate with a caller-chosen code.
    pub fn with_code(target_url: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            target_url: target_url.into(),
            desired_code: Some(code.into()),
        }
    }
}

/// The boundary API the HTTP layer calls.
///
/// Codes are accepted as raw strings: a string that cannot be a short code
/// is reported as `NotFound` by lookups rather than as a format error.
#[async_trait]
pub trait Registry: Send + Sync + 'static {
    /// Creates a link for the target URL and returns the stored record.
    async fn allocate(&self, params: AllocateParams) -> Result<Link>;

    /// Looks a link up by code.
    async fn resolve(&self, code: &str) -> Result<Link>;

    /// Lists every link, newest first.
    async fn list(&self) -> Result<Vec<Link>>;

    /// Permanently removes a link.
    async fn remove(&self, code: &str) -> Result<()>;

    /// Records one redirect for the code. Unknown codes are ignored.
    async fn record_click(&self, code: &str) -> Result<()>;

    /// Resolves a code for a redirect and then records the click.
    ///
    /// The two steps are not atomic: if recording the click fails the
    /// redirect still succeeds and the click is lost.
    async fn visit(&self, code: &str) -> Result<Link> {
        let link = self.resolve(code).await?;
        if let Err(err) = self.record_click(code).await {
            warn!(code = %code, error = %err, "failed to record click");
        }
        Ok(link)
    }
}
