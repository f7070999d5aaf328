use url::Url;

/// Wildcard tenant accepted by the multi-tenant login endpoints.
pub const COMMON_TENANT: &str = "common";

/// Default authority hosting the tenant-scoped endpoints.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Scopes requested by default during the authorization step.
pub const DEFAULT_SCOPES: &[&str] = &["openid", "profile", "user_impersonation"];

/// Typed provider configuration, constructed once per provider instance and
/// shared by reference across all components.
///
/// Replaces a string-keyed settings lookup with named, typed fields: the
/// tenant id defaults to the wildcard [`COMMON_TENANT`] when unset, and the
/// optional `resource` field enables the provider-specific resource-scoped
/// token extension.
#[derive(Debug, Clone)]
pub struct TenantConfig {
    /// Directory (tenant) id. `None` means "any tenant".
    pub tenant_id: Option<String>,
    /// Application (client) id; also the audience expected in identity tokens.
    pub client_id: String,
    /// Application client secret.
    pub client_secret: String,
    /// Optional resource identifier for resource-scoped access tokens.
    pub resource: Option<String>,
    /// Base URL of the identity provider. Overridable for sovereign clouds
    /// and for tests; defaults to [`DEFAULT_AUTHORITY`]. Must be a URL that
    /// can serve as a base (tenant and endpoint path segments are appended
    /// to it); [`TenantConfig::with_authority`] enforces this.
    pub authority: Url,
}

impl TenantConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            tenant_id: None,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            resource: None,
            // The default authority is a valid constant URL.
            authority: Url::parse(DEFAULT_AUTHORITY).expect("default authority url"),
        }
    }

    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    /// Replaces the identity provider's base URL.
    ///
    /// # Panics
    ///
    /// Panics if `authority` cannot serve as a base URL (e.g. a `mailto:`
    /// URL), since endpoint paths could never be appended to it.
    pub fn with_authority(mut self, authority: Url) -> Self {
        assert!(
            !authority.cannot_be_a_base(),
            "authority must be a base URL, got {authority}"
        );
        self.authority = authority;
        self
    }

    /// The tenant id used when building endpoint URLs, falling back to the
    /// wildcard tenant when unconfigured.
    pub fn tenant_id(&self) -> &str {
        self.tenant_id.as_deref().unwrap_or(COMMON_TENANT)
    }
}
