use crate::config::AccessSettings;

/// The request headers an [`AccessPolicy`] gets to look at.
#[derive(Debug, Clone, Copy)]
pub struct RequestInfo<'a> {
    pub host: &'a str,
    pub origin: &'a str,
    pub path: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Forward,
    Deny,
}

/// Decides whether a request may reach the router.
///
/// This sorts traffic by deployment topology. It is not authentication: any client can set
/// its own `Host` and `Origin`.
pub trait AccessPolicy: Send + Sync {
    fn decide(&self, request: &RequestInfo<'_>) -> Access;
}

/// Hides admin paths from the public app domain.
///
/// Admin-only paths are never served through the public host. Protected API paths are
/// served through it only to requests whose `Origin` belongs to the admin host.
#[derive(Debug, Clone)]
pub struct HostOriginPolicy {
    public_host: String,
    admin_host: String,
    admin_paths: Vec<String>,
    protected_api_paths: Vec<String>,
}

impl HostOriginPolicy {
    pub fn new(
        public_host: impl Into<String>,
        admin_host: impl Into<String>,
        admin_paths: Vec<String>,
        protected_api_paths: Vec<String>,
    ) -> Self {
        Self {
            public_host: public_host.into().to_lowercase(),
            admin_host: admin_host.into().to_lowercase(),
            admin_paths,
            protected_api_paths,
        }
    }
}

impl From<AccessSettings> for HostOriginPolicy {
    fn from(settings: AccessSettings) -> Self {
        Self::new(
            settings.public_host,
            settings.admin_host,
            settings.admin_paths,
            settings.protected_api_paths,
        )
    }
}

fn matches_any(path: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| {
        path == prefix
            || path
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

impl AccessPolicy for HostOriginPolicy {
    fn decide(&self, request: &RequestInfo<'_>) -> Access {
        if !request.host.to_lowercase().contains(&self.public_host) {
            return Access::Forward;
        }

        if matches_any(request.path, &self.admin_paths) {
            return Access::Deny;
        }

        if matches_any(request.path, &self.protected_api_paths)
            && !request.origin.to_lowercase().contains(&self.admin_host)
        {
            return Access::Deny;
        }

        Access::Forward
    }
}
