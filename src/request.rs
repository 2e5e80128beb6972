//! Inbound request context.
//!
//! When the binary is started by a webserver through CGI, the request is
//! described by environment variables. [`RequestContext`] captures them
//! once at startup; everything downstream receives it explicitly.

use serde::Serialize;

/// CGI variables describing the request that started this process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestContext {
    /// `HTTP_HOST`: host (and port) the client addressed.
    pub host: Option<String>,
    /// `HTTP_USER_AGENT`: client identity.
    pub user_agent: Option<String>,
    /// `SERVER_SOFTWARE`: webserver name and version.
    pub server_software: Option<String>,
    /// `SERVER_PORT`: port the request arrived on.
    pub server_port: Option<String>,
    /// `SCRIPT_NAME`: URL path of this program.
    pub script_name: Option<String>,
}

impl RequestContext {
    /// Read the request from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the request through a custom variable lookup.
    ///
    /// This allows testing without modifying actual environment variables.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Self {
            host: read("HTTP_HOST"),
            user_agent: read("HTTP_USER_AGENT"),
            server_software: read("SERVER_SOFTWARE"),
            server_port: read("SERVER_PORT"),
            script_name: read("SCRIPT_NAME"),
        }
    }

    /// A request addressed to `host`, for tests and embedding.
    pub fn for_host(host: &str) -> Self {
        Self {
            host: Some(host.to_string()),
            ..Default::default()
        }
    }

    /// Whether a request is present at all. Decided by the host header.
    pub fn is_present(&self) -> bool {
        self.host.is_some()
    }

    /// Directory part of the script path without surrounding slashes,
    /// empty for a script at the document root.
    pub fn script_dir(&self) -> String {
        let Some(script) = &self.script_name else {
            return String::new();
        };
        match script.rfind('/') {
            Some(index) => script[..index].trim_matches('/').to_string(),
            None => String::new(),
        }
    }
}
