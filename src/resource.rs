//! Descriptors of the external data sources a task reads from

use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResource {
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlResource {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlResource {
    pub connection_string: String,
    pub query: String,
}

/// External data source, immutable after construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    File(FileResource),
    Url(UrlResource),
    SqlQuery(SqlResource),
}

impl Resource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Resource::File(FileResource { path: path.into() })
    }

    pub fn url(url: impl Into<String>) -> Self {
        Resource::Url(UrlResource { url: url.into() })
    }

    pub fn sql(connection_string: impl Into<String>, query: impl Into<String>) -> Self {
        Resource::SqlQuery(SqlResource {
            connection_string: connection_string.into(),
            query: query.into(),
        })
    }

    /// Configuration name of the resource type
    pub fn kind(&self) -> &'static str {
        match self {
            Resource::File(_) => "GeneralFileResource",
            Resource::Url(_) => "UrlResource",
            Resource::SqlQuery(_) => "ConnectionStringWithQueryResource",
        }
    }
}

impl fmt::Display for FileResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file {}", self.path.display())
    }
}

impl fmt::Display for UrlResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "url {}", self.url)
    }
}

// The connection string may carry credentials, so only the query is shown.
impl fmt::Display for SqlResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "query \"{}\"", self.query)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::File(resource) => resource.fmt(f),
            Resource::Url(resource) => resource.fmt(f),
            Resource::SqlQuery(resource) => resource.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_hides_connection_string() {
        let resource = Resource::sql("secret.db", "select 1");

        let shown = resource.to_string();
        assert_eq!(shown, "query \"select 1\"");
        assert!(!shown.contains("secret"));
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(Resource::file("a.txt").kind(), "GeneralFileResource");
        assert_eq!(Resource::url("http://x").kind(), "UrlResource");
        assert_eq!(
            Resource::sql("db", "q").kind(),
            "ConnectionStringWithQueryResource"
        );
    }
}
