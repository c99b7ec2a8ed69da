use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::TaskError;
use crate::resource::FileResource;

/// Reads the last modification time of a file
#[derive(Debug)]
pub struct FileLastModifiedTask {
    resource: FileResource,
    last_value: Option<DateTime<Utc>>,
}

impl FileLastModifiedTask {
    pub fn new(resource: FileResource) -> Self {
        Self {
            resource,
            last_value: None,
        }
    }

    pub fn resource(&self) -> &FileResource {
        &self.resource
    }

    pub fn last_value(&self) -> Option<DateTime<Utc>> {
        self.last_value
    }

    pub async fn perform(&mut self) -> Result<DateTime<Utc>, TaskError> {
        let path = &self.resource.path;
        let to_error = |source| TaskError::File {
            path: path.clone(),
            source,
        };

        let modified = tokio::fs::metadata(path)
            .await
            .map_err(to_error)?
            .modified()
            .map_err(to_error)?;

        let modified = DateTime::<Utc>::from(modified);
        debug!("{} last modified at {}", path.display(), modified);

        self.last_value = Some(modified);
        Ok(modified)
    }
}
