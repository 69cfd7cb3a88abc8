//! Yandex Disk REST API client.
//!
//! # Endpoints used
//!
//! | Operation       | Request                                                        |
//! |-----------------|----------------------------------------------------------------|
//! | folder check    | `GET    /v1/disk/resources?path=<folder>`                      |
//! | folder create   | `PUT    /v1/disk/resources?path=<folder>`                      |
//! | list            | `GET    /v1/disk/resources?path=<folder>&limit=&offset=`       |
//! | upload link     | `GET    /v1/disk/resources/upload?path=<file>&overwrite=`      |
//! | upload body     | `PUT    <href from upload link>`                               |
//! | delete          | `DELETE /v1/disk/resources?path=<file>&permanently=`           |
//!
//! All API calls carry `Authorization: OAuth <token>`. The body PUT goes to a
//! pre-signed storage URL and carries no credential.

use std::fmt;
use std::fs::File;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use diskmirror_core::{
    types::{FileName, RemoteFileEntry},
    SyncConfig, Timeouts,
};

use crate::error::{io_err, RemoteError};
use crate::store::{upload_name, RemoteStore};

const RESOURCES: &str = "/v1/disk/resources";
const UPLOAD: &str = "/v1/disk/resources/upload";

/// Page size for folder listings.
pub const PAGE_LIMIT: usize = 100;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Resource {
    #[serde(rename = "_embedded")]
    embedded: Option<ResourceList>,
}

#[derive(Debug, Deserialize)]
struct ResourceList {
    #[serde(default)]
    items: Vec<Value>,
    total: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Link {
    href: Option<String>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Blocking client bound to one Yandex Disk folder.
#[derive(Clone)]
pub struct YandexDisk {
    agent: ureq::Agent,
    api_base_url: String,
    folder: String,
    authorization: String,
    upload_timeout: Duration,
}

impl fmt::Debug for YandexDisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YandexDisk")
            .field("api_base_url", &self.api_base_url)
            .field("folder", &self.folder)
            .field("authorization", &"OAuth <redacted>")
            .finish()
    }
}

impl YandexDisk {
    /// Build a client for `folder` using `token`. No request is made.
    pub fn new(
        api_base_url: impl Into<String>,
        token: &str,
        folder: impl Into<String>,
        timeouts: Timeouts,
    ) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeouts.connect())
            .timeout_read(timeouts.read())
            .timeout_write(timeouts.read())
            .user_agent(concat!("diskmirror/", env!("CARGO_PKG_VERSION")))
            .build();
        let api_base_url: String = api_base_url.into();
        Self {
            agent,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            folder: folder.into(),
            authorization: format!("OAuth {token}"),
            upload_timeout: timeouts.upload(),
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(
            config.api_base_url.as_str(),
            &config.token,
            config.remote_folder.as_str(),
            config.timeouts,
        )
    }

    /// Full remote path of a child of the bound folder.
    fn child_path(&self, name: &FileName) -> Result<String, RemoteError> {
        if name.as_str().is_empty() || name.as_str().contains('/') {
            return Err(RemoteError::InvalidPath(name.to_string()));
        }
        Ok(format!("{}/{}", self.folder.trim_end_matches('/'), name))
    }

    fn api(&self, method: &str, endpoint: &str) -> ureq::Request {
        self.agent
            .request(method, &format!("{}{}", self.api_base_url, endpoint))
            .set("Authorization", &self.authorization)
            .set("Accept", "application/json")
    }

    fn list_page(&self, offset: usize) -> Result<ResourceList, RemoteError> {
        let resource: Resource = self
            .api("GET", RESOURCES)
            .query("path", &self.folder)
            .query("limit", &PAGE_LIMIT.to_string())
            .query("offset", &offset.to_string())
            .call()?
            .into_json()
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        resource.embedded.ok_or_else(|| {
            RemoteError::Decode(format!("{} is not a folder (no _embedded list)", self.folder))
        })
    }

    fn upload_link(&self, remote_path: &str, name: &FileName, overwrite: bool) -> Result<String, RemoteError> {
        let link: Link = self
            .api("GET", UPLOAD)
            .query("path", remote_path)
            .query("overwrite", if overwrite { "true" } else { "false" })
            .call()?
            .into_json()
            .map_err(|e| RemoteError::Decode(e.to_string()))?;
        match link.href {
            Some(href) if !href.is_empty() => Ok(href),
            _ => Err(RemoteError::MissingUploadUrl {
                name: name.to_string(),
            }),
        }
    }
}

impl RemoteStore for YandexDisk {
    fn folder(&self) -> &str {
        &self.folder
    }

    fn ensure_folder(&self) -> Result<(), RemoteError> {
        match self.api("GET", RESOURCES).query("path", &self.folder).call() {
            Ok(_) => {
                tracing::info!(folder = %self.folder, "remote folder present");
                Ok(())
            }
            Err(ureq::Error::Status(404, _)) => {
                match self.api("PUT", RESOURCES).query("path", &self.folder).call() {
                    // 409: created concurrently by someone else.
                    Ok(_) | Err(ureq::Error::Status(409, _)) => {
                        tracing::info!(folder = %self.folder, "remote folder created");
                        Ok(())
                    }
                    Err(err) => Err(err.into()),
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    fn list(&self) -> Result<Vec<RemoteFileEntry>, RemoteError> {
        let mut entries = Vec::new();
        let mut offset = 0usize;
        loop {
            let page = self.list_page(offset)?;
            let count = page.items.len();
            for item in page.items {
                let name = item.get("name").and_then(Value::as_str).map(str::to_owned);
                match name {
                    Some(name) => entries.push(RemoteFileEntry {
                        name: FileName::from(name),
                        metadata: item,
                    }),
                    None => tracing::warn!(folder = %self.folder, "listing item without a name skipped"),
                }
            }
            offset += count;

            let reached_total = page.total.is_some_and(|total| offset as u64 >= total);
            if count < PAGE_LIMIT || reached_total {
                break;
            }
        }
        tracing::debug!(folder = %self.folder, count = entries.len(), "listed remote folder");
        Ok(entries)
    }

    fn upload(&self, local_path: &Path, overwrite: bool) -> Result<(), RemoteError> {
        let name = upload_name(local_path)?;
        let remote_path = self.child_path(&name)?;

        let file = File::open(local_path).map_err(|e| io_err(local_path, e))?;
        let length = file.metadata().map_err(|e| io_err(local_path, e))?.len();

        let href = self.upload_link(&remote_path, &name, overwrite)?;
        self.agent
            .put(&href)
            .timeout(self.upload_timeout)
            .set("Content-Length", &length.to_string())
            .send(file)?;

        tracing::debug!(file = %name, bytes = length, "upload body sent");
        Ok(())
    }

    fn delete(&self, name: &FileName, permanently: bool) -> Result<(), RemoteError> {
        let remote_path = self.child_path(name)?;
        let response = self
            .api("DELETE", RESOURCES)
            .query("path", &remote_path)
            .query("permanently", if permanently { "true" } else { "false" })
            .call()?;
        // 204: removed; 202: the API queued an async operation.
        tracing::debug!(file = %name, status = response.status(), "delete accepted");
        Ok(())
    }
}
