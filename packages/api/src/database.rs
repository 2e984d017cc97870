//! A CouchDB database

use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use sofa_client::RequestBody;
use sofa_client::error::{self, Result};

use crate::resource::{Query, Resource};

const NO_PATH: [&str; 0] = [];

static VALID_DB_NAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-z0-9_$()+/-]*$").ok());

/// Check a database name against CouchDB's naming rule
///
/// # Errors
///
/// Returns a builder error for names the server would reject.
pub fn validate_dbname(name: &str) -> Result<&str> {
    match VALID_DB_NAME.as_ref() {
        Some(re) if re.is_match(name) => Ok(name),
        _ => Err(error::builder(format!("invalid database name {name:?}"))),
    }
}

/// `id` and `rev` of a written document
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DocRevision {
    pub id: String,
    pub rev: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseInfo {
    pub db_name: String,
    #[serde(default)]
    pub doc_count: u64,
    #[serde(default)]
    pub doc_del_count: u64,
    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct Database {
    name: String,
    resource: Resource,
}

impl Database {
    pub(crate) fn from_parent(server: &Resource, name: &str) -> Self {
        Self {
            name: name.to_owned(),
            resource: server.derive(&[name]),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// # Errors
    ///
    /// Fails with not-found if the database does not exist.
    pub fn info(&self) -> Result<DatabaseInfo> {
        Ok(self.resource.get_json(&NO_PATH, &Query::new())?.data)
    }

    /// Fetch a document, or `None` if it does not exist
    ///
    /// # Errors
    ///
    /// Fails for errors other than 404 and for documents that do not decode as `T`.
    pub fn get<T: DeserializeOwned>(&self, id: &str) -> Result<Option<T>> {
        match self.resource.get_json(&[id], &Query::new()) {
            Ok(resp) => Ok(Some(resp.data)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// # Errors
    ///
    /// Fails for errors other than 404.
    pub fn contains(&self, id: &str) -> Result<bool> {
        match self.resource.head(&[id], &Query::new()) {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Create or update the document `id`
    ///
    /// # Errors
    ///
    /// Fails with a conflict if `doc` carries a stale `_rev`.
    pub fn save<D: Serialize + ?Sized>(&self, id: &str, doc: &D) -> Result<DocRevision> {
        let body = RequestBody::json(doc)?;
        Ok(self.resource.put_json(&[id], body, &Query::new())?.data)
    }

    /// Create a document with a server-generated id
    ///
    /// A retried POST may create the document twice; prefer `save` with a
    /// client-generated id where duplicates matter.
    ///
    /// # Errors
    ///
    /// Fails if the server rejects the document.
    pub fn create<D: Serialize + ?Sized>(&self, doc: &D) -> Result<DocRevision> {
        let body = RequestBody::json(doc)?;
        Ok(self.resource.post_json(&NO_PATH, body, &Query::new())?.data)
    }

    /// # Errors
    ///
    /// Fails with a conflict if `rev` is not the current revision.
    pub fn delete(&self, id: &str, rev: &str) -> Result<DocRevision> {
        let query = Query::new().param("rev", rev);
        Ok(self.resource.delete_json(&[id], &query)?.data)
    }
}
