//! A CouchDB server

use serde::Deserialize;

use sofa_client::Session;
use sofa_client::error::Result;

use crate::database::{Database, validate_dbname};
use crate::resource::{Query, Resource};

const NO_PATH: [&str; 0] = [];

#[derive(Debug, Deserialize)]
struct Welcome {
    version: String,
}

#[derive(Debug, Clone)]
pub struct Server {
    resource: Resource,
}

impl Server {
    /// # Errors
    ///
    /// Returns a builder error if `url` does not parse.
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self {
            resource: Resource::new(url)?,
        })
    }

    /// # Errors
    ///
    /// Returns a builder error if `url` does not parse.
    pub fn with_session(url: &str, session: Session) -> Result<Self> {
        Ok(Self {
            resource: Resource::with_session(url, session)?,
        })
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }

    /// Version string from the server's welcome document
    ///
    /// # Errors
    ///
    /// Fails if the server is unreachable or answers with an error.
    pub fn version(&self) -> Result<String> {
        let welcome = self.resource.get_json::<Welcome, _>(&NO_PATH, &Query::new())?;
        Ok(welcome.data.version)
    }

    /// # Errors
    ///
    /// Fails if the server is unreachable or answers with an error.
    pub fn all_dbs(&self) -> Result<Vec<String>> {
        Ok(self.resource.get_json(&["_all_dbs"], &Query::new())?.data)
    }

    /// Whether a database named `name` exists
    ///
    /// # Errors
    ///
    /// Fails for invalid names and for errors other than 404.
    pub fn contains(&self, name: &str) -> Result<bool> {
        let name = validate_dbname(name)?;
        match self.resource.head(&[name], &Query::new()) {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Create a database and return a handle to it
    ///
    /// # Errors
    ///
    /// Fails with a conflict if the database already exists.
    pub fn create(&self, name: &str) -> Result<Database> {
        let name = validate_dbname(name)?;
        self.resource.put(&[name], sofa_client::RequestBody::Empty, &Query::new())?.bytes()?;
        tracing::debug!(target: "sofa::server", name, "Created database");
        Ok(Database::from_parent(&self.resource, name))
    }

    /// # Errors
    ///
    /// Fails with not-found if no such database exists.
    pub fn delete(&self, name: &str) -> Result<()> {
        let name = validate_dbname(name)?;
        self.resource.delete(&[name], &Query::new())?.bytes()?;
        tracing::debug!(target: "sofa::server", name, "Deleted database");
        Ok(())
    }

    /// Handle to a database without checking that it exists
    ///
    /// # Errors
    ///
    /// Fails for invalid database names.
    pub fn database(&self, name: &str) -> Result<Database> {
        let name = validate_dbname(name)?;
        Ok(Database::from_parent(&self.resource, name))
    }
}
