use serde::{Deserialize, Serialize};
use warden_core::{AppResult, NonEmptyString};

use crate::field::{RecordField, ValueKind};
use crate::record::{ChildItem, RecordType};

/// Role record type: a named set of permission grants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Role;

impl RecordType for Role {
    type Field = RoleField;
    type Child = PermissionGrant;

    const LABEL: &'static str = "role";
}

/// Scalar fields of a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RoleField {
    /// Unique role name.
    #[serde(rename = "roleName")]
    RoleName,
}

impl RecordField for RoleField {
    fn all() -> &'static [Self] {
        &[Self::RoleName]
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::RoleName => "roleName",
        }
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Text
    }

    fn is_required(&self) -> bool {
        true
    }

    fn is_unique(&self) -> bool {
        true
    }
}

/// Composite identity of a permission grant inside a role.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermissionKey {
    /// Descriptor the grant applies to.
    pub descriptor_name: String,
    /// Configuration context the grant applies to.
    pub context: String,
}

/// Access levels carried by a permission grant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccessFlags {
    /// Allows creating configuration.
    pub create: bool,
    /// Allows deleting configuration.
    pub delete: bool,
    /// Allows reading configuration.
    pub read: bool,
    /// Allows updating configuration.
    pub write: bool,
    /// Allows running test and custom actions.
    pub execute: bool,
    /// Allows reading uploaded files.
    pub upload_read: bool,
    /// Allows uploading files.
    pub upload_write: bool,
    /// Allows deleting uploaded files.
    pub upload_delete: bool,
}

impl AccessFlags {
    /// Returns flags granting every access level.
    #[must_use]
    pub fn all() -> Self {
        Self {
            create: true,
            delete: true,
            read: true,
            write: true,
            execute: true,
            upload_read: true,
            upload_write: true,
            upload_delete: true,
        }
    }

    /// Returns flags granting read access only.
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            read: true,
            ..Self::default()
        }
    }
}

/// Permission grant of one descriptor in one context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionGrant {
    descriptor_name: NonEmptyString,
    context: NonEmptyString,
    #[serde(flatten)]
    access: AccessFlags,
}

impl PermissionGrant {
    /// Creates a validated grant with no access levels set.
    pub fn new(descriptor_name: impl Into<String>, context: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            descriptor_name: NonEmptyString::new(descriptor_name)?,
            context: NonEmptyString::new(context)?,
            access: AccessFlags::default(),
        })
    }

    /// Returns a copy of this grant with the given access levels.
    #[must_use]
    pub fn with_access(mut self, access: AccessFlags) -> Self {
        self.access = access;
        self
    }

    /// Returns the granted access levels.
    #[must_use]
    pub fn access(&self) -> AccessFlags {
        self.access
    }
}

impl ChildItem for PermissionGrant {
    type Key = PermissionKey;

    fn key(&self) -> Self::Key {
        PermissionKey {
            descriptor_name: self.descriptor_name.as_str().to_owned(),
            context: self.context.as_str().to_owned(),
        }
    }
}
