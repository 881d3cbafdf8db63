use serde::{Deserialize, Serialize};
use warden_core::{AppResult, NonEmptyString};

use crate::field::{RecordField, ValueKind};
use crate::project::ProviderProject;
use crate::record::{ChildItem, RecordType};

/// Distribution job record type: channel settings plus the projects it covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DistributionJob;

impl RecordType for DistributionJob {
    type Field = JobField;
    type Child = JobProject;

    const LABEL: &'static str = "distribution job";
}

/// Scalar fields of a distribution job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum JobField {
    /// Unique job name.
    Name,
    /// Whether the job is dispatched.
    Enabled,
    /// Channel the job distributes to.
    ChannelDescriptorName,
    /// Distribution cadence.
    DistributionFrequency,
    /// Message processing type.
    ProcessingType,
    /// Restricts notifications to the selected projects.
    FilterByProject,
    /// Optional pattern matched against project names.
    ProjectNamePattern,
}

impl RecordField for JobField {
    fn all() -> &'static [Self] {
        &[
            Self::Name,
            Self::Enabled,
            Self::ChannelDescriptorName,
            Self::DistributionFrequency,
            Self::ProcessingType,
            Self::FilterByProject,
            Self::ProjectNamePattern,
        ]
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Enabled => "enabled",
            Self::ChannelDescriptorName => "channelDescriptorName",
            Self::DistributionFrequency => "distributionFrequency",
            Self::ProcessingType => "processingType",
            Self::FilterByProject => "filterByProject",
            Self::ProjectNamePattern => "projectNamePattern",
        }
    }

    fn kind(&self) -> ValueKind {
        match self {
            Self::Enabled | Self::FilterByProject => ValueKind::Boolean,
            _ => ValueKind::Text,
        }
    }

    fn is_required(&self) -> bool {
        matches!(self, Self::Name | Self::ChannelDescriptorName)
    }

    fn is_unique(&self) -> bool {
        matches!(self, Self::Name)
    }
}

/// Provider project attached to a distribution job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProject {
    project_name: NonEmptyString,
    #[serde(default)]
    href: Option<String>,
}

impl JobProject {
    /// Creates a validated job project.
    pub fn new(project_name: impl Into<String>, href: Option<String>) -> AppResult<Self> {
        Ok(Self {
            project_name: NonEmptyString::new(project_name)?,
            href,
        })
    }

    /// Creates a job project from a provider project row.
    pub fn from_provider_project(project: &ProviderProject) -> AppResult<Self> {
        Self::new(project.name(), project.href().map(str::to_owned))
    }

    /// Returns the project name.
    #[must_use]
    pub fn project_name(&self) -> &NonEmptyString {
        &self.project_name
    }

    /// Returns the provider link of the project.
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }
}

impl ChildItem for JobProject {
    type Key = String;

    fn key(&self) -> Self::Key {
        self.project_name.as_str().to_owned()
    }
}
