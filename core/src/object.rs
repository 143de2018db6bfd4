//! Registry of the Marketo objects the client knows how to sync and describe.

use std::fmt;
use std::str::FromStr;

use crate::error::MarketoError;

/// A Marketo lead-database object with its own endpoint path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarketoObject {
    Leads,
    Companies,
    Opportunities,
    OpportunityRoles,
    SalesPersons,
}

impl MarketoObject {
    pub const ALL: [MarketoObject; 5] = [
        MarketoObject::Leads,
        MarketoObject::Companies,
        MarketoObject::Opportunities,
        MarketoObject::OpportunityRoles,
        MarketoObject::SalesPersons,
    ];

    /// Logical name, as accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            MarketoObject::Leads => "Leads",
            MarketoObject::Companies => "Companies",
            MarketoObject::Opportunities => "Opportunities",
            MarketoObject::OpportunityRoles => "Opportunities Roles",
            MarketoObject::SalesPersons => "Sales Persons",
        }
    }

    /// Endpoint path segment, e.g. `opportunities/roles`.
    pub fn path_segment(self) -> &'static str {
        match self {
            MarketoObject::Leads => "leads",
            MarketoObject::Companies => "companies",
            MarketoObject::Opportunities => "opportunities",
            MarketoObject::OpportunityRoles => "opportunities/roles",
            MarketoObject::SalesPersons => "salespersons",
        }
    }
}

impl fmt::Display for MarketoObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MarketoObject {
    type Err = MarketoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MarketoObject::ALL
            .into_iter()
            .find(|object| object.name() == s)
            .ok_or_else(|| MarketoError::invalid(format!("\"{s}\" is not a valid Marketo object")))
    }
}

/// What a sync call should do with records that do or do not already exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    CreateOnly,
    UpdateOnly,
    CreateOrUpdate,
    /// Leads only.
    CreateDuplicate,
}

impl SyncAction {
    /// Wire value of the `action` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            SyncAction::CreateOnly => "createOnly",
            SyncAction::UpdateOnly => "updateOnly",
            SyncAction::CreateOrUpdate => "createOrUpdate",
            SyncAction::CreateDuplicate => "createDuplicate",
        }
    }
}
