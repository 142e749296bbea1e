// SPDX-License-Identifier: AGPL-3.0-or-later

//! # canvass
//!
//! Contacts, businesses and donations for political organizations, organised in workspaces and
//! browsed through saved views.
//!
//! Records are polymorphic: every record has a header row and exactly one typed payload
//! ([`RecordPayload`]) plus a set of multi-valued contact methods. Which columns are shown, which
//! filters apply and how rows are sorted is stored per workspace and record type in a [`View`].
//! The [`Dashboard`] service ties storage, projection, filtering and sorting together.
#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

#[macro_use]
mod macros;

mod config;
mod dashboard;
pub mod db;
mod errors;
pub mod field;
pub mod form;
mod identifier;
pub mod record;
pub mod view;
pub mod workspace;

#[cfg(test)]
mod test_utils;

pub use crate::config::Configuration;
pub use crate::dashboard::Dashboard;
pub use crate::errors::{DashboardError, ParseEnumError};
pub use crate::field::{FieldDefinition, FieldKey, FieldKind};
pub use crate::identifier::{FieldId, RecordId, UserId, ViewId, WorkspaceId};
pub use crate::record::{Record, RecordPayload, RecordType};
pub use crate::view::{View, ViewSession, ViewSettings};
pub use crate::workspace::{Workspace, WorkspaceType};
