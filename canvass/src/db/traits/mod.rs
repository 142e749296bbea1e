// SPDX-License-Identifier: AGPL-3.0-or-later

//! Storage interfaces of the dashboard, implemented by the SQL and the in-memory store.
mod field;
mod record;
mod view;
mod workspace;

pub use field::FieldStore;
pub use record::RecordStore;
pub use view::ViewStore;
pub use workspace::WorkspaceStore;

/// All storage interfaces a dashboard needs, combined in one bound.
pub trait Repository:
    RecordStore + FieldStore + ViewStore + WorkspaceStore + Clone + Send + Sync + 'static
{
}

impl<T> Repository for T where
    T: RecordStore + FieldStore + ViewStore + WorkspaceStore + Clone + Send + Sync + 'static
{
}
