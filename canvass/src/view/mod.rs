// SPDX-License-Identifier: AGPL-3.0-or-later

//! Views render records of one type as a table.
//!
//! A view holds the ordered list of visible fields, a list of filters combined with a logical AND
//! and at most one active sort directive. Rendering is a pure function over already assembled
//! records: filter, then sort, then project every visible field into a cell.
mod column;
mod definition;
mod filter;
mod projection;
mod session;
mod settings;
mod sort;
mod table;

pub use column::{columns, Column};
pub use definition::{View, DEFAULT_VIEW_NAME};
pub use filter::apply_filters;
pub use projection::{project, CellValue};
pub use session::{FilterUpdate, SessionError, ViewSession};
pub use settings::{FilterItem, Operator, SortDirection, SortItem, ViewSettings};
pub use sort::SortState;
pub use table::{render_table, Table, TableRow};
