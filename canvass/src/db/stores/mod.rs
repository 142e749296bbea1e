// SPDX-License-Identifier: AGPL-3.0-or-later

//! Implementations of all storage traits for [`SqlStore`](crate::db::SqlStore).
mod field;
mod record;
mod view;
mod workspace;
