// Copyright (c) 2021 Anatoly Ikorsky
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Decoders of event bodies.
//!
//! Every decoder takes a body with the checksum-related suffix already stripped.

mod format_description_event;
mod intvar_event;
mod query_event;
mod rotate_event;
mod rows_event;
mod rows_query_event;
mod table_map_event;
mod xid_event;

pub use self::{
    format_description_event::FormatDescriptionEvent,
    intvar_event::IntvarEvent,
    query_event::{QueryEvent, StatusVar, StatusVarVal, StatusVars, StatusVarsIterator},
    rotate_event::RotateEvent,
    rows_event::{RowsEvent, RowsEventKind},
    rows_query_event::RowsQueryEvent,
    table_map_event::{ColumnMetadata, TableMapEvent},
    xid_event::XidEvent,
};
