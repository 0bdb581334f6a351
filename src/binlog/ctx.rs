// Copyright (c) 2021 Anatoly Ikorsky
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use tracing::debug;

use std::{collections::HashMap, sync::Arc};

use crate::binlog::{
    checksum::BinlogEventFooter,
    consts::{BinlogVersion, EventType},
    error::{BinlogError, Result},
    events::{FormatDescriptionEvent, TableMapEvent},
};

lazy_static! {
    static ref DEFAULT_FDE: FormatDescriptionEvent =
        FormatDescriptionEvent::new(BinlogVersion::Version4);
}

/// Decoding state of a single binlog stream.
///
/// Holds the actual format description and the table map registry. Each stream
/// needs its own context, since later events are decoded against earlier ones.
#[derive(Debug, Clone, Default)]
pub struct BinlogCtx {
    fde: Option<FormatDescriptionEvent>,
    tables: HashMap<u64, Arc<TableMapEvent>>,
}

impl BinlogCtx {
    /// Creates a context of a stream nothing is known about yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the actual format description.
    pub fn adopt_format_description(&mut self, fde: FormatDescriptionEvent) {
        debug!(
            server_version = %fde.server_version.as_str(),
            binlog_version = fde.binlog_version.raw(),
            header_width = fde.header_width(),
            checksum_alg = ?fde.checksum_alg(),
            "adopting format description"
        );
        self.fde = Some(fde);
    }

    /// Replaces the registry entry for the table id of the given event.
    pub fn register_table(
        &mut self,
        table_map: impl Into<Arc<TableMapEvent>>,
    ) -> Arc<TableMapEvent> {
        let table_map = table_map.into();
        let replaced = self
            .tables
            .insert(table_map.table_id, Arc::clone(&table_map))
            .is_some();
        debug!(
            table_id = table_map.table_id,
            schema = %table_map.database_name.as_str(),
            table = %table_map.table_name.as_str(),
            replaced,
            "table map registered"
        );
        table_map
    }

    /// Returns the format description adopted by this context, if any.
    pub fn format_description(&self) -> Option<&FormatDescriptionEvent> {
        self.fde.as_ref()
    }

    /// Returns the actual format description or a default one, if no description
    /// was adopted yet.
    pub fn fde(&self) -> &FormatDescriptionEvent {
        self.fde.as_ref().unwrap_or(&*DEFAULT_FDE)
    }

    /// Returns the width of the next event header.
    pub fn header_width(&self) -> usize {
        self.fde().header_width()
    }

    /// Returns the post-header length of the given event type.
    pub fn header_width_for(&self, event_type: EventType) -> u8 {
        self.fde().get_event_type_header_length(event_type)
    }

    /// Returns the binlog version of this stream.
    pub fn binlog_version(&self) -> BinlogVersion {
        self.fde().version()
    }

    /// Returns `true` if events of this stream carry a CRC32 checksum.
    pub fn checksum_enabled(&self) -> bool {
        self.fde().checksum_enabled()
    }

    /// Returns the footer non-description events are validated against.
    pub fn footer(&self) -> BinlogEventFooter {
        self.fde().footer
    }

    /// Returns the most recent table map registered for the given table id.
    pub fn table_schema(&self, table_id: u64) -> Result<&Arc<TableMapEvent>> {
        self.tables
            .get(&table_id)
            .ok_or(BinlogError::UnknownTable(table_id))
    }

    /// Returns the number of registered tables.
    pub fn tables_count(&self) -> usize {
        self.tables.len()
    }
}
