// Copyright (c) 2021 Anatoly Ikorsky
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use crate::{
    binlog::{
        checksum::BinlogEventFooter,
        consts::{BinlogChecksumAlg, BinlogVersion, EventType},
        error::Result,
        header::BinlogEventHeader,
    },
    io::ParseBuf,
    misc::{split_version, RawField, RawText},
};

/// A format description event is the first event of a binlog for binlog-version 4.
///
/// It describes how the other events are layed out.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct FormatDescriptionEvent {
    /// Version of this binlog format.
    pub binlog_version: RawField<u16, BinlogVersion>,
    /// Version of the MySQL Server that created the binlog (trailing `NUL`s are trimmed).
    pub server_version: RawText,
    /// Seconds since Unix epoch when the binlog was created.
    pub create_timestamp: u32,
    /// Length of the common header of every event in this stream.
    pub event_header_length: u8,
    /// An array indexed by Binlog Event Type - 1 to extract the length of the event specific
    /// header.
    ///
    /// Use [`Self::get_event_type_header_length`] to get header length for particular event type.
    pub event_type_header_lengths: Vec<u8>,
    /// Checksum algorithm description of this binlog.
    ///
    /// Not a part of the event body, it's filled in by the event reader.
    pub footer: BinlogEventFooter,
}

impl FormatDescriptionEvent {
    /// Length of a server version string.
    pub const SERVER_VER_LEN: usize = 50;
    /// Offset of a server version string.
    pub const SERVER_VER_OFFSET: usize = 2;

    /// Length of a query event post-header, where 5.0 differs: 2 for length of N-bytes vars.
    pub const QUERY_HEADER_LEN: u8 = 4 + 4 + 1 + 2 + 2;
    /// Length of a start event post-header.
    pub const START_V3_HEADER_LEN: u8 = 2 + Self::SERVER_VER_LEN as u8 + 4;
    /// Length of a rotate event post-header.
    pub const ROTATE_HEADER_LEN: u8 = 8;
    /// Length of a v1 rows event post-header.
    pub const ROWS_HEADER_LEN_V1: u8 = 8;
    /// Length of a v2 rows event post-header.
    pub const ROWS_HEADER_LEN_V2: u8 = 10;
    /// Length of a table map event post-header.
    pub const TABLE_MAP_HEADER_LEN: u8 = 8;
    /// Length of a gtid event post-header.
    pub const GTID_HEADER_LEN: u8 = 42;

    /// Creates a description of a stream nothing is known about yet.
    ///
    /// Such a description uses MySql defaults for every event type and has no checksums.
    pub fn new(binlog_version: BinlogVersion) -> Self {
        Self {
            binlog_version: RawField::new(binlog_version as u16),
            server_version: RawText::default(),
            create_timestamp: 0,
            event_header_length: BinlogEventHeader::LEN as u8,
            event_type_header_lengths: Vec::new(),
            footer: Default::default(),
        }
    }

    /// Decodes the event body (checksum-related suffix must be stripped).
    pub fn read(data: &[u8]) -> Result<Self> {
        let mut buf = ParseBuf(data);

        let binlog_version = buf.eat_u16_le()?;
        let server_version = buf.eat(Self::SERVER_VER_LEN)?;
        let create_timestamp = buf.eat_u32_le()?;
        let event_header_length = buf.eat_u8()?;
        let event_type_header_lengths = buf.eat_all().to_vec();

        let server_version: &[u8] = match server_version.iter().rposition(|x| *x != 0) {
            Some(last) => &server_version[..=last],
            None => &[],
        };

        Ok(Self {
            binlog_version: RawField::new(binlog_version),
            server_version: RawText::new(server_version),
            create_timestamp,
            event_header_length,
            event_type_header_lengths,
            footer: Default::default(),
        })
    }

    /// Returns parsed binlog version, `Version4` is assumed for unknown versions.
    pub fn version(&self) -> BinlogVersion {
        self.binlog_version.get().unwrap_or(BinlogVersion::Version4)
    }

    /// Returns a parsed MySql version.
    pub fn split_version(&self) -> (u8, u8, u8) {
        split_version(self.server_version.as_bytes())
    }

    /// Returns width of an event header in this stream.
    pub fn header_width(&self) -> usize {
        match usize::from(self.event_header_length) {
            x if x < BinlogEventHeader::LEGACY_LEN => BinlogEventHeader::LEN,
            x => x,
        }
    }

    /// Returns the checksum algorithm of events that follow this description.
    ///
    /// `None` means that events carry no checksum.
    pub fn checksum_alg(&self) -> Option<BinlogChecksumAlg> {
        self.footer.get_checksum_alg().ok().flatten()
    }

    /// Returns `true` if events that follow this description carry a checksum.
    pub fn checksum_enabled(&self) -> bool {
        self.checksum_alg() == Some(BinlogChecksumAlg::BINLOG_CHECKSUM_ALG_CRC32)
    }

    /// Returns post-header length for the given event type.
    ///
    /// Falls back to the MySql default if the stream's table is too short.
    pub fn get_event_type_header_length(&self, event_type: EventType) -> u8 {
        let index = usize::from(event_type as u8);
        if index == 0 {
            return 0;
        }

        self.event_type_header_lengths
            .get(index - 1)
            .copied()
            .unwrap_or_else(|| default_post_header_len(event_type))
    }
}

/// Post-header lengths written by MySql 8.0.
fn default_post_header_len(event_type: EventType) -> u8 {
    use EventType::*;

    match event_type {
        START_EVENT_V3 => FormatDescriptionEvent::START_V3_HEADER_LEN,
        QUERY_EVENT => FormatDescriptionEvent::QUERY_HEADER_LEN,
        ROTATE_EVENT => FormatDescriptionEvent::ROTATE_HEADER_LEN,
        APPEND_BLOCK_EVENT | DELETE_FILE_EVENT | BEGIN_LOAD_QUERY_EVENT => 4,
        FORMAT_DESCRIPTION_EVENT => {
            FormatDescriptionEvent::START_V3_HEADER_LEN + 1 + HEARTBEAT_LOG_EVENT_V2 as u8
        }
        EXECUTE_LOAD_QUERY_EVENT => FormatDescriptionEvent::QUERY_HEADER_LEN + 4 + 4 + 4 + 1,
        TABLE_MAP_EVENT => FormatDescriptionEvent::TABLE_MAP_HEADER_LEN,
        WRITE_ROWS_EVENT_V1 | UPDATE_ROWS_EVENT_V1 | DELETE_ROWS_EVENT_V1 => {
            FormatDescriptionEvent::ROWS_HEADER_LEN_V1
        }
        WRITE_ROWS_EVENT | UPDATE_ROWS_EVENT | DELETE_ROWS_EVENT | PARTIAL_UPDATE_ROWS_EVENT => {
            FormatDescriptionEvent::ROWS_HEADER_LEN_V2
        }
        INCIDENT_EVENT => 2,
        GTID_EVENT | ANONYMOUS_GTID_EVENT => FormatDescriptionEvent::GTID_HEADER_LEN,
        TRANSACTION_CONTEXT_EVENT => 18,
        VIEW_CHANGE_EVENT => 52,
        TRANSACTION_PAYLOAD_EVENT => 40,
        _ => 0,
    }
}
