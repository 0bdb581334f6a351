// Copyright (c) 2021 Anatoly Ikorsky
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use std::{borrow::Cow, convert::TryFrom};

use crate::{
    binlog::{
        consts::EventType,
        error::{BinlogError, Result},
        events::FormatDescriptionEvent,
    },
    constants::{ColumnType, UnknownColumnType},
    io::ParseBuf,
    misc::{bitfield, bitfield_len, Bitfield, RawSeq, RawText},
};

/// Minimum MySql version that appends optional metadata to a table map event.
const OPTIONAL_METADATA_VERSION: (u8, u8, u8) = (8, 0, 1);

/// Decoded metadata of a single column.
///
/// The shape depends on the column type.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ColumnMetadata {
    /// The column type carries no metadata.
    None,
    /// Maximum length in bytes (`STRING`, `VARCHAR`, `VAR_STRING`, `DECIMAL`).
    MaxLength(u16),
    /// `STRING` column whose real type is `ENUM` or `SET`.
    EnumOrSet {
        real_type: ColumnType,
        /// Storage size in bytes.
        size: u8,
    },
    /// `BIT(bits)` column, stored in `bytes` bytes.
    Bit { bits: u16, bytes: u16 },
    /// Length of the length prefix of a value (blobs, `JSON`, `GEOMETRY`)
    /// or the value size (`FLOAT`, `DOUBLE`).
    LengthSize(u8),
    Decimal { precision: u8, decimals: u8 },
    /// Fractional seconds precision.
    Fsp(u8),
}

impl ColumnMetadata {
    /// Consumes metadata of a column of the given type.
    pub fn read(column_type: ColumnType, buf: &mut ParseBuf<'_>) -> Result<Self> {
        use ColumnType::*;

        let metadata = match column_type {
            MYSQL_TYPE_STRING | MYSQL_TYPE_ENUM | MYSQL_TYPE_SET => {
                let real_type = buf.eat_u8()?;
                let low = buf.eat_u8()?;
                match ColumnType::try_from(real_type) {
                    Ok(real_type @ MYSQL_TYPE_ENUM) | Ok(real_type @ MYSQL_TYPE_SET) => {
                        ColumnMetadata::EnumOrSet {
                            real_type,
                            size: low,
                        }
                    }
                    _ => {
                        // length above 255 borrows two inverted bits of the type byte
                        let meta = u16::from(real_type) << 8 | u16::from(low);
                        ColumnMetadata::MaxLength((((meta >> 4) & 0x300) ^ 0x300) + (meta & 0xff))
                    }
                }
            }
            MYSQL_TYPE_VAR_STRING | MYSQL_TYPE_VARCHAR | MYSQL_TYPE_DECIMAL => {
                ColumnMetadata::MaxLength(buf.eat_u16_le()?)
            }
            MYSQL_TYPE_BIT => {
                let bits = u16::from(buf.eat_u8()?);
                let bytes = u16::from(buf.eat_u8()?);
                let bits = bytes * 8 + bits;
                ColumnMetadata::Bit {
                    bits,
                    bytes: (bits + 7) / 8,
                }
            }
            MYSQL_TYPE_BLOB | MYSQL_TYPE_GEOMETRY | MYSQL_TYPE_DOUBLE | MYSQL_TYPE_FLOAT
            | MYSQL_TYPE_TINY_BLOB | MYSQL_TYPE_MEDIUM_BLOB | MYSQL_TYPE_LONG_BLOB
            | MYSQL_TYPE_JSON => ColumnMetadata::LengthSize(buf.eat_u8()?),
            MYSQL_TYPE_NEWDECIMAL => ColumnMetadata::Decimal {
                precision: buf.eat_u8()?,
                decimals: buf.eat_u8()?,
            },
            MYSQL_TYPE_TIME2 | MYSQL_TYPE_DATETIME2 | MYSQL_TYPE_TIMESTAMP2 => {
                ColumnMetadata::Fsp(buf.eat_u8()?)
            }
            MYSQL_TYPE_DATE | MYSQL_TYPE_DATETIME | MYSQL_TYPE_TIMESTAMP | MYSQL_TYPE_TIME
            | MYSQL_TYPE_TINY | MYSQL_TYPE_SHORT | MYSQL_TYPE_INT24 | MYSQL_TYPE_LONG
            | MYSQL_TYPE_LONGLONG | MYSQL_TYPE_NULL | MYSQL_TYPE_YEAR | MYSQL_TYPE_NEWDATE => {
                ColumnMetadata::None
            }
            MYSQL_TYPE_TYPED_ARRAY => {
                return Err(UnknownColumnType(MYSQL_TYPE_TYPED_ARRAY as u8).into())
            }
        };

        Ok(metadata)
    }
}

/// Table map event.
///
/// In row-based mode, every row operation event is preceded by a Table_map_event which maps
/// a table definition to a number.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct TableMapEvent {
    // post-header
    /// The number that identifies the table.
    ///
    /// It's 6 bytes long (4 bytes for old servers).
    pub table_id: u64,
    /// Reserved for future use; currently always 0.
    pub flags: u16,

    // payload
    /// The name of the database in which the table resides.
    pub database_name: RawText,
    /// The name of the table.
    pub table_name: RawText,
    /// The type of each column in the table, listed from left to right.
    pub columns_type: RawSeq<u8, ColumnType>,
    /// Raw metadata region.
    pub columns_metadata_raw: Vec<u8>,
    /// Decoded metadata, one entry per column.
    pub columns_metadata: Vec<ColumnMetadata>,
    /// For each column, a bit indicating whether data in the column can be NULL or not.
    pub null_bitmask: Bitfield,
    /// Raw optional metadata (MySql >= 8.0.1).
    pub optional_metadata: Vec<u8>,
}

impl TableMapEvent {
    /// Decodes the event body (checksum must be stripped).
    pub fn read(data: &[u8], fde: &FormatDescriptionEvent) -> Result<Self> {
        let mut buf = ParseBuf(data);

        let table_id = if fde.get_event_type_header_length(EventType::TABLE_MAP_EVENT) == 6 {
            // old server
            u64::from(buf.eat_u32_le()?)
        } else {
            buf.eat_u48_le()?
        };
        let flags = buf.eat_u16_le()?;

        let database_name = buf.eat_u8_str()?;
        buf.skip(1)?;
        let table_name = buf.eat_u8_str()?;
        buf.skip(1)?;

        let columns_count = buf.eat_lenenc_len()?;
        let columns_type = buf.eat(columns_count)?;
        let columns_metadata_raw = buf.eat_lenenc_str()?;

        let mut metadata_buf = ParseBuf(columns_metadata_raw);
        let columns_metadata = columns_type
            .iter()
            .map(|ty| {
                let ty = ColumnType::try_from(*ty)?;
                ColumnMetadata::read(ty, &mut metadata_buf)
            })
            .collect::<Result<Vec<_>>>()?;

        let bitmap_len = bitfield_len(columns_count);
        let optional_metadata: &[u8] = if buf.len() != bitmap_len {
            if buf.len() < bitmap_len || fde.split_version() < OPTIONAL_METADATA_VERSION {
                return Err(BinlogError::InvalidNullBitmap {
                    expected: bitmap_len,
                    got: buf.len(),
                });
            }
            &buf.0[bitmap_len..]
        } else {
            &[]
        };
        let null_bitmask = bitfield(buf.eat(bitmap_len)?, columns_count);

        Ok(Self {
            table_id,
            flags,
            database_name: RawText::new(database_name),
            table_name: RawText::new(table_name),
            columns_type: RawSeq::new(columns_type),
            columns_metadata_raw: columns_metadata_raw.to_vec(),
            columns_metadata,
            null_bitmask,
            optional_metadata: optional_metadata.to_vec(),
        })
    }

    /// Returns the number of columns.
    pub fn columns_count(&self) -> usize {
        self.columns_type.len()
    }

    /// Returns database name as a string (lossy converted).
    pub fn database_name(&self) -> Cow<'_, str> {
        self.database_name.as_str()
    }

    /// Returns table name as a string (lossy converted).
    pub fn table_name(&self) -> Cow<'_, str> {
        self.table_name.as_str()
    }

    /// Returns a type of the given column.
    ///
    /// `None` means that the column index is out of range.
    pub fn column_type(
        &self,
        col_idx: usize,
    ) -> std::result::Result<Option<ColumnType>, UnknownColumnType> {
        self.columns_type.get(col_idx).map(|x| x.get()).transpose()
    }

    /// Returns metadata for the given column (`None` if index is out of range).
    pub fn column_metadata(&self, col_idx: usize) -> Option<ColumnMetadata> {
        self.columns_metadata.get(col_idx).copied()
    }

    /// Returns `true` if the given column is nullable.
    pub fn is_nullable(&self, col_idx: usize) -> bool {
        self.null_bitmask.get(col_idx).map(|x| *x).unwrap_or(false)
    }

    /// Table map of a table without columns.
    #[cfg(test)]
    pub(crate) fn empty(table_id: u64) -> Self {
        Self {
            table_id,
            flags: 0,
            database_name: RawText::default(),
            table_name: RawText::default(),
            columns_type: RawSeq::new(Vec::new()),
            columns_metadata_raw: Vec::new(),
            columns_metadata: Vec::new(),
            null_bitmask: Bitfield::new(),
            optional_metadata: Vec::new(),
        }
    }
}
