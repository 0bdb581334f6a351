// Copyright (c) 2021 Anatoly Ikorsky
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

use std::{borrow::Cow, convert::TryFrom, fmt};

use crate::{
    binlog::{
        consts::{BinlogVersion, EventType, StatusVarKey},
        error::{BinlogError, Result},
        events::FormatDescriptionEvent,
    },
    io::ParseBuf,
    misc::RawText,
};

/// `UpdatedDbNames` count written instead of names when a query touches too many databases.
const OVER_MAX_DBS_IN_EVENT_MTS: u8 = 254;

/// A query event is created for each query that modifies the database, unless the query
/// is logged row-based.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct QueryEvent {
    // post-header fields
    /// The ID of the thread that issued this statement. It is needed for temporary tables.
    pub thread_id: u32,
    /// The time from when the query started to when it was logged in the binlog, in seconds.
    pub execution_time: u32,
    /// Error code generated by the master. If the master fails, the slave will fail with
    /// the same error code.
    pub error_code: u16,

    // payload
    /// Zero or more status variables.
    ///
    /// Only available if binlog version >= 4 (empty otherwise).
    pub status_vars: StatusVars,
    /// The currently selected database name.
    pub schema: RawText,
    /// The SQL query.
    pub query: RawText,
}

impl QueryEvent {
    /// Length of the fixed part of a post-header, where 3.23, 4.x and 5.0 agree.
    pub const MINIMAL_POST_HEADER_LEN: usize = 4 + 4 + 1 + 2;

    /// Decodes the event body (checksum must be stripped).
    pub fn read(data: &[u8], fde: &FormatDescriptionEvent) -> Result<Self> {
        let mut buf = ParseBuf(data);
        let post_header_len = usize::from(fde.get_event_type_header_length(EventType::QUERY_EVENT));

        let thread_id = buf.eat_u32_le()?;
        let execution_time = buf.eat_u32_le()?;
        let schema_len = buf.eat_u8()? as usize;
        let error_code = buf.eat_u16_le()?;
        let mut consumed = Self::MINIMAL_POST_HEADER_LEN;

        let status_vars_len = if fde.version() >= BinlogVersion::Version4 {
            consumed += 2;
            buf.eat_u16_le()? as usize
        } else {
            0
        };

        // post-header extension of newer servers
        buf.skip(post_header_len.saturating_sub(consumed))?;

        let status_vars = buf.eat(status_vars_len)?;
        let schema = buf.eat(schema_len)?;
        buf.skip(1)?;
        let query = buf.eat_all();

        Ok(Self {
            thread_id,
            execution_time,
            error_code,
            status_vars: StatusVars(status_vars.to_vec()),
            schema: RawText::new(schema),
            query: RawText::new(query),
        })
    }

    /// Returns the SQL query (lossy converted).
    pub fn query(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.query.as_bytes())
    }

    /// Returns the default schema name.
    pub fn schema(&self) -> Cow<'_, str> {
        self.schema.as_str()
    }
}

/// Status variable value.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum StatusVarVal<'a> {
    Flags2(u32),
    SqlMode(u64),
    /// Ignored by this implementation.
    Catalog(&'a [u8]),
    AutoIncrement {
        increment: u16,
        offset: u16,
    },
    Charset {
        charset_client: u16,
        collation_connection: u16,
        collation_server: u16,
    },
    /// Will be empty if timezone length is `0`.
    TimeZone(&'a [u8]),
    /// Will be empty if catalog length is `0`.
    CatalogNz(&'a [u8]),
    LcTimeNames(u16),
    CharsetDatabase(u16),
    TableMapForUpdate(u64),
    MasterDataWritten(u32),
    Invoker {
        username: &'a [u8],
        hostname: &'a [u8],
    },
    /// Will be empty if the query touched too many databases.
    UpdatedDbNames(Vec<&'a [u8]>),
    Microseconds(u32),
    CommitTs,
    CommitTs2,
    /// `0` is interpreted as `false` and everything else as `true`.
    ExplicitDefaultsForTimestamp(bool),
    DdlLoggedWithXid(u64),
    DefaultCollationForUtf8mb4(u16),
    SqlRequirePrimaryKey(u8),
    DefaultTableEncryption(u8),
}

/// Raw status variable.
#[derive(Clone, Copy, Eq, PartialEq, Hash)]
pub struct StatusVar<'a> {
    key: StatusVarKey,
    value: &'a [u8],
}

impl<'a> StatusVar<'a> {
    /// Status variable key.
    pub fn key(&self) -> StatusVarKey {
        self.key
    }

    /// Raw value of a status variable (key excluded).
    pub fn raw_value(&self) -> &'a [u8] {
        self.value
    }

    /// Returns parsed value of this status variable.
    pub fn value(&self) -> Result<StatusVarVal<'a>> {
        let mut buf = ParseBuf(self.value);

        let value = match self.key {
            StatusVarKey::Flags2 => StatusVarVal::Flags2(buf.eat_u32_le()?),
            StatusVarKey::SqlMode => StatusVarVal::SqlMode(buf.eat_u64_le()?),
            StatusVarKey::Catalog => StatusVarVal::Catalog(buf.eat_u8_str()?),
            StatusVarKey::AutoIncrement => StatusVarVal::AutoIncrement {
                increment: buf.eat_u16_le()?,
                offset: buf.eat_u16_le()?,
            },
            StatusVarKey::Charset => StatusVarVal::Charset {
                charset_client: buf.eat_u16_le()?,
                collation_connection: buf.eat_u16_le()?,
                collation_server: buf.eat_u16_le()?,
            },
            StatusVarKey::TimeZone => StatusVarVal::TimeZone(buf.eat_u8_str()?),
            StatusVarKey::CatalogNz => StatusVarVal::CatalogNz(buf.eat_u8_str()?),
            StatusVarKey::LcTimeNames => StatusVarVal::LcTimeNames(buf.eat_u16_le()?),
            StatusVarKey::CharsetDatabase => StatusVarVal::CharsetDatabase(buf.eat_u16_le()?),
            StatusVarKey::TableMapForUpdate => {
                StatusVarVal::TableMapForUpdate(buf.eat_u64_le()?)
            }
            StatusVarKey::MasterDataWritten => {
                StatusVarVal::MasterDataWritten(buf.eat_u32_le()?)
            }
            StatusVarKey::Invoker => StatusVarVal::Invoker {
                username: buf.eat_u8_str()?,
                hostname: buf.eat_u8_str()?,
            },
            StatusVarKey::UpdatedDbNames => {
                let mut count = buf.eat_u8()?;
                if count == OVER_MAX_DBS_IN_EVENT_MTS {
                    count = 0;
                }
                let mut names = Vec::with_capacity(usize::from(count));
                for _ in 0..count {
                    let len = buf.0.iter().position(|x| *x == 0).ok_or(BinlogError::Truncated {
                        needed: buf.len() + 1,
                        available: buf.len(),
                    })?;
                    names.push(buf.eat(len)?);
                    buf.skip(1)?;
                }
                StatusVarVal::UpdatedDbNames(names)
            }
            StatusVarKey::Microseconds => {
                StatusVarVal::Microseconds(buf.eat_uint_le(3)? as u32)
            }
            StatusVarKey::CommitTs => StatusVarVal::CommitTs,
            StatusVarKey::CommitTs2 => StatusVarVal::CommitTs2,
            StatusVarKey::ExplicitDefaultsForTimestamp => {
                StatusVarVal::ExplicitDefaultsForTimestamp(buf.eat_u8()? != 0)
            }
            StatusVarKey::DdlLoggedWithXid => StatusVarVal::DdlLoggedWithXid(buf.eat_u64_le()?),
            StatusVarKey::DefaultCollationForUtf8mb4 => {
                StatusVarVal::DefaultCollationForUtf8mb4(buf.eat_u16_le()?)
            }
            StatusVarKey::SqlRequirePrimaryKey => {
                StatusVarVal::SqlRequirePrimaryKey(buf.eat_u8()?)
            }
            StatusVarKey::DefaultTableEncryption => {
                StatusVarVal::DefaultTableEncryption(buf.eat_u8()?)
            }
        };

        Ok(value)
    }
}

impl fmt::Debug for StatusVar<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusVar")
            .field("key", &self.key)
            .field("value", &self.value())
            .finish()
    }
}

/// Status variables of a QueryEvent.
#[derive(Clone, Default, Eq, PartialEq, Hash)]
pub struct StatusVars(pub Vec<u8>);

impl StatusVars {
    /// Returns an iterator over QueryEvent status variables.
    pub fn iter(&self) -> StatusVarsIterator<'_> {
        StatusVarsIterator::new(&self.0)
    }

    /// Returns a status variable by key.
    ///
    /// Variables that follow an unknown key can't be reached.
    pub fn get_status_var(&self, needle: StatusVarKey) -> Result<Option<StatusVar<'_>>> {
        for var in self.iter() {
            let var = var?;
            if var.key == needle {
                return Ok(Some(var));
            }
        }
        Ok(None)
    }
}

impl fmt::Debug for StatusVars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.iter().fmt(f)
    }
}

/// Iterator over status vars of a `QueryEvent`.
///
/// Status variables are not self-delimiting, so iteration stops after the first error.
#[derive(Clone, Eq, PartialEq)]
pub struct StatusVarsIterator<'a> {
    buf: ParseBuf<'a>,
    failed: bool,
}

impl<'a> StatusVarsIterator<'a> {
    /// Creates new instance.
    pub fn new(status_vars: &'a [u8]) -> StatusVarsIterator<'a> {
        Self {
            buf: ParseBuf(status_vars),
            failed: false,
        }
    }

    fn next_var(&mut self) -> Result<StatusVar<'a>> {
        let raw_key = self.buf.eat_u8()?;
        let key = StatusVarKey::try_from(raw_key).map_err(BinlogError::UnknownStatusVar)?;

        // length of the value, some of them are prefixed
        let peek = |offset: usize| -> Result<usize> {
            self.buf
                .0
                .get(offset)
                .map(|x| usize::from(*x))
                .ok_or(BinlogError::Truncated {
                    needed: offset + 1,
                    available: self.buf.len(),
                })
        };

        let len = match key {
            StatusVarKey::Flags2 => 4,
            StatusVarKey::SqlMode => 8,
            StatusVarKey::Catalog => 1 + peek(0)? + 1,
            StatusVarKey::AutoIncrement => 4,
            StatusVarKey::Charset => 6,
            StatusVarKey::TimeZone => 1 + peek(0)?,
            StatusVarKey::CatalogNz => 1 + peek(0)?,
            StatusVarKey::LcTimeNames => 2,
            StatusVarKey::CharsetDatabase => 2,
            StatusVarKey::TableMapForUpdate => 8,
            StatusVarKey::MasterDataWritten => 4,
            StatusVarKey::Invoker => {
                let user_len = peek(0)?;
                1 + user_len + 1 + peek(1 + user_len)?
            }
            StatusVarKey::UpdatedDbNames => {
                let mut count = peek(0)?;
                if count == usize::from(OVER_MAX_DBS_IN_EVENT_MTS) {
                    count = 0;
                }
                let mut total = 1;
                for _ in 0..count {
                    while peek(total)? != 0 {
                        total += 1;
                    }
                    total += 1;
                }
                total
            }
            StatusVarKey::Microseconds => 3,
            StatusVarKey::CommitTs => 0,
            StatusVarKey::CommitTs2 => 0,
            StatusVarKey::ExplicitDefaultsForTimestamp => 1,
            StatusVarKey::DdlLoggedWithXid => 8,
            StatusVarKey::DefaultCollationForUtf8mb4 => 2,
            StatusVarKey::SqlRequirePrimaryKey => 1,
            StatusVarKey::DefaultTableEncryption => 1,
        };

        let value = self.buf.eat(len)?;
        Ok(StatusVar { key, value })
    }
}

impl fmt::Debug for StatusVarsIterator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

impl<'a> Iterator for StatusVarsIterator<'a> {
    type Item = Result<StatusVar<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.buf.is_empty() {
            return None;
        }

        let var = self.next_var();
        self.failed = var.is_err();
        Some(var)
    }
}
