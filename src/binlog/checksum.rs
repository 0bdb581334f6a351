// Copyright (c) 2021 Anatoly Ikorsky
//
// Licensed under the Apache License, Version 2.0
// <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0> or the MIT
// license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. All files in the project carrying such notice may not be copied,
// modified, or distributed except according to those terms.

//! Event size and checksum validation.

use byteorder::{ByteOrder, LittleEndian as LE};

use crate::{
    binlog::{
        consts::{BinlogChecksumAlg, EventFlags, UnknownChecksumAlg},
        ctx::BinlogCtx,
        error::{BinlogError, Result},
        events::FormatDescriptionEvent,
        header::BinlogEventHeader,
    },
    misc::{split_version, RawField},
};

/// Binlog event footer.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct BinlogEventFooter {
    /// Raw checksum algorithm description (`None` for servers without checksum support).
    pub checksum_alg: Option<RawField<u8, BinlogChecksumAlg>>,
}

impl BinlogEventFooter {
    /// Length of the checksum algorithm description.
    pub const BINLOG_CHECKSUM_ALG_DESC_LEN: usize = 1;
    /// Length of the checksum.
    pub const BINLOG_CHECKSUM_LEN: usize = 4;
    /// Minimum MySql version that supports checksums.
    pub const CHECKSUM_VERSION_PRODUCT: (u8, u8, u8) = (5, 6, 1);

    /// Returns parsed checksum algorithm, or raw value if algorithm is unknown.
    pub fn get_checksum_alg(
        &self,
    ) -> std::result::Result<Option<BinlogChecksumAlg>, UnknownChecksumAlg> {
        self.checksum_alg.as_ref().map(RawField::get).transpose()
    }

    /// Reads the footer of a format description event out of its full body.
    ///
    /// Server version decides whether the body ends with the algorithm description
    /// and a checksum.
    pub fn read(fde_body: &[u8]) -> Result<Self> {
        let version_end =
            FormatDescriptionEvent::SERVER_VER_OFFSET + FormatDescriptionEvent::SERVER_VER_LEN;
        let server_version = match fde_body
            .get(FormatDescriptionEvent::SERVER_VER_OFFSET..version_end)
        {
            Some(server_version) => server_version,
            None => return Ok(Self { checksum_alg: None }),
        };

        if split_version(server_version) < Self::CHECKSUM_VERSION_PRODUCT {
            return Ok(Self { checksum_alg: None });
        }

        let suffix_len = Self::BINLOG_CHECKSUM_ALG_DESC_LEN + Self::BINLOG_CHECKSUM_LEN;
        if fde_body.len() < version_end + suffix_len {
            return Err(BinlogError::Truncated {
                needed: version_end + suffix_len,
                available: fde_body.len(),
            });
        }

        Ok(Self {
            checksum_alg: Some(RawField::new(fde_body[fde_body.len() - suffix_len])),
        })
    }
}

impl Default for BinlogEventFooter {
    fn default() -> Self {
        BinlogEventFooter {
            checksum_alg: Some(RawField::new(
                BinlogChecksumAlg::BINLOG_CHECKSUM_ALG_OFF as u8,
            )),
        }
    }
}

/// Event body that passed validation.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ValidatedBody<'a> {
    /// Body without the checksum-related suffix.
    pub data: &'a [u8],
    /// Footer the event was validated against.
    pub footer: BinlogEventFooter,
    /// Checksum stored in the event, if any.
    pub checksum: Option<u32>,
}

/// Calculates CRC32 of an event.
///
/// `data` is the event body without the checksum itself (for a format description event
/// it includes the algorithm description).
pub fn calc_checksum(header_bytes: &[u8], is_fde: bool, data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();

    if is_fde && header_bytes.len() >= BinlogEventHeader::LEN {
        // the flag gets cleared when the binlog is closed,
        // so it is never covered by the checksum
        let mut header = [0_u8; BinlogEventHeader::LEN];
        header.copy_from_slice(&header_bytes[..BinlogEventHeader::LEN]);
        header[17] &= !(EventFlags::LOG_EVENT_BINLOG_IN_USE_F.bits() as u8);
        hasher.update(&header);
        hasher.update(&header_bytes[BinlogEventHeader::LEN..]);
    } else {
        hasher.update(header_bytes);
    }

    hasher.update(data);
    hasher.finalize()
}

/// Validates size and checksum of an event.
///
/// Format description events carry their own footer, other events are validated against
/// the footer of the description adopted by `ctx`.
pub fn validate_event<'a>(
    header_bytes: &[u8],
    header: &BinlogEventHeader,
    body: &'a [u8],
    ctx: &BinlogCtx,
) -> Result<ValidatedBody<'a>> {
    let total = header_bytes.len() + body.len();
    if total != header.event_size as usize {
        return Err(BinlogError::SizeMismatch {
            expected: header.event_size as usize,
            got: total,
        });
    }

    let is_fde = header.is_format_description();
    let footer = if is_fde {
        BinlogEventFooter::read(body)?
    } else {
        ctx.footer()
    };

    let alg = match footer.get_checksum_alg()? {
        Some(alg) => alg,
        None => {
            return Ok(ValidatedBody {
                data: body,
                footer,
                checksum: None,
            })
        }
    };

    // fde always contains a checksum field (see WL#2540)
    let suffix_len = match (is_fde, alg) {
        (true, _) => {
            BinlogEventFooter::BINLOG_CHECKSUM_ALG_DESC_LEN + BinlogEventFooter::BINLOG_CHECKSUM_LEN
        }
        (false, BinlogChecksumAlg::BINLOG_CHECKSUM_ALG_CRC32) => {
            BinlogEventFooter::BINLOG_CHECKSUM_LEN
        }
        (false, BinlogChecksumAlg::BINLOG_CHECKSUM_ALG_OFF) => 0,
    };

    if suffix_len == 0 {
        return Ok(ValidatedBody {
            data: body,
            footer,
            checksum: None,
        });
    }

    if body.len() < suffix_len {
        return Err(BinlogError::Truncated {
            needed: suffix_len,
            available: body.len(),
        });
    }

    let (covered, stored) = body.split_at(body.len() - BinlogEventFooter::BINLOG_CHECKSUM_LEN);
    let stored = LE::read_u32(stored);

    if alg == BinlogChecksumAlg::BINLOG_CHECKSUM_ALG_CRC32 {
        let computed = calc_checksum(header_bytes, is_fde, covered);
        if computed != stored {
            return Err(BinlogError::ChecksumMismatch {
                expected: stored,
                computed,
            });
        }
    }

    Ok(ValidatedBody {
        data: &body[..body.len() - suffix_len],
        footer,
        checksum: Some(stored),
    })
}
