//! Structured fields: inbound Read Partition requests and outbound
//! query replies
//!
//! Outbound replies share one frame: 2-byte big-endian length (inclusive
//! of itself), the Query Reply structured-field ID 0x81, the reply code,
//! then the payload. The complete terminal-to-host message carries the
//! structured-field AID (0x88) ahead of the reply frames.

use log::debug;

use crate::codes::{
    AID_STRUCTURED_FIELD, QR_NULL, QR_SUMMARY, QR_USABLE_AREA, REQTYPE_EQUIVALENT, REQTYPE_LIST,
    SFID_QUERY_REPLY,
};

/// Query List request flavour (byte following the Query List opcode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryRequestType {
    /// Reply only to the listed codes
    List,
    /// Reply with everything equivalent to a plain Query
    Equivalent,
    /// Unknown request byte, carried through for diagnostics
    Other(u8),
}

impl QueryRequestType {
    pub fn from_byte(b: u8) -> Self {
        match b {
            REQTYPE_LIST => QueryRequestType::List,
            REQTYPE_EQUIVALENT => QueryRequestType::Equivalent,
            other => QueryRequestType::Other(other),
        }
    }
}

/// A decoded inbound structured field (Write Structured Field payload).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredField {
    /// Read Partition Query: send every supported query reply
    Query,
    /// Read Partition Query List with its request type and query codes
    QueryList {
        request: QueryRequestType,
        codes: Vec<u8>,
    },
}

/// Query reply codes this terminal supports, in summary order.
pub const SUPPORTED_REPLIES: [u8; 2] = [QR_SUMMARY, QR_USABLE_AREA];

/// Frame a single query reply: length (inclusive), SFID, reply code,
/// payload.
fn frame_reply(reply_id: u8, payload: &[u8]) -> Vec<u8> {
    let len = 4 + payload.len();
    let mut out = Vec::with_capacity(len);
    out.push((len >> 8) as u8);
    out.push((len & 0xFF) as u8);
    out.push(SFID_QUERY_REPLY);
    out.push(reply_id);
    out.extend_from_slice(payload);
    out
}

/// Summary reply: one byte per supported reply code.
pub fn summary_reply(codes: &[u8]) -> Vec<u8> {
    frame_reply(QR_SUMMARY, codes)
}

/// Usable Area reply for a display of `rows` x `cols` cells.
///
/// Payload: addressing-mode flags, width and height in cells, units,
/// X/Y resolution as pels-per-10-inches, character cell size, buffer
/// size in cells.
pub fn usable_area_reply(rows: usize, cols: usize) -> Vec<u8> {
    let buffer = rows * cols;
    let payload = [
        0x01, // 12/14-bit addressing allowed
        (cols >> 8) as u8,
        (cols & 0xFF) as u8,
        (rows >> 8) as u8,
        (rows & 0xFF) as u8,
        0x00, // units: inches
        0x02, // X resolution: 720 pels / 10 in
        0xD0,
        0x01, // Y resolution: 384 pels / 10 in
        0x80,
        0x09, // cell width in pels
        0x10, // cell height in pels
        (buffer >> 8) as u8,
        (buffer & 0xFF) as u8,
    ];
    frame_reply(QR_USABLE_AREA, &payload)
}

/// Null reply, sent when a query list names nothing we support.
pub fn null_reply() -> Vec<u8> {
    frame_reply(QR_NULL, &[])
}

/// Build the complete outbound response to a Read Partition query.
///
/// A plain Query, an Equivalent-type list, or a List naming any
/// supported code gets Summary + Usable Area. A List naming only
/// unsupported codes gets Summary + Null.
pub fn query_response(sf: &StructuredField, rows: usize, cols: usize) -> Vec<u8> {
    let full = match sf {
        StructuredField::Query => true,
        StructuredField::QueryList { request, codes } => match request {
            QueryRequestType::Equivalent => true,
            QueryRequestType::List | QueryRequestType::Other(_) => {
                for &code in codes {
                    if !SUPPORTED_REPLIES.contains(&code) {
                        debug!("unsupported query code 0x{:02X} in query list", code);
                    }
                }
                codes.iter().any(|c| SUPPORTED_REPLIES.contains(c))
            }
        },
    };

    let mut out = vec![AID_STRUCTURED_FIELD];
    out.extend_from_slice(&summary_reply(&SUPPORTED_REPLIES));
    if full {
        out.extend_from_slice(&usable_area_reply(rows, cols));
    } else {
        out.extend_from_slice(&null_reply());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_reply_bytes() {
        assert_eq!(
            summary_reply(&SUPPORTED_REPLIES),
            vec![0x00, 0x06, 0x81, 0x80, 0x80, 0x81]
        );
    }

    #[test]
    fn test_null_reply_bytes() {
        assert_eq!(null_reply(), vec![0x00, 0x04, 0x81, 0xFF]);
    }

    #[test]
    fn test_usable_area_reply_80x24() {
        let reply = usable_area_reply(24, 80);
        assert_eq!(reply.len(), 18);
        assert_eq!(&reply[..4], &[0x00, 0x12, 0x81, 0x81]);
        // cols 80, rows 24
        assert_eq!(&reply[5..9], &[0x00, 0x50, 0x00, 0x18]);
        // buffer size 1920
        assert_eq!(&reply[16..], &[0x07, 0x80]);
    }

    #[test]
    fn test_query_response_full() {
        let resp = query_response(&StructuredField::Query, 24, 80);
        assert_eq!(resp[0], 0x88);
        assert_eq!(&resp[1..7], &[0x00, 0x06, 0x81, 0x80, 0x80, 0x81]);
        // usable area follows the summary
        assert_eq!(&resp[7..11], &[0x00, 0x12, 0x81, 0x81]);
    }

    #[test]
    fn test_query_list_unsupported_codes_get_null() {
        let sf = StructuredField::QueryList {
            request: QueryRequestType::List,
            codes: vec![0x86, 0x87],
        };
        let resp = query_response(&sf, 24, 80);
        assert_eq!(resp[0], 0x88);
        assert_eq!(&resp[1..7], &[0x00, 0x06, 0x81, 0x80, 0x80, 0x81]);
        assert_eq!(&resp[7..], &[0x00, 0x04, 0x81, 0xFF]);
    }

    #[test]
    fn test_query_list_with_supported_code() {
        let sf = StructuredField::QueryList {
            request: QueryRequestType::List,
            codes: vec![QR_USABLE_AREA],
        };
        let resp = query_response(&sf, 24, 80);
        assert_eq!(&resp[7..11], &[0x00, 0x12, 0x81, 0x81]);
    }

    #[test]
    fn test_equivalent_request_is_full() {
        let sf = StructuredField::QueryList {
            request: QueryRequestType::Equivalent,
            codes: vec![],
        };
        let resp = query_response(&sf, 24, 80);
        assert_eq!(&resp[7..11], &[0x00, 0x12, 0x81, 0x81]);
    }
}
