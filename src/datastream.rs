//! Inbound 3270 data stream decoder
//!
//! Pure transform from a framed byte record (one command plus its
//! operands) to a typed `InboundMessage`. No screen state is touched
//! here; interpretation happens in the screen model. That split keeps
//! the decoder testable against literal byte vectors and keeps decoding
//! lock-free.

use std::fmt;

use crate::addressing::decode_address_at;
use crate::codes::{
    self, CommandCode, ORDER_EUA, ORDER_GE, ORDER_IC, ORDER_RA, ORDER_SBA, ORDER_SF,
    RP_QUERY, RP_QUERY_LIST, SF_READ_PARTITION,
};
use crate::ebcdic::CharacterSet;
use crate::error::{DatastreamError, DatastreamResult};
use crate::field::FieldAttributes;
use crate::structured_field::{QueryRequestType, StructuredField};

/// Write Control Character: the byte following every Write-family
/// command, eight independent flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteControlCharacter {
    pub nop: bool,
    pub reset: bool,
    pub printer1: bool,
    pub printer2: bool,
    pub start_printer: bool,
    pub sound_alarm: bool,
    pub keyboard_reset: bool,
    pub reset_mdt: bool,
}

impl WriteControlCharacter {
    pub fn from_byte(b: u8) -> Self {
        WriteControlCharacter {
            nop: b & codes::WCC_NOP != 0,
            reset: b & codes::WCC_RESET != 0,
            printer1: b & codes::WCC_PRINTER1 != 0,
            printer2: b & codes::WCC_PRINTER2 != 0,
            start_printer: b & codes::WCC_START_PRINTER != 0,
            sound_alarm: b & codes::WCC_SOUND_ALARM != 0,
            keyboard_reset: b & codes::WCC_KEYBOARD_RESET != 0,
            reset_mdt: b & codes::WCC_RESET_MDT != 0,
        }
    }
}

/// A decoded 3270 order.
#[derive(Debug, Clone, PartialEq)]
pub enum Order {
    SetBufferAddress(u16),
    StartField(FieldAttributes),
    EraseUnprotectedToAddress(u16),
    /// Repeated character, then the exclusive target address
    RepeatToAddress(char, u16),
    /// Raw byte stored without code-page translation
    GraphicsEscape(u8),
    InsertCursor,
    /// Run of code-page-translated character data; NUL characters mark
    /// cells to clear
    Text(String),
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::SetBufferAddress(addr) => write!(f, "SBA({})", addr),
            Order::StartField(attrs) => write!(f, "SF(0x{:02X})", attrs.to_byte()),
            Order::EraseUnprotectedToAddress(addr) => write!(f, "EUA({})", addr),
            Order::RepeatToAddress(ch, addr) => write!(f, "RA('{}',{})", ch, addr),
            Order::GraphicsEscape(byte) => write!(f, "GE(0x{:02X})", byte),
            Order::InsertCursor => write!(f, "IC"),
            Order::Text(text) => write!(f, "Text('{}')", text),
        }
    }
}

/// One fully decoded inbound message.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub command: CommandCode,
    /// Present for the Write family, absent for Write Structured Field
    pub wcc: Option<WriteControlCharacter>,
    pub orders: Vec<Order>,
    pub structured_fields: Vec<StructuredField>,
}

/// Decode one inbound record into a message.
///
/// Recognised-but-unsupported commands (the read family and Erase All
/// Unprotected) and unknown command bytes fail with distinct errors;
/// truncated operands name the order that was cut short.
pub fn decode_inbound(
    data: &[u8],
    charset: &dyn CharacterSet,
) -> DatastreamResult<InboundMessage> {
    let cmd_byte = match data.first() {
        Some(&b) => b,
        None => return Err(DatastreamError::UnrecognisedCommand(0)),
    };
    let command = match CommandCode::from_u8(cmd_byte) {
        Some(c) => c,
        None if codes::is_recognised_unsupported_command(cmd_byte) => {
            return Err(DatastreamError::UnsupportedCommand(cmd_byte));
        }
        None => return Err(DatastreamError::UnrecognisedCommand(cmd_byte)),
    };

    if command == CommandCode::WriteStructuredField {
        let structured_fields = decode_structured_fields(&data[1..])?;
        return Ok(InboundMessage {
            command,
            wcc: None,
            orders: Vec::new(),
            structured_fields,
        });
    }

    let wcc_byte = match data.get(1) {
        Some(&b) => b,
        None => return Err(DatastreamError::TruncatedOrder("Write Control Character")),
    };
    let wcc = WriteControlCharacter::from_byte(wcc_byte);
    let orders = decode_orders(&data[2..], charset)?;

    Ok(InboundMessage {
        command,
        wcc: Some(wcc),
        orders,
        structured_fields: Vec::new(),
    })
}

fn decode_orders(data: &[u8], charset: &dyn CharacterSet) -> DatastreamResult<Vec<Order>> {
    let mut orders = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        match data[pos] {
            ORDER_SBA => {
                let addr = decode_address_at(data, pos + 1)?;
                orders.push(Order::SetBufferAddress(addr));
                pos += 3;
            }
            ORDER_SF => {
                let attr = match data.get(pos + 1) {
                    Some(&b) => b,
                    None => return Err(DatastreamError::TruncatedOrder("Start Field")),
                };
                orders.push(Order::StartField(FieldAttributes::from_byte(attr)));
                pos += 2;
            }
            ORDER_EUA => {
                let addr = decode_address_at(data, pos + 1)?;
                orders.push(Order::EraseUnprotectedToAddress(addr));
                pos += 3;
            }
            ORDER_RA => {
                let ch_byte = match data.get(pos + 1) {
                    Some(&b) => b,
                    None => return Err(DatastreamError::TruncatedOrder("Repeat to Address")),
                };
                let addr = decode_address_at(data, pos + 2)?;
                orders.push(Order::RepeatToAddress(charset.to_char(ch_byte), addr));
                pos += 4;
            }
            ORDER_GE => {
                let byte = match data.get(pos + 1) {
                    Some(&b) => b,
                    None => return Err(DatastreamError::TruncatedOrder("Graphics Escape")),
                };
                orders.push(Order::GraphicsEscape(byte));
                pos += 2;
            }
            ORDER_IC => {
                orders.push(Order::InsertCursor);
                pos += 1;
            }
            _ => {
                let start = pos;
                while pos < data.len() && !codes::is_order_introducer(data[pos]) {
                    pos += 1;
                }
                let text: String = data[start..pos]
                    .iter()
                    .map(|&b| if b == 0x00 { '\0' } else { charset.to_char(b) })
                    .collect();
                orders.push(Order::Text(text));
            }
        }
    }

    Ok(orders)
}

/// Walk the inner TLV loop of a Write Structured Field record.
///
/// Each entry: 2-byte big-endian length inclusive of itself, one type
/// byte, payload. Only Read Partition (Query / Query List) is decoded.
fn decode_structured_fields(data: &[u8]) -> DatastreamResult<Vec<StructuredField>> {
    let mut fields = Vec::new();
    let mut pos = 0;

    while pos < data.len() {
        if pos + 3 > data.len() {
            return Err(DatastreamError::TruncatedStructuredField);
        }
        let len = ((data[pos] as usize) << 8) | data[pos + 1] as usize;
        if len < 3 || pos + len > data.len() {
            return Err(DatastreamError::TruncatedStructuredField);
        }
        let sf_type = data[pos + 2];
        let payload = &data[pos + 3..pos + len];

        if sf_type != SF_READ_PARTITION {
            return Err(DatastreamError::UnsupportedStructuredField(sf_type));
        }
        // Payload: partition ID, then the operation byte
        if payload.len() < 2 {
            return Err(DatastreamError::TruncatedStructuredField);
        }
        let op = payload[1];
        match op {
            RP_QUERY => fields.push(StructuredField::Query),
            RP_QUERY_LIST => {
                if payload.len() < 3 {
                    return Err(DatastreamError::TruncatedStructuredField);
                }
                fields.push(StructuredField::QueryList {
                    request: QueryRequestType::from_byte(payload[2]),
                    codes: payload[3..].to_vec(),
                });
            }
            other => return Err(DatastreamError::UnsupportedQueryRequestType(other)),
        }

        pos += len;
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ebcdic::Cp037;

    fn decode(data: &[u8]) -> DatastreamResult<InboundMessage> {
        decode_inbound(data, &Cp037)
    }

    #[test]
    fn test_write_with_sba_and_eua() {
        let msg = decode(&[0xF1, 0x40, 0x11, 0x40, 0x40, 0x12, 0x40, 0x40]).unwrap();
        assert_eq!(msg.command, CommandCode::Write);
        assert_eq!(
            msg.orders,
            vec![
                Order::SetBufferAddress(0),
                Order::EraseUnprotectedToAddress(0)
            ]
        );
    }

    #[test]
    fn test_write_with_graphics_escape() {
        let msg = decode(&[0xF1, 0x40, 0x11, 0x40, 0x40, 0x08, 0x50]).unwrap();
        assert_eq!(
            msg.orders,
            vec![Order::SetBufferAddress(0), Order::GraphicsEscape(0x50)]
        );
    }

    #[test]
    fn test_wcc_decoding() {
        let msg = decode(&[0xF1, 0xC3]).unwrap();
        let wcc = msg.wcc.unwrap();
        assert!(wcc.nop);
        assert!(wcc.reset);
        assert!(wcc.keyboard_reset);
        assert!(wcc.reset_mdt);
        assert!(!wcc.sound_alarm);
    }

    #[test]
    fn test_text_translation() {
        // EBCDIC "HI" after an SBA
        let msg = decode(&[0xF1, 0x40, 0x11, 0x40, 0x40, 0xC8, 0xC9]).unwrap();
        assert_eq!(
            msg.orders,
            vec![
                Order::SetBufferAddress(0),
                Order::Text("HI".to_string())
            ]
        );
    }

    #[test]
    fn test_repeat_to_address_operand_order() {
        // char byte first, then the 2-byte target address
        let msg = decode(&[0xF1, 0x40, 0x3C, 0x7C, 0xC1, 0x4F]).unwrap();
        assert_eq!(msg.orders, vec![Order::RepeatToAddress('@', 79)]);
    }

    #[test]
    fn test_start_field_and_insert_cursor() {
        let msg = decode(&[0xF5, 0x40, 0x1D, 0x20, 0x13]).unwrap();
        assert_eq!(msg.command, CommandCode::EraseWrite);
        assert_eq!(msg.orders.len(), 2);
        assert!(matches!(msg.orders[0], Order::StartField(a) if a.protected));
        assert_eq!(msg.orders[1], Order::InsertCursor);
    }

    #[test]
    fn test_unsupported_command() {
        assert_eq!(
            decode(&[0xF2, 0x40]),
            Err(DatastreamError::UnsupportedCommand(0xF2))
        );
        assert_eq!(
            decode(&[0x06]),
            Err(DatastreamError::UnsupportedCommand(0x06))
        );
    }

    #[test]
    fn test_unrecognised_command() {
        assert_eq!(
            decode(&[0xAB]),
            Err(DatastreamError::UnrecognisedCommand(0xAB))
        );
    }

    #[test]
    fn test_truncated_address() {
        assert_eq!(
            decode(&[0xF1, 0x40, 0x11, 0x40]),
            Err(DatastreamError::AddressTerminatedEarly)
        );
    }

    #[test]
    fn test_truncated_orders() {
        assert_eq!(
            decode(&[0xF1, 0x40, 0x1D]),
            Err(DatastreamError::TruncatedOrder("Start Field"))
        );
        assert_eq!(
            decode(&[0xF1, 0x40, 0x08]),
            Err(DatastreamError::TruncatedOrder("Graphics Escape"))
        );
        assert_eq!(
            decode(&[0xF1, 0x40, 0x3C]),
            Err(DatastreamError::TruncatedOrder("Repeat to Address"))
        );
    }

    #[test]
    fn test_missing_wcc() {
        assert_eq!(
            decode(&[0xF1]),
            Err(DatastreamError::TruncatedOrder("Write Control Character"))
        );
    }

    #[test]
    fn test_wsf_query() {
        // len=5, type=Read Partition, PID=0xFF, op=Query
        let msg = decode(&[0xF3, 0x00, 0x05, 0x01, 0xFF, 0x02]).unwrap();
        assert_eq!(msg.command, CommandCode::WriteStructuredField);
        assert!(msg.wcc.is_none());
        assert_eq!(msg.structured_fields, vec![StructuredField::Query]);
    }

    #[test]
    fn test_wsf_query_list() {
        let msg = decode(&[0xF3, 0x00, 0x08, 0x01, 0xFF, 0x03, 0x00, 0x80, 0x81]).unwrap();
        assert_eq!(
            msg.structured_fields,
            vec![StructuredField::QueryList {
                request: QueryRequestType::List,
                codes: vec![0x80, 0x81],
            }]
        );
    }

    #[test]
    fn test_wsf_unsupported_type() {
        assert_eq!(
            decode(&[0xF3, 0x00, 0x04, 0x40, 0x00]),
            Err(DatastreamError::UnsupportedStructuredField(0x40))
        );
    }

    #[test]
    fn test_wsf_truncated() {
        assert_eq!(
            decode(&[0xF3, 0x00, 0x09, 0x01, 0xFF, 0x02]),
            Err(DatastreamError::TruncatedStructuredField)
        );
        assert_eq!(
            decode(&[0xF3, 0x00]),
            Err(DatastreamError::TruncatedStructuredField)
        );
    }

    #[test]
    fn test_order_display() {
        assert_eq!(Order::SetBufferAddress(0).to_string(), "SBA(0)");
        assert_eq!(Order::EraseUnprotectedToAddress(0).to_string(), "EUA(0)");
        assert_eq!(Order::GraphicsEscape(0x50).to_string(), "GE(0x50)");
        assert_eq!(Order::InsertCursor.to_string(), "IC");
    }
}
