//! TN3270 Protocol Constants and Codes
//!
//! Command codes, order codes, WCC bit masks, structured-field type codes
//! and query-reply IDs for the IBM 3270 data stream, as specified in the
//! 3270 Data Stream Programmer's Reference (GA23-0059) and RFC 2355.

/// 3270 Command Codes (standard, non-SNA)
///
/// The first byte of every host-to-terminal message.
pub const CMD_WRITE: u8 = 0x01;
pub const CMD_ERASE_WRITE: u8 = 0x05;
pub const CMD_ERASE_WRITE_ALTERNATE: u8 = 0x0D;
pub const CMD_WRITE_STRUCTURED_FIELD: u8 = 0x11;
pub const CMD_READ_BUFFER: u8 = 0x02;
pub const CMD_READ_MODIFIED: u8 = 0x06;
pub const CMD_READ_MODIFIED_ALL: u8 = 0x0E;
pub const CMD_ERASE_ALL_UNPROTECTED: u8 = 0x0F;

/// 3270 Command Codes (SNA variants of the same commands)
pub const CMD_WRITE_SNA: u8 = 0xF1;
pub const CMD_ERASE_WRITE_SNA: u8 = 0xF5;
pub const CMD_ERASE_WRITE_ALTERNATE_SNA: u8 = 0x7E;
pub const CMD_WRITE_STRUCTURED_FIELD_SNA: u8 = 0xF3;
pub const CMD_READ_BUFFER_SNA: u8 = 0xF2;
pub const CMD_READ_MODIFIED_SNA: u8 = 0xF6;
pub const CMD_READ_MODIFIED_ALL_SNA: u8 = 0x6E;
pub const CMD_ERASE_ALL_UNPROTECTED_SNA: u8 = 0x6F;

/// 3270 Order Codes
/// Embedded in the data stream between runs of character data
pub const ORDER_SBA: u8 = 0x11; // Set Buffer Address
pub const ORDER_SF: u8 = 0x1D; // Start Field
pub const ORDER_EUA: u8 = 0x12; // Erase Unprotected to Address
pub const ORDER_RA: u8 = 0x3C; // Repeat to Address
pub const ORDER_GE: u8 = 0x08; // Graphics Escape
pub const ORDER_IC: u8 = 0x13; // Insert Cursor

/// Write Control Character (WCC) bits
/// Bit numbering follows IBM convention: bit 7 is the MSB (0x80)
pub const WCC_NOP: u8 = 0x80;
pub const WCC_RESET: u8 = 0x40;
pub const WCC_PRINTER1: u8 = 0x20;
pub const WCC_PRINTER2: u8 = 0x10;
pub const WCC_START_PRINTER: u8 = 0x08;
pub const WCC_SOUND_ALARM: u8 = 0x04;
pub const WCC_KEYBOARD_RESET: u8 = 0x02;
pub const WCC_RESET_MDT: u8 = 0x01;

/// Field attribute byte bits (Start Field order operand)
pub const ATTR_PROTECTED: u8 = 0x20;
pub const ATTR_NUMERIC: u8 = 0x10;
pub const ATTR_DISPLAY: u8 = 0x0C; // bits 2-3: display/intensity/pen group
pub const ATTR_MDT: u8 = 0x01;

/// Display group values (bits 2-3 of the attribute byte)
pub const DISPLAY_NORMAL: u8 = 0x00;
pub const DISPLAY_NORMAL_PEN: u8 = 0x04;
pub const DISPLAY_INTENSIFIED: u8 = 0x08;
pub const DISPLAY_HIDDEN: u8 = 0x0C;

/// Structured field type codes (inner TLV of Write Structured Field)
pub const SF_READ_PARTITION: u8 = 0x01;

/// Read Partition operation codes
pub const RP_QUERY: u8 = 0x02;
pub const RP_QUERY_LIST: u8 = 0x03;

/// Read Partition Query List request types
pub const REQTYPE_LIST: u8 = 0x00;
pub const REQTYPE_EQUIVALENT: u8 = 0x40;

/// Query Reply structured field ID and reply codes
pub const SFID_QUERY_REPLY: u8 = 0x81;
pub const QR_SUMMARY: u8 = 0x80;
pub const QR_USABLE_AREA: u8 = 0x81;
pub const QR_NULL: u8 = 0xFF;

/// AID byte identifying an inbound (terminal-to-host) structured field
pub const AID_STRUCTURED_FIELD: u8 = 0x88;

/// Enum representation of 3270 command codes for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandCode {
    Write,
    EraseWrite,
    EraseWriteAlternate,
    WriteStructuredField,
}

impl CommandCode {
    /// Convert a byte value to a CommandCode enum
    ///
    /// Accepts both the standard and SNA encodings of each command.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            CMD_WRITE | CMD_WRITE_SNA => Some(Self::Write),
            CMD_ERASE_WRITE | CMD_ERASE_WRITE_SNA => Some(Self::EraseWrite),
            CMD_ERASE_WRITE_ALTERNATE | CMD_ERASE_WRITE_ALTERNATE_SNA => {
                Some(Self::EraseWriteAlternate)
            }
            CMD_WRITE_STRUCTURED_FIELD | CMD_WRITE_STRUCTURED_FIELD_SNA => {
                Some(Self::WriteStructuredField)
            }
            _ => None,
        }
    }

    /// Convert CommandCode enum to its SNA byte value
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Write => CMD_WRITE_SNA,
            Self::EraseWrite => CMD_ERASE_WRITE_SNA,
            Self::EraseWriteAlternate => CMD_ERASE_WRITE_ALTERNATE_SNA,
            Self::WriteStructuredField => CMD_WRITE_STRUCTURED_FIELD_SNA,
        }
    }

    /// True for commands that erase the screen before applying orders
    pub fn is_erase(self) -> bool {
        matches!(self, Self::EraseWrite | Self::EraseWriteAlternate)
    }
}

/// True if the byte names a 3270 command this engine recognises but does
/// not implement (the read-family and erase-all-unprotected commands).
pub fn is_recognised_unsupported_command(value: u8) -> bool {
    matches!(
        value,
        CMD_READ_BUFFER
            | CMD_READ_BUFFER_SNA
            | CMD_READ_MODIFIED
            | CMD_READ_MODIFIED_SNA
            | CMD_READ_MODIFIED_ALL
            | CMD_READ_MODIFIED_ALL_SNA
            | CMD_ERASE_ALL_UNPROTECTED
            | CMD_ERASE_ALL_UNPROTECTED_SNA
    )
}

/// True if the byte is an order introducer
pub fn is_order_introducer(value: u8) -> bool {
    matches!(
        value,
        ORDER_SBA | ORDER_SF | ORDER_EUA | ORDER_RA | ORDER_GE | ORDER_IC
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_code_conversion() {
        assert_eq!(CommandCode::from_u8(CMD_WRITE), Some(CommandCode::Write));
        assert_eq!(
            CommandCode::from_u8(CMD_WRITE_SNA),
            Some(CommandCode::Write)
        );
        assert_eq!(
            CommandCode::from_u8(CMD_ERASE_WRITE_ALTERNATE_SNA),
            Some(CommandCode::EraseWriteAlternate)
        );
        assert_eq!(CommandCode::Write.to_u8(), CMD_WRITE_SNA);
        assert_eq!(CommandCode::from_u8(0xAB), None);
    }

    #[test]
    fn test_erase_family() {
        assert!(CommandCode::EraseWrite.is_erase());
        assert!(CommandCode::EraseWriteAlternate.is_erase());
        assert!(!CommandCode::Write.is_erase());
        assert!(!CommandCode::WriteStructuredField.is_erase());
    }

    #[test]
    fn test_recognised_unsupported() {
        assert!(is_recognised_unsupported_command(CMD_READ_BUFFER));
        assert!(is_recognised_unsupported_command(CMD_READ_MODIFIED_SNA));
        assert!(!is_recognised_unsupported_command(CMD_WRITE_SNA));
        assert!(!is_recognised_unsupported_command(0xAB));
    }

    #[test]
    fn test_order_introducers() {
        for b in [ORDER_SBA, ORDER_SF, ORDER_EUA, ORDER_RA, ORDER_GE, ORDER_IC] {
            assert!(is_order_introducer(b));
        }
        assert!(!is_order_introducer(0xC1));
    }
}
