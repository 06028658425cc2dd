//! Field attributes and materialised field views
//!
//! A Start Field order deposits one attribute byte into the buffer; the
//! attribute governs every cell up to the next field boundary. `Field` is
//! the derived read-only view of one such region, handed out by the
//! screen model.

use std::fmt;

use crate::codes::{
    ATTR_MDT, ATTR_NUMERIC, ATTR_PROTECTED, DISPLAY_HIDDEN, DISPLAY_INTENSIFIED,
    DISPLAY_NORMAL_PEN,
};

/// Decoded Start Field attribute byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldAttributes {
    /// Input is rejected in protected fields
    pub protected: bool,
    /// Numeric-only input field
    pub numeric: bool,
    /// Contents are rendered (false = hidden/non-display)
    pub display: bool,
    /// Intensified (highlighted) rendering
    pub intense: bool,
    /// Light-pen selectable
    pub selector_pen: bool,
    /// Modified Data Tag: field changed since last reset
    pub modified: bool,
}

impl FieldAttributes {
    /// Decode the attribute byte of a Start Field order.
    ///
    /// Bits 2-3 form one group selecting among normal, normal+pen,
    /// intensified+pen and hidden rendering.
    pub fn from_byte(attr: u8) -> Self {
        let display_group = attr & DISPLAY_HIDDEN;
        FieldAttributes {
            protected: attr & ATTR_PROTECTED != 0,
            numeric: attr & ATTR_NUMERIC != 0,
            display: display_group != DISPLAY_HIDDEN,
            intense: display_group == DISPLAY_INTENSIFIED,
            selector_pen: display_group == DISPLAY_NORMAL_PEN
                || display_group == DISPLAY_INTENSIFIED,
            modified: attr & ATTR_MDT != 0,
        }
    }

    /// Re-encode as an attribute byte (used by the diagnostic surface
    /// and outbound read replies).
    pub fn to_byte(self) -> u8 {
        let mut attr = 0u8;
        if self.protected {
            attr |= ATTR_PROTECTED;
        }
        if self.numeric {
            attr |= ATTR_NUMERIC;
        }
        if !self.display {
            attr |= DISPLAY_HIDDEN;
        } else if self.intense {
            attr |= DISPLAY_INTENSIFIED;
        } else if self.selector_pen {
            attr |= DISPLAY_NORMAL_PEN;
        }
        if self.modified {
            attr |= ATTR_MDT;
        }
        attr
    }
}

/// One field of the screen: its start position, attributes, and a copy
/// of its cell contents.
///
/// `start` is the buffer position of the attribute cell. The implicit
/// field of an unformatted screen has no attribute cell and reports
/// `start == -1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub start: i32,
    pub attributes: FieldAttributes,
    pub contents: Vec<Option<char>>,
}

impl Field {
    /// Field contents as a string, unset cells rendered as spaces.
    pub fn text(&self) -> String {
        self.contents.iter().map(|c| c.unwrap_or(' ')).collect()
    }

    /// Field contents with unset cells dropped entirely.
    pub fn text_without_nulls(&self) -> String {
        self.contents.iter().filter_map(|c| *c).collect()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = &self.attributes;
        write!(
            f,
            "Field(pos={},p={},n={},d={},i={},s={},m={},{})",
            self.start,
            a.protected,
            a.numeric,
            a.display,
            a.intense,
            a.selector_pen,
            a.modified,
            self.text()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_bit() {
        assert!(FieldAttributes::from_byte(0x20).protected);
        assert!(!FieldAttributes::from_byte(0x00).protected);
    }

    #[test]
    fn test_numeric_bit() {
        assert!(FieldAttributes::from_byte(0x10).numeric);
        assert!(!FieldAttributes::from_byte(0x20).numeric);
    }

    #[test]
    fn test_display_group() {
        // 00 = normal display, no pen
        let a = FieldAttributes::from_byte(0x00);
        assert!(a.display && !a.intense && !a.selector_pen);
        // 01 = normal display, pen detectable
        let a = FieldAttributes::from_byte(0x04);
        assert!(a.display && !a.intense && a.selector_pen);
        // 10 = intensified, pen detectable
        let a = FieldAttributes::from_byte(0x08);
        assert!(a.display && a.intense && a.selector_pen);
        // 11 = non-display, non-detectable
        let a = FieldAttributes::from_byte(0x0C);
        assert!(!a.display && !a.intense && !a.selector_pen);
    }

    #[test]
    fn test_mdt_bit() {
        assert!(FieldAttributes::from_byte(0x01).modified);
    }

    #[test]
    fn test_byte_roundtrip() {
        for attr in [0x00u8, 0x01, 0x04, 0x08, 0x0C, 0x10, 0x20, 0x21, 0x2D, 0x3C] {
            let decoded = FieldAttributes::from_byte(attr);
            assert_eq!(
                FieldAttributes::from_byte(decoded.to_byte()),
                decoded,
                "attr 0x{:02X}",
                attr
            );
        }
    }

    #[test]
    fn test_display_rendering() {
        let field = Field {
            start: 4,
            attributes: FieldAttributes::from_byte(0x20),
            contents: vec![Some('H'), Some('I'), None],
        };
        assert_eq!(
            field.to_string(),
            "Field(pos=4,p=true,n=false,d=true,i=false,s=false,m=false,HI )"
        );
    }

    #[test]
    fn test_text_helpers() {
        let field = Field {
            start: -1,
            attributes: FieldAttributes::default(),
            contents: vec![Some('A'), None, Some('B')],
        };
        assert_eq!(field.text(), "A B");
        assert_eq!(field.text_without_nulls(), "AB");
    }
}
