//! Field-partitioned screen buffer
//!
//! The screen is a flat vector of cells (`None` = never written) plus a
//! sorted map of field boundaries keyed by buffer position. Fields are
//! never stored; they are derived from the boundary map on demand, which
//! keeps "the fields partition the buffer" true by construction. All
//! decoded orders are applied here and nowhere else.

use std::collections::BTreeMap;

use log::{debug, trace};

use crate::datastream::{InboundMessage, Order};
use crate::error::TerminalError;
use crate::field::{Field, FieldAttributes};

#[derive(Debug, Clone)]
pub struct Screen {
    rows: usize,
    cols: usize,
    cells: Vec<Option<char>>,
    /// Field boundaries: buffer position of the attribute cell
    attributes: BTreeMap<usize, FieldAttributes>,
    /// Working buffer address while applying orders
    working: usize,
    cursor: usize,
}

impl Screen {
    /// A blank screen of `rows` x `cols` cells.
    ///
    /// # Panics
    ///
    /// Panics if `rows` or `cols` is zero; every operation needs at
    /// least one cell to address.
    pub fn new(rows: usize, cols: usize) -> Self {
        assert!(
            rows > 0 && cols > 0,
            "screen dimensions must be non-zero, got {}x{}",
            rows,
            cols
        );
        Screen {
            rows,
            cols,
            cells: vec![None; rows * cols],
            attributes: BTreeMap::new(),
            working: 0,
            cursor: 0,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, position: usize) {
        self.cursor = position % self.size();
    }

    /// Clear everything: cells, field boundaries, cursor.
    pub fn erase(&mut self) {
        self.cells.fill(None);
        self.attributes.clear();
        self.cursor = 0;
    }

    /// Apply one decoded message to the buffer.
    ///
    /// Erase-family commands clear the screen first; the working address
    /// always starts at zero. A WCC with reset or reset-MDT clears the
    /// modified flag of every field.
    pub fn apply(&mut self, message: &InboundMessage) {
        debug!(
            "applying {:?} with {} orders",
            message.command,
            message.orders.len()
        );
        if message.command.is_erase() {
            self.erase();
        }
        if let Some(wcc) = &message.wcc {
            if wcc.reset || wcc.reset_mdt {
                for attrs in self.attributes.values_mut() {
                    attrs.modified = false;
                }
            }
        }
        self.working = 0;
        for order in &message.orders {
            trace!("order {}", order);
            self.apply_order(order);
        }
    }

    fn apply_order(&mut self, order: &Order) {
        match order {
            Order::SetBufferAddress(addr) => {
                self.working = *addr as usize % self.size();
            }
            Order::StartField(attrs) => {
                self.attributes.insert(self.working, *attrs);
                self.cells[self.working] = None;
                self.working = (self.working + 1) % self.size();
            }
            Order::Text(text) => {
                for ch in text.chars() {
                    self.put(ch);
                }
            }
            Order::GraphicsEscape(byte) => {
                // Raw byte, code-page translation bypassed
                self.put(*byte as char);
            }
            Order::RepeatToAddress(ch, addr) => {
                let target = *addr as usize % self.size();
                loop {
                    self.put(*ch);
                    if self.working == target {
                        break;
                    }
                }
            }
            Order::EraseUnprotectedToAddress(addr) => {
                let target = *addr as usize % self.size();
                let mut pos = self.working;
                loop {
                    if !self.attributes.contains_key(&pos) && !self.is_protected(pos) {
                        self.cells[pos] = None;
                    }
                    pos = (pos + 1) % self.size();
                    if pos == target {
                        break;
                    }
                }
            }
            Order::InsertCursor => {
                self.cursor = self.working;
            }
        }
    }

    /// Write one character at the working address and advance. Writing
    /// over an attribute cell removes that boundary, merging the field
    /// into its predecessor. A NUL clears the cell to unset.
    fn put(&mut self, ch: char) {
        self.attributes.remove(&self.working);
        self.cells[self.working] = if ch == '\0' { None } else { Some(ch) };
        self.working = (self.working + 1) % self.size();
    }

    /// The attributes governing `position`: those of the nearest
    /// boundary at or before it, wrapping to the last boundary on the
    /// screen when none precedes it. An unformatted screen is one
    /// implicit unprotected field.
    pub fn attributes_at(&self, position: usize) -> FieldAttributes {
        if let Some((_, attrs)) = self.attributes.range(..=position).next_back() {
            return *attrs;
        }
        match self.attributes.iter().next_back() {
            Some((_, attrs)) => *attrs,
            None => FieldAttributes::default(),
        }
    }

    pub fn is_protected(&self, position: usize) -> bool {
        self.attributes_at(position).protected
    }

    /// Materialise the fields partitioning the buffer, in boundary
    /// order. Each field's contents run from the cell after its
    /// attribute to the next boundary, wrapping past the end of the
    /// buffer for the last field.
    pub fn fields(&self) -> Vec<Field> {
        if self.attributes.is_empty() {
            return vec![Field {
                start: -1,
                attributes: FieldAttributes::default(),
                contents: self.cells.clone(),
            }];
        }

        let starts: Vec<usize> = self.attributes.keys().copied().collect();
        let mut fields = Vec::with_capacity(starts.len());
        for (i, &start) in starts.iter().enumerate() {
            let end = starts[(i + 1) % starts.len()];
            let mut contents = Vec::new();
            let mut pos = (start + 1) % self.size();
            while pos != end {
                contents.push(self.cells[pos]);
                pos = (pos + 1) % self.size();
            }
            fields.push(Field {
                start: start as i32,
                attributes: self.attributes[&start],
                contents,
            });
        }
        fields
    }

    /// The field containing `position`, for cursor-relative searches.
    pub fn field_containing(&self, position: usize) -> Field {
        let fields = self.fields();
        if fields.len() == 1 && fields[0].start == -1 {
            return fields[0].clone();
        }
        let start = match self.attributes.range(..=position).next_back() {
            Some((&s, _)) => s as i32,
            None => match self.attributes.keys().next_back() {
                Some(&s) => s as i32,
                None => -1,
            },
        };
        fields
            .into_iter()
            .find(|f| f.start == start)
            .unwrap_or(Field {
                start: -1,
                attributes: FieldAttributes::default(),
                contents: self.cells.clone(),
            })
    }

    /// Clear the contents of every unprotected field, leaving boundaries
    /// and protected fields untouched, and drop their modified flags.
    pub fn erase_input(&mut self) {
        let size = self.size();
        for pos in 0..size {
            if !self.attributes.contains_key(&pos) && !self.is_protected(pos) {
                self.cells[pos] = None;
            }
        }
        for attrs in self.attributes.values_mut() {
            if !attrs.protected {
                attrs.modified = false;
            }
        }
    }

    /// Text of `length` cells starting at `position`, unset cells as
    /// spaces. Does not wrap: running off the end of the buffer is an
    /// error.
    pub fn retrieve_text(
        &self,
        position: usize,
        length: usize,
    ) -> Result<String, TerminalError> {
        if position + length > self.size() {
            return Err(TerminalError::LengthExceedsBuffer { position, length });
        }
        Ok(self.cells[position..position + length]
            .iter()
            .map(|c| c.unwrap_or(' '))
            .collect())
    }

    /// The whole screen as text, unset cells rendered as spaces.
    pub fn text(&self) -> String {
        self.cells.iter().map(|c| c.unwrap_or(' ')).collect()
    }

    /// The whole screen as text with unset cells dropped, the form the
    /// waiting searches scan.
    pub fn text_without_nulls(&self) -> String {
        self.cells.iter().filter_map(|c| *c).collect()
    }
}
