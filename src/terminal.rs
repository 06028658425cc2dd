//! Terminal facade
//!
//! The concurrency boundary of the engine: one screen behind a mutex, a
//! condvar signalled after every applied message. Inbound messages are
//! applied strictly in the order `process_inbound` is called; any number
//! of reader threads may block in the waiting searches, which re-check
//! their predicate on each signal and never busy-spin.

use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::codes::CommandCode;
use crate::config::TerminalConfig;
use crate::datastream::decode_inbound;
use crate::ebcdic::{CharacterSet, Cp037};
use crate::error::{Result, SearchError, TerminalError};
use crate::field::Field;
use crate::screen::Screen;
use crate::structured_field::query_response;

struct State {
    screen: Screen,
    interrupted: bool,
}

struct Shared {
    state: Mutex<State>,
    changed: Condvar,
}

/// Thread-safe handle to one 3270 terminal. Clones share the screen.
#[derive(Clone)]
pub struct Terminal {
    shared: Arc<Shared>,
    charset: Arc<dyn CharacterSet>,
}

impl Terminal {
    /// A terminal of the given size using the CP037 code page.
    ///
    /// # Panics
    ///
    /// Panics if `rows` or `cols` is zero. Use [`Terminal::from_config`]
    /// for a validating, non-panicking constructor.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_charset(rows, cols, Arc::new(Cp037))
    }

    /// # Panics
    ///
    /// Panics if `rows` or `cols` is zero.
    pub fn with_charset(rows: usize, cols: usize, charset: Arc<dyn CharacterSet>) -> Self {
        info!("terminal created, {}x{}", rows, cols);
        Terminal {
            shared: Arc::new(Shared {
                state: Mutex::new(State {
                    screen: Screen::new(rows, cols),
                    interrupted: false,
                }),
                changed: Condvar::new(),
            }),
            charset,
        }
    }

    pub fn from_config(config: &TerminalConfig) -> Result<Self> {
        config.validate()?;
        let charset = config.charset()?;
        Ok(Self::with_charset(config.rows, config.cols, charset))
    }

    pub fn rows(&self) -> usize {
        self.lock().screen.rows()
    }

    pub fn cols(&self) -> usize {
        self.lock().screen.cols()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.shared.state.lock().unwrap()
    }

    /// Decode one inbound record and apply it to the screen.
    ///
    /// Decoding happens outside the lock. Waiters are woken after every
    /// applied message. For a Write Structured Field carrying a query,
    /// the encoded reply bytes (AID 0x88 plus the query reply frames)
    /// are returned for the caller to send back to the host.
    pub fn process_inbound(&self, data: &[u8]) -> Result<Option<Vec<u8>>> {
        let message = decode_inbound(data, self.charset.as_ref())?;

        let mut state = self.lock();
        let reply = if message.command == CommandCode::WriteStructuredField {
            let (rows, cols) = (state.screen.rows(), state.screen.cols());
            message
                .structured_fields
                .first()
                .map(|sf| query_response(sf, rows, cols))
        } else {
            state.screen.apply(&message);
            None
        };
        drop(state);

        self.shared.changed.notify_all();
        if let Some(reply) = &reply {
            debug!("query reply, {} bytes", reply.len());
        }
        Ok(reply)
    }

    /// Move the cursor to the 1-based `(row, col)` position.
    pub fn set_cursor_position(&self, row: usize, col: usize) -> Result<()> {
        let mut state = self.lock();
        let position = self.validate_position(&state.screen, row, col)?;
        state.screen.set_cursor(position);
        Ok(())
    }

    /// The cursor as a 1-based `(row, col)` pair.
    pub fn cursor_position(&self) -> (usize, usize) {
        let state = self.lock();
        let cols = state.screen.cols();
        let cursor = state.screen.cursor();
        (cursor / cols + 1, cursor % cols + 1)
    }

    fn validate_position(
        &self,
        screen: &Screen,
        row: usize,
        col: usize,
    ) -> std::result::Result<usize, TerminalError> {
        if row == 0 || col == 0 {
            return Err(TerminalError::InvalidCursorPosition { row, col });
        }
        if row > screen.rows() {
            return Err(TerminalError::RowOutOfRange {
                row,
                rows: screen.rows(),
            });
        }
        if col > screen.cols() {
            return Err(TerminalError::ColOutOfRange {
                col,
                cols: screen.cols(),
            });
        }
        Ok((row - 1) * screen.cols() + (col - 1))
    }

    /// Text of `length` cells from the 1-based `(row, col)` position.
    /// No wraparound: reads past the end of the buffer are an error.
    pub fn retrieve_text(&self, row: usize, col: usize, length: usize) -> Result<String> {
        let state = self.lock();
        let position = self.validate_position(&state.screen, row, col)?;
        Ok(state.screen.retrieve_text(position, length)?)
    }

    /// Text of `length` cells starting at the cursor.
    pub fn retrieve_text_at_cursor(&self, length: usize) -> Result<String> {
        let state = self.lock();
        let cursor = state.screen.cursor();
        Ok(state.screen.retrieve_text(cursor, length)?)
    }

    /// Clear every unprotected field, leaving the form intact.
    pub fn erase_input(&self) {
        self.lock().screen.erase_input();
        self.shared.changed.notify_all();
    }

    /// Snapshot of the fields partitioning the screen.
    pub fn fields(&self) -> Vec<Field> {
        self.lock().screen.fields()
    }

    /// The whole screen as text, unset cells rendered as spaces.
    pub fn screen_text(&self) -> String {
        self.lock().screen.text()
    }

    /// Wake every blocked search with the interrupted error. The flag
    /// stays set: searches after an interrupt fail until `resume`.
    pub fn interrupt(&self) {
        self.lock().interrupted = true;
        self.shared.changed.notify_all();
        info!("terminal interrupted");
    }

    /// Clear the interrupted flag, re-enabling waits.
    pub fn resume(&self) {
        self.lock().interrupted = false;
    }

    /// Wait until `text` appears anywhere on the screen (cells scanned
    /// with unset positions dropped). If `fail_text` shows up first the
    /// search fails immediately; fail-text takes priority when both are
    /// present.
    pub fn wait_for_text_on_screen(
        &self,
        text: &str,
        fail_text: Option<&str>,
        timeout: Duration,
    ) -> Result<()> {
        let fails: Vec<&str> = fail_text.into_iter().collect();
        self.wait_for_any_text_on_screen(&[text], &fails, timeout)
    }

    /// Like `wait_for_text_on_screen`, scanning only the field under
    /// the cursor.
    pub fn wait_for_text_in_field(
        &self,
        text: &str,
        fail_text: Option<&str>,
        timeout: Duration,
    ) -> Result<()> {
        let fails: Vec<&str> = fail_text.into_iter().collect();
        self.wait_for_any_text_in_field(&[text], &fails, timeout)
    }

    /// Wait until any of `texts` appears anywhere on the screen. Every
    /// snapshot is checked against all of `fail_texts` first, then
    /// against the search terms, so a fail text ends the wait even when
    /// a search term is present on the same screen.
    pub fn wait_for_any_text_on_screen(
        &self,
        texts: &[&str],
        fail_texts: &[&str],
        timeout: Duration,
    ) -> Result<()> {
        self.wait_for(texts, fail_texts, timeout, |screen| {
            screen.text_without_nulls()
        })
    }

    /// Like `wait_for_any_text_on_screen`, scanning only the field
    /// under the cursor.
    pub fn wait_for_any_text_in_field(
        &self,
        texts: &[&str],
        fail_texts: &[&str],
        timeout: Duration,
    ) -> Result<()> {
        self.wait_for(texts, fail_texts, timeout, |screen| {
            screen.field_containing(screen.cursor()).text_without_nulls()
        })
    }

    /// Wait until `text` appears exactly `expected` times on screen.
    pub fn wait_for_occurrences(
        &self,
        text: &str,
        expected: usize,
        timeout: Duration,
    ) -> Result<()> {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        loop {
            if state.interrupted {
                return Err(SearchError::Interrupted.into());
            }
            let scanned = state.screen.text_without_nulls();
            let actual = scanned.matches(text).count();
            if actual == expected {
                return Ok(());
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(SearchError::IncorrectOccurrences {
                    text: text.to_string(),
                    expected,
                    actual,
                    scanned,
                }
                .into());
            }
            let (guard, _) = self
                .shared
                .changed
                .wait_timeout(state, deadline - now)
                .unwrap();
            state = guard;
        }
    }

    fn wait_for<F>(
        &self,
        texts: &[&str],
        fail_texts: &[&str],
        timeout: Duration,
        snapshot: F,
    ) -> Result<()>
    where
        F: Fn(&Screen) -> String,
    {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        loop {
            if state.interrupted {
                return Err(SearchError::Interrupted.into());
            }
            let scanned = snapshot(&state.screen);
            if let Some(fail) = fail_texts.iter().find(|t| scanned.contains(**t)) {
                return Err(SearchError::ErrorTextFound {
                    found: fail.to_string(),
                    scanned,
                }
                .into());
            }
            if texts.iter().any(|t| scanned.contains(*t)) {
                return Ok(());
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(SearchError::TextNotFound {
                    text: texts.join(", "),
                    scanned,
                }
                .into());
            }
            let (guard, _) = self
                .shared
                .changed
                .wait_timeout(state, deadline - now)
                .unwrap();
            state = guard;
        }
    }
}
