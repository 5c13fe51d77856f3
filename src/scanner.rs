//! Scanning text with a compiled automaton.
//!
//! A scan walks the text one byte at a time, carrying a single state
//! integer in a caller-owned [`Cursor`]. Passing the same cursor to
//! successive calls continues the stream, so a text split into chunks at
//! arbitrary boundaries reports exactly the matches of the whole text.
//!
//! Every occurrence of every pattern is reported, overlaps included. When
//! several patterns end at the same byte the longest comes first, followed
//! by successively shorter suffixes.
//!
//! # Examples
//!
//! ```rust
//! use acism::{Automaton, Cursor, Match};
//! use std::ops::ControlFlow;
//!
//! let automaton = Automaton::new(&["he", "she", "hers"])?;
//! let mut cursor = Cursor::new();
//! let mut found = Vec::new();
//!
//! for chunk in [&b"us"[..], &b"he"[..], &b"rs"[..]] {
//!     let _ = automaton.scan(chunk, &mut cursor, |m| {
//!         found.push(m);
//!         ControlFlow::<()>::Continue(())
//!     });
//! }
//!
//! // offsets are relative to each chunk
//! assert_eq!(found[0], Match { pattern: 1, end: 2 });
//! assert_eq!(found[1], Match { pattern: 0, end: 2 });
//! assert_eq!(found[2], Match { pattern: 2, end: 2 });
//! # Ok::<(), acism::AcismError>(())
//! ```

use crate::automaton::{Automaton, ROOT_STATE};
use serde::Serialize;
use std::convert::Infallible;
use std::ops::ControlFlow;

/// Resumable scan position for one stream.
///
/// Start every stream from [`Cursor::new`] (the root state) and pass the
/// same cursor to each chunk of that stream. A cursor is only meaningful
/// for the automaton that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cursor(u32);

impl Cursor {
    pub const ROOT: Cursor = Cursor(ROOT_STATE);

    pub fn new() -> Self {
        Self::ROOT
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_STATE
    }

    /// Forget any partial match, as at the start of a new stream.
    pub fn reset(&mut self) {
        self.0 = ROOT_STATE;
    }

    /// Raw state value.
    pub fn state(&self) -> u32 {
        self.0
    }
}

/// One pattern occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Match {
    /// Index of the pattern in the list given at construction.
    pub pattern: usize,
    /// Offset just past the last matched byte.
    pub end: usize,
}

impl Automaton {
    /// Scan `text`, calling `on_match` for every pattern occurrence.
    ///
    /// Offsets in the reported [`Match`]es are relative to `text`. The
    /// cursor is updated so that the next call continues the same stream.
    ///
    /// Returning [`ControlFlow::Break`] from the callback stops the scan
    /// after the byte that produced the match; no further matches are
    /// reported and the break value is returned. The cursor is left at
    /// the state following that byte, so scanning the rest of the text
    /// with it reports exactly the remaining matches. Returns
    /// `ControlFlow::Continue(())` once all of `text` is consumed.
    pub fn scan<B, F>(&self, text: &[u8], cursor: &mut Cursor, mut on_match: F) -> ControlFlow<B>
    where
        F: FnMut(Match) -> ControlFlow<B>,
    {
        let mut state = cursor.0;

        for (pos, &byte) in text.iter().enumerate() {
            let symbol = self.symbol(byte);
            if symbol == 0 {
                // no pattern contains this byte
                state = ROOT_STATE;
                continue;
            }

            let mut transition = self.transition(state, symbol);
            while !self.is_valid(transition) && state != ROOT_STATE {
                state = self.backlink(state);
                transition = self.transition(state, symbol);
            }
            if !self.is_valid(transition) {
                continue;
            }
            if !transition.has_match_flags() {
                state = self.next_state(transition);
                continue;
            }

            // Report every pattern ending here by walking the backlink chain
            // from the pre-transition state. The resume state is the target
            // of the first non-leaf forward transition found on the way.
            let mut chain = state;
            state = if self.is_leaf(transition) {
                ROOT_STATE
            } else {
                self.next_state(transition)
            };
            let mut stopped = None;

            loop {
                if self.is_valid(transition) {
                    if transition.is_match() && stopped.is_none() {
                        let slot = chain + u32::from(symbol);
                        let pattern = self.pattern_at(slot);
                        debug_assert!(pattern.is_some(), "match slot {slot} has no pattern");
                        if let Some(pattern) = pattern {
                            let found = Match {
                                pattern,
                                end: pos + 1,
                            };
                            if let ControlFlow::Break(value) = on_match(found) {
                                stopped = Some(value);
                            }
                        }
                    }
                    if state == ROOT_STATE && !self.is_leaf(transition) {
                        state = self.next_state(transition);
                    }
                    if state != ROOT_STATE && !transition.is_suffix() {
                        break;
                    }
                }
                if chain == ROOT_STATE {
                    break;
                }
                chain = self.backlink(chain);
                transition = self.transition(chain, symbol);
            }

            if let Some(value) = stopped {
                cursor.0 = state;
                return ControlFlow::Break(value);
            }
        }

        cursor.0 = state;
        ControlFlow::Continue(())
    }

    /// Every match in `text`, in scan order.
    pub fn find_all(&self, text: &[u8]) -> Vec<Match> {
        let mut matches = Vec::new();
        let mut cursor = Cursor::new();
        let _ = self.scan(text, &mut cursor, |found| {
            matches.push(found);
            ControlFlow::<Infallible>::Continue(())
        });
        matches
    }

    pub fn count_matches(&self, text: &[u8]) -> usize {
        let mut count = 0;
        let mut cursor = Cursor::new();
        let _ = self.scan(text, &mut cursor, |_| {
            count += 1;
            ControlFlow::<Infallible>::Continue(())
        });
        count
    }

    /// Whether any pattern occurs in `text`. Stops at the first match.
    pub fn is_match(&self, text: &[u8]) -> bool {
        let mut cursor = Cursor::new();
        self.scan(text, &mut cursor, |_| ControlFlow::Break(()))
            .is_break()
    }

    /// Start a stream that reports absolute offsets.
    pub fn stream(&self) -> Stream<'_> {
        Stream::new(self)
    }
}

/// A cursor bundled with the number of bytes already scanned, so matches
/// carry offsets from the start of the stream rather than of the chunk.
#[derive(Debug, Clone)]
pub struct Stream<'a> {
    automaton: &'a Automaton,
    cursor: Cursor,
    consumed: usize,
}

impl<'a> Stream<'a> {
    pub fn new(automaton: &'a Automaton) -> Self {
        Self {
            automaton,
            cursor: Cursor::new(),
            consumed: 0,
        }
    }

    /// Scan the next chunk of the stream.
    ///
    /// On [`ControlFlow::Break`] only the bytes up to and including the
    /// breaking match count as consumed; feed the rest of the chunk,
    /// starting at `consumed()` in stream coordinates, to continue.
    pub fn feed<B, F>(&mut self, chunk: &[u8], mut on_match: F) -> ControlFlow<B>
    where
        F: FnMut(Match) -> ControlFlow<B>,
    {
        let automaton = self.automaton;
        let offset = self.consumed;
        let mut scanned = chunk.len();

        let flow = automaton.scan(chunk, &mut self.cursor, |found| {
            let flow = on_match(Match {
                pattern: found.pattern,
                end: offset + found.end,
            });
            if flow.is_break() {
                scanned = found.end;
            }
            flow
        });

        self.consumed += scanned;
        flow
    }

    pub fn automaton(&self) -> &'a Automaton {
        self.automaton
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Bytes scanned so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Start over as a new stream.
    pub fn reset(&mut self) {
        self.cursor.reset();
        self.consumed = 0;
    }
}
