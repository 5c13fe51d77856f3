//! # ACISM
//!
//! Multi-pattern byte matching with an interleaved state-machine
//! Aho-Corasick automaton.
//!
//! A set of fixed byte patterns is compiled once into a single packed
//! transition table. Each state of the automaton occupies a handful of
//! slots inside that shared table rather than a row of its own, so even
//! large pattern sets compile to a few bytes per pattern byte. Scanning is
//! a single linear pass that reports every occurrence of every pattern,
//! overlaps included, and can be resumed across arbitrarily split chunks.
//!
//! ## Quick Start
//!
//! ### Basic Usage
//!
//! ```rust
//! use acism::Automaton;
//!
//! let automaton = Automaton::new(&["he", "she", "his", "hers"])?;
//!
//! for m in automaton.find_all(b"ahishers") {
//!     println!("pattern {} ends at {}", m.pattern, m.end);
//! }
//! assert_eq!(automaton.count_matches(b"ahishers"), 4);
//! # Ok::<(), acism::AcismError>(())
//! ```
//!
//! ### Streaming
//!
//! ```rust
//! use acism::Automaton;
//! use std::ops::ControlFlow;
//!
//! let automaton = Automaton::new(&["needle"])?;
//! let mut stream = automaton.stream();
//! let mut ends = Vec::new();
//!
//! for chunk in [&b"hay nee"[..], &b"dle hay"[..]] {
//!     let _ = stream.feed(chunk, |m| {
//!         ends.push(m.end);
//!         ControlFlow::<()>::Continue(())
//!     });
//! }
//! assert_eq!(ends, vec![10]);
//! # Ok::<(), acism::AcismError>(())
//! ```
//!
//! ### Limits
//!
//! ```rust
//! use acism::{CompileConfig, Compiler};
//!
//! let config = CompileConfig::constrained().with_max_patterns(2);
//! let compiler = Compiler::with_config(config);
//! assert!(compiler.compile(&["a", "b", "c"]).is_err());
//! ```

pub mod automaton;
pub mod batch;
pub mod compiler;
pub mod config;
pub mod error;
pub mod match_hash;
pub mod patterns;
pub mod scanner;
pub mod transition;

// Compiled automaton and scanning
pub use automaton::{Automaton, AutomatonStats};
pub use scanner::{Cursor, Match, Stream};

// Construction and configuration
pub use compiler::alphabet::SymbolTable;
pub use compiler::Compiler;
pub use config::{CompileConfig, MemoryConfig, ParallelConfig};
pub use patterns::PatternSet;

// Errors
pub use error::{AcismError, Result};
