//! Print the lines of a file that contain at least N pattern occurrences.
//!
//! ```text
//! scan_lines <pattern_file> <target_file> [min_matches]
//! ```
//!
//! The pattern file holds one pattern per line. Every line of the target
//! file is scanned on its own, and printed when it contains at least
//! `min_matches` occurrences (default 2) of any patterns, overlaps counted.
//!
//! Run with: `cargo run --release --example scan_lines -- patterns.txt input.log 2`

use acism::{Cursor, PatternSet};
use anyhow::{bail, Context};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::ops::ControlFlow;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        bail!(
            "usage: {} <pattern_file> <target_file> [min_matches]",
            args.first().map_or("scan_lines", String::as_str)
        );
    }

    let min_matches: usize = match args.get(3) {
        Some(value) => value
            .parse()
            .with_context(|| format!("min_matches must be a number, got {value:?}"))?,
        None => 2,
    };

    let patterns = PatternSet::from_path(&args[1])
        .with_context(|| format!("cannot read patterns from {}", args[1]))?;

    let started = Instant::now();
    let automaton = patterns
        .compile()
        .with_context(|| format!("cannot compile {} patterns", patterns.len()))?;
    eprintln!(
        "compiled {} patterns in {:.3} secs: {}",
        patterns.len(),
        started.elapsed().as_secs_f64(),
        automaton.stats().summary()
    );

    let target = File::open(&args[2]).with_context(|| format!("cannot open {}", args[2]))?;
    let mut reader = BufReader::new(target);
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let mut line = Vec::new();
    let mut printed = 0usize;
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        let text = line.strip_suffix(b"\n").unwrap_or(&line);

        let mut cursor = Cursor::new();
        let mut count = 0usize;
        let _ = automaton.scan(text, &mut cursor, |_| {
            count += 1;
            if count >= min_matches {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        if count >= min_matches {
            out.write_all(text)?;
            out.write_all(b"\n")?;
            printed += 1;
        }
    }
    out.flush()?;

    eprintln!("{printed} lines with at least {min_matches} matches");
    Ok(())
}
