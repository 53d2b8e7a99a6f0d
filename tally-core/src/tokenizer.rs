//! Split free-text statement descriptions into keyword candidates.
//!
//! A description such as `AMAZON.COM*TO3Q13XI0 AMZN.COM/BILL WA` becomes
//! `amazon, com, to, xi, amzn, com, bill`: lowercase runs of letters, with digits
//! and punctuation acting as separators.
//!
//! Short runs are noise. A run cut off by a digit or punctuation mark inside a
//! word must be at least 2 letters; a run that reaches the end of its word
//! must be at least 3. The two thresholds differ on purpose and keyword files
//! are written against them, so they must not be unified.

use std::iter::Peekable;
use std::str::Chars;

/// Minimum letters for a run terminated by a non-letter inside a word.
pub const MIN_MID_WORD_LEN: usize = 2;
/// Minimum letters for a run terminated by the end of its word.
pub const MIN_WORD_END_LEN: usize = 3;

/// Lazy token stream over a description. Created by [`tokenize`].
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    chars: Peekable<Chars<'a>>,
}

/// Tokenize a description. The result is lazy; collect it to keep it.
pub fn tokenize(description: &str) -> Tokens<'_> {
    Tokens {
        chars: description.chars().peekable(),
    }
}

impl Iterator for Tokens<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut run = String::new();
        let mut run_len = 0usize;

        while let Some(c) = self.chars.next() {
            if c.is_alphabetic() {
                run.extend(c.to_lowercase());
                run_len += 1;

                let word_ends = self.chars.peek().is_none_or(|next| next.is_whitespace());
                if word_ends {
                    if run_len >= MIN_WORD_END_LEN {
                        return Some(run);
                    }
                    run.clear();
                    run_len = 0;
                }
            } else if run_len > 0 {
                // digit or punctuation inside a word (whitespace always follows
                // a letter run that was already closed above)
                if run_len >= MIN_MID_WORD_LEN {
                    return Some(run);
                }
                run.clear();
                run_len = 0;
            }
        }

        None
    }
}
