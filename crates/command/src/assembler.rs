//! Two-pass argument assembly
//!
//! Every compiled command goes through [`assemble`]:
//!
//! 1. **Length pass**: sum [`Clause::token_count`] over the clauses present.
//! 2. **Fill pass**: allocate exactly that many slots once and let each
//!    clause write its tokens, in the same order the length pass visited them.
//!
//! The clause list is the single source of ordering for both passes, so the
//! canonical clause order holds by construction. A clause that writes a
//! different number of tokens than it announced is a bug in that clause and
//! panics immediately; it is never reported as a user error.

use ftkit_core::{Error, Result, Token};
use tracing::trace;

/// One independently sized piece of a command.
pub trait Clause {
    /// Number of tokens [`Clause::write_tokens`] will emit
    fn token_count(&self) -> usize;

    /// Emit exactly [`Clause::token_count`] tokens
    fn write_tokens(&self, out: &mut TokenWriter);
}

/// Fixed-capacity sink for the fill pass.
///
/// Refuses to grow past the length computed in the length pass.
#[derive(Debug)]
pub struct TokenWriter {
    tokens: Vec<Token>,
    len: usize,
}

impl TokenWriter {
    fn with_len(len: usize) -> Self {
        TokenWriter {
            tokens: Vec::with_capacity(len),
            len,
        }
    }

    /// Append one token.
    ///
    /// # Panics
    ///
    /// Panics if the precomputed length is already reached.
    pub fn push(&mut self, token: impl Into<Token>) {
        assert!(
            self.tokens.len() < self.len,
            "clause wrote past the precomputed command length {}",
            self.len
        );
        self.tokens.push(token.into());
    }

    /// Append a count prefix followed by the items.
    pub fn push_counted<I, T>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
        T: Into<Token>,
    {
        let items = items.into_iter();
        self.push(items.len());
        for item in items {
            self.push(item);
        }
    }

    /// Tokens written so far
    pub fn written(&self) -> usize {
        self.tokens.len()
    }

    fn finish(self) -> Box<[Token]> {
        assert_eq!(
            self.tokens.len(),
            self.len,
            "fill pass wrote {} tokens but length pass computed {}",
            self.tokens.len(),
            self.len
        );
        self.tokens.into_boxed_slice()
    }
}

/// Common clause shapes shared by the index and aggregation compilers.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    /// A single positional value with no keyword: the query string
    Bare(Token),
    /// A lone keyword: `NOHL`
    Flag(&'static str),
    /// Keyword followed by one value: `FILTER <expr>`
    Keyed(&'static str, Token),
    /// Keyword, item count, items: `PREFIX 2 a: b:`
    Counted(&'static str, Vec<Token>),
}

impl Clause for Part {
    fn token_count(&self) -> usize {
        match self {
            Part::Bare(_) | Part::Flag(_) => 1,
            Part::Keyed(_, _) => 2,
            Part::Counted(_, items) => 2 + items.len(),
        }
    }

    fn write_tokens(&self, out: &mut TokenWriter) {
        match self {
            Part::Bare(value) => out.push(value.clone()),
            Part::Flag(keyword) => out.push(*keyword),
            Part::Keyed(keyword, value) => {
                out.push(*keyword);
                out.push(value.clone());
            }
            Part::Counted(keyword, items) => {
                out.push(*keyword);
                out.push_counted(items.iter().cloned());
            }
        }
    }
}

impl<C: Clause> Clause for Vec<C> {
    fn token_count(&self) -> usize {
        self.iter().map(Clause::token_count).sum()
    }

    fn write_tokens(&self, out: &mut TokenWriter) {
        for clause in self {
            clause.write_tokens(out);
        }
    }
}

/// Compile clauses into one exactly sized token sequence.
///
/// # Panics
///
/// Panics if any clause writes a different number of tokens than its
/// `token_count` reported.
pub fn assemble(clauses: &[&dyn Clause]) -> Box<[Token]> {
    let len: usize = clauses.iter().map(|c| c.token_count()).sum();
    let mut writer = TokenWriter::with_len(len);

    for clause in clauses {
        let start = writer.written();
        clause.write_tokens(&mut writer);
        assert_eq!(
            writer.written() - start,
            clause.token_count(),
            "clause token count disagrees with tokens written"
        );
    }

    trace!(clauses = clauses.len(), tokens = len, "assembled command");
    writer.finish()
}

/// Reject an unsigned option value that no integer token can carry.
pub(crate) fn check_int(option: &str, value: u64) -> Result<()> {
    if i64::try_from(value).is_err() {
        return Err(Error::invalid(format!(
            "{} {} exceeds the largest integer argument {}",
            option,
            value,
            i64::MAX
        )));
    }
    Ok(())
}
