//! Fixed-width hot-code report
//!
//! Renders the top of a profile as a table:
//!
//! ```text
//! ------------------------------------------------------------------------------------------------------------------------
//! | COUNT   | %         | METHOD                                                                                         |
//! ------------------------------------------------------------------------------------------------------------------------
//! |    1200 |     37.50 | java.util.HashMap.get(Ljava/lang/Object;)Ljava/lang/Object;                                    |
//! ------------------------------------------------------------------------------------------------------------------------
//! ```
//!
//! Percentages are shares of every sample in the window, not only of the rows
//! shown, so they need not add up to 100.

use crate::config::SamplingConfig;
use crate::error::{ProfileError, ReportError};
use crate::traits::{Profile, RankedEntry};

use core::fmt::{self, Display};
use std::io;

/// Width of the count column
pub const COUNT_WIDTH: usize = 7;
/// Width of the percentage column
pub const RATIO_WIDTH: usize = 9;
/// Width of the identifier column
pub const KEY_WIDTH: usize = 94;
/// Width of a full table row, borders included
pub const TABLE_WIDTH: usize = COUNT_WIDTH + RATIO_WIDTH + KEY_WIDTH + 10;

const ELLIPSIS: &str = "...";

/// Renders profiles as fixed-width tables
///
/// Control characters in an identifier are written escaped (a newline shows
/// as `\n`) so a key can never break a row. Identifiers that are still wider
/// than [`KEY_WIDTH`] characters are cut and end in `...`, keeping every row
/// at the table width. Width is counted in `char`s; a multi-byte character is
/// never split.
///
/// # Example
///
/// ```
/// use hotcode::profile::TopKProfile;
/// use hotcode::report::Reporter;
///
/// let mut profile = TopKProfile::new();
/// for _ in 0..3 { profile.record("Lexer::advance"); }
/// profile.record("Parser::expr");
///
/// let report = Reporter::new(10).render(&profile).unwrap();
/// assert!(report.contains("Lexer::advance"));
/// assert!(report.contains("75.00"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reporter {
    top: usize,
}

impl Reporter {
    /// Create a reporter showing at most `top` rows
    pub fn new(top: usize) -> Self {
        Self { top }
    }

    /// Create a reporter sized by the configured `top` option
    pub fn from_config(config: &SamplingConfig) -> Self {
        Self::new(config.top())
    }

    /// Number of rows requested from the profile
    pub fn top(&self) -> usize {
        self.top
    }

    /// Render the top rows of `profile`
    pub fn render<P>(&self, profile: &P) -> Result<String, ProfileError>
    where
        P: Profile + ?Sized,
        P::Key: Display,
    {
        render_with(profile, self.top)
    }

    /// Render the top rows of `profile` into `out`
    pub fn write_to<P, W>(&self, profile: &P, mut out: W) -> Result<(), ReportError>
    where
        P: Profile + ?Sized,
        P::Key: Display,
        W: io::Write,
    {
        let table = self.render(profile)?;
        out.write_all(table.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// Render the `k` most frequent keys of `profile`
///
/// Fails with [`ProfileError::InvalidArgument`] when `k == 0`. An empty
/// profile renders header and rules with no rows.
pub fn render_with<P>(profile: &P, k: usize) -> Result<String, ProfileError>
where
    P: Profile + ?Sized,
    P::Key: Display,
{
    let entries = profile.top_k_entries(k)?;
    let total = profile.total();

    Ok(Table {
        total,
        entries: &entries,
    }
    .to_string())
}

/// A rendered view over ranked entries
struct Table<'a, K> {
    total: u64,
    entries: &'a [RankedEntry<K>],
}

impl<K: Display> Display for Table<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(TABLE_WIDTH);

        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "| {:<cw$} | {:<rw$} | {:<kw$} |",
            "COUNT",
            "%",
            "METHOD",
            cw = COUNT_WIDTH,
            rw = RATIO_WIDTH,
            kw = KEY_WIDTH
        )?;
        writeln!(f, "{rule}")?;

        // No samples means no meaningful ratio, so no rows either.
        if self.total > 0 {
            for entry in self.entries {
                let key = fit_key(&entry.key.to_string());
                writeln!(
                    f,
                    "| {:>cw$} | {:>rw$.2} | {:<kw$} |",
                    entry.count,
                    entry.ratio(self.total),
                    key,
                    cw = COUNT_WIDTH,
                    rw = RATIO_WIDTH,
                    kw = KEY_WIDTH
                )?;
            }
        }

        writeln!(f, "{rule}")
    }
}

/// Escape control characters, then cut `key` to at most [`KEY_WIDTH`] characters
fn fit_key(key: &str) -> String {
    let mut escaped = String::with_capacity(key.len());
    for c in key.chars() {
        if c.is_control() {
            escaped.extend(c.escape_debug());
        } else {
            escaped.push(c);
        }
    }
    if escaped.chars().count() <= KEY_WIDTH {
        return escaped;
    }
    let mut cut: String = escaped.chars().take(KEY_WIDTH - ELLIPSIS.len()).collect();
    cut.push_str(ELLIPSIS);
    cut
}
