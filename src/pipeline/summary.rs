use std::fmt::{Display, Formatter};

/// Why a listing row did not end up stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Posted-date label older than a day (only when the recency filter is on).
    Stale,
    /// Title has none of the included keywords.
    TitleMismatch,
    /// Detail page could not be fetched even after retries.
    FetchFailed(String),
    /// Detail page has too little text to be a posting.
    ThinDescription,
    /// Excluded title keyword, or no included keyword in title + description.
    OutOfScope,
    /// Vendor email already seen earlier in this run.
    Duplicate,
}

/// What happened to one listing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    /// Handed to the repository. `inserted` is false when the description
    /// hash was already stored by an earlier run.
    Stored { inserted: bool },
    Skipped(SkipReason),
}

/// Counters for one scrape run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total_rows: usize,
    pub filtered_in: usize,
    pub run_duplicates: usize,
    pub stored: usize,
    pub newly_inserted: usize,
    pub fetch_failures: usize,
    pub top_duplicates: Vec<(String, u32)>,
}

impl RunSummary {
    pub fn new(total_rows: usize) -> Self {
        Self {
            total_rows,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: &RowOutcome) {
        match outcome {
            RowOutcome::Stored { inserted } => {
                self.filtered_in += 1;
                self.stored += 1;
                if *inserted {
                    self.newly_inserted += 1;
                }
            }
            RowOutcome::Skipped(SkipReason::Duplicate) => {
                self.filtered_in += 1;
                self.run_duplicates += 1;
            }
            RowOutcome::Skipped(SkipReason::FetchFailed(_)) => self.fetch_failures += 1,
            RowOutcome::Skipped(_) => {}
        }
    }
}

impl Display for RunSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "================ SUMMARY ================")?;
        writeln!(f, "TOTAL JOBS FOUND     : {}", self.total_rows)?;
        writeln!(f, "IN-SCOPE JOBS        : {}", self.filtered_in)?;
        writeln!(f, "RUN DUPLICATES       : {}", self.run_duplicates)?;
        writeln!(
            f,
            "STORED JOBS          : {} ({} new)",
            self.stored, self.newly_inserted
        )?;
        writeln!(f, "FETCH FAILURES       : {}", self.fetch_failures)?;
        writeln!(f, "=========================================")?;

        if self.top_duplicates.is_empty() {
            write!(f, "No duplicate vendors found in this run")
        } else {
            writeln!(f, "TOP DUPLICATE VENDORS (same run)")?;
            for (idx, (email, count)) in self.top_duplicates.iter().enumerate() {
                writeln!(f, "{}. {}  ->  {} duplicates", idx + 1, email, count)?;
            }
            Ok(())
        }
    }
}
