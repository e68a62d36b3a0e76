//! Recency bucketing for the session list
//!
//! Sessions are grouped for display into Today / Yesterday / Previous 7
//! Days / Previous 30 Days based on each session's date and an injected
//! "today". The buckets are derived views recomputed on demand; nothing
//! here mutates the store.

use crate::store::types::SessionMap;
use chrono::{Days, NaiveDate};

/// A recency-based display grouping
///
/// A session is in exactly one bucket, or in none: dates newer than
/// today (clock skew) or older than 30 days fall outside every window.
/// That gap is deliberate; such sessions stay in the store but are not
/// listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecencyBucket {
    Today,
    Yesterday,
    PastWeek,
    PastMonth,
}

impl RecencyBucket {
    /// Heading used when displaying the bucket
    pub fn title(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Yesterday => "Yesterday",
            Self::PastWeek => "Previous 7 Days",
            Self::PastMonth => "Previous 30 Days",
        }
    }
}

/// Session identifiers partitioned by recency, in store (key) order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketedSessions {
    pub today: Vec<String>,
    pub yesterday: Vec<String>,
    pub past_week: Vec<String>,
    pub past_month: Vec<String>,
    /// Sessions outside every window (future-dated or older than 30 days)
    pub unlisted: usize,
}

impl BucketedSessions {
    /// The bucket contents in display order, paired with their titles
    pub fn iter(&self) -> impl Iterator<Item = (RecencyBucket, &[String])> {
        [
            (RecencyBucket::Today, self.today.as_slice()),
            (RecencyBucket::Yesterday, self.yesterday.as_slice()),
            (RecencyBucket::PastWeek, self.past_week.as_slice()),
            (RecencyBucket::PastMonth, self.past_month.as_slice()),
        ]
        .into_iter()
    }

    /// Total number of bucketed identifiers
    pub fn len(&self) -> usize {
        self.today.len() + self.yesterday.len() + self.past_week.len() + self.past_month.len()
    }

    /// Whether every bucket is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classify a single date against `today`
///
/// Half-open ranges:
/// - Today: `date == today`
/// - Yesterday: `date == today - 1`
/// - PastWeek: `today - 7 <= date < today - 1`
/// - PastMonth: `today - 30 <= date < today - 7`
pub fn bucket_for(date: NaiveDate, today: NaiveDate) -> Option<RecencyBucket> {
    let yesterday = today - Days::new(1);
    let seven_days_ago = today - Days::new(7);
    let thirty_days_ago = today - Days::new(30);

    if date == today {
        Some(RecencyBucket::Today)
    } else if date == yesterday {
        Some(RecencyBucket::Yesterday)
    } else if seven_days_ago <= date && date < yesterday {
        Some(RecencyBucket::PastWeek)
    } else if thirty_days_ago <= date && date < seven_days_ago {
        Some(RecencyBucket::PastMonth)
    } else {
        None
    }
}

/// Partition the full session mapping into recency buckets
///
/// Pure function of `(sessions, today)`; `today` is injected so tests
/// can pin it. Archived sessions are not excluded.
pub fn classify(sessions: &SessionMap, today: NaiveDate) -> BucketedSessions {
    let mut buckets = BucketedSessions::default();
    for (id, session) in sessions {
        match bucket_for(session.date, today) {
            Some(RecencyBucket::Today) => buckets.today.push(id.clone()),
            Some(RecencyBucket::Yesterday) => buckets.yesterday.push(id.clone()),
            Some(RecencyBucket::PastWeek) => buckets.past_week.push(id.clone()),
            Some(RecencyBucket::PastMonth) => buckets.past_month.push(id.clone()),
            None => buckets.unlisted += 1,
        }
    }
    buckets
}
