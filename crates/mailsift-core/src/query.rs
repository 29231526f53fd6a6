//! Gmail search query construction for `fetch`.

use chrono::{Days, Local, NaiveDate};
use tracing::info;

use crate::error::{Error, Result};

/// Query used when no date range or query is given.
pub const DEFAULT_QUERY: &str = "after:2025/03/01 before:2025/03/30";

const DATE_FORMAT: &str = "%Y/%m/%d";

/// Where the fetch query comes from, in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Fetch the last N days up to today. Zero is ignored.
    pub last_days: Option<u32>,
    /// Lower date bound (`YYYY/MM/DD`).
    pub after: Option<String>,
    /// Upper date bound (`YYYY/MM/DD`).
    pub before: Option<String>,
    /// Free-form Gmail query.
    pub query: Option<String>,
}

impl QueryOptions {
    /// Builds the query relative to the local date.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `last_days` reaches before the
    /// earliest representable date.
    pub fn build(&self) -> Result<String> {
        self.build_for(Local::now().date_naive())
    }

    /// Builds the query relative to `today`.
    ///
    /// `last_days` wins over `after`/`before`, which win over `query`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `last_days` reaches before the
    /// earliest representable date.
    pub fn build_for(&self, today: NaiveDate) -> Result<String> {
        if let Some(days) = self.last_days.filter(|&d| d > 0) {
            let start = today
                .checked_sub_days(Days::new(u64::from(days)))
                .ok_or_else(|| Error::InvalidInput(format!("--last-days {days} is out of range")))?;
            let query = format!(
                "after:{} before:{}",
                start.format(DATE_FORMAT),
                today.format(DATE_FORMAT)
            );
            info!("Using last {days} days: {query}");
            return Ok(query);
        }

        if self.after.is_some() || self.before.is_some() {
            let parts: Vec<String> = [("after", &self.after), ("before", &self.before)]
                .into_iter()
                .filter_map(|(key, value)| value.as_ref().map(|v| format!("{key}:{v}")))
                .collect();
            let query = parts.join(" ");
            info!("Using date range: {query}");
            return Ok(query);
        }

        let query = self.query.clone().unwrap_or_else(|| DEFAULT_QUERY.to_string());
        info!("Using query: {query}");
        Ok(query)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 30).unwrap()
    }

    #[test]
    fn test_default_query() {
        assert_eq!(QueryOptions::default().build_for(today()).unwrap(), DEFAULT_QUERY);
    }

    #[test]
    fn test_last_days_overrides_everything() {
        let options = QueryOptions {
            last_days: Some(7),
            after: Some("2020/01/01".to_string()),
            query: Some("label:JOB".to_string()),
            ..QueryOptions::default()
        };
        assert_eq!(options.build_for(today()).unwrap(), "after:2025/03/23 before:2025/03/30");
    }

    #[test]
    fn test_last_days_crosses_month() {
        let options = QueryOptions {
            last_days: Some(30),
            ..QueryOptions::default()
        };
        assert_eq!(options.build_for(today()).unwrap(), "after:2025/02/28 before:2025/03/30");
    }

    #[test]
    fn test_zero_last_days_is_ignored() {
        let options = QueryOptions {
            last_days: Some(0),
            before: Some("2025/01/01".to_string()),
            ..QueryOptions::default()
        };
        assert_eq!(options.build_for(today()).unwrap(), "before:2025/01/01");
    }

    #[test]
    fn test_date_range_beats_query() {
        let options = QueryOptions {
            after: Some("2025/01/01".to_string()),
            before: Some("2025/02/01".to_string()),
            query: Some("ignored".to_string()),
            ..QueryOptions::default()
        };
        assert_eq!(options.build_for(today()).unwrap(), "after:2025/01/01 before:2025/02/01");
    }

    #[test]
    fn test_custom_query() {
        let options = QueryOptions {
            query: Some("label:JOB".to_string()),
            ..QueryOptions::default()
        };
        assert_eq!(options.build_for(today()).unwrap(), "label:JOB");
    }

    #[test]
    fn test_last_days_out_of_range() {
        let options = QueryOptions {
            last_days: Some(u32::MAX),
            ..QueryOptions::default()
        };
        assert!(matches!(
            options.build_for(today()),
            Err(Error::InvalidInput(_))
        ));
    }
}
