//! Stamp source
//!
//! Mutations record the calendar date of the write. Going through [`Clock`]
//! keeps stamping deterministic under test.

use crate::node::ModificationStamp;
use chrono::NaiveDate;

/// Source of the current calendar date
pub trait Clock: Send + Sync {
    /// Today's date in local time
    fn today(&self) -> NaiveDate;

    /// Stamp for a write made now by `by`
    fn stamp(&self, by: &str) -> ModificationStamp {
        ModificationStamp::new(self.today(), by)
    }
}

/// Wall-clock dates from the local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Frozen(NaiveDate);

    impl Clock for Frozen {
        fn today(&self) -> NaiveDate {
            self.0
        }
    }

    #[test]
    fn stamp_uses_clock_date() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let stamp = Frozen(date).stamp("Ana Pereira");
        assert_eq!(stamp.at, date);
        assert_eq!(stamp.by, "Ana Pereira");
    }

    #[test]
    fn system_clock_is_recent() {
        let floor = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(SystemClock.today() > floor);
    }
}
