//! Age derivation — completed years between a birthdate and an evaluation
//! date.
//!
//! Age is never stored; it is computed on read from the persisted
//! birthdate. Write-time validation already rejects future birthdates, but
//! the computation still refuses them rather than returning a negative
//! count.

use chrono::{Datelike, NaiveDate};

use crate::{Error, Result};

/// Number of complete years elapsed between `birthdate` and `on`.
///
/// The anniversary is the birthdate projected into the evaluation year.
/// A February 29 birthdate has no anniversary in a non-leap year; its
/// year of age completes only once March 1 arrives, so someone born
/// 2000-02-29 is 22 on 2023-02-28 and 23 on 2023-03-01.
///
/// Fails if `birthdate` is on or after `on`.
pub fn completed_years(birthdate: NaiveDate, on: NaiveDate) -> Result<u32> {
  if birthdate >= on {
    return Err(Error::Computation {
      what:   "age",
      reason: format!("birthdate {birthdate} is not before {on}"),
    });
  }

  let anniversary = birthdate
    .with_year(on.year())
    // Feb 29 projected into a non-leap year: completes on Mar 1.
    .unwrap_or_else(|| {
      NaiveDate::from_ymd_opt(on.year(), 3, 1)
        .expect("March 1 exists in every year")
    });

  let years = on.year() - birthdate.year();
  let years = if anniversary > on { years - 1 } else { years };

  // years >= 0 is guaranteed by the birthdate < on check above.
  Ok(years as u32)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
  }

  #[test]
  fn day_before_anniversary() {
    assert_eq!(completed_years(d(2000, 3, 15), d(2024, 3, 14)).unwrap(), 23);
  }

  #[test]
  fn on_anniversary() {
    assert_eq!(completed_years(d(2000, 3, 15), d(2024, 3, 15)).unwrap(), 24);
  }

  #[test]
  fn day_after_anniversary() {
    assert_eq!(completed_years(d(2000, 3, 15), d(2024, 3, 16)).unwrap(), 24);
  }

  #[test]
  fn leap_birthdate_in_non_leap_year() {
    // Born Feb 29: the year completes only once Mar 1 arrives.
    assert_eq!(completed_years(d(2000, 2, 29), d(2023, 2, 28)).unwrap(), 22);
    assert_eq!(completed_years(d(2000, 2, 29), d(2023, 3, 1)).unwrap(), 23);
  }

  #[test]
  fn leap_birthdate_in_leap_year() {
    assert_eq!(completed_years(d(2000, 2, 29), d(2024, 2, 28)).unwrap(), 23);
    assert_eq!(completed_years(d(2000, 2, 29), d(2024, 2, 29)).unwrap(), 24);
  }

  #[test]
  fn less_than_one_year() {
    assert_eq!(completed_years(d(2024, 1, 10), d(2024, 12, 31)).unwrap(), 0);
  }

  #[test]
  fn future_birthdate_is_refused() {
    let err = completed_years(d(2030, 1, 1), d(2024, 3, 15)).unwrap_err();
    assert!(matches!(err, Error::Computation { what: "age", .. }));
  }

  #[test]
  fn birthdate_equal_to_evaluation_date_is_refused() {
    let err = completed_years(d(2024, 3, 15), d(2024, 3, 15)).unwrap_err();
    assert!(matches!(err, Error::Computation { .. }));
  }
}
