//! Filtering dated records by a selected period.
//!
//! A [PeriodSelector] describes which dates are in scope: everything, an
//! exact calendar month or year, or a rolling window anchored at a
//! reference date. The reference date is always supplied by the caller so
//! that period resolution is testable with a fixed clock.
//!
//! Selector parsing is deliberately forgiving: unrecognized period values
//! from query strings or old bookmarks fall back to [PeriodSelector::All]
//! instead of failing, so stale links keep working.

use std::ops::RangeInclusive;

use time::{Date, Month};

/// A record with a calendar date, the sole filtering key.
pub trait Dated {
    /// The date of the record, at day precision.
    fn date(&self) -> Date;
}

/// A rolling window anchored at a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollingWindow {
    /// The first through last day of the reference month.
    CurrentMonth,
    /// The first through last day of the month before the reference month.
    LastMonth,
    /// The first day of the month two months before the reference month,
    /// through the reference date itself.
    LastThreeMonths,
    /// The first day of the month five months before the reference month,
    /// through the reference date itself.
    LastSixMonths,
    /// The first day of the month eleven months before the reference month,
    /// through the reference date itself.
    LastYear,
}

impl RollingWindow {
    /// Parse a query-string value such as "last-3-months".
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "current-month" => Some(Self::CurrentMonth),
            "last-month" => Some(Self::LastMonth),
            "last-3-months" => Some(Self::LastThreeMonths),
            "last-6-months" => Some(Self::LastSixMonths),
            "last-year" => Some(Self::LastYear),
            _ => None,
        }
    }

    /// The query-string value for this window.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            Self::CurrentMonth => "current-month",
            Self::LastMonth => "last-month",
            Self::LastThreeMonths => "last-3-months",
            Self::LastSixMonths => "last-6-months",
            Self::LastYear => "last-year",
        }
    }

    /// Human-readable label for selection controls.
    pub fn label(&self) -> &'static str {
        match self {
            Self::CurrentMonth => "Current month",
            Self::LastMonth => "Last month",
            Self::LastThreeMonths => "Last 3 months",
            Self::LastSixMonths => "Last 6 months",
            Self::LastYear => "Last 12 months",
        }
    }
}

/// The criterion used to scope dated records before aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodSelector {
    /// No filtering.
    All,
    /// Records whose date falls in the given calendar month.
    ExactMonth {
        /// The calendar month.
        month: Month,
        /// The calendar year.
        year: i32,
    },
    /// Records whose date falls in the given calendar year.
    ExactYear(i32),
    /// Records inside a rolling window anchored at the reference date.
    Rolling(RollingWindow),
}

impl PeriodSelector {
    /// Parse the reports-page period value. Unrecognized values fall back
    /// to [PeriodSelector::All].
    pub fn from_report_query(value: &str) -> Self {
        match RollingWindow::parse(value) {
            Some(window) => Self::Rolling(window),
            None => Self::All,
        }
    }

    /// Combine the month/year values of the transactions-page filter.
    ///
    /// A concrete month always needs its year; month "all" with a concrete
    /// year filters by year alone; "all"/"all" disables date filtering.
    /// Values that don't parse fall back to [PeriodSelector::All].
    pub fn from_month_year(month: &str, year: &str) -> Self {
        let parsed_year = year.parse::<i32>().ok();
        let parsed_month = month
            .parse::<u8>()
            .ok()
            .and_then(|number| Month::try_from(number).ok());

        match (parsed_month, parsed_year) {
            (Some(month), Some(year)) => Self::ExactMonth { month, year },
            (None, Some(year)) if month == "all" => Self::ExactYear(year),
            _ => Self::All,
        }
    }

    /// Resolve the selector to an inclusive date range, anchored at
    /// `today` for rolling windows. `None` means no date bounds.
    pub fn date_range(&self, today: Date) -> Option<RangeInclusive<Date>> {
        match *self {
            Self::All => None,
            Self::ExactMonth { month, year } => {
                Some(first_day_of_month(year, month)..=last_day_of_month(year, month))
            }
            Self::ExactYear(year) => Some(
                first_day_of_month(year, Month::January)
                    ..=last_day_of_month(year, Month::December),
            ),
            Self::Rolling(window) => {
                let (year, month) = (today.year(), today.month());

                let range = match window {
                    RollingWindow::CurrentMonth => {
                        first_day_of_month(year, month)..=last_day_of_month(year, month)
                    }
                    RollingWindow::LastMonth => {
                        let (year, month) = months_back(year, month, 1);
                        first_day_of_month(year, month)..=last_day_of_month(year, month)
                    }
                    // The open-ended windows run up to "now", not to the
                    // end of the reference month.
                    RollingWindow::LastThreeMonths => {
                        let (year, month) = months_back(year, month, 2);
                        first_day_of_month(year, month)..=today
                    }
                    RollingWindow::LastSixMonths => {
                        let (year, month) = months_back(year, month, 5);
                        first_day_of_month(year, month)..=today
                    }
                    RollingWindow::LastYear => {
                        let (year, month) = months_back(year, month, 11);
                        first_day_of_month(year, month)..=today
                    }
                };

                Some(range)
            }
        }
    }

    /// Whether a date is inside the period, at day granularity.
    pub fn contains(&self, date: Date, today: Date) -> bool {
        match self.date_range(today) {
            Some(range) => range.contains(&date),
            None => true,
        }
    }
}

/// Keep the records whose date falls inside the selected period.
///
/// [PeriodSelector::All] returns the input unchanged. An empty input
/// yields an empty output; there is no error case.
pub fn filter_by_period<T: Dated + Clone>(
    records: &[T],
    selector: PeriodSelector,
    today: Date,
) -> Vec<T> {
    records
        .iter()
        .filter(|record| selector.contains(record.date(), today))
        .cloned()
        .collect()
}

/// The first day of the given calendar month.
pub fn first_day_of_month(year: i32, month: Month) -> Date {
    Date::from_calendar_date(year, month, 1).unwrap()
}

/// The last day of the given calendar month.
pub fn last_day_of_month(year: i32, month: Month) -> Date {
    Date::from_calendar_date(year, month, month.length(year)).unwrap()
}

/// The calendar month `count` months before the given one.
pub fn months_back(year: i32, month: Month, count: i32) -> (i32, Month) {
    let total = year * 12 + i32::from(u8::from(month)) - 1 - count;
    let year = total.div_euclid(12);
    let month = Month::try_from((total.rem_euclid(12) + 1) as u8).unwrap();

    (year, month)
}

#[cfg(test)]
mod period_tests {
    use time::{Date, Month, macros::date};

    use super::{Dated, PeriodSelector, RollingWindow, filter_by_period, months_back};

    #[derive(Debug, Clone, PartialEq)]
    struct Record {
        date: Date,
    }

    impl Dated for Record {
        fn date(&self) -> Date {
            self.date
        }
    }

    fn records(dates: &[Date]) -> Vec<Record> {
        dates.iter().map(|&date| Record { date }).collect()
    }

    #[test]
    fn all_returns_input_unchanged() {
        let input = records(&[
            date!(2020 - 01 - 01),
            date!(2024 - 06 - 15),
            date!(2035 - 12 - 31),
        ]);

        let got = filter_by_period(&input, PeriodSelector::All, date!(2024 - 03 - 15));

        assert_eq!(got, input);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let input: Vec<Record> = vec![];

        let got = filter_by_period(
            &input,
            PeriodSelector::Rolling(RollingWindow::CurrentMonth),
            date!(2024 - 03 - 15),
        );

        assert!(got.is_empty());
    }

    #[test]
    fn exact_month_matches_month_and_year() {
        let input = records(&[
            date!(2024 - 03 - 01),
            date!(2024 - 03 - 31),
            date!(2024 - 04 - 01),
            date!(2023 - 03 - 15),
        ]);
        let selector = PeriodSelector::ExactMonth {
            month: Month::March,
            year: 2024,
        };

        let got = filter_by_period(&input, selector, date!(2024 - 06 - 01));

        assert_eq!(
            got,
            records(&[date!(2024 - 03 - 01), date!(2024 - 03 - 31)])
        );
    }

    #[test]
    fn exact_year_ignores_month() {
        let input = records(&[
            date!(2024 - 01 - 01),
            date!(2024 - 12 - 31),
            date!(2023 - 12 - 31),
            date!(2025 - 01 - 01),
        ]);

        let got = filter_by_period(&input, PeriodSelector::ExactYear(2024), date!(2024 - 06 - 01));

        assert_eq!(
            got,
            records(&[date!(2024 - 01 - 01), date!(2024 - 12 - 31)])
        );
    }

    #[test]
    fn current_month_spans_first_through_last_day() {
        let today = date!(2024 - 02 - 10);
        let selector = PeriodSelector::Rolling(RollingWindow::CurrentMonth);

        let range = selector.date_range(today).unwrap();

        // 2024 is a leap year.
        assert_eq!(range, date!(2024 - 02 - 01)..=date!(2024 - 02 - 29));
    }

    #[test]
    fn current_month_contains_every_returned_record() {
        let today = date!(2024 - 03 - 15);
        let input = records(&[
            date!(2024 - 02 - 29),
            date!(2024 - 03 - 01),
            date!(2024 - 03 - 15),
            date!(2024 - 03 - 31),
            date!(2024 - 04 - 01),
        ]);

        let got = filter_by_period(
            &input,
            PeriodSelector::Rolling(RollingWindow::CurrentMonth),
            today,
        );

        let first = date!(2024 - 03 - 01);
        let last = date!(2024 - 03 - 31);
        assert!(!got.is_empty());
        assert!(got.iter().all(|r| first <= r.date && r.date <= last));
    }

    #[test]
    fn last_month_wraps_across_year_boundary() {
        let selector = PeriodSelector::Rolling(RollingWindow::LastMonth);

        let range = selector.date_range(date!(2024 - 01 - 20)).unwrap();

        assert_eq!(range, date!(2023 - 12 - 01)..=date!(2023 - 12 - 31));
    }

    #[test]
    fn last_three_months_ends_at_reference_date() {
        // Anchored at 2024-03-15 the window is [2024-01-01, 2024-03-15].
        let selector = PeriodSelector::Rolling(RollingWindow::LastThreeMonths);
        let today = date!(2024 - 03 - 15);

        let range = selector.date_range(today).unwrap();
        assert_eq!(range, date!(2024 - 01 - 01)..=date!(2024 - 03 - 15));

        let input = records(&[
            date!(2023 - 12 - 31),
            date!(2024 - 01 - 01),
            date!(2024 - 03 - 15),
            date!(2024 - 03 - 16),
        ]);
        let got = filter_by_period(&input, selector, today);

        assert_eq!(
            got,
            records(&[date!(2024 - 01 - 01), date!(2024 - 03 - 15)])
        );
    }

    #[test]
    fn last_six_months_starts_five_months_back() {
        let selector = PeriodSelector::Rolling(RollingWindow::LastSixMonths);

        let range = selector.date_range(date!(2024 - 03 - 15)).unwrap();

        assert_eq!(range, date!(2023 - 10 - 01)..=date!(2024 - 03 - 15));
    }

    #[test]
    fn last_year_starts_eleven_months_back() {
        let selector = PeriodSelector::Rolling(RollingWindow::LastYear);

        let range = selector.date_range(date!(2024 - 03 - 15)).unwrap();

        assert_eq!(range, date!(2023 - 04 - 01)..=date!(2024 - 03 - 15));
    }

    #[test]
    fn months_back_handles_year_wrap() {
        assert_eq!(months_back(2024, Month::March, 2), (2024, Month::January));
        assert_eq!(months_back(2024, Month::January, 1), (2023, Month::December));
        assert_eq!(months_back(2024, Month::February, 11), (2023, Month::March));
        assert_eq!(months_back(2024, Month::June, 0), (2024, Month::June));
        assert_eq!(months_back(2024, Month::January, 13), (2022, Month::December));
    }

    #[test]
    fn unrecognized_report_period_falls_back_to_all() {
        assert_eq!(
            PeriodSelector::from_report_query("next-week"),
            PeriodSelector::All
        );
        assert_eq!(PeriodSelector::from_report_query("all"), PeriodSelector::All);
        assert_eq!(PeriodSelector::from_report_query(""), PeriodSelector::All);
    }

    #[test]
    fn report_period_parses_known_windows() {
        assert_eq!(
            PeriodSelector::from_report_query("last-3-months"),
            PeriodSelector::Rolling(RollingWindow::LastThreeMonths)
        );
        assert_eq!(
            PeriodSelector::from_report_query("current-month"),
            PeriodSelector::Rolling(RollingWindow::CurrentMonth)
        );
    }

    #[test]
    fn month_year_params_combine_as_selectors() {
        assert_eq!(
            PeriodSelector::from_month_year("3", "2024"),
            PeriodSelector::ExactMonth {
                month: Month::March,
                year: 2024
            }
        );
        assert_eq!(
            PeriodSelector::from_month_year("all", "2024"),
            PeriodSelector::ExactYear(2024)
        );
        assert_eq!(
            PeriodSelector::from_month_year("all", "all"),
            PeriodSelector::All
        );
        // Garbage degrades to no filtering rather than an error.
        assert_eq!(
            PeriodSelector::from_month_year("13", "2024"),
            PeriodSelector::All
        );
        assert_eq!(
            PeriodSelector::from_month_year("0", "banana"),
            PeriodSelector::All
        );
    }

    #[test]
    fn filtering_is_idempotent() {
        let input = records(&[
            date!(2024 - 03 - 01),
            date!(2024 - 02 - 15),
            date!(2024 - 03 - 20),
        ]);
        let selector = PeriodSelector::Rolling(RollingWindow::CurrentMonth);
        let today = date!(2024 - 03 - 15);

        let once = filter_by_period(&input, selector, today);
        let twice = filter_by_period(&once, selector, today);

        assert_eq!(once, twice);
    }
}
