//! Month-grid computation for the calendar page.

use time::Month;

/// One month laid out as Monday-first weeks
///
/// `weeks` holds rows of seven cells; `None` marks the padding cells before
/// the first and after the last day of the month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    pub year: i32,
    pub month: u8,
    pub month_name: String,
    pub weeks: Vec<Vec<Option<u8>>>,
    pub prev_year: i32,
    pub prev_month: u8,
    pub next_year: i32,
    pub next_month: u8,
}

/// Build the month grid and adjacent-month navigation for (year, month)
///
/// Out-of-range months surface the calendar library's own rejection.
pub fn month_view(year: i32, month: u8) -> Result<MonthView, time::error::ComponentRange> {
    let month_of_year = Month::try_from(month)?;
    let first = time::Date::from_calendar_date(year, month_of_year, 1)?;

    let leading = first.weekday().number_days_from_monday() as usize;
    let days_in_month = month_of_year.length(year);

    let mut weeks = Vec::new();
    let mut week: Vec<Option<u8>> = vec![None; leading];

    for day in 1..=days_in_month {
        week.push(Some(day));
        if week.len() == 7 {
            weeks.push(week);
            week = Vec::new();
        }
    }

    if !week.is_empty() {
        week.resize(7, None);
        weeks.push(week);
    }

    let (prev_year, prev_month) = if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    };

    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    Ok(MonthView {
        year,
        month,
        month_name: month_of_year.to_string(),
        weeks,
        prev_year,
        prev_month,
        next_year,
        next_month,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days(view: &MonthView) -> Vec<u8> {
        view.weeks.iter().flatten().filter_map(|d| *d).collect()
    }

    #[test]
    fn test_june_2024_layout() {
        // June 2024 starts on a Saturday and has 30 days
        let view = month_view(2024, 6).unwrap();
        assert_eq!(view.month_name, "June");
        assert_eq!(view.weeks.len(), 5);
        assert_eq!(
            view.weeks[0],
            vec![None, None, None, None, None, Some(1), Some(2)]
        );
        assert_eq!(days(&view), (1..=30).collect::<Vec<u8>>());
        // The 30th lands on a Sunday, closing the grid with no trailing padding
        assert_eq!(view.weeks[4][0], Some(24));
        assert_eq!(view.weeks[4][6], Some(30));
    }

    #[test]
    fn test_february_leap_year() {
        let view = month_view(2024, 2).unwrap();
        assert_eq!(days(&view).len(), 29);

        let view = month_view(2023, 2).unwrap();
        assert_eq!(days(&view).len(), 28);
    }

    #[test]
    fn test_every_month_in_order_and_padded() {
        for month in 1..=12u8 {
            let view = month_view(2025, month).unwrap();
            let listed = days(&view);
            let expected: Vec<u8> = (1..=Month::try_from(month).unwrap().length(2025)).collect();
            assert_eq!(listed, expected, "month {month}");
            for week in &view.weeks {
                assert_eq!(week.len(), 7, "month {month}");
            }
        }
    }

    #[test]
    fn test_year_rollover_navigation() {
        let january = month_view(2024, 1).unwrap();
        assert_eq!((january.prev_year, january.prev_month), (2023, 12));
        assert_eq!((january.next_year, january.next_month), (2024, 2));

        let december = month_view(2024, 12).unwrap();
        assert_eq!((december.prev_year, december.prev_month), (2024, 11));
        assert_eq!((december.next_year, december.next_month), (2025, 1));
    }

    #[test]
    fn test_out_of_range_month_is_rejected_by_calendar() {
        assert!(month_view(2024, 0).is_err());
        assert!(month_view(2024, 13).is_err());
    }

    #[test]
    fn test_monday_first_september_2025() {
        // 1 September 2025 is a Monday: no leading padding
        let view = month_view(2025, 9).unwrap();
        assert_eq!(view.weeks[0][0], Some(1));
    }
}
