// File: ./src/model/recurrence.rs
use crate::error::{Result, TodoError};
use crate::model::item::Task;
use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use std::fmt;
use std::str::FromStr;
use strum::{EnumIter, IntoEnumIterator};

/// Upper bound on skip-forward steps for non-strict recurrences.
pub const MAX_SKIP_STEPS: usize = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum RecurrenceUnit {
    CalendarDays,
    BusinessDays,
    Weeks,
    Months,
    Years,
}

impl RecurrenceUnit {
    pub fn code(&self) -> char {
        match self {
            RecurrenceUnit::CalendarDays => 'd',
            RecurrenceUnit::BusinessDays => 'b',
            RecurrenceUnit::Weeks => 'w',
            RecurrenceUnit::Months => 'm',
            RecurrenceUnit::Years => 'y',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        Self::iter().find(|unit| unit.code() == code)
    }
}

/// A `rec:` rule such as `3d`, `+1w` or `2b`.
///
/// Strict rules (leading `+`) advance from the due date. Non-strict rules
/// advance from the completion date and skip occurrences that already lie
/// in the past.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recurrence {
    pub unit: RecurrenceUnit,
    pub value: u32,
    pub strict: bool,
}

impl Recurrence {
    pub fn new(unit: RecurrenceUnit, value: u32, strict: bool) -> Result<Self> {
        if value == 0 {
            return Err(TodoError::invalid_argument(
                "Recurrence interval must be at least 1",
            ));
        }
        Ok(Self {
            unit,
            value,
            strict,
        })
    }

    /// Moves `from` forward by one interval.
    pub fn advance(&self, from: NaiveDate) -> Option<NaiveDate> {
        let value = self.value;
        match self.unit {
            RecurrenceUnit::CalendarDays => from.checked_add_signed(Duration::days(value.into())),
            RecurrenceUnit::BusinessDays => add_business_days(value.into(), from),
            RecurrenceUnit::Weeks => from.checked_add_signed(Duration::weeks(value.into())),
            RecurrenceUnit::Months => from.checked_add_months(Months::new(value)),
            RecurrenceUnit::Years => from.checked_add_months(Months::new(value.checked_mul(12)?)),
        }
    }

    /// Length of one interval in days, for units that have a fixed length.
    fn fixed_span_days(&self) -> Option<i64> {
        let value = i64::from(self.value);
        match self.unit {
            RecurrenceUnit::CalendarDays => Some(value),
            RecurrenceUnit::Weeks => Some(value * 7),
            _ => None,
        }
    }

    /// Computes the next open occurrence of a completed task, using the
    /// task's own notion of today.
    pub fn next_occurrence(&self, task: &Task) -> Option<Task> {
        self.next_occurrence_on(task, task.options().today())
    }

    /// Computes the next open occurrence relative to `today`. Returns `None`
    /// when the task is not complete or the date arithmetic overflows.
    pub fn next_occurrence_on(&self, task: &Task, today: NaiveDate) -> Option<Task> {
        if !task.is_complete() {
            return None;
        }

        let due = if self.strict {
            let anchor = task.due_date().unwrap_or(today);
            self.advance(anchor)?
        } else {
            let anchor = task.completed().unwrap_or(today);
            let mut due = self.advance(anchor)?;
            if let Some(span) = self.fixed_span_days() {
                due = skip_fixed_span(due, today, span)?;
            }
            let mut steps = 0;
            while due < today {
                steps += 1;
                if steps > MAX_SKIP_STEPS {
                    log::warn!(
                        "Recurrence '{}' did not reach {} within {} steps",
                        self,
                        today,
                        MAX_SKIP_STEPS
                    );
                    return None;
                }
                due = self.advance(due)?;
            }
            due
        };

        let mut next = task.clone();
        next.set_due_date(due).ok()?;
        next.set_complete(false);
        next.take_changes();
        Some(next)
    }
}

impl FromStr for Recurrence {
    type Err = TodoError;

    /// Grammar: optional `+`, one or more digits, one unit letter.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || TodoError::invalid_format(format!("Invalid recurrence: '{}'", s));

        if s.chars().any(char::is_whitespace) {
            return Err(invalid());
        }
        let (strict, body) = match s.strip_prefix('+') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let mut chars = body.chars();
        let unit_code = chars.next_back().ok_or_else(invalid)?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let value: u32 = digits.parse().map_err(|_| invalid())?;
        let unit = RecurrenceUnit::from_code(unit_code).ok_or_else(invalid)?;
        Recurrence::new(unit, value, strict).map_err(|_| invalid())
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.strict {
            f.write_str("+")?;
        }
        write!(f, "{}{}", self.value, self.unit.code())
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// First date `due + k * span` (k >= 0) that is not before `today`.
fn skip_fixed_span(due: NaiveDate, today: NaiveDate, span: i64) -> Option<NaiveDate> {
    let gap = (today - due).num_days();
    if gap <= 0 {
        return Some(due);
    }
    let intervals = (gap + span - 1) / span;
    due.checked_add_signed(Duration::try_days(intervals.checked_mul(span)?)?)
}

/// One calendar step in `step`'s direction, then on past any weekend day.
fn step_business_day(date: NaiveDate, step: Duration) -> Option<NaiveDate> {
    let mut current = date.checked_add_signed(step)?;
    while is_weekend(current) {
        current = current.checked_add_signed(step)?;
    }
    Some(current)
}

/// Moves `days` business days from `date`, skipping Saturdays and Sundays.
///
/// Zero days leaves a weekday untouched and snaps a weekend date forward to
/// the following Monday. Returns `None` when the result leaves the
/// representable date range.
pub fn add_business_days(days: i64, date: NaiveDate) -> Option<NaiveDate> {
    if days == 0 {
        return match date.weekday() {
            Weekday::Sat => date.checked_add_signed(Duration::days(2)),
            Weekday::Sun => date.checked_add_signed(Duration::days(1)),
            _ => Some(date),
        };
    }

    let step = Duration::days(days.signum());
    let mut remaining = days.unsigned_abs();

    // The first step always lands on a weekday; from there five business
    // days are exactly one calendar week.
    let mut current = step_business_day(date, step)?;
    remaining -= 1;

    let weeks = i64::try_from(remaining / 5).ok()?;
    current = current.checked_add_signed(Duration::try_weeks(weeks * days.signum())?)?;
    for _ in 0..remaining % 5 {
        current = step_business_day(current, step)?;
    }
    Some(current)
}
