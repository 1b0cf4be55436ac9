//! Trading calendar: groups trading dates into fixed-size periods.

use chrono::NaiveDate;

use crate::domain::TradeWindow;

/// Ordered trading dates split into periods of `step` dates.
///
/// Period `i` covers `dates[i * step ..= (i + 1) * step - 1]` (the final
/// period may be shorter). The prediction window for trade period `i` is
/// period `i - 1`.
#[derive(Debug, Clone)]
pub struct TradingCalendar {
    dates: Vec<NaiveDate>,
    step: usize,
}

impl TradingCalendar {
    /// Dates are sorted and deduplicated. A `step` of zero is treated as one.
    pub fn new(mut dates: Vec<NaiveDate>, step: usize) -> Self {
        dates.sort();
        dates.dedup();
        Self { dates, step: step.max(1) }
    }

    pub fn daily(dates: Vec<NaiveDate>) -> Self {
        Self::new(dates, 1)
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.dates.len().div_ceil(self.step)
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn step(&self) -> usize {
        self.step
    }

    /// Window of period `trade_index - shift`, or `None` when out of range.
    pub fn window(&self, trade_index: usize, shift: usize) -> Option<TradeWindow> {
        let period = trade_index.checked_sub(shift)?;
        let first = period.checked_mul(self.step)?;
        if first >= self.dates.len() {
            return None;
        }
        let last = (first + self.step - 1).min(self.dates.len() - 1);
        Some(TradeWindow::new(self.dates[first], self.dates[last]))
    }

    pub fn trade_window(&self, trade_index: usize) -> Option<TradeWindow> {
        self.window(trade_index, 0)
    }

    pub fn pred_window(&self, trade_index: usize) -> Option<TradeWindow> {
        self.window(trade_index, 1)
    }

    /// Index of the period containing `date`, if it is a trading date.
    pub fn period_of(&self, date: NaiveDate) -> Option<usize> {
        self.dates.binary_search(&date).ok().map(|i| i / self.step)
    }
}
