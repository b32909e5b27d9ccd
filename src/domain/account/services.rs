use super::entities::{Position, Symbol, Timestamp};
use chrono::{DateTime, Datelike, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::America::New_York;
use chrono_tz::Tz;
use std::cmp::Ordering;
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Profit and loss: (current - entry) * quantity.
pub fn profit_and_loss(current_price: f64, entry_price: f64, qty: f64) -> f64 {
    (current_price - entry_price) * qty
}

/// One row of the holdings table, derived from a position snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub symbol: Symbol,
    pub shares: f64,
    pub entry_price: f64,
    pub current_price: f64,
    pub pnl: f64,
    /// Fraction of cost, as reported by the broker.
    pub pnl_percent: f64,
    pub held_since: Timestamp,
}

impl From<&Position> for Holding {
    fn from(position: &Position) -> Self {
        let entry_price = position.average_entry_price();
        Self {
            symbol: position.symbol.clone(),
            shares: position.qty,
            entry_price,
            current_price: position.current_price,
            pnl: profit_and_loss(position.current_price, entry_price, position.qty),
            pnl_percent: position.unrealized_plpc,
            held_since: position.created_at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum HoldingSortField {
    Symbol,
    Shares,
    Entry,
    Current,
    Pnl,
    HeldSince,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Active ordering of the holdings table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldingSort {
    pub field: HoldingSortField,
    pub direction: SortDirection,
}

impl Default for HoldingSort {
    fn default() -> Self {
        Self { field: HoldingSortField::HeldSince, direction: SortDirection::Descending }
    }
}

impl HoldingSort {
    /// Header click: the active column flips direction, another column starts ascending.
    pub fn toggled(self, field: HoldingSortField) -> Self {
        if self.field == field {
            Self { field, direction: self.direction.flipped() }
        } else {
            Self { field, direction: SortDirection::Ascending }
        }
    }

    /// Total order over holdings. Equal keys fall back to symbol ascending
    /// regardless of direction.
    pub fn compare(&self, a: &Holding, b: &Holding) -> Ordering {
        let primary = match self.field {
            HoldingSortField::Symbol => a.symbol.cmp(&b.symbol),
            HoldingSortField::Shares => a.shares.total_cmp(&b.shares),
            HoldingSortField::Entry => a.entry_price.total_cmp(&b.entry_price),
            HoldingSortField::Current => a.current_price.total_cmp(&b.current_price),
            HoldingSortField::Pnl => a.pnl.total_cmp(&b.pnl),
            HoldingSortField::HeldSince => a.held_since.cmp(&b.held_since),
        };
        let primary = match self.direction {
            SortDirection::Ascending => primary,
            SortDirection::Descending => primary.reverse(),
        };
        primary.then_with(|| a.symbol.cmp(&b.symbol))
    }

    pub fn apply(&self, holdings: &mut [Holding]) {
        holdings.sort_by(|a, b| self.compare(a, b));
    }
}

/// Builds the sorted holdings table for a positions snapshot.
pub fn holdings_from_positions(positions: &[Position], sort: HoldingSort) -> Vec<Holding> {
    let mut holdings: Vec<Holding> = positions.iter().map(Holding::from).collect();
    sort.apply(&mut holdings);
    holdings
}

/// Open/closed state plus the next transitions of the regular session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketSession {
    pub is_open: bool,
    pub next_open: DateTime<Utc>,
    pub next_close: DateTime<Utc>,
}

impl MarketSession {
    pub fn next_transition(&self) -> DateTime<Utc> {
        if self.is_open { self.next_close } else { self.next_open }
    }
}

/// Regular US equity session computed from the wall clock alone.
#[derive(Debug, Clone, Copy)]
pub struct MarketHoursService {
    timezone: Tz,
    open: NaiveTime,
    close: NaiveTime,
}

impl Default for MarketHoursService {
    fn default() -> Self {
        Self::new()
    }
}

impl MarketHoursService {
    pub fn new() -> Self {
        Self {
            timezone: New_York,
            open: NaiveTime::from_hms_opt(9, 30, 0).unwrap_or_default(),
            close: NaiveTime::from_hms_opt(16, 0, 0).unwrap_or_default(),
        }
    }

    fn is_trading_day(weekday: Weekday) -> bool {
        !matches!(weekday, Weekday::Sat | Weekday::Sun)
    }

    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        let local = now.with_timezone(&self.timezone);
        let time = local.time();
        Self::is_trading_day(local.weekday()) && time >= self.open && time < self.close
    }

    /// Next instant at or after `now` where the exchange-local time equals `at`
    /// on a trading day.
    fn next_boundary(&self, now: DateTime<Utc>, at: NaiveTime) -> DateTime<Utc> {
        let local = now.with_timezone(&self.timezone);
        let mut day = local.date_naive();
        // A week always contains a trading day; eight steps cover "later today".
        for _ in 0..8 {
            if Self::is_trading_day(day.weekday()) {
                if let Some(candidate) =
                    self.timezone.from_local_datetime(&day.and_time(at)).earliest()
                {
                    let candidate = candidate.with_timezone(&Utc);
                    if candidate > now {
                        return candidate;
                    }
                }
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        now
    }

    pub fn session(&self, now: DateTime<Utc>) -> MarketSession {
        MarketSession {
            is_open: self.is_open(now),
            next_open: self.next_boundary(now, self.open),
            next_close: self.next_boundary(now, self.close),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holding(symbol: &str, pnl: f64, held_ms: i64) -> Holding {
        Holding {
            symbol: Symbol::from(symbol),
            shares: 10.0,
            entry_price: 100.0,
            current_price: 100.0 + pnl / 10.0,
            pnl,
            pnl_percent: pnl / 1000.0,
            held_since: Timestamp::from_millis(held_ms),
        }
    }

    #[test]
    fn pnl_uses_average_entry() {
        assert_eq!(profit_and_loss(110.0, 100.0, 5.0), 50.0);
        assert_eq!(profit_and_loss(90.0, 100.0, 5.0), -50.0);
    }

    #[test]
    fn toggling_the_active_column_flips_direction() {
        let sort = HoldingSort::default();
        let flipped = sort.toggled(HoldingSortField::HeldSince);
        assert_eq!(flipped.direction, SortDirection::Ascending);
        let other = flipped.toggled(HoldingSortField::Pnl);
        assert_eq!(other, HoldingSort { field: HoldingSortField::Pnl, direction: SortDirection::Ascending });
    }

    #[test]
    fn default_sort_is_newest_first() {
        let mut rows = vec![holding("AAA", 1.0, 1_000), holding("BBB", 1.0, 5_000)];
        HoldingSort::default().apply(&mut rows);
        assert_eq!(rows[0].symbol.value(), "BBB");
    }

    #[test]
    fn market_is_closed_on_weekends() {
        let service = MarketHoursService::new();
        // Saturday 2024-03-16 15:00 UTC
        let saturday = Utc.with_ymd_and_hms(2024, 3, 16, 15, 0, 0).unwrap();
        let session = service.session(saturday);
        assert!(!session.is_open);
        // Monday 09:30 EDT = 13:30 UTC
        assert_eq!(session.next_open, Utc.with_ymd_and_hms(2024, 3, 18, 13, 30, 0).unwrap());
    }

    #[test]
    fn market_open_mid_session() {
        let service = MarketHoursService::new();
        // Wednesday 2024-03-13 15:45 UTC = 11:45 EDT
        let now = Utc.with_ymd_and_hms(2024, 3, 13, 15, 45, 0).unwrap();
        let session = service.session(now);
        assert!(session.is_open);
        assert_eq!(session.next_transition(), Utc.with_ymd_and_hms(2024, 3, 13, 20, 0, 0).unwrap());
    }
}
