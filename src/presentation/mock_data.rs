//! Static figures for the panels that have no backing table yet.

use crate::application::performance::{ChartPoint, PnlFigure, ProfitAndLoss};
use crate::application::view_models::{BotState, BotStatus};
use crate::domain::account::Timestamp;

pub fn bot_status() -> BotStatus {
    BotStatus {
        state: BotState::Active,
        last_active: Timestamp::parse("2024-03-13T15:58:23Z"),
        message: "Trading normally".to_string(),
    }
}

pub fn profit_and_loss() -> ProfitAndLoss {
    ProfitAndLoss {
        day: PnlFigure { value: 2500.0, percentage: 0.025 },
        week: PnlFigure { value: 5000.0, percentage: 0.05 },
        month: PnlFigure { value: 12000.0, percentage: 0.12 },
        all_time: PnlFigure { value: 100000.0, percentage: 1.0 },
    }
}

pub fn portfolio_history() -> Vec<ChartPoint> {
    vec![
        ChartPoint::new("2024-03-01", 150000.0),
        ChartPoint::new("2024-03-07", 155000.0),
        ChartPoint::new("2024-03-14", 160040.25),
    ]
}
