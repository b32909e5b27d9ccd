use warren_dashboard::domain::account::{
    HoldingSort, HoldingSortField, Position, SortDirection, Symbol, Timestamp, holdings_from_positions,
};

fn position(symbol: &str, qty: f64, entry: f64, current: f64, held_ms: i64) -> Position {
    Position {
        symbol: Symbol::from(symbol),
        qty,
        cost_basis: entry * qty,
        current_price: current,
        unrealized_plpc: (current - entry) / entry,
        created_at: Timestamp::from_millis(held_ms),
    }
}

fn symbols(sort: HoldingSort, positions: &[Position]) -> Vec<String> {
    holdings_from_positions(positions, sort).into_iter().map(|holding| holding.symbol.to_string()).collect()
}

#[test]
fn equal_pnl_breaks_ties_by_symbol_in_both_directions() {
    // Both gain exactly 100.
    let positions = vec![
        position("MSFT", 10.0, 100.0, 110.0, 2_000),
        position("AAPL", 20.0, 50.0, 55.0, 1_000),
        position("TSLA", 5.0, 200.0, 190.0, 3_000),
    ];
    let ascending = HoldingSort { field: HoldingSortField::Pnl, direction: SortDirection::Ascending };
    assert_eq!(symbols(ascending, &positions), ["TSLA", "AAPL", "MSFT"]);

    let descending = ascending.toggled(HoldingSortField::Pnl);
    assert_eq!(symbols(descending, &positions), ["AAPL", "MSFT", "TSLA"]);
}

#[test]
fn holdings_derive_entry_and_pnl_from_cost_basis() {
    let holdings = holdings_from_positions(&[position("NVDA", 25.0, 890.45, 919.13, 0)], HoldingSort::default());
    let nvda = &holdings[0];
    assert!((nvda.entry_price - 890.45).abs() < 1e-9);
    assert!((nvda.pnl - 717.0).abs() < 1e-6);
}

#[test]
fn zero_quantity_does_not_break_ordering() {
    let positions = vec![position("AMD", 0.0, 0.0, 10.0, 0), position("META", 1.0, 10.0, 12.0, 0)];
    let sort = HoldingSort { field: HoldingSortField::Entry, direction: SortDirection::Ascending };
    assert_eq!(symbols(sort, &positions).len(), 2);
}
