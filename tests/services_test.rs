//! Integration tests for the simulation services

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tradepro::config::SimulationConfig;
use tradepro::services::quotes::apply_delta;
use tradepro::services::{CandleGenerator, PositionBook, QuoteSimulator, Terminal};
use tradepro::types::{seed_quotes, OrderSide, Position, ServerMessage};

#[test]
fn test_forced_quote_tick_scenario() {
    let mut quote = seed_quotes().remove(0);
    let spread = quote.spread();

    apply_delta(&mut quote, 10.0);

    assert_eq!(quote.bid, 108792.41);
    assert!((quote.spread() - spread).abs() < 0.01);
    for value in [quote.bid, quote.ask, quote.change] {
        let cents = value * 100.0;
        assert!((cents - cents.round()).abs() < 1e-6);
    }
}

#[test]
fn test_quote_order_is_stable() {
    let mut simulator = QuoteSimulator::default();
    let before: Vec<String> = simulator.quotes().iter().map(|q| q.symbol.clone()).collect();

    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..100 {
        simulator.tick_with(&mut rng);
    }

    let after: Vec<String> = simulator.quotes().iter().map(|q| q.symbol.clone()).collect();
    assert_eq!(before, after);
}

#[test]
fn test_spread_invariance_across_instruments() {
    let mut simulator = QuoteSimulator::default();
    let spreads: Vec<f64> = simulator.quotes().iter().map(|q| q.spread()).collect();

    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..250 {
        simulator.tick_with(&mut rng);
    }

    for (quote, spread) in simulator.quotes().iter().zip(spreads) {
        let tolerance = 1.5 * 10f64.powi(-(quote.price_class().decimals() as i32));
        assert!(
            (quote.spread() - spread).abs() <= tolerance,
            "{} spread drifted",
            quote.symbol
        );
    }
}

#[test]
fn test_candle_series_for_every_watchlist_symbol() {
    let generator = CandleGenerator;
    for quote in seed_quotes() {
        let series = generator.regenerate(&quote.symbol, Some(quote.bid));
        assert_eq!(series.candles.len(), 31);
        for candle in &series.candles {
            assert!(candle.low <= candle.open.min(candle.close));
            assert!(candle.high >= candle.open.max(candle.close));
        }
    }
}

#[test]
fn test_forced_position_scenario() {
    let mut book = PositionBook::new(Vec::new());
    book.open(Position::new(
        "1",
        "BTC",
        OrderSide::Buy,
        0.01,
        108808.62,
        "Aug 30, 5:40:13 P",
    ));

    book.revalue_at("1", 108782.41);

    let position = book.get("1").unwrap();
    assert_eq!(position.profit_loss, -0.26);
    assert!((position.profit_loss_percent + 0.024).abs() < 1e-9);
    assert_eq!(book.total_profit_loss(), -0.26);
}

#[tokio::test(start_paused = true)]
async fn test_terminal_runs_and_stops() {
    let terminal = Terminal::new(SimulationConfig {
        quote_interval: Duration::from_millis(500),
        ..SimulationConfig::default()
    });
    let mut updates = terminal.subscribe();
    let tasks = terminal.start();

    tokio::time::sleep(Duration::from_millis(1100)).await;
    tasks.shutdown().await;

    let mut quote_updates = 0;
    while let Ok(message) = updates.try_recv() {
        if matches!(message, ServerMessage::QuotesUpdate { .. }) {
            quote_updates += 1;
        }
    }
    assert_eq!(quote_updates, 2);

    let before = terminal.quotes().await;
    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(terminal.quotes().await, before);
}
