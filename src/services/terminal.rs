//! Terminal state and the simulation loops that drive it.
//!
//! [`Terminal`] owns the quote watchlist, the chart series for the selected
//! instrument and the open positions. [`Terminal::start`] spawns one loop per
//! simulator; every tick publishes a [`ServerMessage`] on a broadcast channel
//! that the WebSocket layer fans out to subscribers.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, watch, RwLock};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use super::candles::{CandleGenerator, CandleSeries};
use super::positions::PositionBook;
use super::quotes::QuoteSimulator;
use super::selection::Selection;
use super::task::{clamp_period, ScopedTask};
use crate::config::SimulationConfig;
use crate::types::{ChartSnapshot, PositionsSnapshot, Quote, ServerMessage, Timeframe};

const UPDATE_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
struct ChartState {
    series: CandleSeries,
    generated_at: i64,
}

/// Shared simulation state.
pub struct Terminal {
    config: SimulationConfig,
    quotes: RwLock<QuoteSimulator>,
    chart: RwLock<ChartState>,
    positions: RwLock<PositionBook>,
    selection: Selection,
    timeframe: watch::Sender<Timeframe>,
    updates: broadcast::Sender<ServerMessage>,
}

impl Terminal {
    /// Create a terminal with the seed watchlist and position, and an initial
    /// chart for the configured default symbol.
    pub fn new(config: SimulationConfig) -> Arc<Self> {
        Self::with_state(config, QuoteSimulator::default(), PositionBook::seeded())
    }

    /// Create a terminal over explicit simulator state.
    pub fn with_state(
        config: SimulationConfig,
        quotes: QuoteSimulator,
        positions: PositionBook,
    ) -> Arc<Self> {
        let symbol = config.default_symbol.clone();
        let anchor = config
            .candles_follow_quotes
            .then(|| quotes.get(&symbol).map(|q| q.bid))
            .flatten();
        let series = CandleGenerator.regenerate(&symbol, anchor);

        let (timeframe, _) = watch::channel(Timeframe::default());
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);

        Arc::new(Self {
            selection: Selection::new(symbol),
            quotes: RwLock::new(quotes),
            chart: RwLock::new(ChartState {
                series,
                generated_at: Utc::now().timestamp_millis(),
            }),
            positions: RwLock::new(positions),
            timeframe,
            updates,
            config,
        })
    }

    /// Spawn the quote, candle and position loops.
    ///
    /// The loops stop when the returned guard is dropped.
    pub fn start(self: &Arc<Self>) -> TerminalTasks {
        let quotes = {
            let terminal = self.clone();
            ScopedTask::every("quotes", self.config.quote_interval, move || {
                let terminal = terminal.clone();
                async move { terminal.tick_quotes().await }
            })
        };

        let positions = {
            let terminal = self.clone();
            ScopedTask::every("positions", self.config.position_interval, move || {
                let terminal = terminal.clone();
                async move { terminal.tick_positions().await }
            })
        };

        let candles = ScopedTask::spawn("candles", self.clone().run_candle_loop());

        TerminalTasks {
            tasks: vec![quotes, candles, positions],
        }
    }

    /// Regenerates immediately, then on every period. A selection or
    /// timeframe change regenerates at once and restarts the period.
    async fn run_candle_loop(self: Arc<Self>) {
        let mut selection = self.selection.watch();
        let mut timeframe = self.timeframe.subscribe();
        let mut ticker = interval(clamp_period(self.config.candle_interval));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                Ok(()) = selection.changed() => {
                    let symbol = selection.borrow_and_update().clone();
                    debug!(%symbol, "selection changed, restarting chart");
                    ticker.reset();
                }
                Ok(()) = timeframe.changed() => {
                    let timeframe = *timeframe.borrow_and_update();
                    debug!(%timeframe, "timeframe changed, restarting chart");
                    ticker.reset();
                }
            }
            self.regenerate_chart().await;
        }
    }

    // =========================================================================
    // Ticks
    // =========================================================================

    /// Advance the watchlist one tick and publish it.
    pub async fn tick_quotes(&self) {
        let quotes = {
            let mut simulator = self.quotes.write().await;
            simulator.tick();
            simulator.quotes().to_vec()
        };
        self.publish(ServerMessage::QuotesUpdate { quotes });
    }

    /// Re-mark every open position and publish the panel.
    pub async fn tick_positions(&self) {
        let positions = {
            let mut book = self.positions.write().await;
            book.tick();
            book.snapshot()
        };
        self.publish(ServerMessage::PositionsUpdate { positions });
    }

    /// Build a fresh series for the current selection and publish it.
    ///
    /// Returns false if the selection moved on while the series was built.
    pub async fn regenerate_chart(&self) -> bool {
        let symbol = self.selection.current();
        let anchor = if self.config.candles_follow_quotes {
            self.quotes.read().await.get(&symbol).map(|q| q.bid)
        } else {
            None
        };
        let series = CandleGenerator.regenerate(&symbol, anchor);
        self.publish_chart(series).await
    }

    /// Store `series` as the chart unless its symbol is no longer selected.
    pub(crate) async fn publish_chart(&self, series: CandleSeries) -> bool {
        let snapshot = {
            let mut chart = self.chart.write().await;
            if series.symbol != self.selection.current() {
                debug!(symbol = %series.symbol, "discarding chart for stale selection");
                return false;
            }
            chart.series = series;
            chart.generated_at = Utc::now().timestamp_millis();
            self.chart_snapshot(&chart)
        };
        self.publish(ServerMessage::ChartUpdate { chart: snapshot });
        true
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Quotes in seed order.
    pub async fn quotes(&self) -> Vec<Quote> {
        self.quotes.read().await.quotes().to_vec()
    }

    pub async fn quote(&self, symbol: &str) -> Option<Quote> {
        self.quotes.read().await.get(symbol).cloned()
    }

    pub async fn chart(&self) -> ChartSnapshot {
        let chart = self.chart.read().await;
        self.chart_snapshot(&chart)
    }

    pub async fn positions(&self) -> PositionsSnapshot {
        self.positions.read().await.snapshot()
    }

    pub fn selected(&self) -> String {
        self.selection.current()
    }

    pub fn timeframe(&self) -> Timeframe {
        *self.timeframe.borrow()
    }

    /// Full state for a newly connected client.
    pub async fn snapshot(&self) -> ServerMessage {
        ServerMessage::Snapshot {
            selected: self.selected(),
            quotes: self.quotes().await,
            chart: self.chart().await,
            positions: self.positions().await,
        }
    }

    /// Receiver for every published update.
    pub fn subscribe(&self) -> broadcast::Receiver<ServerMessage> {
        self.updates.subscribe()
    }

    // =========================================================================
    // Controls
    // =========================================================================

    /// Replace the selected instrument. Symbols are trimmed and uppercased;
    /// returns `None` for a blank symbol. Unknown symbols are accepted and
    /// charted from the default base price.
    pub fn select(&self, symbol: &str) -> Option<String> {
        let symbol = normalize_symbol(symbol)?;
        self.selection.select(&symbol);
        Some(symbol)
    }

    /// Change the period preference. Restarts chart generation when the
    /// value actually changes.
    pub fn set_timeframe(&self, timeframe: Timeframe) -> bool {
        let changed = self.timeframe.send_if_modified(|current| {
            if *current == timeframe {
                false
            } else {
                *current = timeframe;
                true
            }
        });
        if changed {
            info!(%timeframe, "timeframe changed");
        }
        changed
    }

    /// Close a position. Closing an absent id is a no-op.
    pub async fn close_position(&self, id: &str) -> bool {
        let (removed, positions) = {
            let mut book = self.positions.write().await;
            let removed = book.close(id);
            (removed, book.snapshot())
        };
        if removed {
            info!(id, "position closed");
            self.publish(ServerMessage::PositionsUpdate { positions });
        }
        removed
    }

    /// Price orders are referenced against: the chart's current price when
    /// `symbol` is charted, otherwise the quote's bid.
    pub async fn reference_price(&self, symbol: &str) -> Option<f64> {
        {
            let chart = self.chart.read().await;
            if chart.series.symbol == symbol {
                return Some(chart.series.current_price());
            }
        }
        self.quote(symbol).await.map(|q| q.bid)
    }

    fn chart_snapshot(&self, chart: &ChartState) -> ChartSnapshot {
        ChartSnapshot {
            symbol: chart.series.symbol.clone(),
            timeframe: self.timeframe(),
            candles: chart.series.candles.clone(),
            current_price: chart.series.current_price(),
            generated_at: chart.generated_at,
        }
    }

    fn publish(&self, message: ServerMessage) {
        // No receivers is fine; nobody is connected yet.
        let _ = self.updates.send(message);
    }
}

/// Trim and uppercase a symbol, rejecting blanks.
pub fn normalize_symbol(symbol: &str) -> Option<String> {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        None
    } else {
        Some(symbol.to_uppercase())
    }
}

/// Guards for the running simulation loops.
#[derive(Debug)]
pub struct TerminalTasks {
    tasks: Vec<ScopedTask>,
}

impl TerminalTasks {
    pub fn names(&self) -> Vec<&'static str> {
        self.tasks.iter().map(|t| t.name()).collect()
    }

    /// Stop every loop and wait for them to finish.
    pub async fn shutdown(self) {
        for task in self.tasks {
            task.stop().await;
        }
    }
}
