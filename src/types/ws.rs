use super::{ChartSnapshot, PositionsSnapshot, Quote, Timeframe};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Push feeds a WebSocket client can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feed {
    Quotes,
    Chart,
    Positions,
}

impl Feed {
    pub const ALL: [Feed; 3] = [Feed::Quotes, Feed::Chart, Feed::Positions];
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feed::Quotes => write!(f, "quotes"),
            Feed::Chart => write!(f, "chart"),
            Feed::Positions => write!(f, "positions"),
        }
    }
}

/// Incoming WebSocket message from client.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Subscribe {
        feeds: Vec<Feed>,
    },
    Unsubscribe {
        feeds: Vec<Feed>,
    },
    /// Replace the selected instrument
    Select {
        symbol: String,
    },
    /// Change the chart period preference
    SetTimeframe {
        timeframe: Timeframe,
    },
    /// Close an open position (no-op if already gone)
    ClosePosition {
        id: String,
    },
}

/// Outgoing WebSocket message to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Full terminal state, sent once on connect
    Snapshot {
        selected: String,
        quotes: Vec<Quote>,
        chart: ChartSnapshot,
        positions: PositionsSnapshot,
    },
    QuotesUpdate {
        quotes: Vec<Quote>,
    },
    ChartUpdate {
        chart: ChartSnapshot,
    },
    PositionsUpdate {
        positions: PositionsSnapshot,
    },
    Subscribed {
        feeds: Vec<Feed>,
    },
    Unsubscribed {
        feeds: Vec<Feed>,
    },
    Selected {
        symbol: String,
    },
    TimeframeSet {
        timeframe: Timeframe,
    },
    PositionClosed {
        id: String,
        removed: bool,
    },
    Error {
        error: String,
    },
}

impl ServerMessage {
    /// Feed this message belongs to, if it is a periodic update.
    pub fn feed(&self) -> Option<Feed> {
        match self {
            ServerMessage::QuotesUpdate { .. } => Some(Feed::Quotes),
            ServerMessage::ChartUpdate { .. } => Some(Feed::Chart),
            ServerMessage::PositionsUpdate { .. } => Some(Feed::Positions),
            _ => None,
        }
    }
}
