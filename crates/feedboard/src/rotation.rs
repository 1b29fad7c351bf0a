//! Page Rotation
//!
//! Advances the shared display one page at a time on the board's
//! `rotate_seconds` interval and pushes each new frame to connected clients.
//! The same loop watches the clock so an AUTO switch-over or an expired
//! override reaches displays even when pages are not rotating.

use std::time::Duration;

use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::board::BoardFrame;
use crate::server::{AppState, PageStep};

/// How often the loop wakes to check the clock and the rotation interval
const CLOCK_CHECK: Duration = Duration::from_secs(1);

/// Timed page turner
pub struct BoardRotator {
    state: AppState,
    /// Whether pages turn at all; the clock is watched either way
    rotate: bool,
}

impl BoardRotator {
    pub fn new(state: AppState) -> Self {
        Self { state, rotate: true }
    }

    /// Enable or disable page turns
    pub fn rotate(mut self, rotate: bool) -> Self {
        self.rotate = rotate;
        self
    }

    /// Current interval; `None` when rotation is disabled or there is no board
    async fn interval(&self) -> Option<Duration> {
        if !self.rotate {
            return None;
        }
        let board = self.state.board().await?;
        match board.display().rotate_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Turn one page and publish it
    ///
    /// Single-page boards are left alone so displays are not redrawn for nothing.
    pub async fn tick(&self) -> Option<BoardFrame> {
        let board = self.state.board().await?;
        let time_mode = self.state.time_mode(&board);
        if board.layout(time_mode).total_pages() <= 1 {
            return None;
        }

        match self.state.turn_page(PageStep::Next).await {
            Ok(frame) => {
                debug!(page = frame.page, total = frame.total_pages, "Rotated page");
                self.state.publish(&frame).await;
                Some(frame)
            }
            Err(e) => {
                warn!("Page rotation failed: {}", e);
                None
            }
        }
    }

    /// One wake-up of the loop: turn the page when due, then catch a time
    /// mode change the turn did not already publish
    pub async fn cycle(&self, turn_due: bool) -> Option<BoardFrame> {
        let turned = if turn_due { self.tick().await } else { None };
        let refreshed = self.state.refresh_time_mode().await;
        refreshed.or(turned)
    }

    /// Run the rotation loop
    ///
    /// The interval is re-read every cycle so a manifest reload takes effect
    /// on the next turn.
    pub async fn run(self) {
        info!(rotate = self.rotate, "Starting page rotation loop");

        let mut clock = tokio::time::interval(CLOCK_CHECK);
        clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_turn = Instant::now();

        loop {
            clock.tick().await;

            let turn_due = match self.interval().await {
                Some(interval) => last_turn.elapsed() >= interval,
                None => {
                    last_turn = Instant::now();
                    false
                }
            };
            if turn_due {
                last_turn = Instant::now();
            }
            self.cycle(turn_due).await;
        }
    }
}
