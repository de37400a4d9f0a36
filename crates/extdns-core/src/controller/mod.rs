//! Synchronization controller
//!
//! The Controller is responsible for:
//! - Collecting desired endpoints from a Source
//! - Reading current records from a DnsProvider
//! - Planning the changes between the two
//! - Applying the changes (unless dry-run)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐                      ┌──────────────┐
//! │   Source    │──── desired ────┐    │ DnsProvider  │
//! └─────────────┘                 │    │  (records)   │
//!                                 ▼    └──────────────┘
//!                          ┌──────────────┐   │
//!                          │     Plan     │◀──┘ current
//!                          └──────────────┘
//!                                 │ Changes
//!                 ┌───────────────┼───────────────┐
//!                 ▼                               ▼
//!         ┌──────────────┐                ┌─────────────┐
//!         │ DnsProvider  │                │   Events    │
//!         │ (apply)      │                │  (notify)   │
//!         └──────────────┘                └─────────────┘
//! ```
//!
//! ## Cycle Flow
//!
//! 1. `Source::endpoints()`
//! 2. `DnsProvider::records(zone)`
//! 3. `Plan::calculate()`
//! 4. `DnsProvider::apply_changes(zone, changes)` if non-empty and not dry-run
//! 5. Emit event for monitoring/logging
//!
//! A failed cycle is not retried. The next tick starts over from a fresh
//! read of both sides.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::IntervalStream;
use tracing::{debug, error, info, warn};

use crate::config::ExtDnsConfig;
use crate::error::Result;
use crate::plan::{Changes, Plan};
use crate::traits::{DnsProvider, Source};

/// Events emitted by the Controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// Controller started
    Started {
        zone: String,
    },

    /// Changes were applied to the zone
    SyncSucceeded {
        created: usize,
        updated: usize,
        deleted: usize,
    },

    /// Zone already matches the desired endpoints
    NoChanges,

    /// Changes were computed but not applied
    DryRun {
        created: usize,
        updated: usize,
        deleted: usize,
    },

    /// A cycle failed
    SyncFailed {
        error: String,
    },

    /// Controller stopped
    Stopped {
        reason: String,
    },
}

/// Synchronization controller
///
/// Keeps one zone of one provider in line with one source. Use
/// [`crate::source::MultiSource`] to combine sources.
///
/// ## Lifecycle
///
/// 1. Create with [`Controller::new()`]
/// 2. Either call [`Controller::run_once()`] or start the loop with [`Controller::run()`]
/// 3. The loop runs until a shutdown signal is received
pub struct Controller {
    /// Desired endpoints
    source: Box<dyn Source>,

    /// DNS backend
    provider: Box<dyn DnsProvider>,

    /// Zone to keep in sync
    zone: String,

    /// Time between cycles
    interval: Duration,

    /// Plan but never apply
    dry_run: bool,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<ControllerEvent>,
}

impl Controller {
    /// Create a new controller
    ///
    /// # Parameters
    ///
    /// - `source`: Source implementation
    /// - `provider`: DNS provider implementation
    /// - `config`: extdns configuration
    ///
    /// # Returns
    ///
    /// A tuple of (controller, event_receiver) where event_receiver yields controller events
    pub fn new(
        source: Box<dyn Source>,
        provider: Box<dyn DnsProvider>,
        config: ExtDnsConfig,
    ) -> Result<(Self, mpsc::Receiver<ControllerEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.controller.event_channel_capacity);

        let controller = Self {
            source,
            provider,
            zone: config.zone,
            interval: Duration::from_secs(config.controller.interval_secs),
            dry_run: config.controller.dry_run,
            event_tx: tx,
        };

        Ok((controller, rx))
    }

    /// Zone this controller manages
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Run a single synchronization cycle
    ///
    /// # Returns
    ///
    /// - `Ok(Changes)`: The changes that were planned (applied unless dry-run)
    /// - `Err(Error)`: The source or provider failed; nothing was applied
    ///   unless the provider itself failed partway through `apply_changes`
    pub async fn run_once(&self) -> Result<Changes> {
        match self.sync().await {
            Ok(changes) => Ok(changes),
            Err(e) => {
                self.emit_event(ControllerEvent::SyncFailed {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn sync(&self) -> Result<Changes> {
        let desired = self.source.endpoints().await?;
        let current = self.provider.records(&self.zone).await?;

        debug!(
            zone = %self.zone,
            source = self.source.source_name(),
            provider = self.provider.provider_name(),
            desired = desired.len(),
            current = current.len(),
            "Planning changes"
        );

        let changes = Plan::new(current, desired).calculate();
        let (created, updated, deleted) = (
            changes.create.len(),
            changes.update_new.len(),
            changes.delete.len(),
        );

        if changes.is_empty() {
            debug!(zone = %self.zone, "Zone is up to date");
            self.emit_event(ControllerEvent::NoChanges);
            return Ok(changes);
        }

        if self.dry_run {
            for ep in &changes.create {
                info!("[dry-run] would create {}", ep);
            }
            for ep in &changes.update_new {
                info!("[dry-run] would update {}", ep);
            }
            for ep in &changes.delete {
                info!("[dry-run] would delete {}", ep);
            }
            self.emit_event(ControllerEvent::DryRun {
                created,
                updated,
                deleted,
            });
            return Ok(changes);
        }

        self.provider.apply_changes(&self.zone, &changes).await?;

        info!(
            zone = %self.zone,
            created, updated, deleted,
            "Applied changes"
        );
        self.emit_event(ControllerEvent::SyncSucceeded {
            created,
            updated,
            deleted,
        });

        Ok(changes)
    }

    /// Run the controller loop
    ///
    /// Runs a cycle immediately and then once per interval until Ctrl-C.
    pub async fn run(&self) -> Result<()> {
        self.run_internal(None).await
    }

    /// Run the controller loop until `shutdown_rx` fires
    ///
    /// Embedders and tests use this to control shutdown; the daemon uses
    /// [`Controller::run()`].
    pub async fn run_with_shutdown(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.run_internal(shutdown_rx).await
    }

    async fn run_internal(
        &self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        self.emit_event(ControllerEvent::Started {
            zone: self.zone.clone(),
        });
        info!(zone = %self.zone, interval = ?self.interval, dry_run = self.dry_run, "Controller started");

        let mut interval = tokio::time::interval(self.interval);
        // A cycle that outlasts the interval pushes the next tick back
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut ticks = IntervalStream::new(interval);

        let shutdown = async move {
            match shutdown_rx {
                Some(rx) => {
                    let _ = rx.await;
                }
                None => {
                    if let Err(e) = tokio::signal::ctrl_c().await {
                        error!("Failed to listen for shutdown signal: {}", e);
                        std::future::pending::<()>().await;
                    }
                }
            }
        };
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                Some(_) = ticks.next() => {
                    if let Err(e) = self.run_once().await {
                        error!(zone = %self.zone, "Synchronization failed: {}", e);
                    }
                }

                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    self.emit_event(ControllerEvent::Stopped {
                        reason: "Shutdown signal".to_string(),
                    });
                    break;
                }
            }
        }

        Ok(())
    }

    /// Emit a controller event
    fn emit_event(&self, event: ControllerEvent) {
        // Dropped when the receiver lags; the channel is bounded
        if let Err(mpsc::error::TrySendError::Full(_)) = self.event_tx.try_send(event) {
            warn!("Event channel full, dropping event. Consider increasing event_channel_capacity.");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_event_equality() {
        let event = ControllerEvent::SyncSucceeded {
            created: 1,
            updated: 0,
            deleted: 2,
        };

        assert_eq!(event.clone(), event);
        assert_ne!(event, ControllerEvent::NoChanges);
    }
}
