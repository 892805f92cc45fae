/// Token monitor
///
/// Wires the log stream subscriber to the event processor and exposes the
/// read-only views consumers poll:
/// - `latest_event()`: the published snapshot
/// - `stats()`: counters
/// - `token(mint)` / `recent_tokens(n)`: every enriched token
/// - `token_analytics(mint)`: on-demand analytics for any mint
///
/// Lifecycle is `new → start → stop`. All caches and sets belong to the
/// instance.
pub mod processor;
pub mod snapshot;
pub mod state;


pub use processor::{EventOutcome, EventProcessor, ProcessorSettings, SkipReason};
pub use snapshot::{should_replace, LatestSnapshot};
pub use state::{MonitorState, MonitorStats, TokenStore};

use parking_lot::Mutex;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};

use crate::config::Config;
use crate::errors::{MonitorError, MonitorResult};
use crate::logger::{self, LogTag};
use crate::retry::RetryPolicy;
use crate::rpc::ChainReader;
use crate::shutdown::ShutdownSignal;
use crate::tokens::{
    AnalyticsCalculator, LaunchpadVerifier, MetadataResolver, TokenAnalytics, TokenEvent, UriFetcher,
};
use crate::websocket::{LogEvent, LogStreamSubscriber};

struct RunningTasks {
    subscriber: JoinHandle<()>,
    dispatcher: JoinHandle<()>,
}

pub struct TokenMonitor {
    config: Config,
    processor: Arc<EventProcessor>,
    shutdown: ShutdownSignal,
    tasks: Mutex<Option<RunningTasks>>,
}

fn parse_address(field: &str, value: &str) -> MonitorResult<Pubkey> {
    Pubkey::from_str(value.trim())
        .map_err(|e| MonitorError::Configuration(format!("{} '{}' is not a valid address: {}", field, value, e)))
}

impl TokenMonitor {
    pub fn new(config: Config, chain: Arc<dyn ChainReader>, fetcher: Arc<dyn UriFetcher>) -> MonitorResult<Self> {
        let launchpad_program = parse_address("launchpad.program_id", &config.launchpad.program_id)?;
        let native_mint = parse_address("launchpad.native_mint", &config.launchpad.native_mint)?;
        let metadata_program = parse_address("metadata.metadata_program_id", &config.metadata.metadata_program_id)?;
        parse_address("monitor.program_id", &config.monitor.program_id)?;

        let shutdown = ShutdownSignal::new();
        let retry = RetryPolicy::from_config(&config.retry).with_shutdown(shutdown.clone());

        let metadata = MetadataResolver::new(chain.clone(), fetcher, retry.clone(), metadata_program);
        let launchpad = LaunchpadVerifier::new(chain.clone(), retry.clone(), &launchpad_program);
        let analytics = AnalyticsCalculator::new(
            chain.clone(),
            retry.clone(),
            config.analytics.clone(),
            launchpad_program,
            native_mint,
        );

        let processor = EventProcessor::new(
            chain,
            retry,
            metadata,
            launchpad,
            analytics,
            MonitorState::new(&config.monitor),
            ProcessorSettings::from_config(&config.monitor, &native_mint.to_string()),
            shutdown.clone(),
        );

        Ok(Self {
            config,
            processor: Arc::new(processor),
            shutdown,
            tasks: Mutex::new(None),
        })
    }

    /// Override the start watermark (unix seconds); transactions older than it are skipped
    pub fn with_start_time(self, unix_secs: i64) -> Self {
        self.processor.set_start_watermark(unix_secs);
        self
    }

    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    /// Spawn the subscriber and dispatcher tasks
    pub fn start(&self) -> MonitorResult<()> {
        let mut tasks = self.tasks.lock();
        if tasks.is_some() {
            return Err(MonitorError::Configuration("monitor already started".to_string()));
        }
        if self.shutdown.is_triggered() {
            return Err(MonitorError::Shutdown);
        }

        let ws_url = self.config.rpc.ws_endpoint();
        let (subscriber, events) = LogStreamSubscriber::new(
            &ws_url,
            &self.config.monitor.program_id,
            Duration::from_secs(self.config.monitor.reconnect_delay_secs),
            self.shutdown.clone(),
        );

        logger::info(
            LogTag::Monitor,
            &format!(
                "🚀 Watching program {} for new tokens (window {}s)",
                self.config.monitor.program_id, self.config.monitor.freshness_window_secs
            ),
        );

        let dispatcher = tokio::spawn(dispatch(
            events,
            self.processor.clone(),
            self.shutdown.clone(),
            Duration::from_secs(self.config.monitor.shutdown_timeout_secs),
        ));

        *tasks = Some(RunningTasks {
            subscriber: tokio::spawn(subscriber.run()),
            dispatcher,
        });

        Ok(())
    }

    /// Signal shutdown, close the subscription and wait for in-flight events
    pub async fn stop(&self) {
        if self.shutdown.trigger() {
            logger::info(LogTag::Monitor, "Stopping token monitor...");
        }

        let Some(tasks) = self.tasks.lock().take() else {
            return;
        };

        if let Err(e) = tasks.subscriber.await {
            logger::warning(LogTag::Monitor, &format!("Subscriber task ended abnormally: {}", e));
        }
        if let Err(e) = tasks.dispatcher.await {
            logger::warning(LogTag::Monitor, &format!("Dispatcher task ended abnormally: {}", e));
        }

        logger::info(LogTag::Monitor, "Token monitor stopped");
    }

    pub fn latest_event(&self) -> Option<Arc<TokenEvent>> {
        self.processor.state().snapshot.get()
    }

    pub fn stats(&self) -> MonitorStats {
        self.processor
            .state()
            .stats(self.processor.metadata_cache_len(), self.processor.launchpad_cache_len())
    }

    pub fn token(&self, mint: &str) -> Option<Arc<TokenEvent>> {
        self.processor.state().tokens.get(mint)
    }

    /// The `n` most recent tokens, oldest first
    pub fn recent_tokens(&self, n: usize) -> Vec<Arc<TokenEvent>> {
        self.processor.state().tokens.recent(n)
    }

    pub async fn token_analytics(&self, mint: &str) -> TokenAnalytics {
        self.processor.analytics().analyze(mint).await
    }

    /// Run one event through the pipeline directly, bypassing the subscription
    pub async fn handle_log_event(&self, event: LogEvent) -> EventOutcome {
        self.processor.handle(event).await
    }
}

/// Spawn one task per event until shutdown, then drain in-flight tasks
async fn dispatch(
    mut events: mpsc::UnboundedReceiver<LogEvent>,
    processor: Arc<EventProcessor>,
    shutdown: ShutdownSignal,
    drain_timeout: Duration,
) {
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            _ = shutdown.wait() => break,
            event = events.recv() => {
                let Some(event) = event else { break };
                let processor = processor.clone();
                in_flight.spawn(async move { processor.handle(event).await });
            }
            Some(finished) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(e) = finished {
                    logger::error(LogTag::Monitor, &format!("Event task failed: {}", e));
                }
            }
        }
    }

    let pending = in_flight.len();
    if pending == 0 {
        return;
    }

    logger::info(
        LogTag::Monitor,
        &format!("Waiting up to {}s for {} in-flight events", drain_timeout.as_secs(), pending),
    );

    let drained = tokio::time::timeout(drain_timeout, async {
        while in_flight.join_next().await.is_some() {}
    })
    .await;

    if drained.is_err() {
        logger::warning(
            LogTag::Monitor,
            &format!("Aborting {} events still in flight", in_flight.len()),
        );
        in_flight.abort_all();
        while in_flight.join_next().await.is_some() {}
    }
}
