use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::arguments::is_debug_websocket_enabled;
use crate::errors::{MonitorError, MonitorResult};
use crate::logger::{self, log, LogTag};
use crate::shutdown::ShutdownSignal;
use crate::utils::{check_shutdown_or_delay, safe_truncate};

/// One log notification for a transaction that mentioned the watched program
#[derive(Debug, Clone, PartialEq)]
pub struct LogEvent {
    pub signature: String,
    pub logs: Vec<String>,
    /// The transaction failed on chain
    pub has_error: bool,
    pub slot: u64,
}

impl LogEvent {
    pub fn new(signature: &str, logs: Vec<String>) -> Self {
        Self {
            signature: signature.to_string(),
            logs,
            has_error: false,
            slot: 0,
        }
    }
}

/// WebSocket subscription request
#[derive(Serialize)]
struct SubscribeRequest {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: Vec<serde_json::Value>,
}

/// Either a subscription confirmation (`result`) or a `logsNotification`
#[derive(Deserialize, Debug)]
struct IncomingMessage {
    method: Option<String>,
    params: Option<NotificationParams>,
    result: Option<serde_json::Value>,
    error: Option<serde_json::Value>,
}

#[derive(Deserialize, Debug)]
struct NotificationParams {
    result: Option<NotificationResult>,
}

#[derive(Deserialize, Debug)]
struct NotificationResult {
    context: Option<NotificationContext>,
    value: Option<LogsValue>,
}

#[derive(Deserialize, Debug)]
struct NotificationContext {
    slot: u64,
}

#[derive(Deserialize, Debug)]
struct LogsValue {
    signature: String,
    err: Option<serde_json::Value>,
    #[serde(default)]
    logs: Option<Vec<String>>,
}

#[derive(Debug, PartialEq)]
pub(crate) enum Incoming {
    Subscribed(u64),
    Log(LogEvent),
    Rejected(String),
    Ignored,
}

pub(crate) fn parse_message(text: &str) -> MonitorResult<Incoming> {
    let message: IncomingMessage = serde_json::from_str(text)?;

    if let Some(error) = message.error {
        return Ok(Incoming::Rejected(error.to_string()));
    }

    if message.method.as_deref() == Some("logsNotification") {
        let result = message.params.and_then(|p| p.result);
        let slot = result
            .as_ref()
            .and_then(|r| r.context.as_ref())
            .map(|c| c.slot)
            .unwrap_or(0);

        return Ok(match result.and_then(|r| r.value) {
            Some(value) => Incoming::Log(LogEvent {
                signature: value.signature,
                logs: value.logs.unwrap_or_default(),
                has_error: value.err.map(|e| !e.is_null()).unwrap_or(false),
                slot,
            }),
            None => Incoming::Ignored,
        });
    }

    match message.result.and_then(|r| r.as_u64()) {
        Some(id) => Ok(Incoming::Subscribed(id)),
        None => Ok(Incoming::Ignored),
    }
}

enum StreamEnd {
    Shutdown,
    ReceiverDropped,
    Disconnected,
}

/// Live `logsSubscribe` subscription with automatic reconnect
///
/// Events are forwarded in arrival order over an unbounded channel. The loop
/// ends on shutdown or when the receiving side is dropped.
pub struct LogStreamSubscriber {
    ws_url: String,
    program_id: String,
    reconnect_delay: Duration,
    shutdown: ShutdownSignal,
    sender: mpsc::UnboundedSender<LogEvent>,
}

impl LogStreamSubscriber {
    pub fn new(
        ws_url: &str,
        program_id: &str,
        reconnect_delay: Duration,
        shutdown: ShutdownSignal,
    ) -> (Self, mpsc::UnboundedReceiver<LogEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();

        let subscriber = Self {
            ws_url: ws_url.to_string(),
            program_id: program_id.to_string(),
            reconnect_delay,
            shutdown,
            sender,
        };

        (subscriber, receiver)
    }

    /// Connect, subscribe and forward events until shutdown
    pub async fn run(self) {
        loop {
            if self.shutdown.is_triggered() {
                break;
            }

            log(
                LogTag::Websocket,
                "CONNECT",
                &format!("🔄 Connecting to WebSocket: {}", self.ws_url),
            );

            match self.connect_and_listen().await {
                Ok(StreamEnd::Shutdown) | Ok(StreamEnd::ReceiverDropped) => break,
                Ok(StreamEnd::Disconnected) => {
                    log(
                        LogTag::Websocket,
                        "RECONNECT",
                        &format!(
                            "WebSocket closed - reconnecting in {}s",
                            self.reconnect_delay.as_secs()
                        ),
                    );
                }
                Err(e) => {
                    log(
                        LogTag::Websocket,
                        "ERROR",
                        &format!(
                            "WebSocket error: {} - reconnecting in {}s",
                            e,
                            self.reconnect_delay.as_secs()
                        ),
                    );
                }
            }

            if check_shutdown_or_delay(&self.shutdown, self.reconnect_delay).await {
                break;
            }
        }

        log(LogTag::Websocket, "STOP", "WebSocket monitoring stopped");
    }

    async fn connect_and_listen(&self) -> MonitorResult<StreamEnd> {
        let (ws_stream, _) = connect_async(self.ws_url.as_str())
            .await
            .map_err(|e| MonitorError::Subscription(format!("Failed to connect to WebSocket: {}", e)))?;

        let (mut ws_sender, mut ws_receiver) = ws_stream.split();

        let subscribe = SubscribeRequest {
            jsonrpc: "2.0",
            id: 1,
            method: "logsSubscribe",
            params: vec![
                serde_json::json!({ "mentions": [self.program_id] }),
                serde_json::json!({ "commitment": "confirmed" }),
            ],
        };

        ws_sender
            .send(Message::Text(serde_json::to_string(&subscribe)?))
            .await
            .map_err(|e| MonitorError::Subscription(format!("Failed to send subscription: {}", e)))?;

        log(
            LogTag::Websocket,
            "SUBSCRIBE",
            &format!("📡 Subscribing to logs mentioning {}", self.program_id),
        );

        let mut subscription_id: Option<u64> = None;

        loop {
            let message = tokio::select! {
                _ = self.shutdown.wait() => {
                    if let Some(id) = subscription_id {
                        let unsubscribe = serde_json::json!({
                            "jsonrpc": "2.0",
                            "id": 2,
                            "method": "logsUnsubscribe",
                            "params": [id]
                        });
                        let _ = ws_sender.send(Message::Text(unsubscribe.to_string())).await;
                    }
                    let _ = ws_sender.send(Message::Close(None)).await;
                    return Ok(StreamEnd::Shutdown);
                }
                message = ws_receiver.next() => message,
            };

            let text = match message {
                Some(Ok(Message::Text(text))) => text,
                Some(Ok(Message::Close(_))) | None => {
                    log(LogTag::Websocket, "CLOSE", "WebSocket connection closed by server");
                    return Ok(StreamEnd::Disconnected);
                }
                // Ping/pong and binary frames carry no notifications
                Some(Ok(_)) => continue,
                Some(Err(e)) => {
                    return Err(MonitorError::Subscription(format!("WebSocket read failed: {}", e)));
                }
            };

            match parse_message(&text) {
                Ok(Incoming::Log(event)) => {
                    if is_debug_websocket_enabled() {
                        log(
                            LogTag::Websocket,
                            "NEW_TX",
                            &format!("🆕 Log event for {}", safe_truncate(&event.signature, 8)),
                        );
                    }
                    if self.sender.send(event).is_err() {
                        log(
                            LogTag::Websocket,
                            "CHANNEL_ERROR",
                            "Event receiver dropped - stopping subscription",
                        );
                        return Ok(StreamEnd::ReceiverDropped);
                    }
                }
                Ok(Incoming::Subscribed(id)) => {
                    subscription_id = Some(id);
                    log(
                        LogTag::Websocket,
                        "SUBSCRIBED",
                        &format!("✅ WebSocket subscription confirmed: {}", id),
                    );
                }
                Ok(Incoming::Rejected(error)) => {
                    return Err(MonitorError::Subscription(format!("Subscription rejected: {}", error)));
                }
                Ok(Incoming::Ignored) => {
                    logger::verbose(LogTag::Websocket, "Ignoring message without a log notification");
                }
                Err(e) => {
                    if is_debug_websocket_enabled() {
                        log(
                            LogTag::Websocket,
                            "DEBUG",
                            &format!("Unparsable WebSocket message: {}", e),
                        );
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_subscription_confirmation() {
        let parsed = parse_message(r#"{"jsonrpc":"2.0","result":24040,"id":1}"#).unwrap();
        assert_eq!(parsed, Incoming::Subscribed(24040));
    }

    #[test]
    fn test_parse_logs_notification() {
        let text = r#"{
            "jsonrpc": "2.0",
            "method": "logsNotification",
            "params": {
                "result": {
                    "context": { "slot": 5208469 },
                    "value": {
                        "signature": "5h6xBEauJ3PK6SWCZ1PGjBvj8vDdWG3KpwATGy1ARAXFSDwt8GFXM7W5Ncn16wmqokgpiKRLuS83KUxyZyv2sUYv",
                        "err": null,
                        "logs": [
                            "Program WLHv2UAZm6z4KyaaELi5pjdbJh6RESMva1Rnn8pJVVh invoke [1]",
                            "Program log: Instruction: Initialize"
                        ]
                    }
                },
                "subscription": 24040
            }
        }"#;

        match parse_message(text).unwrap() {
            Incoming::Log(event) => {
                assert!(event.signature.starts_with("5h6xBEau"));
                assert_eq!(event.slot, 5208469);
                assert_eq!(event.logs.len(), 2);
                assert!(!event.has_error);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_parse_failed_transaction_notification() {
        let text = r#"{"jsonrpc":"2.0","method":"logsNotification","params":{"result":{"context":{"slot":1},
            "value":{"signature":"SIG","err":{"InstructionError":[0,{"Custom":6001}]},"logs":null}},"subscription":1}}"#;

        match parse_message(text).unwrap() {
            Incoming::Log(event) => {
                assert!(event.has_error);
                assert!(event.logs.is_empty());
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejection_and_garbage() {
        let rejected =
            parse_message(r#"{"jsonrpc":"2.0","error":{"code":-32602,"message":"Invalid params"},"id":1}"#).unwrap();
        assert!(matches!(rejected, Incoming::Rejected(_)));
        assert!(parse_message("not json").is_err());
    }
}
