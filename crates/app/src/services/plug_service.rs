//! Plug service: discovers smart plugs and changes their power state.
//!
//! Every call starts from a fresh scan: BLE addresses rotate and plugs move
//! in and out of range, so no device handle outlives a request.

use std::time::Duration;

use plughub_domain::error::PlugError;
use plughub_domain::filter::filter_smart_plugs;
use plughub_domain::intent::StateChangeRequest;
use plughub_domain::plug_state::PlugState;
use plughub_domain::protocol::POWER_CHARACTERISTIC;
use plughub_domain::resolve::resolve;
use plughub_domain::scan::ScanEntry;

use crate::ports::{Connection, Transport};
use crate::retry::RetryPolicy;

/// Application service driving smart plugs through a [`Transport`].
pub struct PlugService<T> {
    transport: T,
    retry: RetryPolicy,
    scan_duration: Duration,
}

impl<T: Transport> PlugService<T> {
    /// Create a new service scanning for `scan_duration` on each request.
    pub fn new(transport: T, retry: RetryPolicy, scan_duration: Duration) -> Self {
        Self {
            transport,
            retry,
            scan_duration,
        }
    }

    /// Scan and return the advertisements that look like smart plugs.
    ///
    /// # Errors
    ///
    /// Returns [`PlugError::Transport`] on radio failure, or
    /// [`PlugError::Disconnected`] once the retry policy is exhausted.
    #[tracing::instrument(skip(self))]
    pub async fn list_plugs(&self) -> Result<Vec<ScanEntry>, PlugError> {
        let _radio = self.transport.exclusive().await;
        self.discover().await
    }

    /// Drive the plug at `identifier` according to `intent`.
    ///
    /// Holds the radio for the whole scan, connect, read and write sequence.
    /// The connection is closed before returning, whether or not the control
    /// step succeeded. Returns the state that was written.
    ///
    /// # Errors
    ///
    /// Returns [`PlugError::NotFound`] / [`PlugError::AmbiguousMatch`] when
    /// `identifier` does not resolve to exactly one plug,
    /// [`PlugError::InvalidStateEncoding`] when a toggle reads an unexpected
    /// value, or the transport error that interrupted the sequence.
    #[tracing::instrument(skip(self))]
    pub async fn set_state(
        &self,
        identifier: &str,
        intent: StateChangeRequest,
    ) -> Result<PlugState, PlugError> {
        let _radio = self.transport.exclusive().await;

        let plug = resolve(identifier, self.discover().await?)?;
        let address = plug.address();

        let mut connection = self
            .retry
            .run("connect", || self.transport.connect(address))
            .await?;
        tracing::debug!(address, "connected to smart plug");

        let result = apply_intent(&mut connection, intent).await;

        if let Err(err) = connection.disconnect().await {
            tracing::warn!(%err, address, "failed to disconnect smart plug");
        }

        let state = result?;
        tracing::info!(address, %intent, %state, "smart plug state changed");
        Ok(state)
    }

    async fn discover(&self) -> Result<Vec<ScanEntry>, PlugError> {
        let entries = self
            .retry
            .run("scan", || self.transport.scan(self.scan_duration))
            .await?;
        let seen = entries.len();
        let plugs = filter_smart_plugs(entries);
        tracing::debug!(seen, plugs = plugs.len(), "BLE scan complete");
        Ok(plugs)
    }
}

/// Read the current state when needed, then write the target state.
async fn apply_intent<C: Connection>(
    connection: &mut C,
    intent: StateChangeRequest,
) -> Result<PlugState, PlugError> {
    let target = match intent.fixed_target() {
        Some(target) => target,
        None => {
            let payload = connection.read_characteristic(POWER_CHARACTERISTIC).await?;
            let current = PlugState::decode_payload(&payload)?;
            tracing::debug!(%current, "read current plug state");
            current.negate()
        }
    };

    connection
        .write_characteristic(POWER_CHARACTERISTIC, &[target.encode()])
        .await?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    use plughub_domain::error::{CharacteristicNotFoundError, InvalidStateEncodingError};
    use plughub_domain::scan::AddressType;

    use crate::ports::{ExclusiveAccess, RadioLock};

    const PLUG: &str = "AA:BB:CC:DD:EE:FF";

    #[derive(Debug, Clone, PartialEq)]
    enum Op {
        Scan,
        Connect(String),
        Read(uuid::Uuid),
        Write(uuid::Uuid, Vec<u8>),
        Disconnect,
    }

    /// In-memory radio with one plug characteristic and an operation log.
    #[derive(Clone)]
    struct FakeRadio {
        entries: Vec<ScanEntry>,
        value: Arc<Mutex<Vec<u8>>>,
        log: Arc<Mutex<Vec<Op>>>,
        scan_drops: Arc<AtomicU32>,
        connect_drops: Arc<AtomicU32>,
        fail_write: bool,
        missing_characteristic: bool,
        scan_broken: bool,
        lock: RadioLock,
        ran_unlocked: Arc<AtomicBool>,
    }

    impl FakeRadio {
        fn with_plug(value: u8) -> Self {
            Self {
                entries: vec![
                    ScanEntry::new(
                        "11:22:33:44:55:66",
                        AddressType::Public,
                        Some("Speaker".to_string()),
                    ),
                    ScanEntry::new(
                        PLUG,
                        AddressType::Random,
                        Some("Hue smart plug".to_string()),
                    ),
                ],
                value: Arc::new(Mutex::new(vec![value])),
                log: Arc::default(),
                scan_drops: Arc::default(),
                connect_drops: Arc::default(),
                fail_write: false,
                missing_characteristic: false,
                scan_broken: false,
                lock: RadioLock::new(),
                ran_unlocked: Arc::default(),
            }
        }

        fn record(&self, op: Op) {
            if !self.lock.is_held() {
                self.ran_unlocked.store(true, Ordering::SeqCst);
            }
            self.log.lock().unwrap().push(op);
        }

        fn ops(&self) -> Vec<Op> {
            self.log.lock().unwrap().clone()
        }

        fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
            self.ops().iter().filter(|op| pred(op)).count()
        }

        fn value(&self) -> Vec<u8> {
            self.value.lock().unwrap().clone()
        }

        fn take_drop(counter: &AtomicU32) -> bool {
            counter
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
        }
    }

    struct FakeConnection {
        radio: FakeRadio,
    }

    impl Transport for FakeRadio {
        type Connection = FakeConnection;

        async fn scan(&self, _duration: Duration) -> Result<Vec<ScanEntry>, PlugError> {
            self.record(Op::Scan);
            if self.scan_broken {
                return Err(PlugError::transport("adapter powered off"));
            }
            if Self::take_drop(&self.scan_drops) {
                return Err(PlugError::disconnected("scan dropped"));
            }
            Ok(self.entries.clone())
        }

        async fn connect(&self, address: &str) -> Result<FakeConnection, PlugError> {
            self.record(Op::Connect(address.to_string()));
            if Self::take_drop(&self.connect_drops) {
                return Err(PlugError::disconnected("handshake dropped"));
            }
            Ok(FakeConnection {
                radio: self.clone(),
            })
        }

        async fn exclusive(&self) -> ExclusiveAccess {
            self.lock.acquire().await
        }
    }

    impl Connection for FakeConnection {
        async fn read_characteristic(&mut self, uuid: uuid::Uuid) -> Result<Vec<u8>, PlugError> {
            self.radio.record(Op::Read(uuid));
            if self.radio.missing_characteristic || uuid != POWER_CHARACTERISTIC {
                return Err(CharacteristicNotFoundError { uuid }.into());
            }
            Ok(self.radio.value())
        }

        async fn write_characteristic(
            &mut self,
            uuid: uuid::Uuid,
            value: &[u8],
        ) -> Result<(), PlugError> {
            self.radio.record(Op::Write(uuid, value.to_vec()));
            if self.radio.fail_write {
                return Err(PlugError::disconnected("write dropped"));
            }
            *self.radio.value.lock().unwrap() = value.to_vec();
            Ok(())
        }

        async fn disconnect(self) -> Result<(), PlugError> {
            self.radio.record(Op::Disconnect);
            Ok(())
        }
    }

    fn service(radio: &FakeRadio) -> PlugService<FakeRadio> {
        PlugService::new(
            radio.clone(),
            RetryPolicy::default(),
            Duration::from_secs(1),
        )
    }

    #[tokio::test]
    async fn should_list_only_smart_plugs() {
        let radio = FakeRadio::with_plug(0x00);
        let plugs = service(&radio).list_plugs().await.unwrap();

        assert_eq!(plugs.len(), 1);
        assert_eq!(plugs[0].address(), PLUG);
        assert_eq!(radio.ops(), vec![Op::Scan]);
    }

    #[tokio::test]
    async fn should_read_once_then_write_on_when_toggling_off_plug() {
        let radio = FakeRadio::with_plug(0x00);
        let state = service(&radio)
            .set_state(PLUG, StateChangeRequest::Toggle)
            .await
            .unwrap();

        assert_eq!(state, PlugState::ON);
        assert_eq!(
            radio.ops(),
            vec![
                Op::Scan,
                Op::Connect(PLUG.to_string()),
                Op::Read(POWER_CHARACTERISTIC),
                Op::Write(POWER_CHARACTERISTIC, vec![0x01]),
                Op::Disconnect,
            ]
        );
    }

    #[tokio::test]
    async fn should_toggle_on_plug_off() {
        let radio = FakeRadio::with_plug(0x01);
        let state = service(&radio)
            .set_state(PLUG, StateChangeRequest::Toggle)
            .await
            .unwrap();

        assert_eq!(state, PlugState::OFF);
        assert_eq!(radio.value(), vec![0x00]);
    }

    #[tokio::test]
    async fn should_write_on_without_reading_when_activating() {
        let radio = FakeRadio::with_plug(0x00);
        service(&radio)
            .set_state(PLUG, StateChangeRequest::Activate)
            .await
            .unwrap();

        assert_eq!(radio.count(|op| matches!(op, Op::Read(_))), 0);
        assert_eq!(
            radio.count(|op| *op == Op::Write(POWER_CHARACTERISTIC, vec![0x01])),
            1
        );
        assert_eq!(radio.count(|op| *op == Op::Disconnect), 1);
    }

    #[tokio::test]
    async fn should_write_off_without_reading_when_deactivating() {
        let radio = FakeRadio::with_plug(0x01);
        let state = service(&radio)
            .set_state(PLUG, StateChangeRequest::Deactivate)
            .await
            .unwrap();

        assert_eq!(state, PlugState::OFF);
        assert_eq!(radio.count(|op| matches!(op, Op::Read(_))), 0);
        assert_eq!(radio.value(), vec![0x00]);
    }

    #[tokio::test]
    async fn should_resolve_identifier_case_insensitively() {
        let radio = FakeRadio::with_plug(0x00);
        service(&radio)
            .set_state("aa:bb:cc:dd:ee:ff", StateChangeRequest::Activate)
            .await
            .unwrap();

        assert_eq!(radio.count(|op| *op == Op::Connect(PLUG.to_string())), 1);
    }

    #[tokio::test]
    async fn should_not_connect_when_plug_not_found() {
        let radio = FakeRadio::with_plug(0x00);
        let result = service(&radio)
            .set_state("00:00:00:00:00:00", StateChangeRequest::Toggle)
            .await;

        assert!(matches!(result, Err(PlugError::NotFound(_))));
        assert_eq!(radio.ops(), vec![Op::Scan]);
    }

    #[tokio::test]
    async fn should_not_resolve_non_plug_devices() {
        let radio = FakeRadio::with_plug(0x00);
        let result = service(&radio)
            .set_state("11:22:33:44:55:66", StateChangeRequest::Activate)
            .await;

        assert!(matches!(result, Err(PlugError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_report_ambiguous_match() {
        let mut radio = FakeRadio::with_plug(0x00);
        radio.entries.push(ScanEntry::new(
            "aa:bb:cc:dd:ee:ff",
            AddressType::Random,
            Some("Hue smart plug".to_string()),
        ));

        let result = service(&radio)
            .set_state(PLUG, StateChangeRequest::Activate)
            .await;

        assert!(matches!(result, Err(PlugError::AmbiguousMatch(_))));
        assert_eq!(radio.count(|op| matches!(op, Op::Connect(_))), 0);
    }

    #[tokio::test]
    async fn should_disconnect_and_skip_write_when_state_is_invalid() {
        let radio = FakeRadio::with_plug(0x07);
        let result = service(&radio)
            .set_state(PLUG, StateChangeRequest::Toggle)
            .await;

        assert!(matches!(
            result,
            Err(PlugError::InvalidStateEncoding(InvalidStateEncodingError { ref payload })) if *payload == vec![0x07]
        ));
        assert_eq!(radio.count(|op| matches!(op, Op::Write(..))), 0);
        assert_eq!(radio.ops().last(), Some(&Op::Disconnect));
    }

    #[tokio::test]
    async fn should_disconnect_when_write_fails() {
        let mut radio = FakeRadio::with_plug(0x00);
        radio.fail_write = true;

        let result = service(&radio)
            .set_state(PLUG, StateChangeRequest::Activate)
            .await;

        assert!(matches!(result, Err(PlugError::Disconnected(_))));
        assert_eq!(radio.ops().last(), Some(&Op::Disconnect));
        assert_eq!(radio.count(|op| matches!(op, Op::Write(..))), 1);
    }

    #[tokio::test]
    async fn should_propagate_missing_characteristic_and_disconnect() {
        let mut radio = FakeRadio::with_plug(0x00);
        radio.missing_characteristic = true;

        let result = service(&radio)
            .set_state(PLUG, StateChangeRequest::Toggle)
            .await;

        assert!(matches!(
            result,
            Err(PlugError::CharacteristicNotFound(CharacteristicNotFoundError { uuid })) if uuid == POWER_CHARACTERISTIC
        ));
        assert_eq!(radio.count(|op| matches!(op, Op::Connect(_))), 1);
        assert_eq!(radio.count(|op| matches!(op, Op::Write(..))), 0);
        assert_eq!(radio.ops().last(), Some(&Op::Disconnect));
    }

    #[tokio::test]
    async fn should_not_retry_scan_on_transport_failure() {
        let mut radio = FakeRadio::with_plug(0x00);
        radio.scan_broken = true;

        let result = service(&radio)
            .set_state(PLUG, StateChangeRequest::Activate)
            .await;

        assert!(matches!(result, Err(PlugError::Transport(_))));
        assert_eq!(radio.ops(), vec![Op::Scan]);
        assert!(!radio.lock.is_held());
    }

    #[tokio::test]
    async fn should_retry_connect_after_transient_disconnects() {
        let radio = FakeRadio::with_plug(0x00);
        radio.connect_drops.store(4, Ordering::SeqCst);

        service(&radio)
            .set_state(PLUG, StateChangeRequest::Activate)
            .await
            .unwrap();

        assert_eq!(radio.count(|op| matches!(op, Op::Connect(_))), 5);
        assert_eq!(radio.count(|op| *op == Op::Scan), 1);
    }

    #[tokio::test]
    async fn should_give_up_connect_after_five_attempts() {
        let radio = FakeRadio::with_plug(0x00);
        radio.connect_drops.store(u32::MAX, Ordering::SeqCst);

        let result = service(&radio)
            .set_state(PLUG, StateChangeRequest::Activate)
            .await;

        assert!(matches!(result, Err(PlugError::Disconnected(_))));
        assert_eq!(radio.count(|op| matches!(op, Op::Connect(_))), 5);
        assert_eq!(radio.count(|op| *op == Op::Disconnect), 0);
    }

    #[tokio::test]
    async fn should_retry_scan_after_transient_disconnects() {
        let radio = FakeRadio::with_plug(0x00);
        radio.scan_drops.store(2, Ordering::SeqCst);

        let plugs = service(&radio).list_plugs().await.unwrap();

        assert_eq!(plugs.len(), 1);
        assert_eq!(radio.count(|op| *op == Op::Scan), 3);
    }

    #[tokio::test]
    async fn should_hold_radio_for_whole_sequence() {
        let radio = FakeRadio::with_plug(0x00);
        service(&radio)
            .set_state(PLUG, StateChangeRequest::Toggle)
            .await
            .unwrap();

        assert!(!radio.ran_unlocked.load(Ordering::SeqCst));
        assert!(!radio.lock.is_held());
    }

    #[tokio::test]
    async fn should_release_radio_after_failure() {
        let radio = FakeRadio::with_plug(0x00);
        let _ = service(&radio)
            .set_state("00:00:00:00:00:00", StateChangeRequest::Toggle)
            .await;

        assert!(!radio.lock.is_held());
    }
}
