//! Shared fixtures for the client unit tests.

use crate::client::stats::StatsObserver;
use crate::pool::{BoxBody, CallModel, ResponseSink, RunnerCall};
use bytes::Bytes;
use parking_lot::Mutex;
use relay_tonic_core::proto::{
    CallFinished, CallResultStart, DataFrame, HttpHeader, HttpRespMeta, RunnerMsg,
    call_result_start, runner_msg,
};
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Recording response sink. `write_limit` caps how many bytes one
/// write accepts, to provoke the partial-write latch.
#[derive(Default)]
pub(crate) struct TestSink {
    pub headers: Mutex<Vec<(String, String)>>,
    pub statuses: Mutex<Vec<u16>>,
    pub body: Mutex<Vec<u8>>,
    pub write_limit: Option<usize>,
    pub writes: AtomicUsize,
}

impl TestSink {
    pub(crate) fn with_write_limit(limit: usize) -> Self {
        Self {
            write_limit: Some(limit),
            ..Default::default()
        }
    }

    pub(crate) fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ResponseSink for TestSink {
    fn set_header(&self, name: &str, value: &str) {
        self.headers.lock().push((name.into(), value.into()));
    }

    fn set_status(&self, code: u16) {
        self.statuses.lock().push(code);
    }

    async fn write_body(&self, data: &[u8]) -> io::Result<usize> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let accepted = self.write_limit.map_or(data.len(), |cap| data.len().min(cap));
        self.body.lock().extend_from_slice(&data[..accepted]);
        Ok(accepted)
    }
}

/// Minimal call fixture backed by an in-memory body.
pub(crate) struct TestCall {
    model: CallModel,
    extensions: HashMap<String, String>,
    slot_hash: Vec<u8>,
    body: Vec<u8>,
    sink: Arc<TestSink>,
    exec_time: Mutex<Duration>,
}

impl TestCall {
    pub(crate) fn new(body: &[u8]) -> Arc<Self> {
        Self::with_sink(body, Arc::new(TestSink::default()))
    }

    pub(crate) fn with_sink(body: &[u8], sink: Arc<TestSink>) -> Arc<Self> {
        Arc::new(Self {
            model: CallModel {
                id: "call-1".into(),
                app_id: "app-1".into(),
                fn_id: "fn-1".into(),
                image: "registry/fn:latest".into(),
                timeout_secs: 30,
                idle_timeout_secs: 5,
                memory_mb: 128,
                ..Default::default()
            },
            extensions: HashMap::from([("mode".to_string(), "test".to_string())]),
            slot_hash: b"slot-a".to_vec(),
            body: body.to_vec(),
            sink,
            exec_time: Mutex::new(Duration::ZERO),
        })
    }

    pub(crate) fn sink(&self) -> &TestSink {
        &self.sink
    }

    pub(crate) fn user_execution_time(&self) -> Duration {
        *self.exec_time.lock()
    }
}

impl RunnerCall for TestCall {
    fn model(&self) -> &CallModel {
        &self.model
    }

    fn slot_hash_id(&self) -> &[u8] {
        &self.slot_hash
    }

    fn extensions(&self) -> &HashMap<String, String> {
        &self.extensions
    }

    fn request_body(&self) -> BoxBody {
        Box::new(io::Cursor::new(self.body.clone()))
    }

    fn response_sink(&self) -> Arc<dyn ResponseSink> {
        Arc::clone(&self.sink) as Arc<dyn ResponseSink>
    }

    fn add_user_execution_time(&self, elapsed: Duration) {
        *self.exec_time.lock() += elapsed;
    }
}

/// Recording latency observer.
#[derive(Default)]
pub(crate) struct TestStats {
    pub scheduler: Mutex<Vec<Duration>>,
    pub execution: Mutex<Vec<Duration>>,
}

impl StatsObserver for TestStats {
    fn record_scheduler_latency(&self, elapsed: Duration) {
        self.scheduler.lock().push(elapsed);
    }

    fn record_execution_latency(&self, elapsed: Duration) {
        self.execution.lock().push(elapsed);
    }
}

pub(crate) fn result_start(status_code: i32, headers: &[(&str, &str)]) -> RunnerMsg {
    RunnerMsg {
        body: Some(runner_msg::Body::ResultStart(CallResultStart {
            meta: Some(call_result_start::Meta::Http(HttpRespMeta {
                status_code,
                headers: headers
                    .iter()
                    .map(|(key, value)| HttpHeader {
                        key: (*key).into(),
                        value: (*value).into(),
                    })
                    .collect(),
            })),
        })),
    }
}

pub(crate) fn data_msg(data: &[u8], eof: bool) -> RunnerMsg {
    RunnerMsg {
        body: Some(runner_msg::Body::Data(DataFrame {
            data: Bytes::copy_from_slice(data),
            eof,
        })),
    }
}

pub(crate) fn finished_ok(scheduler_ns: i64, execution_ns: i64) -> RunnerMsg {
    RunnerMsg {
        body: Some(runner_msg::Body::Finished(CallFinished {
            success: true,
            scheduler_duration: scheduler_ns,
            execution_duration: execution_ns,
            ..Default::default()
        })),
    }
}

pub(crate) fn finished_err(error_code: i32, error_str: &str, error_user: bool) -> RunnerMsg {
    RunnerMsg {
        body: Some(runner_msg::Body::Finished(CallFinished {
            success: false,
            error_code,
            error_str: error_str.into(),
            error_user,
            ..Default::default()
        })),
    }
}
