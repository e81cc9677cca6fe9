//! A scripted [`RemoteDataClient`] for tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::VecDeque;
use std::rc::Rc;

use serde_json::Value;

use crate::rpc_client::RemoteDataClient;
use crate::rpc_client::RemoteError;

/// Answers calls from per-operation queues and records every call made.
///
/// The last queued answer for an operation is reused once the queue drains.
/// Operations with nothing queued answer `null`.
#[derive(Clone, Default)]
pub struct FakeClient {
    responses: Rc<RefCell<HashMap<String, VecDeque<Result<Value, RemoteError>>>>>,
    calls: Rc<RefCell<Vec<(String, Value)>>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, operation: &str, response: Result<Value, RemoteError>) {
        self.responses
            .borrow_mut()
            .entry(operation.to_string())
            .or_default()
            .push_back(response);
    }

    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.borrow().clone()
    }

    pub fn calls_to(&self, operation: &str) -> Vec<Value> {
        self.calls
            .borrow()
            .iter()
            .filter(|(op, _)| op == operation)
            .map(|(_, params)| params.clone())
            .collect()
    }
}

impl RemoteDataClient for FakeClient {
    async fn call(&self, operation: &str, params: Value) -> Result<Value, RemoteError> {
        self.calls
            .borrow_mut()
            .push((operation.to_string(), params));

        let mut responses = self.responses.borrow_mut();
        match responses.get_mut(operation) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap_or(Ok(Value::Null)),
            Some(queue) => queue.front().cloned().unwrap_or(Ok(Value::Null)),
            None => Ok(Value::Null),
        }
    }
}
