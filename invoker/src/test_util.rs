// Copyright (c) 2020-present, UMD Database Group.
//
// This program is free software: you can use, redistribute, and/or modify
// it under the terms of the GNU Affero General Public License, version 3
// or later ("AGPL"), as published by the Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
// FITNESS FOR A PARTICULAR PURPOSE.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <http://www.gnu.org/licenses/>.

//! Utility functions for unit and integration tests.

use crate::aws::lambda::LambdaTransport;
use crate::error::{InvokerError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use rusoto_lambda::{
    FunctionConfiguration, InvocationRequest, InvocationResponse, UpdateFunctionCodeRequest,
};
use std::collections::VecDeque;
use std::sync::Mutex;

/// An in-memory [`LambdaTransport`] that records every request and replays
/// queued answers in order. Once the queue is drained, invocations succeed
/// with an empty payload.
#[derive(Debug, Default)]
pub struct StubTransport {
    answers:      Mutex<VecDeque<Result<InvocationResponse>>>,
    requests:     Mutex<Vec<InvocationRequest>>,
    code_updates: Mutex<Vec<UpdateFunctionCodeRequest>>,
}

impl StubTransport {
    /// Creates a stub with no queued answers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful answer carrying `payload`.
    pub fn with_response(self, payload: impl Into<Bytes>) -> Self {
        self.push(Ok(InvocationResponse {
            payload: Some(payload.into()),
            status_code: Some(200),
            ..Default::default()
        }))
    }

    /// Queues an answer flagged with a function error, the way Lambda reports
    /// an exception raised by the handler.
    pub fn with_function_error(self, kind: &str, payload: impl Into<Bytes>) -> Self {
        self.push(Ok(InvocationResponse {
            function_error: Some(kind.to_owned()),
            payload: Some(payload.into()),
            status_code: Some(200),
            ..Default::default()
        }))
    }

    /// Queues a failed call.
    pub fn with_error(self, error: InvokerError) -> Self {
        self.push(Err(error))
    }

    fn push(self, answer: Result<InvocationResponse>) -> Self {
        self.answers.lock().unwrap().push_back(answer);
        self
    }

    /// Every invocation received so far.
    pub fn requests(&self) -> Vec<InvocationRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Every code update received so far.
    pub fn code_updates(&self) -> Vec<UpdateFunctionCodeRequest> {
        self.code_updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl LambdaTransport for StubTransport {
    async fn invoke(&self, request: InvocationRequest) -> Result<InvocationResponse> {
        self.requests.lock().unwrap().push(request);
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(InvocationResponse {
                    status_code: Some(200),
                    ..Default::default()
                })
            })
    }

    async fn update_function_code(
        &self,
        request: UpdateFunctionCodeRequest,
    ) -> Result<FunctionConfiguration> {
        let conf = FunctionConfiguration {
            function_name: Some(request.function_name.clone()),
            version: Some("$LATEST".to_owned()),
            ..Default::default()
        };
        self.code_updates.lock().unwrap().push(request);
        Ok(conf)
    }
}
