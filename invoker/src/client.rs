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

//! The client a test harness uses to call the sample function.

use crate::aws::credentials::lambda_client;
use crate::aws::lambda::{invoke_function, LambdaTransport};
use crate::configs::InvokerConfig;
use crate::environment::Environment;
use crate::error::Result;
use bytes::Bytes;
use log::info;
use rusoto_lambda::{InvocationRequest, LambdaClient};
use serde::Serialize;

/// Invokes the sample function of one environment.
///
/// The function name, qualifier and invocation type are resolved once, when
/// the client is built, into an invocation descriptor. Each call to
/// [`InvocationClient::invoke`] sends that descriptor with its own payload,
/// so a client can be reused for any number of sequential calls.
///
/// ```no_run
/// use invoker::prelude::*;
/// use serde_json::json;
///
/// # async fn run() -> Result<()> {
/// let client = InvocationClient::new(Environment::Staging)?;
/// let greeting = client.invoke(&json!({ "name": "world" })).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct InvocationClient<T: LambdaTransport = LambdaClient> {
    environment: Environment,
    config:      InvokerConfig,
    descriptor:  InvocationRequest,
    transport:   T,
}

impl InvocationClient<LambdaClient> {
    /// Creates a client for `environment` with the built-in configuration.
    pub fn new(environment: Environment) -> Result<Self> {
        Self::with_config(environment, InvokerConfig::default())
    }

    /// Creates a client for `environment` whose AWS client uses the region
    /// and credentials of `config`.
    pub fn with_config(environment: Environment, config: InvokerConfig) -> Result<Self> {
        let transport = lambda_client(&config, environment)?;
        Self::with_transport(environment, config, transport)
    }
}

impl<T: LambdaTransport> InvocationClient<T> {
    /// Creates a client that sends its calls through `transport`.
    pub fn with_transport(
        environment: Environment,
        config: InvokerConfig,
        transport: T,
    ) -> Result<Self> {
        let descriptor = InvocationRequest {
            function_name: config.function_name(environment)?.to_owned(),
            invocation_type: Some(config.invocation_type.clone()),
            qualifier: config.qualifier.clone(),
            ..Default::default()
        };

        Ok(InvocationClient {
            environment,
            config,
            descriptor,
            transport,
        })
    }

    /// The environment this client calls.
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// The resolved remote function name.
    pub fn function_name(&self) -> &str {
        &self.descriptor.function_name
    }

    /// The alias or version calls are routed to, if any.
    pub fn qualifier(&self) -> Option<&str> {
        self.descriptor.qualifier.as_deref()
    }

    /// The configuration the client was built with.
    pub fn config(&self) -> &InvokerConfig {
        &self.config
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Serializes `request` to JSON, invokes the function once and returns the
    /// response text after the configured decoding. By default every `"` is
    /// removed from the text, which unwraps a JSON string response.
    ///
    /// Serialization, transport, credential and remote execution failures are
    /// all returned as errors; nothing is retried.
    pub async fn invoke<R: Serialize + ?Sized>(&self, request: &R) -> Result<String> {
        let payload = Bytes::from(serde_json::to_vec(request)?);
        let response = invoke_function(&self.transport, &self.descriptor, payload).await?;

        let text = match response.payload {
            Some(payload) => String::from_utf8(payload.to_vec())?,
            None => String::new(),
        };
        info!(
            "{} answered with {} bytes (status: {:?})",
            self.descriptor.function_name,
            text.len(),
            response.status_code
        );

        Ok(self.config.response_decoding.decode(&text))
    }

    /// Runs [`InvocationClient::invoke`] to completion on a private runtime,
    /// blocking the calling thread. Panics if called from within an async
    /// runtime.
    pub fn invoke_blocking<R: Serialize + ?Sized>(&self, request: &R) -> Result<String> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?
            .block_on(self.invoke(request))
    }
}
