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

//! This module contains all wrapped functions of the AWS Lambda services.

use crate::configs::InvokerConfig;
use crate::environment::Environment;
use crate::error::{InvokerError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, info};
use rusoto_lambda::{
    FunctionConfiguration, InvocationRequest, InvocationResponse, Lambda, LambdaClient,
    UpdateFunctionCodeRequest,
};

/// The calls the invoker makes against AWS Lambda.
///
/// [`LambdaClient`] is the production implementation; tests use
/// [`crate::test_util::StubTransport`].
#[async_trait]
pub trait LambdaTransport: Send + Sync {
    /// Invokes a function and waits for Lambda's answer.
    async fn invoke(&self, request: InvocationRequest) -> Result<InvocationResponse>;

    /// Replaces a function's code.
    async fn update_function_code(
        &self,
        request: UpdateFunctionCodeRequest,
    ) -> Result<FunctionConfiguration>;
}

#[async_trait]
impl LambdaTransport for LambdaClient {
    async fn invoke(&self, request: InvocationRequest) -> Result<InvocationResponse> {
        Ok(Lambda::invoke(self, request).await?)
    }

    async fn update_function_code(
        &self,
        request: UpdateFunctionCodeRequest,
    ) -> Result<FunctionConfiguration> {
        Ok(Lambda::update_function_code(self, request).await?)
    }
}

/// Invokes the lambda function described by `descriptor` with the given
/// payload. The call is attempted once.
///
/// # Arguments
/// * `transport` - The Lambda client.
/// * `descriptor` - Function name, qualifier and invocation type.
/// * `payload` - The payload to be passed to the lambda function.
///
/// # Returns
/// The result of the invocation. A response flagged with a function error is
/// turned into [`InvokerError::FunctionError`].
pub async fn invoke_function<T: LambdaTransport + ?Sized>(
    transport: &T,
    descriptor: &InvocationRequest,
    payload: Bytes,
) -> Result<InvocationResponse> {
    let request = InvocationRequest {
        payload: Some(payload),
        ..descriptor.clone()
    };

    debug!(
        "Invoking {} (qualifier: {:?}, type: {:?})",
        request.function_name, request.qualifier, request.invocation_type
    );

    let response = transport.invoke(request).await?;
    match response.function_error {
        Some(ref kind) => {
            let details = response
                .payload
                .as_ref()
                .map(|p| String::from_utf8_lossy(p).into_owned())
                .unwrap_or_default();
            info!("Function execution error: {}, details: {}", kind, details);
            Err(InvokerError::FunctionError(format!(
                "{} returned {}: {}",
                descriptor.function_name, kind, details
            )))
        }
        None => Ok(response),
    }
}

/// Points the function of `environment` at a new code artifact in S3.
///
/// # Arguments
/// * `transport` - The Lambda client.
/// * `config` - Supplies the function name and the S3 key layout.
/// * `environment` - The deployment to update.
/// * `version` - The artifact version, e.g. `1.0.3`.
/// * `bucket` - The S3 bucket holding the artifact.
///
/// # Returns
/// The function configuration Lambda reports after the update.
pub async fn update_function_code<T: LambdaTransport + ?Sized>(
    transport: &T,
    config: &InvokerConfig,
    environment: Environment,
    version: &str,
    bucket: &str,
) -> Result<FunctionConfiguration> {
    let function_name = config.function_name(environment)?.to_owned();
    let s3_key = config.deploy.s3_key(environment, version);
    info!(
        "Updating {} from s3://{}/{}",
        function_name, bucket, s3_key
    );

    let request = UpdateFunctionCodeRequest {
        function_name,
        s3_bucket: Some(bucket.to_owned()),
        s3_key: Some(s3_key),
        publish: Some(config.deploy.publish),
        ..Default::default()
    };

    transport.update_function_code(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::StubTransport;

    fn descriptor() -> InvocationRequest {
        InvocationRequest {
            function_name: "sampleLambda_staging".to_owned(),
            invocation_type: Some("RequestResponse".to_owned()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn attaches_payload_to_a_copy_of_the_descriptor() -> Result<()> {
        let stub = StubTransport::new().with_response("\"ok\"");
        let descriptor = descriptor();
        invoke_function(&stub, &descriptor, Bytes::from_static(b"{\"x\":1}")).await?;

        let sent = stub.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].function_name, "sampleLambda_staging");
        assert_eq!(sent[0].payload.as_deref(), Some(&b"{\"x\":1}"[..]));
        assert_eq!(descriptor.payload, None);
        Ok(())
    }

    #[tokio::test]
    async fn function_errors_fail_the_call() {
        let stub = StubTransport::new().with_function_error(
            "Unhandled",
            "{\"errorMessage\":\"boom\"}",
        );
        let err = invoke_function(&stub, &descriptor(), Bytes::new())
            .await
            .unwrap_err();
        match err {
            InvokerError::FunctionError(desc) => {
                assert!(desc.contains("Unhandled"));
                assert!(desc.contains("boom"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn transport_errors_are_not_retried() {
        let stub = StubTransport::new().with_error(InvokerError::AWS("timeout".to_owned()));
        let err = invoke_function(&stub, &descriptor(), Bytes::new()).await;
        assert!(matches!(err, Err(InvokerError::AWS(_))));
        assert_eq!(stub.requests().len(), 1);
    }

    #[tokio::test]
    async fn update_points_at_the_versioned_artifact() -> Result<()> {
        let stub = StubTransport::new();
        let config = InvokerConfig::default();
        let conf = update_function_code(
            &stub,
            &config,
            Environment::Production,
            "1.0.3",
            "artifacts",
        )
        .await?;
        assert_eq!(conf.function_name.as_deref(), Some("sampleLambda_production"));

        let sent = stub.code_updates();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].function_name, "sampleLambda_production");
        assert_eq!(sent[0].s3_bucket.as_deref(), Some("artifacts"));
        assert_eq!(
            sent[0].s3_key.as_deref(),
            Some("sample_lambda/production/sample-lambda-1.0.3.zip")
        );
        assert_eq!(sent[0].publish, Some(false));
        Ok(())
    }
}
