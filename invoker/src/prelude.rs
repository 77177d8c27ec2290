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

//! A "prelude" for users of the invoker crate.
//!
//! ```
//! use invoker::prelude::*;
//! ```

pub use crate::aws::credentials::CredentialsSource;
pub use crate::aws::lambda::{update_function_code, LambdaTransport};
pub use crate::client::InvocationClient;
pub use crate::configs::{
    DeployConfig, InvokerConfig, ResponseDecoding, INVOKER_CONF, INVOKER_LAMBDA_ASYNC_CALL,
    INVOKER_LAMBDA_SYNC_CALL,
};
pub use crate::environment::Environment;
pub use crate::error::{InvokerError, Result};
