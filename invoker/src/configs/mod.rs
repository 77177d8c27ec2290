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

//! This module provides the default configurations of the invoker.

pub mod invoker;
pub use invoker::{DeployConfig, InvokerConfig, ResponseDecoding};

pub use crate::config::INVOKER_CONF;
use lazy_static::lazy_static;

lazy_static! {
    /// AWS Lambda function async invocation.
    pub static ref INVOKER_LAMBDA_ASYNC_CALL: String = "Event".to_string();
    /// AWS Lambda function sync invocation.
    pub static ref INVOKER_LAMBDA_SYNC_CALL: String = "RequestResponse".to_string();

    /// The configuration built from the embedded config file.
    pub static ref INVOKER_DEFAULT_CONFIG: InvokerConfig = InvokerConfig::from_ini(&INVOKER_CONF).unwrap();
}
