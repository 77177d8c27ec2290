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

//! Invoker error types

use rusoto_core::RusotoError;
use std::error;
use std::fmt::{Display, Formatter};
use std::io;
use std::result;
use std::string::FromUtf8Error;

/// Result type for operations that could result in an [InvokerError]
pub type Result<T> = result::Result<T, InvokerError>;

/// Invoker error
#[derive(Debug)]
pub enum InvokerError {
    /// Error returned when no usable AWS credentials could be resolved, or
    /// when AWS rejected them.
    Credentials(String),
    /// Error returned when accessing the AWS services fails: transport,
    /// timeouts, throttling and every other service-side rejection.
    AWS(String),
    /// Error returned when the remote function ran but raised an error. The
    /// description carries the error kind and the payload Lambda sent back.
    FunctionError(String),
    /// Error returned when serde_json failed to serialize or deserialize data.
    SerdeJson(serde_json::Error),
    /// Error returned when a response payload is not valid UTF-8.
    Utf8(FromUtf8Error),
    /// Error returned when a configuration value is missing or malformed.
    Config(String),
    /// Error associated to I/O operations and associated traits.
    IoError(io::Error),
}

impl From<io::Error> for InvokerError {
    fn from(e: io::Error) -> Self {
        InvokerError::IoError(e)
    }
}

impl From<serde_json::Error> for InvokerError {
    fn from(e: serde_json::Error) -> Self {
        InvokerError::SerdeJson(e)
    }
}

impl From<FromUtf8Error> for InvokerError {
    fn from(e: FromUtf8Error) -> Self {
        InvokerError::Utf8(e)
    }
}

impl From<ini::Error> for InvokerError {
    fn from(e: ini::Error) -> Self {
        match e {
            ini::Error::Io(e) => InvokerError::IoError(e),
            ini::Error::Parse(e) => InvokerError::Config(e.to_string()),
        }
    }
}

impl From<ini::ParseError> for InvokerError {
    fn from(e: ini::ParseError) -> Self {
        InvokerError::Config(e.to_string())
    }
}

impl<E: error::Error + 'static> From<RusotoError<E>> for InvokerError {
    fn from(e: RusotoError<E>) -> Self {
        match e {
            RusotoError::Credentials(e) => InvokerError::Credentials(e.to_string()),
            e => InvokerError::AWS(e.to_string()),
        }
    }
}

impl Display for InvokerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            InvokerError::Credentials(ref desc) => write!(f, "Credentials error: {}", desc),
            InvokerError::AWS(ref desc) => write!(f, "AWS error: {}", desc),
            InvokerError::FunctionError(ref desc) => {
                write!(f, "Function execution error: {}", desc)
            }
            InvokerError::SerdeJson(ref desc) => write!(f, "serde_json error: {:?}", desc),
            InvokerError::Utf8(ref desc) => write!(f, "UTF-8 error: {}", desc),
            InvokerError::Config(ref desc) => write!(f, "Configuration error: {}", desc),
            InvokerError::IoError(ref desc) => write!(f, "IO error: {}", desc),
        }
    }
}

impl error::Error for InvokerError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rusoto_core::credential::CredentialsError;
    use rusoto_lambda::InvokeError;

    #[test]
    fn rusoto_credentials_errors_stay_distinct() {
        let err: InvokerError =
            RusotoError::<InvokeError>::Credentials(CredentialsError::new("no keys")).into();
        assert!(matches!(err, InvokerError::Credentials(ref d) if d.contains("no keys")));

        let err: InvokerError =
            RusotoError::Service(InvokeError::ResourceNotFound("gone".to_owned())).into();
        assert!(matches!(err, InvokerError::AWS(ref d) if d.contains("gone")));
    }

    #[test]
    fn display_prefixes() {
        let err = InvokerError::FunctionError("Unhandled".to_owned());
        assert_eq!(err.to_string(), "Function execution error: Unhandled");
        let err = InvokerError::Config("bad region".to_owned());
        assert_eq!(err.to_string(), "Configuration error: bad region");
    }
}
