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

//! Deployment environments the sample function is published to.

use crate::error::{InvokerError, Result};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Deployment target selector. It decides which remote function a client
/// calls and never changes once the client is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    /// The staging deployment.
    Staging,
    /// The production deployment.
    Production,
}

impl Environment {
    /// All known environments.
    pub const ALL: [Environment; 2] = [Environment::Staging, Environment::Production];

    /// The lower-case name used in config keys, S3 keys and on the command
    /// line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::Staging
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Environment {
    type Err = InvokerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(InvokerError::Config(format!(
                "unknown environment: {:?} (expected staging or production)",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() -> Result<()> {
        assert_eq!("PRODUCTION".parse::<Environment>()?, Environment::Production);
        assert_eq!(" Staging ".parse::<Environment>()?, Environment::Staging);
        assert!("prod".parse::<Environment>().is_err());
        Ok(())
    }

    #[test]
    fn display_round_trips_through_from_str() -> Result<()> {
        for env in Environment::ALL {
            assert_eq!(env.to_string().parse::<Environment>()?, env);
        }
        Ok(())
    }
}
