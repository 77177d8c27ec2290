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

//! Credential resolution for the Lambda client.

use crate::configs::InvokerConfig;
use crate::environment::Environment;
use crate::error::{InvokerError, Result};
use ini::Ini;
use log::debug;
use rusoto_core::credential::StaticProvider;
use rusoto_core::HttpClient;
use rusoto_lambda::LambdaClient;
use std::path::{Path, PathBuf};

/// Where the Lambda client gets its AWS keys from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsSource {
    /// The default AWS chain: environment variables, the shared profile file,
    /// container and instance metadata.
    Default,
    /// An INI file holding one static key pair per environment:
    ///
    /// ```ini
    /// staging_access_key = AKIA...
    /// staging_secret_key = ...
    /// production_access_key = AKIA...
    /// production_secret_key = ...
    /// ```
    StaticFile(PathBuf),
}

impl Default for CredentialsSource {
    fn default() -> Self {
        CredentialsSource::Default
    }
}

/// Parses the key pair of `environment` out of a static credentials document.
pub fn static_keys(conf: &Ini, environment: Environment) -> Result<(String, String)> {
    let key = |kind: &str| {
        let name = format!("{}_{}_key", environment, kind);
        conf.get_from(None::<String>, &name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| InvokerError::Credentials(format!("missing {}", name)))
    };
    Ok((key("access")?, key("secret")?))
}

/// Reads the key pair of `environment` from a static credentials file.
pub fn load_static_keys<P: AsRef<Path>>(
    path: P,
    environment: Environment,
) -> Result<(String, String)> {
    let conf = Ini::load_from_file(path.as_ref()).map_err(|e| {
        InvokerError::Credentials(format!("{}: {}", path.as_ref().display(), e))
    })?;
    static_keys(&conf, environment)
}

/// Creates a Lambda client for `environment` in the configured region.
pub fn lambda_client(config: &InvokerConfig, environment: Environment) -> Result<LambdaClient> {
    match config.credentials {
        CredentialsSource::Default => Ok(LambdaClient::new(config.region.clone())),
        CredentialsSource::StaticFile(ref path) => {
            debug!("Using static {} credentials from {}", environment, path.display());
            let (access_key, secret_key) = load_static_keys(path, environment)?;
            let dispatcher = HttpClient::new().map_err(|e| InvokerError::AWS(e.to_string()))?;
            Ok(LambdaClient::new_with(
                dispatcher,
                StaticProvider::new_minimal(access_key, secret_key),
                config.region.clone(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: &str = "staging_access_key = AKIASTAGING\n\
                        staging_secret_key = s3cr3t\n\
                        production_access_key = AKIAPROD\n\
                        production_secret_key = \n";

    #[test]
    fn picks_the_pair_of_the_environment() -> Result<()> {
        let conf = Ini::load_from_str(KEYS)?;
        let (access, secret) = static_keys(&conf, Environment::Staging)?;
        assert_eq!(access, "AKIASTAGING");
        assert_eq!(secret, "s3cr3t");
        Ok(())
    }

    #[test]
    fn empty_keys_are_credential_errors() -> Result<()> {
        let conf = Ini::load_from_str(KEYS)?;
        match static_keys(&conf, Environment::Production) {
            Err(InvokerError::Credentials(desc)) => {
                assert_eq!(desc, "missing production_secret_key")
            }
            other => panic!("unexpected result: {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn missing_file_is_a_credential_error() {
        let err = load_static_keys("/nonexistent/aws_credentials.ini", Environment::Staging);
        assert!(matches!(err, Err(InvokerError::Credentials(_))));
    }

    #[test]
    fn client_with_static_file_needs_the_file() {
        let config = InvokerConfig::default().with_credentials(CredentialsSource::StaticFile(
            PathBuf::from("/nonexistent/aws_credentials.ini"),
        ));
        assert_eq!(
            config.credentials,
            CredentialsSource::StaticFile(PathBuf::from("/nonexistent/aws_credentials.ini"))
        );
        let err = lambda_client(&config, Environment::Production);
        assert!(matches!(err, Err(InvokerError::Credentials(_))));
    }
}
