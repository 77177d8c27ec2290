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

//! Typed view over the invoker's INI settings.

use super::{
    INVOKER_CONF, INVOKER_DEFAULT_CONFIG, INVOKER_LAMBDA_ASYNC_CALL, INVOKER_LAMBDA_SYNC_CALL,
};
use crate::aws::credentials::CredentialsSource;
use crate::environment::Environment;
use crate::error::{InvokerError, Result};
use ini::Ini;
use log::debug;
use rusoto_core::Region;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How the text of a response payload is turned into the returned string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseDecoding {
    /// Removes every double-quote character. This unwraps a JSON string
    /// scalar, but also destroys quotes inside the value and leaves JSON
    /// escape backslashes in place: `"he said "hi""` becomes `he said hi`.
    StripQuotes,
    /// Decodes the payload as a JSON string scalar. Payloads that are not a
    /// JSON string (objects, numbers, plain text) are returned unchanged.
    JsonScalar,
}

impl ResponseDecoding {
    /// Applies the decoding to a UTF-8 response text.
    pub fn decode(&self, text: &str) -> String {
        match self {
            ResponseDecoding::StripQuotes => text.replace('"', ""),
            ResponseDecoding::JsonScalar => {
                serde_json::from_str::<String>(text).unwrap_or_else(|_| text.to_owned())
            }
        }
    }
}

impl Default for ResponseDecoding {
    fn default() -> Self {
        ResponseDecoding::StripQuotes
    }
}

impl FromStr for ResponseDecoding {
    type Err = InvokerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "strip_quotes" => Ok(ResponseDecoding::StripQuotes),
            "json_scalar" => Ok(ResponseDecoding::JsonScalar),
            other => Err(InvokerError::Config(format!(
                "unknown response decoding: {:?}",
                other
            ))),
        }
    }
}

/// Settings used to push new function code from S3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployConfig {
    /// First component of the artifact's S3 key.
    pub s3_key_prefix:   String,
    /// File name prefix of the zipped artifact.
    pub artifact_prefix: String,
    /// Whether Lambda publishes a new version after the update.
    pub publish:         bool,
}

impl DeployConfig {
    /// The S3 key of the artifact built for `environment` at `version`, e.g.
    /// `sample_lambda/staging/sample-lambda-1.0.3.zip`.
    pub fn s3_key(&self, environment: Environment, version: &str) -> String {
        format!(
            "{}/{}/{}-{}.zip",
            self.s3_key_prefix, environment, self.artifact_prefix, version
        )
    }
}

/// Everything a client needs to know to reach the remote function.
#[derive(Debug, Clone)]
pub struct InvokerConfig {
    /// Region the functions are deployed to.
    pub region:                       Region,
    /// Remote function name of each environment. An environment without an
    /// entry calls the staging function.
    pub function_name_by_environment: HashMap<Environment, String>,
    /// Alias or version to route to; `None` routes to the default version.
    pub qualifier:                    Option<String>,
    /// Lambda invocation type, `RequestResponse` or `Event`.
    pub invocation_type:              String,
    /// How response text is decoded.
    pub response_decoding:            ResponseDecoding,
    /// Where credentials come from.
    pub credentials:                  CredentialsSource,
    /// Code update settings.
    pub deploy:                       DeployConfig,
}

impl Default for InvokerConfig {
    fn default() -> Self {
        INVOKER_DEFAULT_CONFIG.clone()
    }
}

/// Looks `key` up in `conf`, falling back to the embedded defaults.
fn lookup<'a>(conf: &'a Ini, section: &str, key: &str) -> Option<&'a str> {
    conf.get_from(Some(section), key)
        .or_else(|| INVOKER_CONF.get_from(Some(section), key))
        .map(str::trim)
}

fn required<'a>(conf: &'a Ini, section: &str, key: &str) -> Result<&'a str> {
    lookup(conf, section, key)
        .ok_or_else(|| InvokerError::Config(format!("missing [{}] {}", section, key)))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl InvokerConfig {
    /// Builds the configuration from an INI document. Keys the document does
    /// not set take their value from the embedded `config.toml`.
    pub fn from_ini(conf: &Ini) -> Result<Self> {
        let region = Region::from_str(required(conf, "aws", "region")?)
            .map_err(|e| InvokerError::Config(e.to_string()))?;

        let mut function_name_by_environment = HashMap::new();
        for env in Environment::ALL {
            let key = format!("{}_function", env);
            if let Some(name) = non_empty(lookup(conf, "lambda", &key)) {
                function_name_by_environment.insert(env, name.to_owned());
            }
        }
        if !function_name_by_environment.contains_key(&Environment::Staging) {
            return Err(InvokerError::Config(
                "missing [lambda] staging_function".to_string(),
            ));
        }

        let qualifier = non_empty(lookup(conf, "lambda", "qualifier")).map(str::to_owned);

        let invocation_type = required(conf, "lambda", "invocation_type")?.to_owned();
        if invocation_type != *INVOKER_LAMBDA_SYNC_CALL
            && invocation_type != *INVOKER_LAMBDA_ASYNC_CALL
        {
            return Err(InvokerError::Config(format!(
                "unknown invocation type: {:?}",
                invocation_type
            )));
        }

        let response_decoding = required(conf, "lambda", "response_decoding")?.parse()?;

        let credentials = match non_empty(lookup(conf, "credentials", "file")) {
            Some(path) => CredentialsSource::StaticFile(PathBuf::from(path)),
            None => CredentialsSource::Default,
        };

        let publish = required(conf, "deploy", "publish")?;
        let deploy = DeployConfig {
            s3_key_prefix:   required(conf, "deploy", "s3_key_prefix")?.to_owned(),
            artifact_prefix: required(conf, "deploy", "artifact_prefix")?.to_owned(),
            publish:         publish.parse::<bool>().map_err(|_| {
                InvokerError::Config(format!("[deploy] publish is not a bool: {:?}", publish))
            })?,
        };

        Ok(InvokerConfig {
            region,
            function_name_by_environment,
            qualifier,
            invocation_type,
            response_decoding,
            credentials,
            deploy,
        })
    }

    /// Parses an INI document held in a string.
    pub fn from_ini_str(conf: &str) -> Result<Self> {
        Self::from_ini(&Ini::load_from_str(conf)?)
    }

    /// Loads a custom configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!("Loading configuration from {}", path.as_ref().display());
        Self::from_ini(&Ini::load_from_file(path)?)
    }

    /// Resolves the remote function name of `environment`. Environments
    /// missing from the table call the staging function.
    pub fn function_name(&self, environment: Environment) -> Result<&str> {
        self.function_name_by_environment
            .get(&environment)
            .or_else(|| {
                self.function_name_by_environment
                    .get(&Environment::Staging)
            })
            .map(String::as_str)
            .ok_or_else(|| {
                InvokerError::Config(format!("no function name for {}", environment))
            })
    }

    /// Sets the function name called for `environment`.
    pub fn with_function_name(mut self, environment: Environment, name: &str) -> Self {
        self.function_name_by_environment
            .insert(environment, name.to_owned());
        self
    }

    /// Routes invocations to an alias or version. An empty string restores
    /// the default version.
    pub fn with_qualifier(mut self, qualifier: &str) -> Self {
        self.qualifier = non_empty(Some(qualifier.trim())).map(str::to_owned);
        self
    }

    /// Sets how response payloads are decoded.
    pub fn with_response_decoding(mut self, decoding: ResponseDecoding) -> Self {
        self.response_decoding = decoding;
        self
    }

    /// Sets the credential source.
    pub fn with_credentials(mut self, credentials: CredentialsSource) -> Self {
        self.credentials = credentials;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_embedded_file() -> Result<()> {
        let conf = InvokerConfig::default();
        assert_eq!(conf.region, Region::UsWest2);
        assert_eq!(
            conf.function_name(Environment::Production)?,
            "sampleLambda_production"
        );
        assert_eq!(conf.function_name(Environment::Staging)?, "sampleLambda_staging");
        assert_eq!(conf.qualifier, None);
        assert_eq!(conf.invocation_type, "RequestResponse");
        assert_eq!(conf.response_decoding, ResponseDecoding::StripQuotes);
        assert_eq!(conf.credentials, CredentialsSource::Default);
        assert!(!conf.deploy.publish);
        Ok(())
    }

    #[test]
    fn partial_documents_fall_back_to_defaults() -> Result<()> {
        let conf = InvokerConfig::from_ini_str(
            "[aws]\nregion = eu-west-1\n\n[lambda]\nqualifier = SAMPLE_ALIAS\n",
        )?;
        assert_eq!(conf.region, Region::EuWest1);
        assert_eq!(conf.qualifier.as_deref(), Some("SAMPLE_ALIAS"));
        assert_eq!(conf.function_name(Environment::Staging)?, "sampleLambda_staging");
        Ok(())
    }

    #[test]
    fn missing_environment_uses_staging_function() -> Result<()> {
        let mut conf = InvokerConfig::default();
        conf.function_name_by_environment
            .remove(&Environment::Production);
        assert_eq!(
            conf.function_name(Environment::Production)?,
            "sampleLambda_staging"
        );

        conf.function_name_by_environment.clear();
        assert!(conf.function_name(Environment::Staging).is_err());
        Ok(())
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(InvokerConfig::from_ini_str("[aws]\nregion = moon-base-1\n").is_err());
        assert!(InvokerConfig::from_ini_str("[lambda]\ninvocation_type = DryRun\n").is_err());
        assert!(InvokerConfig::from_ini_str("[lambda]\nresponse_decoding = yaml\n").is_err());
        assert!(InvokerConfig::from_ini_str("[deploy]\npublish = maybe\n").is_err());
    }

    #[test]
    fn qualifier_setter_treats_empty_as_disabled() {
        let conf = InvokerConfig::default().with_qualifier("SAMPLE_ALIAS");
        assert_eq!(conf.qualifier.as_deref(), Some("SAMPLE_ALIAS"));
        let conf = conf.with_qualifier("");
        assert_eq!(conf.qualifier, None);
    }

    #[test]
    fn strip_quotes_is_lossy() {
        let decoding = ResponseDecoding::StripQuotes;
        assert_eq!(decoding.decode("\"hello\""), "hello");
        assert_eq!(decoding.decode("\"he said \"hi\"\""), "he said hi");
        assert_eq!(decoding.decode(r#""he said \"hi\"""#), r"he said \hi\");
    }

    #[test]
    fn json_scalar_unescapes_strings_only() {
        let decoding = ResponseDecoding::JsonScalar;
        assert_eq!(decoding.decode("\"hello\""), "hello");
        assert_eq!(decoding.decode(r#""he said \"hi\"""#), "he said \"hi\"");
        assert_eq!(decoding.decode("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(decoding.decode("42"), "42");
    }

    #[test]
    fn deploy_key_layout() {
        let deploy = InvokerConfig::default().deploy;
        assert_eq!(
            deploy.s3_key(Environment::Production, "1.0.3"),
            "sample_lambda/production/sample-lambda-1.0.3.zip"
        );
    }
}
