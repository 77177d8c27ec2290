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

//! Invokes the sample function and prints what it answered.

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use invoker::client::InvocationClient;
use invoker::configs::{InvokerConfig, ResponseDecoding};
use invoker::environment::Environment;
use serde_json::Value;
use std::fs;

pub async fn command(matches: &ArgMatches, config: InvokerConfig) -> Result<()> {
    let environment = environment(matches)?;
    let config = configure(matches, config);
    let request = read_request(matches)?;

    let client = InvocationClient::with_config(environment, config)?;
    let response = client
        .invoke(&request)
        .await
        .with_context(|| format!("invoking {}", client.function_name()))?;
    println!("{}", response);

    Ok(())
}

pub fn command_args() -> Command<'static> {
    Command::new("invoke")
        .about("Invokes the sample Lambda function and prints its response")
        .arg(
            Arg::new("environment")
                .short('e')
                .long("env")
                .value_name("ENV")
                .possible_values(["staging", "production"])
                .default_value("staging")
                .help("Selects the deployment to call")
                .takes_value(true),
        )
        .arg(
            Arg::new("payload")
                .short('p')
                .long("payload")
                .value_name("JSON")
                .help("Sets the request sent to the function [default: {}]")
                .conflicts_with("payload file")
                .takes_value(true),
        )
        .arg(
            Arg::new("payload file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Reads the request from a JSON file")
                .takes_value(true),
        )
        .arg(
            Arg::new("qualifier")
                .short('q')
                .long("qualifier")
                .value_name("ALIAS")
                .help("Routes the call to an alias or version")
                .takes_value(true),
        )
        .arg(
            Arg::new("json scalar")
                .long("json-scalar")
                .help("Decodes the response as a JSON string instead of stripping quotes"),
        )
}

pub(crate) fn environment(matches: &ArgMatches) -> Result<Environment> {
    Ok(matches.value_of("environment").unwrap_or("staging").parse()?)
}

fn configure(matches: &ArgMatches, mut config: InvokerConfig) -> InvokerConfig {
    if let Some(qualifier) = matches.value_of("qualifier") {
        config = config.with_qualifier(qualifier);
    }
    if matches.is_present("json scalar") {
        config = config.with_response_decoding(ResponseDecoding::JsonScalar);
    }
    config
}

/// Reads the request from `--payload` or `--file`; an empty object otherwise.
fn read_request(matches: &ArgMatches) -> Result<Value> {
    let text = match (matches.value_of("payload"), matches.value_of("payload file")) {
        (Some(json), _) => json.to_owned(),
        (None, Some(path)) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path))?
        }
        (None, None) => "{}".to_owned(),
    };
    serde_json::from_str(&text).context("the request is not valid JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn matches(args: &[&str]) -> ArgMatches {
        command_args()
            .try_get_matches_from(std::iter::once("invoke").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn request_defaults_to_an_empty_object() -> Result<()> {
        assert_eq!(read_request(&matches(&[]))?, json!({}));
        assert_eq!(environment(&matches(&[]))?, Environment::Staging);
        Ok(())
    }

    #[test]
    fn inline_payload_is_parsed() -> Result<()> {
        let m = matches(&["-e", "production", "-p", r#"{"x":1}"#]);
        assert_eq!(read_request(&m)?, json!({ "x": 1 }));
        assert_eq!(environment(&m)?, Environment::Production);
        assert!(read_request(&matches(&["-p", "{x"])).is_err());
        Ok(())
    }

    #[test]
    fn payload_sources_conflict() {
        let result =
            command_args().try_get_matches_from(["invoke", "-p", "{}", "-f", "req.json"]);
        assert!(result.is_err());
    }

    #[test]
    fn flags_shape_the_config() {
        let m = matches(&["-q", "SAMPLE_ALIAS", "--json-scalar"]);
        let config = configure(&m, InvokerConfig::default());
        assert_eq!(config.qualifier.as_deref(), Some("SAMPLE_ALIAS"));
        assert_eq!(config.response_decoding, ResponseDecoding::JsonScalar);
    }
}
