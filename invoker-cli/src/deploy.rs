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

//! Points a deployed function at a new code artifact.

use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use invoker::aws::credentials::lambda_client;
use invoker::aws::lambda::update_function_code;
use invoker::configs::InvokerConfig;

pub async fn command(matches: &ArgMatches, config: InvokerConfig) -> Result<()> {
    let environment = crate::invoke::environment(matches)?;
    let version = matches
        .value_of("version")
        .ok_or_else(|| anyhow::anyhow!("No artifact version provided"))?;
    let bucket = matches
        .value_of("bucket")
        .ok_or_else(|| anyhow::anyhow!("No S3 bucket provided"))?;

    let client = lambda_client(&config, environment)?;
    let conf = update_function_code(&client, &config, environment, version, bucket).await?;

    println!(
        "[OK] updated {} (version: {}, sha256: {}, size: {} bytes, modified: {})",
        conf.function_name.unwrap_or_default(),
        conf.version.unwrap_or_default(),
        conf.code_sha_256.unwrap_or_default(),
        conf.code_size.unwrap_or_default(),
        conf.last_modified.unwrap_or_default(),
    );

    Ok(())
}

pub fn command_args() -> Command<'static> {
    Command::new("update-code")
        .about("Updates the function code from an artifact in AWS S3")
        .disable_version_flag(true)
        .arg(
            Arg::new("environment")
                .short('e')
                .long("env")
                .value_name("ENV")
                .possible_values(["staging", "production"])
                .required(true)
                .help("Selects the deployment to update")
                .takes_value(true),
        )
        .arg(
            Arg::new("version")
                .short('v')
                .long("version")
                .value_name("VERSION")
                .required(true)
                .help("Sets the artifact version, e.g. 1.0.3")
                .takes_value(true),
        )
        .arg(
            Arg::new("bucket")
                .short('b')
                .long("bucket")
                .value_name("BUCKET")
                .required(true)
                .help("Sets the S3 bucket holding the artifact")
                .takes_value(true),
        )
}
