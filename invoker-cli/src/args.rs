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

use anyhow::Result;
use clap::{Arg, ArgMatches};
use log::LevelFilter;
use std::io::Write;

pub fn get_args() -> Vec<Arg<'static>> {
    let config = Arg::new("config")
        .short('c')
        .long("config")
        .value_name("FILE")
        .help("Sets a custom config file")
        .global(true)
        .takes_value(true);
    get_logging_args().into_iter().chain(vec![config]).collect()
}

fn get_logging_args() -> Vec<Arg<'static>> {
    [
        Arg::new("log-level")
            .short('L')
            .long("log-level")
            .possible_values(["error", "warn", "info", "debug", "trace", "off"])
            .help("Log level [default: info]")
            .global(true)
            .takes_value(true),
        Arg::new("trace")
            .long("trace")
            .help("Log ultra-verbose (trace level) information")
            .global(true)
            .takes_value(false),
        Arg::new("silent")
            .long("silent")
            .help("Suppress all output")
            .global(true)
            .takes_value(false),
    ]
    .to_vec()
}

/// Resolves the log level, preferring flags given after the subcommand.
/// `--trace` wins over `--silent`, which wins over `--log-level`.
fn log_level(global_matches: &ArgMatches, matches: &ArgMatches) -> LevelFilter {
    let flag = |name: &str| matches.is_present(name) || global_matches.is_present(name);
    if flag("trace") {
        return LevelFilter::Trace;
    }
    if flag("silent") {
        return LevelFilter::Off;
    }
    matches
        .value_of("log-level")
        .or_else(|| global_matches.value_of("log-level"))
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Info)
}

pub fn get_logging(
    global_matches: &ArgMatches,
    matches: &ArgMatches,
) -> Result<env_logger::Builder> {
    let level = log_level(global_matches, matches);

    let mut builder = env_logger::Builder::new();
    builder.filter(None, level);
    if level < LevelFilter::Trace {
        // rusoto and hyper log every request at debug level.
        builder.filter_module("rusoto_core", LevelFilter::Warn);
        builder.filter_module("hyper", LevelFilter::Warn);
        builder.format(|f, record| {
            writeln!(
                f,
                "[{}] {}",
                record.level().to_string().to_lowercase(),
                record.args()
            )
        });
    } else {
        builder.format_timestamp_secs();
    }

    Ok(builder)
}
