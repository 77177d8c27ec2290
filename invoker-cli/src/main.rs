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

mod args;
mod deploy;
mod invoke;

use anyhow::Result;
use clap::{crate_version, Command};
use invoker::configs::InvokerConfig;
use log::debug;

fn command() -> Command<'static> {
    Command::new("invoker-cli")
        .version(crate_version!())
        .about("Invokes and redeploys the sample Lambda function")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .args(args::get_args())
        .subcommand(invoke::command_args())
        .subcommand(deploy::command_args())
}

#[tokio::main]
pub async fn main() -> Result<()> {
    let matches = command().get_matches();

    let (name, sub_matches) = matches
        .subcommand()
        .ok_or_else(|| anyhow::anyhow!("no subcommand given"))?;
    args::get_logging(&matches, sub_matches)?.init();

    let config = match sub_matches
        .value_of("config")
        .or_else(|| matches.value_of("config"))
    {
        Some(path) => InvokerConfig::load(path)?,
        None => InvokerConfig::default(),
    };
    debug!("Running {} with {:?}", name, config);

    match name {
        "invoke" => invoke::command(sub_matches, config).await?,
        "update-code" => deploy::command(sub_matches, config).await?,
        _ => println!("{}", command().render_usage()),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn global_flags_reach_subcommands() {
        let matches = command()
            .try_get_matches_from([
                "invoker-cli",
                "invoke",
                "--log-level",
                "debug",
                "-c",
                "x.ini",
            ])
            .unwrap();
        let (name, sub_matches) = matches.subcommand().unwrap();
        assert_eq!(name, "invoke");
        assert_eq!(sub_matches.value_of("log-level"), Some("debug"));
        assert_eq!(sub_matches.value_of("config"), Some("x.ini"));
    }
}
