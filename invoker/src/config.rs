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

//! Configuration settings shared by the library and the command line tool.

use ini::Ini;
use lazy_static::lazy_static;

/// The built-in configuration file.
pub const DEFAULT_CONFIG: &str = include_str!("./config.toml");

lazy_static! {
    /// Global settings.
    pub static ref INVOKER_CONF: Ini = Ini::load_from_str(DEFAULT_CONFIG).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;

    #[test]
    fn setting_shows() -> Result<()> {
        let conf = Ini::load_from_str(DEFAULT_CONFIG)?;

        for (sec, prop) in &conf {
            println!("Section: {:?}", sec);
            for (key, value) in prop.iter() {
                println!("{:?}:{:?}", key, value);
            }
        }

        assert_eq!("us-west-2", &conf["aws"]["region"]);
        assert_eq!("sampleLambda_staging", &conf["lambda"]["staging_function"]);
        assert_eq!(
            "sampleLambda_production",
            &conf["lambda"]["production_function"]
        );
        assert_eq!("", &conf["lambda"]["qualifier"]);
        assert_eq!("RequestResponse", &INVOKER_CONF["lambda"]["invocation_type"]);

        Ok(())
    }
}
