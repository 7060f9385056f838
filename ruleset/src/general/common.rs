/*
 *  Ruleset, game rules as seen by a search.
 *  Copyright (C) 2024 ToTheAnd
 *
 *  Ruleset is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  Ruleset is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with Ruleset. If not, see <https://www.gnu.org/licenses/>.
 */

use std::fmt::Debug;
use std::str::FromStr;

use anyhow::{anyhow, bail};
use colored::Colorize;
use itertools::Itertools;

pub type Res<T> = anyhow::Result<T>;

pub fn parse_fp_from_str<T: FromStr>(as_str: &str, name: &str) -> Res<T> {
    as_str
        .parse::<T>()
        .map_err(|_err| anyhow!("Couldn't parse {name} ('{}')", as_str.red()))
}

pub fn parse_int_from_str<T: FromStr>(as_str: &str, name: &str) -> Res<T> {
    // for some weird Rust reason, parse::<T>() returns a completely unbounded Err on failure,
    // so we just write the error message ourselves
    as_str
        .parse::<T>()
        .map_err(|_err| anyhow!("Couldn't parse {name} ('{}')", as_str.red()))
}

pub fn parse_bool_from_str(input: &str, name: &str) -> Res<bool> {
    if input.eq_ignore_ascii_case("true") || input.eq_ignore_ascii_case("on") || input == "1" {
        Ok(true)
    } else if input.eq_ignore_ascii_case("false") || input.eq_ignore_ascii_case("off") || input == "0" {
        Ok(false)
    } else {
        bail!(
            "Incorrect value for '{0}': Expected either '{1}' or '{2}', not '{3}'",
            name.bold(),
            "true".bold(),
            "false".bold(),
            input.red()
        )
    }
}

/// The name is used to identify the entity throughout all UIs and command line arguments.
/// Examples are games ('chess', 'tictactoe'), engines ('alpha-beta', 'mcts', etc), and evals ('material', etc).
pub trait NamedEntity: Debug {
    /// The short name must be lowercase without spaces (words can be joined with '-') and is used for text-based UIs
    fn short_name(&self) -> String;

    /// The long name can be prettier than the short name and consist of more than one word
    fn long_name(&self) -> String;

    /// The optional description.
    fn description(&self) -> Option<String>;

    fn matches(&self, name: &str) -> bool {
        self.short_name().eq_ignore_ascii_case(name)
    }
}

pub trait StaticallyNamedEntity: NamedEntity {
    fn static_short_name() -> &'static str
    where
        Self: Sized;

    fn static_long_name() -> String
    where
        Self: Sized;

    fn static_description() -> String
    where
        Self: Sized;
}

impl<T: StaticallyNamedEntity> NamedEntity for T {
    fn short_name(&self) -> String {
        Self::static_short_name().to_string()
    }

    fn long_name(&self) -> String {
        Self::static_long_name()
    }

    fn description(&self) -> Option<String> {
        Some(Self::static_description())
    }
}

pub type EntityList<T> = Vec<T>;

#[derive(Debug)]
pub struct GenericSelect<T: Debug> {
    pub name: &'static str,
    pub val: T, // can be a factory function / object in many cases
}

impl<T: Debug> NamedEntity for GenericSelect<T> {
    fn short_name(&self) -> String {
        self.name.to_string()
    }

    fn long_name(&self) -> String {
        self.name.to_string()
    }

    fn description(&self) -> Option<String> {
        None
    }
}

/// Looks up an entity by its short name (ignoring case) and produces a helpful error message if there is none.
pub fn select_name_static<'a, T: NamedEntity, I: ExactSizeIterator<Item = &'a T> + Clone>(
    name: &str,
    mut list: I,
    typ: &str,
    game_name: &str,
) -> Res<&'a T> {
    if let Some(res) = list.clone().find(|entity| entity.matches(name)) {
        return Ok(res);
    }
    let list_as_string = match list.len() {
        0 => format!("There are no valid {typ} names"),
        1 => format!(
            "The only valid {typ} is '{}'",
            list.next().map(|x| x.short_name()).unwrap_or_default().bold()
        ),
        _ => format!(
            "Valid {typ} names are {}",
            list.map(|x| format!("'{}'", x.short_name().bold())).join(", ")
        ),
    };
    bail!(
        "Couldn't find {typ} '{name}' for the current game ({game_name}). {list_as_string}.",
        name = name.red(),
        game_name = game_name.bold()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_test() {
        assert!(parse_bool_from_str("true", "x").unwrap());
        assert!(parse_bool_from_str("On", "x").unwrap());
        assert!(!parse_bool_from_str("FALSE", "x").unwrap());
        assert!(!parse_bool_from_str("0", "x").unwrap());
        assert!(parse_bool_from_str("maybe", "x").is_err());
    }

    #[test]
    fn parse_numbers_test() {
        assert_eq!(parse_int_from_str::<u32>("42", "depth").unwrap(), 42);
        assert!(parse_int_from_str::<u32>("-3", "depth").is_err());
        assert!((parse_fp_from_str::<f64>("1.5", "time").unwrap() - 1.5).abs() < 1e-12);
        assert!(parse_fp_from_str::<f64>("fast", "time").is_err());
    }

    #[test]
    fn select_name_test() {
        let list = vec![
            GenericSelect { name: "startpos", val: 1 },
            GenericSelect { name: "kiwipete", val: 2 },
        ];
        assert_eq!(
            select_name_static("KiwiPete", list.iter(), "position", "chess")
                .unwrap()
                .val,
            2
        );
        let err = select_name_static("nope", list.iter(), "position", "chess").unwrap_err();
        assert!(err.to_string().contains("startpos"));
    }
}
