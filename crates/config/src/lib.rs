// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Configuration parsing and loading
//!
//! TOML is parsed into raw types mirroring the file, then loaded into the
//! core rule tree with expressions interned and validated.

mod evaluator;
mod loader;
mod parser;
mod types;

pub use evaluator::BuiltinEvaluator;
pub use loader::{load_config, load_config_file, Config, LoadError, RoomDef};
pub use parser::{parse_config, parse_range_list, parse_time_of_day, ParseError};
pub use types::{RawActorType, RawConfig, RawRoom, RawRule};
