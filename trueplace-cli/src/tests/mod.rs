//! Unit tests for the `TruePlace` CLI.

use super::*;

mod helpers;
mod rank_unit;
