// Copyright 2025-2026, Offchain Labs, Inc.
// For license information, see https://github.com/OffchainLabs/nitro/blob/master/LICENSE.md

pub mod color;
pub mod format;

pub use color::{Color, Marker};
