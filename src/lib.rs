// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregate;
pub mod classify;
pub mod cli;
pub mod client;
pub mod commands;
pub mod export;
pub mod fetch;
pub mod models;
pub mod ratio;
pub mod utils;
