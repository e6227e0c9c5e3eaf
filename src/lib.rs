// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod aggregate;
pub mod auth;
pub mod backend;
pub mod categories;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod money;
pub mod store;
pub mod tracker;
pub mod utils;
