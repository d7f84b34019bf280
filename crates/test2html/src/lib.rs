// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! test2html library
//!
//! This module exports the command pipeline and renderers of test2html for
//! use in integration tests and as a library.

pub mod app;
pub mod config;
pub mod html;
pub mod json;
pub mod output;
pub mod render;
