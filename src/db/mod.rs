// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage layer (in-memory, with JSON snapshots).

pub mod memory;

pub use memory::{DbError, MemoryDb};
