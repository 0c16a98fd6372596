// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - collaborators of the cache.

pub mod gateway;
pub mod ids;

pub use gateway::{Gateway, HttpGateway};
pub use ids::{IdGenerator, UuidGenerator};
