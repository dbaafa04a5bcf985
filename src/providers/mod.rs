// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Upstream HTTP integrations.

pub mod backend;

pub use backend::{BackendClient, Endpoint, ForwardResult};
