// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: frames, captions and the session that holds them.

pub mod caption;
pub mod frame;
pub mod session;
