// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O: the caption service client, media files and caption export.

pub mod api;
pub mod media;
pub mod serialization;
