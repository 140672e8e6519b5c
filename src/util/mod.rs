// SPDX-License-Identifier: Apache-2.0

//! Helpful primitives for locating certificates.

pub mod search_path;
