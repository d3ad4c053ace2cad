// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end specs that drive the compiled `tq` binary.

#[cfg(test)]
mod cli;
