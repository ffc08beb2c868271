// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

pub mod chmod;
pub mod digest;
pub mod fstype;
pub mod ln;
pub mod ls;
pub mod realpath;
pub mod stat;
