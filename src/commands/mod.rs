// Copyright (c) 2025 TaskNest.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod categories;
pub mod transactions;
pub mod tasks;
pub mod habits;
pub mod notes;
pub mod reports;
pub mod exporter;
pub mod doctor;
