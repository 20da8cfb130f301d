// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Service modules for authentication, storage and sketch processing.

pub mod auth;
pub mod blueprint;
pub mod storage;

pub use auth::{Authenticator, StaticCredentials};
