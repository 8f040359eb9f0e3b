// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod auth;
pub mod dashboard;
pub mod strategy;
pub mod tx;

use anyhow::{Context, Result};

use crate::config::Config;
use crate::remote::HttpStore;
use crate::session::{Session, SyncController};

/// Build a controller from the stored credentials and hydrate a fresh
/// session for the signed-in identity.
pub(crate) async fn open_session(config: &Config) -> Result<(SyncController<HttpStore>, Session)> {
    let stored = config
        .session
        .as_ref()
        .context("Not signed in; run `burnrate auth login` first")?;
    let store = HttpStore::new(&config.base_url, &config.api_key, &stored.access_token)?;
    let controller = SyncController::new(store);
    let mut session = Session::new();
    controller.hydrate(&mut session, stored.identity()).await;
    Ok((controller, session))
}
