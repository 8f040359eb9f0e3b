// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use tracing::warn;

use crate::auth::{AuthService, AuthSession, HttpAuth};
use crate::config::{self, Config, StoredSession};

pub async fn handle(m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("login", sub)) => login(sub).await?,
        Some(("signup", sub)) => signup(sub).await?,
        Some(("logout", _)) => logout().await?,
        Some(("whoami", _)) => whoami().await?,
        _ => {}
    }
    Ok(())
}

fn store_session(config: &mut Config, session: &AuthSession) {
    config.session = Some(StoredSession {
        access_token: session.access_token.clone(),
        user_id: session.identity.id.clone(),
        email: session.identity.email.clone(),
        display_name: session.identity.display_name.clone(),
    });
}

async fn login(sub: &clap::ArgMatches) -> Result<()> {
    let email = sub.get_one::<String>("email").unwrap();
    let password = sub.get_one::<String>("password").unwrap();
    let mut config = config::load()?;
    let auth = HttpAuth::new(&config.base_url, &config.api_key)?;
    let session = auth.sign_in(email, password).await?;
    store_session(&mut config, &session);
    config::save(&config)?;
    println!(
        "Signed in as {} <{}>",
        session.identity.display_label(),
        session.identity.email
    );
    Ok(())
}

async fn signup(sub: &clap::ArgMatches) -> Result<()> {
    let email = sub.get_one::<String>("email").unwrap();
    let password = sub.get_one::<String>("password").unwrap();
    let name = sub.get_one::<String>("name").map(|s| s.as_str());
    let mut config = config::load()?;
    let auth = HttpAuth::new(&config.base_url, &config.api_key)?;
    match auth.sign_up(email, password, name).await? {
        Some(session) => {
            store_session(&mut config, &session);
            config::save(&config)?;
            println!(
                "Account created; signed in as {} <{}>",
                session.identity.display_label(),
                session.identity.email
            );
        }
        None => {
            println!(
                "Account created. Check {} for a confirmation link, then run `burnrate auth login`.",
                email
            );
        }
    }
    Ok(())
}

async fn logout() -> Result<()> {
    let mut config = config::load()?;
    match config.session.take() {
        Some(stored) => {
            let auth = HttpAuth::new(&config.base_url, &config.api_key)?;
            if let Err(err) = auth.sign_out(&stored.access_token).await {
                warn!(error = %err, "remote sign-out failed, clearing local session anyway");
            }
            config::save(&config)?;
            println!("Signed out.");
        }
        None => println!("No active session."),
    }
    Ok(())
}

async fn whoami() -> Result<()> {
    let config = config::load()?;
    let stored = config
        .session
        .as_ref()
        .context("Not signed in; run `burnrate auth login` first")?;
    let auth = HttpAuth::new(&config.base_url, &config.api_key)?;
    let identity = auth
        .current_identity(&stored.access_token)
        .await
        .context("Stored session is no longer valid; run `burnrate auth login`")?;
    println!(
        "{} <{}> (id: {})",
        identity.display_label(),
        identity.email,
        identity.id
    );
    Ok(())
}
