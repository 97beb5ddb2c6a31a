//! Account commands.
//!
//! # Usage
//!
//! ```bash
//! tastebud auth sign-up -e ann@example.com -p hunter22 -n "Ann Lee" -r customer
//! tastebud auth sign-in -e ann@example.com -p hunter22
//! tastebud auth whoami
//! tastebud auth sign-out
//! ```

use secrecy::SecretString;

use tastebud_core::UserRole;
use tastebud_storefront::error::Result;
use tastebud_storefront::state::AppState;

use crate::output;

pub async fn sign_in(state: &AppState, email: &str, password: String) -> Result<()> {
    let password = SecretString::from(password);
    let user = state.session().sign_in(email, &password).await?;
    output::line(format!("Signed in as {} ({})", user.full_name, user.role.label()));
    Ok(())
}

pub async fn sign_up(
    state: &AppState,
    email: &str,
    password: String,
    full_name: &str,
    role: UserRole,
) -> Result<()> {
    let password = SecretString::from(password);
    let response = state
        .session()
        .sign_up(email, &password, full_name, role)
        .await?;

    if response.message.is_empty() {
        output::line("Account created. Sign in to continue.");
    } else {
        output::line(response.message);
    }
    Ok(())
}

pub async fn sign_out(state: &AppState) {
    state.session().sign_out().await;
    output::line("Signed out");
}

pub fn whoami(state: &AppState) {
    match state.session().current_user() {
        Some(user) => output::user(&user),
        None => output::line("Not signed in"),
    }
}
