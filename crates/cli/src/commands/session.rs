//! Sign-in, sign-out and navigation commands.

use tracing::info;

use school_portal::Credentials;
use school_portal_core::{Role, View};

use super::{CommandError, Context, render};

/// Sign in and open the role's dashboard.
///
/// # Errors
///
/// Returns error if the credentials are refused or the session cannot be saved.
pub async fn login(
    ctx: &mut Context,
    username: String,
    password: String,
    role: Role,
) -> Result<(), CommandError> {
    let credentials = Credentials::new(username, password, role);
    let result = ctx.portal.login(&credentials).await;
    render(&ctx.snapshot());
    let nav = result?;
    info!(view = %nav.view, "Opened dashboard");
    Ok(())
}

/// Sign out.
///
/// # Errors
///
/// Returns error if the session file cannot be updated.
pub fn logout(ctx: &mut Context) -> Result<(), CommandError> {
    ctx.portal.logout()?;
    render(&ctx.snapshot());
    Ok(())
}

pub fn whoami(ctx: &Context) {
    match ctx.portal.session() {
        Some(session) => info!(username = %session.username, role = %session.role, "Signed in"),
        None => info!("Not signed in"),
    }
}

/// Open a view; redirects are reported, not treated as errors.
pub fn open(ctx: &Context, view: View) {
    let nav = ctx.portal.navigate(view);
    if nav.was_redirected() {
        info!(requested = %nav.requested, shown = %nav.view, "Redirected");
    }
    render(&ctx.snapshot());
}

/// List the nav links visible to the current session.
pub fn menu(ctx: &Context) {
    let page = ctx.snapshot();
    for link in ctx.portal.router().menu().links() {
        if page.visible_links.contains(&link.view) {
            info!(view = %link.view, "{}", link.label);
        }
    }
    if page.nav_sections_visible {
        info!("Navigation sections shown");
    }
}
