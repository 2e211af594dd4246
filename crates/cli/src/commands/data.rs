//! Data-loading commands.

use tracing::{info, warn};

use school_portal::{LoadOutcome, SelectSource};
use school_portal_core::{ClassId, SubjectId, View};

use super::{Context, render};

pub async fn classes(ctx: &Context) {
    let source = ctx.portal.loaders().load_classes().await;
    report_selects("classes", source);
    log_select(ctx, "timetable-class");
}

pub async fn subjects(ctx: &Context) {
    let source = ctx.portal.loaders().load_subjects().await;
    report_selects("subjects", source);
    log_select(ctx, "notes-subject");
}

pub async fn timetable(ctx: &Context, class_id: ClassId) {
    if let Some(token) = enter(ctx, View::Timetable) {
        let outcome = ctx.portal.loaders().load_timetable(&class_id, &token).await;
        finish(ctx, outcome);
    }
}

pub async fn assignments(ctx: &Context) {
    if let Some(token) = enter(ctx, View::Assignments) {
        let outcome = ctx.portal.loaders().load_assignments(&token).await;
        finish(ctx, outcome);
    }
}

pub async fn notes(ctx: &Context, class_id: ClassId, subject_id: SubjectId) {
    if let Some(token) = enter(ctx, View::Notes) {
        let outcome = ctx
            .portal
            .loaders()
            .load_notes(&class_id, &subject_id, &token)
            .await;
        finish(ctx, outcome);
    }
}

pub async fn cbts(ctx: &Context) {
    if let Some(token) = enter(ctx, View::Cbt) {
        let outcome = ctx.portal.loaders().load_cbts(&token).await;
        finish(ctx, outcome);
    }
}

pub async fn reports(ctx: &Context) {
    if let Some(token) = enter(ctx, View::Reports) {
        let outcome = ctx.portal.loaders().load_reports(&token).await;
        finish(ctx, outcome);
    }
}

/// Open the view and hand back a token, or report the redirect.
fn enter(ctx: &Context, view: View) -> Option<school_portal::NavigationToken> {
    match ctx.enter(view) {
        Ok(()) => Some(ctx.portal.token()),
        Err(e) => {
            warn!("{e}");
            None
        }
    }
}

fn finish(ctx: &Context, outcome: LoadOutcome) {
    info!(?outcome, "Load finished");
    render(&ctx.snapshot());
}

fn report_selects(what: &str, source: SelectSource) {
    match source {
        SelectSource::Remote(count) => info!(count, "Loaded {what}"),
        SelectSource::Demo => warn!("API unavailable, showing demo {what}"),
    }
}

fn log_select(ctx: &Context, select_id: &str) {
    let page = ctx.snapshot();
    let Some(options) = page.selects.get(select_id) else {
        return;
    };
    for option in options.iter().filter(|option| !option.value.is_empty()) {
        info!(id = %option.value, "{}", option.label);
    }
}
