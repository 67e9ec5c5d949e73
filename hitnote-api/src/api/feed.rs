//! Activity feed endpoint

use axum::extract::{Path, State};
use axum::Json;
use hitnote_common::feed::{self, ActivityItem};

use crate::AppState;

/// GET /usuarios/:id/feed
///
/// Fail-open: the aggregator already degrades to an empty feed on any
/// storage error, so this endpoint always answers 200.
pub async fn user_feed(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Json<Vec<ActivityItem>> {
    Json(feed::user_feed(&state.db, id).await)
}
