//! No document host: accept and discard.

use crate::blob::SaveRequest;

pub(crate) fn run(request: SaveRequest) {
    tracing::debug!(name = %request.resolved_name(), "no document host; save request discarded");
}
