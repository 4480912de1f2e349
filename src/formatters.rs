use crate::error::SurfError;
use crate::models::{Beach, FindBeachesResponse, ToolErrorBody};

/// Wraps geocoded beaches into the `find_beaches` response body
pub fn format_beaches(beaches: Vec<Beach>) -> FindBeachesResponse {
    FindBeachesResponse {
        count: beaches.len(),
        beaches,
    }
}

/// Renders a domain error as a structured tool error body
pub fn format_error(error: &SurfError) -> ToolErrorBody {
    ToolErrorBody {
        kind: error.kind(),
        message: error.to_string(),
        hint: error.hint(),
    }
}
