/// User agent string for HTTP requests (Nominatim rejects anonymous clients)
pub const USER_AGENT: &str = "mcp-surf-server/0.1.0 (surf conditions forecast)";

/// Nominatim (OpenStreetMap) API base URL
pub const NOMINATIM_API_BASE: &str = "https://nominatim.openstreetmap.org";

/// Windy Point Forecast API endpoint
pub const WINDY_API_URL: &str = "https://api.windy.com/api/point-forecast/v2";

/// Windy model used for waves and swell
pub const WAVE_MODEL: &str = "gfsWave";

/// Windy model used for surface wind
pub const WIND_MODEL: &str = "gfs";

/// Hard ceiling of the GFS forecast horizon (16 days)
pub const MAX_FORECAST_HOURS: u32 = 384;

/// Forecast horizon used when a tool call omits `hours_ahead`
pub const DEFAULT_HOURS_AHEAD: u32 = 48;

/// Default HTTP timeout in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Maximum number of Nominatim results requested per search
pub const GEOCODING_RESULT_LIMIT: u32 = 20;
