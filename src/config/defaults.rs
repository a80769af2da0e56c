/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Source site defaults
pub const DEFAULT_PROVIDER_NAME: &str = "VidFast";
pub const DEFAULT_MIRRORS: &[&str] = &[
    "https://vidfast.pro",
    "https://www.vidfast.pro",
    "https://vidfast.to",
    "https://vidfast.net",
];
pub const DEFAULT_MIRROR_PROBE_TIMEOUT_SECS: u64 = 10;

// Page templates, tried in order per content kind
pub const DEFAULT_MOVIE_TEMPLATES: &[&str] = &["/movie/{id}", "/watch/{id}", "/film/{id}", "/m/{id}"];
pub const DEFAULT_EPISODE_TEMPLATES: &[&str] = &[
    "/tv/{id}/{season}/{episode}",
    "/series/{id}/{season}/{episode}",
    "/watch/{id}/{season}/{episode}",
    "/s/{id}/{season}/{episode}",
];
pub const DEFAULT_MOVIE_DIRECT_TEMPLATE: &str = "/movie/{id}?autoPlay=true";
pub const DEFAULT_EPISODE_DIRECT_TEMPLATE: &str = "/tv/{id}/{season}/{episode}?autoPlay=true";

// Fetcher defaults
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_RETRY_PLAIN_ON_FAILURE: bool = true;

// Resolver defaults
pub const DEFAULT_MAX_RESULTS: usize = 5;
pub const DEFAULT_FRAME_DEPTH: usize = 1;
pub const DEFAULT_FRAME_DELAY_MIN_MS: u64 = 1000;
pub const DEFAULT_FRAME_DELAY_MAX_MS: u64 = 3000;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 8;
pub const DEFAULT_COUNTRY_WHITELIST: &[&str] =
    &["US", "GB", "CA", "AU", "DE", "FR", "IT", "ES", "NL", "BE"];
pub const DEFAULT_FALLBACK_QUALITY_LABEL: &str = "Unverified";

// Validator keyword lists
pub const DEFAULT_MIN_URL_LENGTH: usize = 10;
pub const DEFAULT_REJECTED_SCHEMES: &[&str] = &["data:", "javascript:", "about:", "mailto:"];
pub const DEFAULT_ASSET_INDICATORS: &[&str] = &[
    "font", "css", ".js", "json", "xml", "txt", ".png", ".jpg", ".jpeg", ".gif", ".svg", ".ico",
    ".webp",
];
pub const DEFAULT_MEDIA_EXTENSIONS: &[&str] = &[
    ".m3u8", ".mp4", ".webm", ".avi", ".mkv", ".mov", ".flv", ".ts", ".mpd",
];
pub const DEFAULT_STREAMING_INDICATORS: &[&str] =
    &["stream", "video", "play", "embed", "player", "watch", "media"];
pub const DEFAULT_ADAPTIVE_KEYWORDS: &[&str] = &["hls", "dash", "manifest", "playlist"];
pub const DEFAULT_FRAME_HOST_INDICATORS: &[&str] = &[
    "vidfast",
    "embed",
    "player",
    "stream",
    "video",
    "watch",
    "vidsrc",
    "vidcloud",
    "upstream",
    "fembed",
    "streamtape",
    "doodstream",
    "streamlare",
    "mixdrop",
    "mp4upload",
    "videovard",
    "streamhub",
    "vidoza",
    "speedostream",
];

// Quality ranking table: (token, score, label), highest first
pub const DEFAULT_QUALITY_TOKENS: &[(&str, u8, &str)] = &[
    ("4k", 10, "4K"),
    ("2160p", 10, "4K"),
    ("1440p", 8, "1440p"),
    ("1080p", 6, "1080p"),
    ("720p", 4, "720p"),
    ("480p", 2, "480p"),
    ("360p", 1, "360p"),
    ("240p", 0, "240p"),
];
// Container/protocol preference: (extension, score, label)
pub const DEFAULT_FORMAT_SCORES: &[(&str, u8, &str)] = &[
    (".m3u8", 7, "HLS"),
    (".mpd", 7, "DASH"),
    (".mp4", 5, "MP4"),
    (".webm", 4, "WebM"),
    (".ts", 3, "TS"),
];
pub const DEFAULT_SUPERIOR_KEYWORDS: &[&str] = &["hd", "high", "best", "premium"];
pub const DEFAULT_SUPERIOR_SCORE: u8 = 6;
pub const DEFAULT_HD_LABEL_KEYWORDS: &[&str] = &["hd", "high", "premium"];
pub const DEFAULT_SD_LABEL_KEYWORDS: &[&str] = &["sd", "standard"];
pub const DEFAULT_QUALITY_SCORE: u8 = 3;
pub const DEFAULT_QUALITY_LABEL: &str = "Stream";
