use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

const TMDB_PREFIX: &str = "tmdb:";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Movie,
    Episode,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Movie => "movie",
            ContentKind::Episode => "episode",
        }
    }
}

/// What the caller wants playable streams for. Built once per call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ResolutionRequest {
    Movie {
        id: String,
    },
    Episode {
        series_id: String,
        season: String,
        episode: String,
    },
}

impl ResolutionRequest {
    pub fn movie<S: Into<String>>(id: S) -> Self {
        Self::Movie { id: id.into() }
    }

    pub fn episode<A, B, C>(series_id: A, season: B, episode: C) -> Self
    where
        A: Into<String>,
        B: Into<String>,
        C: Into<String>,
    {
        Self::Episode {
            series_id: series_id.into(),
            season: season.into(),
            episode: episode.into(),
        }
    }

    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Movie { .. } => ContentKind::Movie,
            Self::Episode { .. } => ContentKind::Episode,
        }
    }

    /// The movie id or the series id
    pub fn content_id(&self) -> &str {
        match self {
            Self::Movie { id } => id,
            Self::Episode { series_id, .. } => series_id,
        }
    }

    /// `S01E02`-style marker for episodes, `None` for movies
    pub fn episode_marker(&self) -> Option<String> {
        match self {
            Self::Movie { .. } => None,
            Self::Episode {
                season, episode, ..
            } => Some(format!("S{}E{}", zero_pad(season, 2), zero_pad(episode, 2))),
        }
    }

    /// Parse an add-on style stream id.
    ///
    /// Movies are a bare id (`tt0111161` or `tmdb:278`); series ids carry the
    /// season and episode after colons (`tt0903747:1:2`). Malformed ids are
    /// rejected here so the resolver only ever sees well-formed requests.
    pub fn from_stream_id(kind: &str, raw_id: &str) -> AppResult<Self> {
        let raw_id = raw_id.trim();
        match kind.to_ascii_lowercase().as_str() {
            "movie" => {
                let id = strip_id_prefix(raw_id);
                if id.is_empty() {
                    return Err(AppError::validation("movie id must not be empty"));
                }
                Ok(Self::movie(id))
            }
            "series" | "episode" | "tv" => {
                let parts: Vec<&str> = raw_id.split(':').collect();
                // tmdb:123:1:2 carries one extra leading segment
                let parts = if raw_id.starts_with(TMDB_PREFIX) && parts.len() >= 4 {
                    &parts[1..]
                } else {
                    &parts[..]
                };
                if parts.len() < 3 {
                    return Err(AppError::validation(format!(
                        "invalid series id '{raw_id}': expected <id>:<season>:<episode>"
                    )));
                }
                let (series_id, season, episode) = (parts[0].trim(), parts[1].trim(), parts[2].trim());
                if series_id.is_empty() || season.is_empty() || episode.is_empty() {
                    return Err(AppError::validation(format!(
                        "invalid series id '{raw_id}': empty component"
                    )));
                }
                Ok(Self::episode(series_id, season, episode))
            }
            other => Err(AppError::validation(format!(
                "unsupported content kind '{other}'"
            ))),
        }
    }
}

fn strip_id_prefix(id: &str) -> &str {
    id.strip_prefix(TMDB_PREFIX).unwrap_or(id)
}

/// Left-pad with zeros to `width`; longer values are returned unchanged.
pub fn zero_pad(value: &str, width: usize) -> String {
    format!("{value:0>width$}")
}

/// An ordered URL-path pattern with `{id}`, `{season}` and `{episode}` placeholders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageTemplate {
    pub pattern: String,
}

impl PageTemplate {
    pub fn new<S: Into<String>>(pattern: S) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// Fill the placeholders for `request`. Episode placeholders render empty
    /// for movie requests.
    pub fn render(&self, request: &ResolutionRequest) -> String {
        let (season, episode) = match request {
            ResolutionRequest::Movie { .. } => ("", ""),
            ResolutionRequest::Episode {
                season, episode, ..
            } => (season.as_str(), episode.as_str()),
        };
        self.pattern
            .replace("{id}", request.content_id())
            .replace("{season}", season)
            .replace("{episode}", episode)
    }

    /// Absolute URL of this template on `base_url`
    pub fn url_for(&self, base_url: &str, request: &ResolutionRequest) -> String {
        let path = self.render(request);
        let base = base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", "01")]
    #[case("9", "09")]
    #[case("10", "10")]
    #[case("123", "123")]
    fn test_zero_pad(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(zero_pad(input, 2), expected);
    }

    #[test]
    fn test_parse_movie_ids() {
        assert_eq!(
            ResolutionRequest::from_stream_id("movie", "tt0111161").unwrap(),
            ResolutionRequest::movie("tt0111161")
        );
        assert_eq!(
            ResolutionRequest::from_stream_id("movie", "tmdb:278").unwrap(),
            ResolutionRequest::movie("278")
        );
    }

    #[test]
    fn test_parse_series_ids() {
        assert_eq!(
            ResolutionRequest::from_stream_id("series", "tt0903747:1:2").unwrap(),
            ResolutionRequest::episode("tt0903747", "1", "2")
        );
        assert_eq!(
            ResolutionRequest::from_stream_id("series", "tmdb:1396:3:7").unwrap(),
            ResolutionRequest::episode("1396", "3", "7")
        );
    }

    #[rstest]
    #[case("series", "tt0903747:1")]
    #[case("series", "tt0903747")]
    #[case("series", "tt0903747::2")]
    #[case("movie", "")]
    #[case("channel", "tt0111161")]
    fn test_parse_rejects_malformed(#[case] kind: &str, #[case] id: &str) {
        assert!(matches!(
            ResolutionRequest::from_stream_id(kind, id),
            Err(AppError::Validation { .. })
        ));
    }

    #[test]
    fn test_episode_marker() {
        let request = ResolutionRequest::episode("tt0903747", "1", "12");
        assert_eq!(request.episode_marker().as_deref(), Some("S01E12"));
        assert_eq!(ResolutionRequest::movie("tt1").episode_marker(), None);
    }

    #[test]
    fn test_template_rendering() {
        let episode = ResolutionRequest::episode("tt0903747", "2", "5");
        let template = PageTemplate::new("/tv/{id}/{season}/{episode}");
        assert_eq!(template.render(&episode), "/tv/tt0903747/2/5");
        assert_eq!(
            template.url_for("https://site.example/", &episode),
            "https://site.example/tv/tt0903747/2/5"
        );

        let movie = ResolutionRequest::movie("tt0111161");
        assert_eq!(
            PageTemplate::new("movie/{id}?autoPlay=true").url_for("https://site.example", &movie),
            "https://site.example/movie/tt0111161?autoPlay=true"
        );
    }
}
