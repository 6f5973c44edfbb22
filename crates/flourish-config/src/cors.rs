use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use serde::de::{self, SeqAccess, Visitor};

/// CORS policy
///
/// Without a `[server.cors]` section the server reflects the caller's
/// origin, which is what the mobile and web clients expect.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// `"*"` or an explicit list of origins
    #[serde(default)]
    pub origins: Origins,
    /// Send `access-control-allow-credentials`
    #[serde(default)]
    pub credentials: bool,
    /// Preflight cache lifetime in seconds
    #[serde(default)]
    pub max_age: Option<u64>,
}

impl CorsConfig {
    pub fn max_age_duration(&self) -> Option<Duration> {
        self.max_age.map(Duration::from_secs)
    }
}

/// Allowed origins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Origins {
    /// Echo back whatever origin the request carries
    #[default]
    Mirror,
    /// Explicit allow-list
    List(Vec<String>),
}

impl<'de> Deserialize<'de> for Origins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct OriginsVisitor;

        impl<'de> Visitor<'de> for OriginsVisitor {
            type Value = Origins;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("\"*\", an origin, or an array of origins")
            }

            fn visit_str<E>(self, value: &str) -> Result<Origins, E>
            where
                E: de::Error,
            {
                Ok(match value {
                    "*" => Origins::Mirror,
                    origin => Origins::List(vec![origin.to_owned()]),
                })
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Origins, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut origins = Vec::new();
                while let Some(origin) = seq.next_element::<String>()? {
                    if origin == "*" {
                        return Ok(Origins::Mirror);
                    }
                    origins.push(origin);
                }
                Ok(Origins::List(origins))
            }
        }

        deserializer.deserialize_any(OriginsVisitor)
    }
}
