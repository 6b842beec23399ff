use url::Url;

use crate::error::AuthError;

/// Browser-style match pattern, `<scheme>://<host><path>`
///
/// - scheme `*` matches `http` and `https`
/// - host `*.example.com` matches `example.com` and all of its subdomains
/// - `*` in the path matches any run of characters, query string included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlPattern {
    scheme: SchemePattern,
    host: HostPattern,
    path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SchemePattern {
    Web,
    Exact(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum HostPattern {
    Any,
    Domain(String),
    Exact(String),
}

impl UrlPattern {
    pub fn parse(pattern: &str) -> Result<Self, AuthError> {
        let invalid =
            |reason: &str| AuthError::Configuration(format!("Invalid match pattern '{}': {}", pattern, reason));

        let (scheme, rest) = pattern
            .split_once("://")
            .ok_or_else(|| invalid("missing scheme separator"))?;
        let scheme = match scheme {
            "*" => SchemePattern::Web,
            "" => return Err(invalid("empty scheme")),
            other => SchemePattern::Exact(other.to_ascii_lowercase()),
        };

        let slash = rest.find('/').ok_or_else(|| invalid("missing path"))?;
        let (host, path) = rest.split_at(slash);
        let host = match host {
            "*" => HostPattern::Any,
            "" => return Err(invalid("empty host")),
            h if h.starts_with("*.") => HostPattern::Domain(h[2..].to_ascii_lowercase()),
            h if h.contains('*') => return Err(invalid("wildcard must lead the host")),
            h => HostPattern::Exact(h.to_ascii_lowercase()),
        };

        Ok(Self {
            scheme,
            host,
            path: path.to_string(),
        })
    }

    pub fn matches(&self, url: &str) -> bool {
        let Ok(url) = Url::parse(url) else {
            return false;
        };

        let scheme_ok = match &self.scheme {
            SchemePattern::Web => matches!(url.scheme(), "http" | "https"),
            SchemePattern::Exact(scheme) => url.scheme() == scheme,
        };
        if !scheme_ok {
            return false;
        }

        let host = url.host_str().unwrap_or("");
        let host_ok = match &self.host {
            HostPattern::Any => true,
            HostPattern::Domain(domain) => {
                host == domain
                    || host
                        .strip_suffix(domain.as_str())
                        .is_some_and(|prefix| prefix.ends_with('.'))
            }
            HostPattern::Exact(exact) => host == exact,
        };
        if !host_ok {
            return false;
        }

        let mut target = url.path().to_string();
        if let Some(query) = url.query() {
            target.push('?');
            target.push_str(query);
        }
        glob_match(&self.path, &target)
    }
}

/// `*`-only glob, linear backtracking over the last star
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern = pattern.as_bytes();
    let text = text.as_bytes();
    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == b'*' {
            star = Some((p, t));
            p += 1;
        } else if p < pattern.len() && pattern[p] == text[t] {
            p += 1;
            t += 1;
        } else if let Some((star_p, star_t)) = star {
            p = star_p + 1;
            t = star_t + 1;
            star = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == b'*')
}
