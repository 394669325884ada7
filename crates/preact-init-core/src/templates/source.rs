//! Template source locators
//!
//! Accepted forms:
//! - `owner/repo` (GitHub)
//! - `github:owner/repo`, `gitlab:owner/repo`, `bitbucket:owner/repo`
//! - `direct:<url>` or a bare `https://`, `http://`, `ssh://`, `git://`, `git@` URL
//!
//! Shorthands may carry a `#ref` suffix naming a branch or tag.

use std::fmt;
use std::str::FromStr;
use url::Url;

/// Branch used when a shorthand does not name one
pub const DEFAULT_REF: &str = "master";

/// Git hosting services understood by the shorthand syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Host {
    GitHub,
    GitLab,
    Bitbucket,
}

impl Host {
    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "github" => Some(Self::GitHub),
            "gitlab" => Some(Self::GitLab),
            "bitbucket" => Some(Self::Bitbucket),
            _ => None,
        }
    }

    pub fn domain(&self) -> &'static str {
        match self {
            Self::GitHub => "github.com",
            Self::GitLab => "gitlab.com",
            Self::Bitbucket => "bitbucket.org",
        }
    }
}

/// A parsed template locator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// `service:owner/repo#ref` shorthand
    Hosted {
        host: Host,
        owner: String,
        repo: String,
        reference: Option<String>,
    },
    /// A full URL, cloned or downloaded as given
    Direct { url: String },
}

impl TemplateSource {
    /// URL passed to `git clone`
    pub fn clone_url(&self, use_ssh: bool) -> String {
        match self {
            Self::Hosted {
                host, owner, repo, ..
            } => {
                if use_ssh {
                    format!("git@{}:{}/{}.git", host.domain(), owner, repo)
                } else {
                    format!("https://{}/{}/{}.git", host.domain(), owner, repo)
                }
            }
            Self::Direct { url } => url.clone(),
        }
    }

    /// Zip archive URL, if this source can be downloaded without git
    pub fn archive_url(&self) -> Option<String> {
        match self {
            Self::Hosted {
                host,
                owner,
                repo,
                reference,
            } => {
                let reference = reference.as_deref().unwrap_or(DEFAULT_REF);
                Some(match host {
                    Host::GitHub => format!(
                        "https://github.com/{}/{}/archive/{}.zip",
                        owner, repo, reference
                    ),
                    Host::GitLab => format!(
                        "https://gitlab.com/{}/{}/-/archive/{}/{}-{}.zip",
                        owner, repo, reference, repo, reference
                    ),
                    Host::Bitbucket => format!(
                        "https://bitbucket.org/{}/{}/get/{}.zip",
                        owner, repo, reference
                    ),
                })
            }
            Self::Direct { url } => Url::parse(url)
                .ok()
                .filter(|u| matches!(u.scheme(), "http" | "https") && u.path().ends_with(".zip"))
                .map(|u| u.to_string()),
        }
    }

    /// Branch or tag to check out, if one was named
    pub fn reference(&self) -> Option<&str> {
        match self {
            Self::Hosted { reference, .. } => reference.as_deref(),
            Self::Direct { .. } => None,
        }
    }
}

impl fmt::Display for TemplateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hosted {
                host,
                owner,
                repo,
                reference,
            } => {
                write!(f, "{}/{}/{}", host.domain(), owner, repo)?;
                if let Some(reference) = reference {
                    write!(f, "#{}", reference)?;
                }
                Ok(())
            }
            Self::Direct { url } => write!(f, "{}", url),
        }
    }
}

impl FromStr for TemplateSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("template source is empty".to_string());
        }

        if let Some(url) = s.strip_prefix("direct:") {
            return parse_direct(url);
        }
        if ["https://", "http://", "ssh://", "git://", "git@"]
            .iter()
            .any(|scheme| s.starts_with(scheme))
        {
            return parse_direct(s);
        }

        let (host, rest) = match s.split_once(':') {
            Some((prefix, rest)) => {
                let host = Host::from_prefix(prefix)
                    .ok_or_else(|| format!("unknown hosting service '{}'", prefix))?;
                (host, rest)
            }
            None => (Host::GitHub, s),
        };

        let (path, reference) = match rest.split_once('#') {
            Some((path, reference)) if !reference.is_empty() => {
                (path, Some(reference.to_string()))
            }
            Some(_) => return Err(format!("empty reference in '{}'", s)),
            None => (rest, None),
        };

        match path.split_once('/') {
            Some((owner, repo)) if is_segment(owner) && is_segment(repo) => Ok(Self::Hosted {
                host,
                owner: owner.to_string(),
                repo: repo.trim_end_matches(".git").to_string(),
                reference,
            }),
            _ => Err(format!("unrecognized template source '{}'", s)),
        }
    }
}

fn parse_direct(url: &str) -> Result<TemplateSource, String> {
    if url.starts_with("git@") {
        return Ok(TemplateSource::Direct {
            url: url.to_string(),
        });
    }
    Url::parse(url)
        .map(|u| TemplateSource::Direct { url: u.to_string() })
        .map_err(|e| format!("invalid template URL '{}': {}", url, e))
}

fn is_segment(part: &str) -> bool {
    !part.is_empty()
        && part
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}
