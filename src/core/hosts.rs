//! Host alias derivation and Git remote URL parsing.
//!
//! A label maps to a hosting platform by substring match against a fixed
//! table, falling back to github.com for anything unrecognized. The derived
//! alias `{platform}-{label}` doubles as the SSH config `Host` name and as
//! the apparent hostname in rewritten Git remote URLs. Aliases are never
//! persisted; they are recomputed from the label every time.

/// Known hosting platforms, matched by substring against the label.
const PLATFORM_HOSTS: &[(&str, &str)] = &[
    ("github", "github.com"),
    ("gitlab", "gitlab.com"),
    ("gitee", "gitee.com"),
    ("bitbucket", "bitbucket.org"),
];

const FALLBACK_HOST: &str = "github.com";

/// Hostname a label is assumed to target.
///
/// Self-hosted servers with unrecognizable labels fall back to github.com;
/// intent for such labels is unspecified upstream, so the fallback stands.
pub fn hostname_for_label(label: &str) -> &'static str {
    let label = label.to_lowercase();
    PLATFORM_HOSTS
        .iter()
        .find(|(token, _)| label.contains(token))
        .map(|(_, host)| *host)
        .unwrap_or(FALLBACK_HOST)
}

/// Derived `{platform}-{label}` alias for a label.
pub fn host_alias(label: &str) -> String {
    let hostname = hostname_for_label(label);
    let platform = hostname.split('.').next().unwrap_or(hostname);
    format!("{platform}-{label}")
}

/// A Git remote URL decomposed into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRemote {
    pub platform: String,
    pub owner: String,
    pub repo: String,
}

/// Parse a Git remote URL in either of the two supported grammars.
///
/// SSH form `git@host:owner/repo[.git]`: when the host contains a hyphen it
/// is an sshm alias, and the platform is everything before the first hyphen;
/// otherwise the platform is the host's first dot-separated segment.
/// HTTPS form `https://host/owner/repo[.git]`: the platform is always the
/// first dot-separated segment.
pub fn parse_git_url(url: &str) -> Option<ParsedRemote> {
    if let Some(rest) = url.strip_prefix("git@") {
        let (host, path) = rest.split_once(':')?;
        let (owner, repo) = path.split_once('/')?;
        let repo = repo.strip_suffix(".git").unwrap_or(repo);
        if host.is_empty() || owner.is_empty() || repo.is_empty() {
            return None;
        }

        let platform = if host.contains('-') {
            host.split('-').next().unwrap_or(host)
        } else {
            host.split('.').next().unwrap_or(host)
        };
        return Some(ParsedRemote {
            platform: platform.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
        });
    }

    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let mut parts = rest.splitn(3, '/');
    let host = parts.next()?;
    let owner = parts.next()?;
    let repo = parts.next()?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if host.is_empty() || owner.is_empty() || repo.is_empty() {
        return None;
    }

    Some(ParsedRemote {
        platform: host.split('.').next().unwrap_or(host).to_string(),
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}

/// Extract the host part of an SSH-form remote URL (`git@<host>:...`).
pub fn ssh_host(url: &str) -> Option<&str> {
    let rest = url.strip_prefix("git@")?;
    let (host, _) = rest.split_once(':')?;
    if host.is_empty() {
        None
    } else {
        Some(host)
    }
}

/// The label an sshm alias refers to: everything after the first hyphen.
pub fn label_from_alias(alias: &str) -> Option<&str> {
    alias.split_once('-').map(|(_, label)| label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_map_to_known_platforms() {
        assert_eq!(hostname_for_label("github"), "github.com");
        assert_eq!(hostname_for_label("my_gitlab_work"), "gitlab.com");
        assert_eq!(hostname_for_label("bitbucket2"), "bitbucket.org");
        assert_eq!(hostname_for_label("personal"), "github.com");
    }

    #[test]
    fn alias_is_platform_dash_label() {
        assert_eq!(host_alias("github"), "github-github");
        assert_eq!(host_alias("work"), "github-work");
        assert_eq!(host_alias("gitlab_ci"), "gitlab-gitlab_ci");
    }

    #[test]
    fn parses_ssh_url_with_git_suffix() {
        let parsed = parse_git_url("git@github.com:octocat/Hello-World.git").unwrap();
        assert_eq!(parsed.platform, "github");
        assert_eq!(parsed.owner, "octocat");
        assert_eq!(parsed.repo, "Hello-World");
    }

    #[test]
    fn parses_aliased_ssh_url_without_git_suffix() {
        let parsed = parse_git_url("git@github-work:octocat/Hello-World").unwrap();
        assert_eq!(parsed.platform, "github");
        assert_eq!(parsed.owner, "octocat");
        assert_eq!(parsed.repo, "Hello-World");
    }

    #[test]
    fn parses_https_url() {
        let parsed = parse_git_url("https://gitlab.com/group/project.git").unwrap();
        assert_eq!(parsed.platform, "gitlab");
        assert_eq!(parsed.owner, "group");
        assert_eq!(parsed.repo, "project");
    }

    #[test]
    fn rejects_unparseable_urls() {
        assert!(parse_git_url("ssh://weird").is_none());
        assert!(parse_git_url("git@host").is_none());
        assert!(parse_git_url("git@host:ownerrepo").is_none());
        assert!(parse_git_url("https://host").is_none());
    }

    #[test]
    fn ssh_host_extraction() {
        assert_eq!(ssh_host("git@github-work:a/b.git"), Some("github-work"));
        assert_eq!(ssh_host("https://github.com/a/b"), None);
    }

    #[test]
    fn alias_label_extraction() {
        assert_eq!(label_from_alias("github-work"), Some("work"));
        assert_eq!(label_from_alias("github.com"), None);
    }
}
