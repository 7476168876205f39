//! Hostname based guessing of the companion backend URL.
//!
//! A guess is only ever a guess: the resolver logs it as such and the user can
//! correct it through the override mechanism.

use crate::config::HostingRule;
use crate::urls::{is_loopback_host, usable_url};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PROJECT_REGEX: Regex =
        Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?(\.[a-z0-9]([a-z0-9-]*[a-z0-9])?)*$").unwrap();
}

/// Marker Vercel puts between project name and branch in preview hostnames.
const PREVIEW_MARKER: &str = "-git-";

/// A guessed backend URL and the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guess {
    pub url: String,
    pub provider: String,
}

/// Strips `suffix` from `hostname` and returns the project name in front of it.
pub fn derive_project_name(hostname: &str, suffix: &str) -> Option<String> {
    let host = hostname.trim().trim_end_matches('.').to_lowercase();
    let suffix = suffix.trim().trim_start_matches('.').to_lowercase();
    if suffix.is_empty() {
        return None;
    }

    let prefix = host.strip_suffix(&suffix)?.strip_suffix('.')?;
    let prefix = prefix.strip_prefix("www.").unwrap_or(prefix);
    let project = match prefix.find(PREVIEW_MARKER) {
        Some(idx) => &prefix[..idx],
        None => prefix,
    };

    if PROJECT_REGEX.is_match(project) {
        Some(project.to_string())
    } else {
        None
    }
}

/// Guesses the backend URL for a page served from `hostname`.
///
/// Rules are tried in order; within a rule the first candidate that renders to
/// an absolute `https` URL wins. Loopback hosts never produce a guess.
pub fn guess_backend_url(hostname: &str, rules: &[HostingRule]) -> Option<Guess> {
    if hostname.trim().is_empty() || is_loopback_host(hostname) {
        return None;
    }

    rules.iter().find_map(|rule| {
        let project = rule
            .host_suffixes
            .iter()
            .find_map(|suffix| derive_project_name(hostname, suffix))?;

        rule.candidates
            .iter()
            .filter_map(|pattern| render_candidate(pattern, &project))
            .next()
            .map(|url| Guess {
                url,
                provider: rule.name.clone(),
            })
    })
}

fn render_candidate(pattern: &str, project: &str) -> Option<String> {
    let rendered = pattern.replace("{project}", project);
    let url = usable_url(&rendered)?;
    if url.starts_with("https://") {
        Some(url)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("quiz.vercel.app", "vercel.app", Some("quiz") ; "plain project")]
    #[test_case("QUIZ.Vercel.App.", "vercel.app", Some("quiz") ; "case and trailing dot")]
    #[test_case("www.quiz.vercel.app", "vercel.app", Some("quiz") ; "www prefix")]
    #[test_case("quiz-git-main-team.vercel.app", "vercel.app", Some("quiz") ; "preview deployment")]
    #[test_case("team.quiz.vercel.com", "vercel.com", Some("team.quiz") ; "nested labels")]
    #[test_case("vercel.app", "vercel.app", None ; "bare suffix")]
    #[test_case("notvercel.app", "vercel.app", None ; "suffix without dot")]
    #[test_case("quiz.netlify.app", "vercel.app", None ; "other provider")]
    #[test_case("-git-main.vercel.app", "vercel.app", None ; "empty preview project")]
    fn project_names(hostname: &str, suffix: &str, expected: Option<&str>) {
        assert_eq!(derive_project_name(hostname, suffix).as_deref(), expected);
    }

    #[test]
    fn vercel_maps_to_railway() {
        let guess = guess_backend_url("quiz.vercel.app", &[HostingRule::vercel()]).unwrap();
        assert_eq!(guess.url, "https://quiz.railway.app");
        assert_eq!(guess.provider, "vercel");
    }

    #[test]
    fn loopback_and_unknown_hosts_do_not_guess() {
        let rules = [HostingRule::vercel()];
        assert_eq!(guess_backend_url("localhost", &rules), None);
        assert_eq!(guess_backend_url("127.0.0.1", &rules), None);
        assert_eq!(guess_backend_url("", &rules), None);
        assert_eq!(guess_backend_url("quiz.example.com", &rules), None);
    }

    #[test]
    fn first_https_candidate_wins() {
        let rule = HostingRule::new(
            "netlify",
            &["netlify.app"],
            &[
                "http://{project}.insecure.example",
                "{project}.no-scheme.example",
                "https://{project}-api.onrender.com",
                "https://fallback.example.com",
            ],
        );
        let guess = guess_backend_url("shop.netlify.app", &[rule]).unwrap();
        assert_eq!(guess.url, "https://shop-api.onrender.com");
    }

    #[test]
    fn fixed_candidates_need_no_placeholder() {
        let rule = HostingRule::new("pages", &["pages.dev"], &["https://api.example.com/"]);
        let guess = guess_backend_url("docs.pages.dev", &[rule]).unwrap();
        assert_eq!(guess.url, "https://api.example.com");
    }

    #[test]
    fn rules_are_tried_in_order() {
        let rules = [
            HostingRule::new("first", &["example.app"], &["https://{project}.first.example"]),
            HostingRule::new("second", &["example.app"], &["https://{project}.second.example"]),
        ];
        let guess = guess_backend_url("demo.example.app", &rules).unwrap();
        assert_eq!(guess.provider, "first");
    }

    proptest! {
        #[test]
        fn guesses_are_absolute_https_and_deterministic(project in "[a-z][a-z0-9-]{0,20}[a-z0-9]") {
            prop_assume!(!project.contains(PREVIEW_MARKER));
            let hostname = format!("{}.vercel.app", project);
            let rules = [HostingRule::vercel()];
            let first = guess_backend_url(&hostname, &rules).unwrap();
            let second = guess_backend_url(&hostname, &rules).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert!(first.url.starts_with("https://"));
            prop_assert!(url::Url::parse(&first.url).is_ok());
            prop_assert_eq!(first.url, format!("https://{}.railway.app", project));
        }
    }
}
