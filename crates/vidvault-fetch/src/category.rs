//! URL categories.
//!
//! Every requested URL lands in exactly one fetch-strategy category. The
//! special categories come from the settings file (built-ins first, then any
//! configured extras, in declaration order) and match by URL host; whatever
//! they leave unclaimed forms the standard group, which always runs last.

use url::Url;

use vidvault_core::Settings;

/// Name of the fallback group for URLs no special category claims.
pub const STANDARD_CATEGORY: &str = "standard";

/// Cookie template the built-in cookie category reads its browser from.
pub const BUILTIN_COOKIE_TEMPLATE: &str = "generic";

/// Engine-side behavior of a category, applied on top of the base options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryKind {
    /// No overrides; the engine picks its own extractor.
    Standard,
    /// Force the generic extractor for sites whose dedicated one is broken.
    ForcedGeneric,
    /// Impersonate a browser client, e.g. `edge:windows`.
    Impersonate { target: String },
    /// Send cookies from a local browser, resolved from the named template
    /// when the group is actually fetched.
    Cookie { template: String },
    /// Extra engine arguments, appended verbatim.
    Extra { args: Vec<String> },
}

/// A special category: its name, the hosts it claims, and what it does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub name: String,
    pub hosts: Vec<String>,
    pub kind: CategoryKind,
}

impl CategoryRule {
    /// Whether this rule claims `url`. Unparsable URLs and URLs without a
    /// host match nothing and fall through to the standard group.
    fn matches(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(parsed) => parsed
                .host_str()
                .map(|host| self.hosts.iter().any(|allowed| allowed == host))
                .unwrap_or(false),
            Err(_) => false,
        }
    }
}

/// One category's slice of a request: the URLs it claimed, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlGroup {
    pub name: String,
    pub kind: CategoryKind,
    pub urls: Vec<String>,
}

/// The special categories configured in `settings`, in the order they are
/// checked: forced-generic, impersonation, cookies, then the extras in file
/// order. Categories with an empty host list are omitted.
pub fn category_rules(settings: &Settings) -> Vec<CategoryRule> {
    let mut rules = Vec::new();
    if !settings.forced_generic_sites.is_empty() {
        rules.push(CategoryRule {
            name: "forced_generic".to_string(),
            hosts: settings.forced_generic_sites.clone(),
            kind: CategoryKind::ForcedGeneric,
        });
    }
    if !settings.impersonate_sites.is_empty() {
        rules.push(CategoryRule {
            name: "impersonate".to_string(),
            hosts: settings.impersonate_sites.clone(),
            kind: CategoryKind::Impersonate {
                target: settings.impersonate_target.clone(),
            },
        });
    }
    if !settings.cookie_sites.is_empty() {
        rules.push(CategoryRule {
            name: "cookie".to_string(),
            hosts: settings.cookie_sites.clone(),
            kind: CategoryKind::Cookie {
                template: BUILTIN_COOKIE_TEMPLATE.to_string(),
            },
        });
    }
    for extra in &settings.extra_categories {
        rules.push(CategoryRule {
            name: extra.name.clone(),
            hosts: extra.hosts.clone(),
            kind: CategoryKind::Extra {
                args: extra.extra_args.clone(),
            },
        });
    }
    rules
}

/// Partitions `urls` over `rules`, first match wins. A URL two rules list is
/// claimed by the earlier rule only; the unclaimed remainder becomes the
/// standard group at the end. Empty groups are dropped.
pub fn classify(urls: &[String], rules: &[CategoryRule]) -> Vec<UrlGroup> {
    let mut claimed = vec![false; urls.len()];
    let mut groups = Vec::new();

    for rule in rules {
        let mut members = Vec::new();
        for (index, url) in urls.iter().enumerate() {
            if !claimed[index] && rule.matches(url) {
                claimed[index] = true;
                members.push(url.clone());
            }
        }
        if !members.is_empty() {
            groups.push(UrlGroup {
                name: rule.name.clone(),
                kind: rule.kind.clone(),
                urls: members,
            });
        }
    }

    let rest: Vec<String> = urls
        .iter()
        .zip(&claimed)
        .filter(|(_, taken)| !**taken)
        .map(|(url, _)| url.clone())
        .collect();
    if !rest.is_empty() {
        groups.push(UrlGroup {
            name: STANDARD_CATEGORY.to_string(),
            kind: CategoryKind::Standard,
            urls: rest,
        });
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(list: &[&str]) -> Vec<String> {
        list.iter().map(|url| url.to_string()).collect()
    }

    fn settings_with_sites() -> Settings {
        Settings {
            forced_generic_sites: vec!["special.example".to_string()],
            impersonate_sites: vec!["browserish.example".to_string()],
            cookie_sites: vec!["walled.example".to_string()],
            extra_categories: vec![vidvault_core::ExtraCategory {
                name: "slowhosts".to_string(),
                hosts: vec!["slow.example".to_string()],
                extra_args: vec!["--limit-rate".to_string(), "500K".to_string()],
            }],
            ..Settings::default()
        }
    }

    #[test]
    fn test_rules_follow_declaration_order() {
        let rules = category_rules(&settings_with_sites());
        let names: Vec<&str> = rules.iter().map(|rule| rule.name.as_str()).collect();
        assert_eq!(names, ["forced_generic", "impersonate", "cookie", "slowhosts"]);
        assert_eq!(
            rules[1].kind,
            CategoryKind::Impersonate {
                target: "edge:windows".to_string()
            }
        );
    }

    #[test]
    fn test_rules_skip_empty_site_lists() {
        let settings = Settings {
            cookie_sites: vec!["walled.example".to_string()],
            ..Settings::default()
        };
        let rules = category_rules(&settings);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, "cookie");
    }

    #[test]
    fn test_classify_each_url_lands_in_exactly_one_group() {
        let rules = category_rules(&settings_with_sites());
        let input = urls(&[
            "https://special.example/a",
            "https://plain.example/b",
            "https://walled.example/c",
            "https://slow.example/d",
        ]);
        let groups = classify(&input, &rules);

        let names: Vec<&str> = groups.iter().map(|group| group.name.as_str()).collect();
        assert_eq!(names, ["forced_generic", "cookie", "slowhosts", "standard"]);

        let total: usize = groups.iter().map(|group| group.urls.len()).sum();
        assert_eq!(total, input.len());
        for url in &input {
            let claiming = groups.iter().filter(|group| group.urls.contains(url)).count();
            assert_eq!(claiming, 1, "{url} must belong to exactly one group");
        }
    }

    #[test]
    fn test_classify_first_matching_rule_wins() {
        // Same host listed under two categories: the earlier one claims it.
        let settings = Settings {
            forced_generic_sites: vec!["both.example".to_string()],
            cookie_sites: vec!["both.example".to_string()],
            ..Settings::default()
        };
        let groups = classify(
            &urls(&["https://both.example/a"]),
            &category_rules(&settings),
        );
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "forced_generic");
    }

    #[test]
    fn test_classify_standard_group_runs_last() {
        let rules = category_rules(&settings_with_sites());
        let groups = classify(
            &urls(&["https://plain.example/b", "https://special.example/a"]),
            &rules,
        );
        assert_eq!(groups.last().unwrap().name, STANDARD_CATEGORY);
        assert_eq!(groups.last().unwrap().kind, CategoryKind::Standard);
    }

    #[test]
    fn test_classify_malformed_url_falls_through_to_standard() {
        let rules = category_rules(&settings_with_sites());
        let groups = classify(&urls(&["not a url", "file:///tmp/x"]), &rules);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, STANDARD_CATEGORY);
        assert_eq!(groups[0].urls.len(), 2);
    }

    #[test]
    fn test_classify_host_match_ignores_port_and_path() {
        let rules = category_rules(&settings_with_sites());
        let groups = classify(
            &urls(&["https://special.example:8443/deep/path?x=1"]),
            &rules,
        );
        assert_eq!(groups[0].name, "forced_generic");
    }

    #[test]
    fn test_classify_subdomain_is_not_its_parent() {
        let rules = category_rules(&settings_with_sites());
        let groups = classify(&urls(&["https://www.special.example/a"]), &rules);
        assert_eq!(groups[0].name, STANDARD_CATEGORY);
    }

    #[test]
    fn test_classify_empty_input_yields_no_groups() {
        let rules = category_rules(&settings_with_sites());
        assert!(classify(&[], &rules).is_empty());
    }

    #[test]
    fn test_classify_preserves_input_order_within_groups() {
        let rules = category_rules(&settings_with_sites());
        let groups = classify(
            &urls(&[
                "https://special.example/1",
                "https://plain.example/x",
                "https://special.example/2",
            ]),
            &rules,
        );
        assert_eq!(
            groups[0].urls,
            urls(&["https://special.example/1", "https://special.example/2"])
        );
    }
}
