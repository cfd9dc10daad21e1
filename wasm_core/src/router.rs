//! Hash-fragment routing for the page shell.

use serde::Serialize;

use crate::catalogue::{ToolEntry, find_tool};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    About,
    Contact,
    Privacy,
    Terms,
    ToolsIndex,
    Tool(&'static ToolEntry),
    NotFound,
}

/// Serializable view of a route for the JS shell.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouteView {
    pub page: &'static str,
    pub tool_id: Option<&'static str>,
    pub hash: String,
}

/// Maps a location fragment (`#/tool/spin-wheel`, `/about`, `""`) to a page.
pub fn parse_location(hash: &str) -> Route {
    let path = hash.trim();
    let path = path.strip_prefix('#').unwrap_or(path);
    let path = path.split(['?', '#']).next().unwrap_or("");
    let path = path.trim_matches('/');
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    match (segments.next(), segments.next(), segments.next()) {
        (None, _, _) | (Some("home"), None, _) => Route::Home,
        (Some("about"), None, _) => Route::About,
        (Some("contact"), None, _) => Route::Contact,
        (Some("privacy"), None, _) => Route::Privacy,
        (Some("terms"), None, _) => Route::Terms,
        (Some("tools"), None, _) => Route::ToolsIndex,
        (Some("tool"), Some(id), None) => find_tool(&decode_segment(id))
            .map(Route::Tool)
            .unwrap_or(Route::NotFound),
        _ => Route::NotFound,
    }
}

fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

impl Route {
    pub fn page(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::About => "about",
            Self::Contact => "contact",
            Self::Privacy => "privacy",
            Self::Terms => "terms",
            Self::ToolsIndex => "tools",
            Self::Tool(_) => "tool",
            Self::NotFound => "not-found",
        }
    }

    /// Canonical fragment for links. `NotFound` has none and maps home.
    pub fn to_hash(&self) -> String {
        match self {
            Self::Home | Self::NotFound => "#/".to_string(),
            Self::Tool(tool) => format!("#/tool/{}", tool.id),
            other => format!("#/{}", other.page()),
        }
    }

    pub fn view(&self) -> RouteView {
        RouteView {
            page: self.page(),
            tool_id: match self {
                Self::Tool(tool) => Some(tool.id),
                _ => None,
            },
            hash: self.to_hash(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_root_fragments_are_home() {
        for hash in ["", "#", "#/", "/", "#/home", "  #/home/ "] {
            assert_eq!(parse_location(hash), Route::Home, "{hash:?}");
        }
    }

    #[test]
    fn static_pages_resolve() {
        assert_eq!(parse_location("#/about"), Route::About);
        assert_eq!(parse_location("#/contact/"), Route::Contact);
        assert_eq!(parse_location("privacy"), Route::Privacy);
        assert_eq!(parse_location("#/terms?ref=footer"), Route::Terms);
        assert_eq!(parse_location("#/tools"), Route::ToolsIndex);
    }

    #[test]
    fn tool_pages_resolve_against_catalogue() {
        let Route::Tool(tool) = parse_location("#/tool/spin-wheel") else {
            panic!("expected a tool route");
        };
        assert_eq!(tool.id, "spin-wheel");
        assert_eq!(
            parse_location("#/tool/random%2Dpicker").view().tool_id,
            Some("random-picker")
        );
        assert_eq!(parse_location("#/tool/unknown"), Route::NotFound);
        assert_eq!(parse_location("#/tool"), Route::NotFound);
        assert_eq!(parse_location("#/tool/spin-wheel/extra"), Route::NotFound);
    }

    #[test]
    fn unknown_paths_are_not_found() {
        assert_eq!(parse_location("#/pricing"), Route::NotFound);
        assert_eq!(parse_location("#/about/team"), Route::NotFound);
    }

    #[test]
    fn hashes_round_trip() {
        for hash in ["#/", "#/about", "#/tools", "#/tool/notepad"] {
            assert_eq!(parse_location(hash).to_hash(), hash);
        }
        assert_eq!(parse_location("#/nowhere").view().page, "not-found");
    }
}
