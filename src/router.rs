//! Page routing: the closed set of pages and the ways to move between them.

/// A top-level page. Declaration order is the navigation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Papers,
    AiEconomics,
    Research,
}

/// Direction of a cyclic page step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Home, Page::Papers, Page::AiEconomics, Page::Research];

    /// Parse a page id (`home`, `papers`, `ai-economics`, `research`).
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim() {
            "home" => Some(Page::Home),
            "papers" => Some(Page::Papers),
            "ai-economics" => Some(Page::AiEconomics),
            "research" => Some(Page::Research),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Papers => "papers",
            Page::AiEconomics => "ai-economics",
            Page::Research => "research",
        }
    }

    /// Tab label in the navigation bar.
    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Papers => "Papers & Conferences",
            Page::AiEconomics => "AI Economics",
            Page::Research => "Research",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Page::Home => 0,
            Page::Papers => 1,
            Page::AiEconomics => 2,
            Page::Research => 3,
        }
    }

    /// Page at cycle position `index`, if any.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Neighbor in the cycle; wraps at both ends.
    pub fn step(self, direction: Direction) -> Self {
        let len = Self::ALL.len();
        let idx = match direction {
            Direction::Next => (self.index() + 1) % len,
            Direction::Previous => (self.index() + len - 1) % len,
        };
        Self::ALL[idx]
    }

    pub fn next(self) -> Self {
        self.step(Direction::Next)
    }

    pub fn prev(self) -> Self {
        self.step(Direction::Previous)
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Map a spoken-style command to a page.
///
/// Rules are checked in order against the lowercased text, first match wins:
/// `home`, then `papers`/`research`, then `ai`/`economics`, then `about`.
pub fn page_for_command(text: &str) -> Option<Page> {
    let text = text.to_lowercase();
    if text.contains("home") {
        Some(Page::Home)
    } else if text.contains("papers") || text.contains("research") {
        Some(Page::Papers)
    } else if text.contains("ai") || text.contains("economics") {
        Some(Page::AiEconomics)
    } else if text.contains("about") {
        Some(Page::Research)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        for page in Page::ALL {
            assert_eq!(Page::from_id(page.id()), Some(page));
            assert_eq!(Page::from_index(page.index()), Some(page));
        }
    }

    #[test]
    fn test_unknown_id() {
        assert_eq!(Page::from_id("contact"), None);
        assert_eq!(Page::from_id(""), None);
        assert_eq!(Page::from_index(4), None);
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(Page::Research.next(), Page::Home);
        assert_eq!(Page::Home.prev(), Page::Research);
        assert_eq!(Page::Papers.next(), Page::AiEconomics);
        assert_eq!(Page::AiEconomics.prev(), Page::Papers);
    }

    #[test]
    fn test_full_cycle_returns_to_start() {
        let mut page = Page::Papers;
        for _ in 0..Page::ALL.len() {
            page = page.next();
        }
        assert_eq!(page, Page::Papers);
    }

    #[test]
    fn test_command_mapping() {
        assert_eq!(page_for_command("Go HOME"), Some(Page::Home));
        assert_eq!(page_for_command("show papers"), Some(Page::Papers));
        assert_eq!(page_for_command("research"), Some(Page::Papers));
        assert_eq!(page_for_command("economics"), Some(Page::AiEconomics));
        assert_eq!(page_for_command("open ai page"), Some(Page::AiEconomics));
        assert_eq!(page_for_command("tell me about it"), Some(Page::Research));
        assert_eq!(page_for_command("xyz"), None);
    }

    #[test]
    fn test_command_mapping_order() {
        // "research" hits the papers rule before "about".
        assert_eq!(page_for_command("about research"), Some(Page::Papers));
        // "home" wins over everything else.
        assert_eq!(page_for_command("home economics"), Some(Page::Home));
    }
}
