use url::form_urlencoded;

pub const FILTERS_KEY: &str = "filters";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOption {
    pub id: &'static str,
    pub label: &'static str,
}

/// Category chips shown above the results grid.
pub const FILTER_OPTIONS: &[FilterOption] = &[
    FilterOption { id: "amazing_views", label: "Amazing views" },
    FilterOption { id: "beachfront", label: "Beachfront" },
    FilterOption { id: "cabins", label: "Cabins" },
    FilterOption { id: "mansions", label: "Mansions" },
    FilterOption { id: "tiny_homes", label: "Tiny homes" },
    FilterOption { id: "countryside", label: "Countryside" },
    FilterOption { id: "luxe", label: "Luxe" },
    FilterOption { id: "pools", label: "Amazing pools" },
    FilterOption { id: "design", label: "Design" },
    FilterOption { id: "skiing", label: "Skiing" },
    FilterOption { id: "historical", label: "Historical homes" },
    FilterOption { id: "tropical", label: "Tropical" },
];

pub fn is_known_filter(id: &str) -> bool {
    FILTER_OPTIONS.iter().any(|option| option.id == id)
}

/// Selected chip ids in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    selected: Vec<String>,
}

impl FilterSelection {
    /// Reads the comma-separated `filters` value out of a raw query string,
    /// dropping unknown or repeated ids.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut selection = FilterSelection::default();

        if let Some((_, value)) =
            form_urlencoded::parse(query.as_bytes()).find(|(key, _)| key == FILTERS_KEY)
        {
            for id in value.split(',').map(str::trim) {
                if is_known_filter(id) && !selection.contains(id) {
                    selection.selected.push(id.to_string());
                }
            }
        }

        selection
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn toggle(&mut self, id: &str) {
        if let Some(pos) = self.selected.iter().position(|s| s == id) {
            self.selected.remove(pos);
        } else {
            self.selected.push(id.to_string());
        }
    }

    /// Selection after toggling `id`, leaving `self` untouched.
    pub fn toggled(&self, id: &str) -> Self {
        let mut next = self.clone();
        next.toggle(id);
        next
    }

    pub fn to_query_value(&self) -> Option<String> {
        if self.selected.is_empty() {
            None
        } else {
            Some(self.selected.join(","))
        }
    }
}
