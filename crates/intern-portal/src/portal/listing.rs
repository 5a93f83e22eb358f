use serde::Deserialize;

use super::catalog;
use super::domain::{Internship, InternshipRole, LocationType};

/// Case-insensitive role search over title and description. An empty term keeps every role.
pub fn search_roles(term: &str) -> Vec<InternshipRole> {
    let needle = term.trim().to_lowercase();
    catalog::roles()
        .into_iter()
        .filter(|role| {
            needle.is_empty()
                || role.title.to_lowercase().contains(&needle)
                || role.description.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Filters applied on the listing page on top of a role's internships.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListingFilters {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub location_type: Option<LocationType>,
}

impl ListingFilters {
    pub fn matches(&self, internship: &Internship) -> bool {
        if let Some(search) = non_empty_lowercase(self.search.as_deref()) {
            let hit = internship.title.to_lowercase().contains(&search)
                || internship.company.to_lowercase().contains(&search)
                || internship.description.to_lowercase().contains(&search);
            if !hit {
                return false;
            }
        }

        if let Some(location) = non_empty_lowercase(self.location.as_deref()) {
            if !internship.location.to_lowercase().contains(&location) {
                return false;
            }
        }

        match self.location_type {
            Some(kind) => internship.location_type == kind,
            None => true,
        }
    }
}

fn non_empty_lowercase(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase)
}

pub fn filter_internships(internships: &[Internship], filters: &ListingFilters) -> Vec<Internship> {
    internships
        .iter()
        .filter(|internship| filters.matches(internship))
        .cloned()
        .collect()
}
