pub mod graphql;

use serde::{Deserialize, Serialize};

/// A country as returned by the GraphQL API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    pub code: String,
    pub name: String,
}

impl Country {
    #[cfg(test)]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Value of the field selected by `key` (name when not grouping)
    pub fn field(&self, key: GroupKey) -> &str {
        match key {
            GroupKey::Code => &self.code,
            GroupKey::None | GroupKey::Name => &self.name,
        }
    }
}

/// Which country field buckets the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKey {
    #[default]
    None,
    Code,
    Name,
}

impl GroupKey {
    pub const ALL: [GroupKey; 3] = [GroupKey::None, GroupKey::Code, GroupKey::Name];

    pub fn label(self) -> &'static str {
        match self {
            GroupKey::None => "none",
            GroupKey::Code => "code",
            GroupKey::Name => "name",
        }
    }

    /// Cycle none -> code -> name -> none
    pub fn next(self) -> Self {
        match self {
            GroupKey::None => GroupKey::Code,
            GroupKey::Code => GroupKey::Name,
            GroupKey::Name => GroupKey::None,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            GroupKey::None => GroupKey::Name,
            GroupKey::Code => GroupKey::None,
            GroupKey::Name => GroupKey::Code,
        }
    }
}

impl std::str::FromStr for GroupKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(GroupKey::None),
            "code" => Ok(GroupKey::Code),
            "name" => Ok(GroupKey::Name),
            other => anyhow::bail!("Unknown group key '{}' (expected none, code or name)", other),
        }
    }
}

/// Which field the search term is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Always match the country name
    #[default]
    Name,
    /// Match the code while grouping by code, the name otherwise
    GroupField,
}

/// One bucket of the grouped view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub key: String,
    pub countries: Vec<Country>,
}

/// Stable, case-insensitive substring filter over the raw list
pub fn filter_countries(
    raw: &[Country],
    search: &str,
    group_key: GroupKey,
    mode: FilterMode,
) -> Vec<Country> {
    let needle = search.to_lowercase();
    let field = match mode {
        FilterMode::Name => GroupKey::Name,
        FilterMode::GroupField => group_key,
    };

    raw.iter()
        .filter(|c| c.field(field).to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

/// Partition the filtered list into buckets in first-seen order.
/// Returns `None` when not grouping.
pub fn group_countries(filtered: &[Country], group_key: GroupKey) -> Option<Vec<Group>> {
    if group_key == GroupKey::None {
        return None;
    }

    let mut groups: Vec<Group> = Vec::new();
    for country in filtered {
        let key = country.field(group_key);
        match groups.iter_mut().find(|g| g.key == key) {
            Some(group) => group.countries.push(country.clone()),
            None => groups.push(Group {
                key: key.to_string(),
                countries: vec![country.clone()],
            }),
        }
    }
    Some(groups)
}

#[cfg(test)]
pub(crate) fn sample(names: &[(&str, &str)]) -> Vec<Country> {
    names.iter().map(|(code, name)| Country::new(*code, *name)).collect()
}
