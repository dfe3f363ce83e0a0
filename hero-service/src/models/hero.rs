use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Maximum length of `name` and `alias`, matching the `VARCHAR(100)` columns
pub const MAX_TEXT_LEN: usize = 100;

/// A stored hero
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Hero {
    pub id: i64,
    pub name: String,
    pub alias: String,
    pub powers: Option<String>,
}

/// Payload for creating a hero
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewHero {
    pub name: String,
    pub alias: String,
    #[serde(default)]
    pub powers: Option<String>,
}

impl NewHero {
    /// Check required fields are non-empty and fit their columns
    pub fn validate(&self) -> Result<(), String> {
        validate_text("name", &self.name)?;
        validate_text("alias", &self.alias)
    }
}

/// Partial update payload
///
/// `name` and `alias` are either replaced or left alone. `powers` is
/// tri-state: absent leaves it, `null` clears it, a string replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub powers: Option<Option<String>>,
}

impl HeroChanges {
    /// True when the payload would not change any field
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.alias.is_none() && self.powers.is_none()
    }

    /// Validate the fields that are present
    pub fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            validate_text("name", name)?;
        }
        if let Some(alias) = &self.alias {
            validate_text("alias", alias)?;
        }
        Ok(())
    }

    /// Overwrite the supplied fields of `hero`
    pub fn apply_to(self, hero: &mut Hero) {
        if let Some(name) = self.name {
            hero.name = name;
        }
        if let Some(alias) = self.alias {
            hero.alias = alias;
        }
        if let Some(powers) = self.powers {
            hero.powers = powers;
        }
    }
}

// Distinguishes an explicit `null` from a missing key; missing keys never
// reach this function because of `#[serde(default)]`.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn validate_text(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("'{}' must not be empty", field));
    }
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(format!(
            "'{}' must be at most {} characters",
            field, MAX_TEXT_LEN
        ));
    }
    Ok(())
}

/// Sortable hero attributes
///
/// The explicit allow-list of column names a list request may order by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HeroField {
    #[default]
    Id,
    Name,
    Alias,
    Powers,
}

impl HeroField {
    pub const ALL: [HeroField; 4] = [Self::Id, Self::Name, Self::Alias, Self::Powers];

    /// Look up a field by its attribute name
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.column() == name)
    }

    /// Resolve a requested field, substituting `id` for unknown names
    pub fn resolve(name: &str) -> Self {
        Self::parse(name).unwrap_or_default()
    }

    /// Column name in the `heros` table
    pub const fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Alias => "alias",
            Self::Powers => "powers",
        }
    }
}

impl fmt::Display for HeroField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// A hero together with its generated backstory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroStory {
    pub id: i64,
    pub name: String,
    pub alias: String,
    pub story: String,
}

impl HeroStory {
    /// Build the story for `hero`; the text depends only on name and alias
    pub fn for_hero(hero: Hero) -> Self {
        let story = compose_story(&hero.name, &hero.alias);
        Self {
            id: hero.id,
            name: hero.name,
            alias: hero.alias,
            story,
        }
    }
}

fn compose_story(name: &str, alias: &str) -> String {
    format!(
        "Behind the bright lights of the city a legend is whispered: \"{alias}\". \
         Few know that the hero who keeps watch through the night is really {name}. \
         Everyone {alias} has saved quietly remembers that name."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hero() -> Hero {
        Hero {
            id: 7,
            name: "Dick Grayson".to_string(),
            alias: "Nightwing".to_string(),
            powers: Some("acrobatics".to_string()),
        }
    }

    #[test]
    fn test_field_allow_list() {
        assert_eq!(HeroField::parse("alias"), Some(HeroField::Alias));
        assert_eq!(HeroField::parse("Alias"), None);
        assert_eq!(HeroField::resolve("created_at"), HeroField::Id);
        assert_eq!(HeroField::resolve("powers").column(), "powers");
    }

    #[test]
    fn test_changes_distinguish_null_from_absent() {
        let absent: HeroChanges = serde_json::from_str(r#"{"name":"Robin"}"#).unwrap();
        assert_eq!(absent.powers, None);

        let cleared: HeroChanges = serde_json::from_str(r#"{"powers":null}"#).unwrap();
        assert_eq!(cleared.powers, Some(None));
        assert!(!cleared.is_empty());

        let empty: HeroChanges = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_apply_only_touches_supplied_fields() {
        let mut target = hero();
        HeroChanges {
            alias: Some("Robin".to_string()),
            ..HeroChanges::default()
        }
        .apply_to(&mut target);
        assert_eq!(target.name, "Dick Grayson");
        assert_eq!(target.alias, "Robin");
        assert_eq!(target.powers.as_deref(), Some("acrobatics"));

        HeroChanges {
            powers: Some(None),
            ..HeroChanges::default()
        }
        .apply_to(&mut target);
        assert_eq!(target.powers, None);
    }

    #[test]
    fn test_validation() {
        let mut new = NewHero {
            name: "Bruce Wayne".to_string(),
            alias: "Batman".to_string(),
            powers: None,
        };
        assert!(new.validate().is_ok());

        new.alias = "   ".to_string();
        assert!(new.validate().unwrap_err().contains("alias"));

        new.alias = "x".repeat(MAX_TEXT_LEN + 1);
        assert!(new.validate().unwrap_err().contains("100"));

        let changes = HeroChanges {
            name: Some(String::new()),
            ..HeroChanges::default()
        };
        assert!(changes.validate().is_err());
    }

    #[test]
    fn test_story_is_deterministic() {
        let first = HeroStory::for_hero(hero());
        let second = HeroStory::for_hero(hero());
        assert_eq!(first, second);
        assert!(first.story.contains("Nightwing"));
        assert!(first.story.contains("Dick Grayson"));
        assert_eq!(first.id, 7);
    }

    #[test]
    fn test_story_ignores_powers() {
        let mut other = hero();
        other.id = 8;
        other.powers = None;
        assert_eq!(
            HeroStory::for_hero(other).story,
            HeroStory::for_hero(hero()).story
        );
    }
}
