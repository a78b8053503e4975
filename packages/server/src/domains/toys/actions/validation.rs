use crate::common::utils::geo::normalize_coordinates;
use crate::common::{ApiError, UserId};
use crate::domains::toys::data::{CreateToyInput, UpdateToyInput};
use crate::domains::toys::models::{normalize_tags, AgeRange, NewToy, ToyChanges, ToyCondition};

pub const MAX_TITLE_CHARS: usize = 120;
pub const MAX_IMAGES: usize = 8;

fn title(raw: &str) -> Result<String, ApiError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ApiError::validation("title is required"));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(ApiError::validation(format!(
            "title must be at most {} characters",
            MAX_TITLE_CHARS
        )));
    }
    Ok(title.to_string())
}

fn required(field: &str, raw: &str) -> Result<String, ApiError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(ApiError::validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

fn images(raw: Vec<String>) -> Result<Vec<String>, ApiError> {
    let images: Vec<String> = raw
        .into_iter()
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect();
    if images.len() > MAX_IMAGES {
        return Err(ApiError::validation(format!(
            "at most {} images are allowed",
            MAX_IMAGES
        )));
    }
    Ok(images)
}

fn age_range(raw: &str) -> Result<AgeRange, ApiError> {
    raw.parse()
        .map_err(|e: anyhow::Error| ApiError::validation(e.to_string()))
}

fn condition(raw: &str) -> Result<ToyCondition, ApiError> {
    raw.parse()
        .map_err(|e: anyhow::Error| ApiError::validation(e.to_string()))
}

fn location(raw: Option<String>) -> Option<String> {
    raw.map(|l| l.trim().to_string()).filter(|l| !l.is_empty())
}

/// Check a create request. The listing always belongs to `owner_id`.
pub fn validate_new_toy(owner_id: UserId, input: CreateToyInput) -> Result<NewToy, ApiError> {
    Ok(NewToy {
        user_id: owner_id,
        title: title(&input.title)?,
        description: required("description", &input.description)?,
        age_range: age_range(&input.age_range)?,
        condition: condition(&input.condition)?,
        category: required("category", &input.category)?.to_lowercase(),
        tags: normalize_tags(input.tags),
        images: images(input.images)?,
        location: location(input.location),
        coordinates: normalize_coordinates(input.latitude, input.longitude)?,
    })
}

/// Check a partial update
pub fn validate_changes(input: UpdateToyInput) -> Result<ToyChanges, ApiError> {
    Ok(ToyChanges {
        title: input.title.as_deref().map(title).transpose()?,
        description: input
            .description
            .as_deref()
            .map(|d| required("description", d))
            .transpose()?,
        age_range: input.age_range.as_deref().map(age_range).transpose()?,
        condition: input.condition.as_deref().map(condition).transpose()?,
        category: input
            .category
            .as_deref()
            .map(|c| required("category", c).map(|c| c.to_lowercase()))
            .transpose()?,
        tags: input.tags.map(normalize_tags),
        images: input.images.map(images).transpose()?,
        location: location(input.location),
        coordinates: normalize_coordinates(input.latitude, input.longitude)?,
        is_available: input.is_available,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> CreateToyInput {
        CreateToyInput {
            title: "  Wooden train set ".to_string(),
            description: "Complete with 20 tracks".to_string(),
            age_range: "3-5".to_string(),
            condition: "like_new".to_string(),
            category: " Vehicles ".to_string(),
            tags: vec!["Trains".to_string(), "wood".to_string(), "trains".to_string()],
            images: vec!["https://img.example/1.jpg".to_string()],
            location: Some("  ".to_string()),
            latitude: Some(44.98312),
            longitude: Some(-93.26874),
        }
    }

    #[test]
    fn test_valid_input_is_normalized() {
        let owner = UserId::new();
        let toy = validate_new_toy(owner, input()).unwrap();

        assert_eq!(toy.user_id, owner);
        assert_eq!(toy.title, "Wooden train set");
        assert_eq!(toy.category, "vehicles");
        assert_eq!(toy.tags, vec!["trains".to_string(), "wood".to_string()]);
        assert_eq!(toy.condition, ToyCondition::LikeNew);
        assert_eq!(toy.location, None);
        assert_eq!(toy.coordinates, Some((44.98, -93.27)));
    }

    #[test]
    fn test_title_length() {
        let mut long = input();
        long.title = "x".repeat(MAX_TITLE_CHARS + 1);
        assert!(validate_new_toy(UserId::new(), long).is_err());

        let mut exact = input();
        exact.title = "é".repeat(MAX_TITLE_CHARS);
        assert!(validate_new_toy(UserId::new(), exact).is_ok());

        let mut blank = input();
        blank.title = "   ".to_string();
        assert!(validate_new_toy(UserId::new(), blank).is_err());
    }

    #[test]
    fn test_rejects_bad_enums_and_fields() {
        let mut bad_age = input();
        bad_age.age_range = "2-4".to_string();
        assert!(validate_new_toy(UserId::new(), bad_age).is_err());

        let mut bad_condition = input();
        bad_condition.condition = "mint".to_string();
        assert!(validate_new_toy(UserId::new(), bad_condition).is_err());

        let mut no_category = input();
        no_category.category = String::new();
        assert!(validate_new_toy(UserId::new(), no_category).is_err());

        let mut too_many_images = input();
        too_many_images.images = vec!["https://img.example/x.jpg".to_string(); MAX_IMAGES + 1];
        assert!(validate_new_toy(UserId::new(), too_many_images).is_err());
    }

    #[test]
    fn test_coordinates_must_be_paired_and_valid() {
        let mut half = input();
        half.longitude = None;
        assert!(validate_new_toy(UserId::new(), half).is_err());

        let mut off_globe = input();
        off_globe.latitude = Some(123.0);
        assert!(validate_new_toy(UserId::new(), off_globe).is_err());
    }

    #[test]
    fn test_empty_update_changes_nothing() {
        let changes = validate_changes(UpdateToyInput::default()).unwrap();
        assert!(changes.title.is_none());
        assert!(changes.coordinates.is_none());
        assert!(changes.is_available.is_none());
    }

    #[test]
    fn test_update_validates_present_fields() {
        let changes = validate_changes(UpdateToyInput {
            condition: Some("Well Loved".to_string()),
            tags: Some(vec!["Outdoor".to_string(), "".to_string()]),
            is_available: Some(false),
            ..UpdateToyInput::default()
        })
        .unwrap();
        assert_eq!(changes.condition, Some(ToyCondition::WellLoved));
        assert_eq!(changes.tags, Some(vec!["outdoor".to_string()]));
        assert_eq!(changes.is_available, Some(false));

        assert!(validate_changes(UpdateToyInput {
            title: Some(String::new()),
            ..UpdateToyInput::default()
        })
        .is_err());
    }
}
