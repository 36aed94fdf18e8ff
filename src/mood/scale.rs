use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::error::ScaleError;

pub const MIN_VALUE: u8 = 1;
pub const MAX_VALUE: u8 = 5;

/// Display attributes and numeric value of one mood label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodAttributes {
  pub label: String,
  pub value: u8,
  pub glyph: String,
  /// Hex color, e.g. `#2ecc71`
  pub color: String,
}

impl MoodAttributes {
  fn new(label: &str, value: u8, glyph: &str, color: &str) -> Self {
    Self {
      label: label.to_string(),
      value,
      glyph: glyph.to_string(),
      color: color.to_string(),
    }
  }
}

/// Ordered mapping from mood label to attributes.
///
/// Labels are unique and values strictly increase from the most negative
/// mood to the most positive, all within 1..=5.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<MoodAttributes>")]
pub struct MoodScale {
  moods: Vec<MoodAttributes>,
}

impl MoodScale {
  pub fn new(moods: Vec<MoodAttributes>) -> Result<Self, ScaleError> {
    if moods.is_empty() {
      return Err(ScaleError::Empty);
    }

    let mut labels = HashSet::new();
    let mut previous: Option<u8> = None;

    for mood in &moods {
      if mood.label.trim().is_empty() {
        return Err(ScaleError::EmptyLabel);
      }
      if !labels.insert(mood.label.as_str()) {
        return Err(ScaleError::DuplicateLabel(mood.label.clone()));
      }
      if !(MIN_VALUE..=MAX_VALUE).contains(&mood.value) {
        return Err(ScaleError::OutOfRange {
          label: mood.label.clone(),
          value: mood.value,
        });
      }
      if previous.is_some_and(|p| mood.value <= p) {
        return Err(ScaleError::NotMonotonic {
          label: mood.label.clone(),
          value: mood.value,
        });
      }
      previous = Some(mood.value);
    }

    Ok(Self { moods })
  }

  pub fn get(&self, label: &str) -> Option<&MoodAttributes> {
    self.moods.iter().find(|m| m.label == label)
  }

  /// Reverse lookup from numeric value to label.
  pub fn label_for(&self, value: u8) -> Option<&str> {
    self
      .moods
      .iter()
      .find(|m| m.value == value)
      .map(|m| m.label.as_str())
  }

  /// Mood at a 0-based position, used for the number-key picker.
  pub fn at(&self, index: usize) -> Option<&MoodAttributes> {
    self.moods.get(index)
  }

  pub fn iter(&self) -> impl Iterator<Item = &MoodAttributes> {
    self.moods.iter()
  }
}

impl TryFrom<Vec<MoodAttributes>> for MoodScale {
  type Error = ScaleError;

  fn try_from(moods: Vec<MoodAttributes>) -> Result<Self, Self::Error> {
    Self::new(moods)
  }
}

impl Default for MoodScale {
  fn default() -> Self {
    Self {
      moods: vec![
        MoodAttributes::new("terrible", 1, "😢", "#e74c3c"),
        MoodAttributes::new("bad", 2, "😟", "#e67e22"),
        MoodAttributes::new("okay", 3, "😐", "#f1c40f"),
        MoodAttributes::new("good", 4, "🙂", "#2ecc71"),
        MoodAttributes::new("great", 5, "😄", "#27ae60"),
      ],
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_scale_is_valid() {
    let scale = MoodScale::default();
    assert_eq!(MoodScale::new(scale.iter().cloned().collect()), Ok(scale.clone()));
    assert_eq!(scale.iter().count(), 5);
  }

  #[test]
  fn test_lookup_both_directions() {
    let scale = MoodScale::default();
    assert_eq!(scale.get("good").map(|m| m.value), Some(4));
    assert_eq!(scale.label_for(1), Some("terrible"));
    assert_eq!(scale.label_for(5), Some("great"));
    assert_eq!(scale.get("ecstatic"), None);
    assert_eq!(scale.label_for(9), None);
  }

  #[test]
  fn test_rejects_out_of_range_value() {
    let err = MoodScale::new(vec![MoodAttributes::new("wild", 6, "!", "#000000")]);
    assert!(matches!(err, Err(ScaleError::OutOfRange { value: 6, .. })));
  }

  #[test]
  fn test_rejects_non_monotonic_values() {
    let err = MoodScale::new(vec![
      MoodAttributes::new("low", 2, "-", "#000000"),
      MoodAttributes::new("lower", 1, "--", "#000000"),
    ]);
    assert!(matches!(err, Err(ScaleError::NotMonotonic { .. })));
  }

  #[test]
  fn test_rejects_duplicates() {
    let err = MoodScale::new(vec![
      MoodAttributes::new("meh", 2, "-", "#000000"),
      MoodAttributes::new("meh", 3, "-", "#000000"),
    ]);
    assert_eq!(err, Err(ScaleError::DuplicateLabel("meh".to_string())));
  }

  #[test]
  fn test_deserialize_validates() {
    let yaml = "- { label: low, value: 1, glyph: x, color: '#111111' }\n- { label: high, value: 5, glyph: y, color: '#222222' }\n";
    let scale: MoodScale = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(scale.label_for(5), Some("high"));

    let bad = "- { label: low, value: 0, glyph: x, color: '#111111' }\n";
    assert!(serde_yaml::from_str::<MoodScale>(bad).is_err());
  }
}
