//! Team colors and per-color data storage.
//!
//! ## Color
//!
//! The four fixed teams. Their declaration order is the turn rotation:
//! CRIMSON → SAPPHIRE → GOLD → EMERALD → CRIMSON.
//!
//! ## ColorMap
//!
//! Fixed-size per-color storage backed by an array for O(1) access.
//! Supports iteration and indexing by `Color`.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::ops::{Index, IndexMut};

/// Number of teams in a match.
pub const COLOR_COUNT: usize = 4;

/// Team identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Color {
    Crimson,
    Sapphire,
    Gold,
    Emerald,
}

impl Color {
    /// All colors in rotation order.
    pub const ALL: [Color; COLOR_COUNT] = [Color::Crimson, Color::Sapphire, Color::Gold, Color::Emerald];

    /// The color that opens every match.
    pub const FIRST: Color = Color::Crimson;

    /// Position in the rotation (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Color at a rotation index. Wraps around.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % COLOR_COUNT]
    }

    /// Next color in the fixed rotation.
    ///
    /// ```
    /// use ludo_echoes::core::Color;
    ///
    /// assert_eq!(Color::Crimson.next(), Color::Sapphire);
    /// assert_eq!(Color::Emerald.next(), Color::Crimson);
    /// ```
    #[must_use]
    pub const fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Upper-case team name, as shown in log lines.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Color::Crimson => "CRIMSON",
            Color::Sapphire => "SAPPHIRE",
            Color::Gold => "GOLD",
            Color::Emerald => "EMERALD",
        }
    }

    /// Look up a color by name, ignoring case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().find(|c| c.name().eq_ignore_ascii_case(name))
    }

    /// Iterate over all colors in rotation order.
    pub fn all() -> impl Iterator<Item = Color> {
        Self::ALL.into_iter()
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-color data storage with O(1) access.
///
/// Serializes as a map keyed by team name. Deserializing fills colors that
/// are absent with `T::default()`.
///
/// ## Example
///
/// ```
/// use ludo_echoes::core::{Color, ColorMap};
///
/// let mut themes: ColorMap<String> = ColorMap::with_default();
/// themes[Color::Gold] = "desert caravan".to_string();
///
/// assert_eq!(themes[Color::Gold], "desert caravan");
/// assert!(themes[Color::Crimson].is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ColorMap<T> {
    data: [T; COLOR_COUNT],
}

impl<T> ColorMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(Color) -> T) -> Self {
        Self {
            data: Color::ALL.map(factory),
        }
    }

    /// Create a map with all entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a map with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a color's data.
    #[must_use]
    pub fn get(&self, color: Color) -> &T {
        &self.data[color.index()]
    }

    /// Get a mutable reference to a color's data.
    pub fn get_mut(&mut self, color: Color) -> &mut T {
        &mut self.data[color.index()]
    }

    /// Iterate over (Color, &T) pairs in rotation order.
    pub fn iter(&self) -> impl Iterator<Item = (Color, &T)> {
        Color::ALL.into_iter().zip(self.data.iter())
    }
}

impl<T: Default> Default for ColorMap<T> {
    fn default() -> Self {
        Self::with_default()
    }
}

impl<T: Serialize> Serialize for ColorMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(COLOR_COUNT))?;
        for (color, value) in self.iter() {
            map.serialize_entry(color.name(), value)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de> + Default> Deserialize<'de> for ColorMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<String, T>::deserialize(deserializer)?;
        let mut map = Self::with_default();
        for (name, value) in entries {
            let color = Color::from_name(&name)
                .ok_or_else(|| D::Error::custom(format!("unknown color: {name}")))?;
            map[color] = value;
        }
        Ok(map)
    }
}

impl<T> Index<Color> for ColorMap<T> {
    type Output = T;

    fn index(&self, color: Color) -> &Self::Output {
        self.get(color)
    }
}

impl<T> IndexMut<Color> for ColorMap<T> {
    fn index_mut(&mut self, color: Color) -> &mut Self::Output {
        self.get_mut(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_order() {
        let mut color = Color::FIRST;
        let mut seen = Vec::new();
        for _ in 0..5 {
            seen.push(color);
            color = color.next();
        }

        assert_eq!(
            seen,
            vec![Color::Crimson, Color::Sapphire, Color::Gold, Color::Emerald, Color::Crimson]
        );
    }

    #[test]
    fn test_index_round_trip() {
        for color in Color::all() {
            assert_eq!(Color::from_index(color.index()), color);
        }
        assert_eq!(Color::from_index(6), Color::Gold);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Color::Sapphire), "SAPPHIRE");
    }

    #[test]
    fn test_color_map_new() {
        let map: ColorMap<usize> = ColorMap::new(|c| c.index() * 13);

        assert_eq!(map[Color::Crimson], 0);
        assert_eq!(map[Color::Sapphire], 13);
        assert_eq!(map[Color::Gold], 26);
        assert_eq!(map[Color::Emerald], 39);
    }

    #[test]
    fn test_color_map_mutation_and_iter() {
        let mut map: ColorMap<i32> = ColorMap::with_value(0);
        map[Color::Gold] = 7;

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[2], (Color::Gold, &7));
    }

    #[test]
    fn test_color_serialization() {
        let json = serde_json::to_string(&Color::Emerald).unwrap();
        assert_eq!(json, "\"EMERALD\"");

        let map: ColorMap<String> = ColorMap::new(|c| c.name().to_lowercase());
        let json = serde_json::to_string(&map).unwrap();
        assert!(json.contains("\"GOLD\":\"gold\""));
        let deserialized: ColorMap<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }

    #[test]
    fn test_color_map_partial_deserialize() {
        let map: ColorMap<u32> = serde_json::from_str(r#"{"sapphire": 5}"#).unwrap();
        assert_eq!(map[Color::Sapphire], 5);
        assert_eq!(map[Color::Crimson], 0);

        let err = serde_json::from_str::<ColorMap<u32>>(r#"{"TEAL": 1}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Color::from_name("emerald"), Some(Color::Emerald));
        assert_eq!(Color::from_name("Teal"), None);
    }
}
