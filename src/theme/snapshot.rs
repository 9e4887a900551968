//! Style snapshot: the visual parameters applied for one color mode.

use std::collections::BTreeMap;

use super::error::SnapshotValidationError;

/// A named collection of visual parameters applied atomically.
///
/// Parameter names follow the CSS custom property convention
/// (`--bg-primary`), values are colors, opacities or timing strings.
/// Parameters whose name ends in `-opacity` must hold a number in
/// `0.0..=1.0`; values starting with `#` must be hex colors.
///
/// # Example
///
/// ```rust
/// use themeshift::StyleSnapshot;
///
/// let snapshot = StyleSnapshot::new()
///     .set("--bg-primary", "#1f2937")
///     .set("--particle-opacity", "0.8");
///
/// assert_eq!(snapshot.get("--bg-primary"), Some("#1f2937"));
/// assert!(snapshot.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleSnapshot {
    params: BTreeMap<String, String>,
}

impl StyleSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, returning the updated snapshot for chaining.
    ///
    /// Setting an existing name replaces its value.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    pub fn has(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Iterates parameters in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Checks every color and opacity value.
    ///
    /// Returns the first offending parameter in name order.
    pub fn validate(&self) -> Result<(), SnapshotValidationError> {
        for (name, value) in &self.params {
            if name.ends_with("-opacity") {
                match value.parse::<f32>() {
                    Ok(v) if (0.0..=1.0).contains(&v) => {}
                    _ => {
                        return Err(SnapshotValidationError::OpacityOutOfRange {
                            name: name.clone(),
                            value: value.clone(),
                        })
                    }
                }
            } else if value.starts_with('#') && !is_hex_color(value) {
                return Err(SnapshotValidationError::InvalidColor {
                    name: name.clone(),
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

fn is_hex_color(value: &str) -> bool {
    let digits = &value[1..];
    matches!(digits.len(), 3 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_set_and_get() {
        let snapshot = StyleSnapshot::new().set("--text-primary", "#111827");
        assert!(snapshot.has("--text-primary"));
        assert_eq!(snapshot.get("--text-primary"), Some("#111827"));
        assert_eq!(snapshot.get("--missing"), None);
    }

    #[test]
    fn test_snapshot_set_replaces() {
        let snapshot = StyleSnapshot::new()
            .set("--bg-primary", "#ffffff")
            .set("--bg-primary", "#000000");
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("--bg-primary"), Some("#000000"));
    }

    #[test]
    fn test_snapshot_iter_is_name_ordered() {
        let snapshot = StyleSnapshot::new().set("b", "2").set("a", "1");
        let names: Vec<_> = snapshot.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_snapshot_default_is_empty() {
        assert!(StyleSnapshot::default().is_empty());
    }

    #[test]
    fn test_validate_accepts_short_and_long_hex() {
        let snapshot = StyleSnapshot::new()
            .set("--a", "#fff")
            .set("--b", "#1f2937")
            .set("--c", "#1f2937cc")
            .set("--theme-transition", "0.5s cubic-bezier(0.4, 0, 0.2, 1)");
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_color() {
        let snapshot = StyleSnapshot::new().set("--bg-primary", "#12345g");
        assert_eq!(
            snapshot.validate(),
            Err(SnapshotValidationError::InvalidColor {
                name: "--bg-primary".into(),
                value: "#12345g".into(),
            })
        );
    }

    #[test]
    fn test_validate_rejects_opacity_out_of_range() {
        let snapshot = StyleSnapshot::new().set("--particle-opacity", "1.5");
        assert!(matches!(
            snapshot.validate(),
            Err(SnapshotValidationError::OpacityOutOfRange { .. })
        ));

        let snapshot = StyleSnapshot::new().set("--particle-opacity", "high");
        assert!(snapshot.validate().is_err());
    }
}
