use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Requested icon size: a symbolic step styled by CSS, or explicit pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IconSize {
    Xs,
    Sm,
    #[default]
    Md,
    Lg,
    Xl,
    Px(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid icon size '{0}': expected xs, sm, md, lg, xl or a pixel count")]
pub struct ParseSizeError(String);

impl IconSize {
    /// Symbolic token (`"md"`), `None` for pixel sizes
    pub fn token(&self) -> Option<&'static str> {
        match self {
            IconSize::Xs => Some("xs"),
            IconSize::Sm => Some("sm"),
            IconSize::Md => Some("md"),
            IconSize::Lg => Some("lg"),
            IconSize::Xl => Some("xl"),
            IconSize::Px(_) => None,
        }
    }

    /// CSS modifier class for symbolic sizes (`"icon--md"`)
    pub fn css_class(&self) -> Option<String> {
        self.token().map(|token| format!("icon--{}", token))
    }

    /// Explicit width/height in pixels; symbolic sizes leave this to CSS
    pub fn pixels(&self) -> Option<u32> {
        match self {
            IconSize::Px(px) => Some(*px),
            _ => None,
        }
    }
}

impl FromStr for IconSize {
    type Err = ParseSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim();
        match value.to_ascii_lowercase().as_str() {
            "xs" => Ok(IconSize::Xs),
            "sm" => Ok(IconSize::Sm),
            "md" => Ok(IconSize::Md),
            "lg" => Ok(IconSize::Lg),
            "xl" => Ok(IconSize::Xl),
            other => {
                let px = other.strip_suffix("px").unwrap_or(other);
                match px.parse::<u32>() {
                    Ok(px) if px > 0 => Ok(IconSize::Px(px)),
                    _ => Err(ParseSizeError(value.to_string())),
                }
            }
        }
    }
}

impl fmt::Display for IconSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.token(), self.pixels()) {
            (Some(token), _) => write!(f, "{}", token),
            (None, Some(px)) => write!(f, "{}px", px),
            (None, None) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbolic_sizes_have_class_and_no_pixels() {
        for size in [IconSize::Xs, IconSize::Sm, IconSize::Md, IconSize::Lg, IconSize::Xl] {
            assert!(size.css_class().is_some());
            assert_eq!(size.pixels(), None);
        }
        assert_eq!(IconSize::Lg.css_class().as_deref(), Some("icon--lg"));
    }

    #[test]
    fn test_pixel_size() {
        let size = IconSize::Px(32);
        assert_eq!(size.pixels(), Some(32));
        assert_eq!(size.css_class(), None);
    }

    #[test]
    fn test_default_is_md() {
        assert_eq!(IconSize::default(), IconSize::Md);
    }

    #[test]
    fn test_parse() {
        assert_eq!("md".parse::<IconSize>(), Ok(IconSize::Md));
        assert_eq!(" XL ".parse::<IconSize>(), Ok(IconSize::Xl));
        assert_eq!("24".parse::<IconSize>(), Ok(IconSize::Px(24)));
        assert_eq!("18px".parse::<IconSize>(), Ok(IconSize::Px(18)));
    }

    #[test]
    fn test_parse_rejects_invalid() {
        for input in ["", "huge", "0", "-4", "12.5"] {
            assert!(input.parse::<IconSize>().is_err(), "{:?} should fail", input);
        }
    }

    #[test]
    fn test_display_round_trip() {
        assert_eq!(IconSize::Sm.to_string(), "sm");
        assert_eq!(IconSize::Px(40).to_string(), "40px");
        assert_eq!(IconSize::Px(40).to_string().parse::<IconSize>(), Ok(IconSize::Px(40)));
    }
}
