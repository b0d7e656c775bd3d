//! CSS colour parsing and WCAG contrast math.

/// An opaque sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parse a CSS colour value. Supports `#rgb`, `#rrggbb`, `#rgba` and
    /// `#rrggbbaa` when fully opaque, `rgb()`/`rgba()` with opaque alpha, and
    /// the basic named colours. Anything else (including `transparent`,
    /// `inherit` and translucent colours) yields `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let lowered = value.to_ascii_lowercase();
        let value = lowered.trim().trim_end_matches("!important").trim();

        if let Some(hex) = value.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(args) = value
            .strip_prefix("rgba(")
            .or_else(|| value.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_rgb_args(args);
        }
        named(value)
    }

    /// WCAG 2.x relative luminance.
    pub fn luminance(&self) -> f64 {
        fn channel(c: u8) -> f64 {
            let c = f64::from(c) / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * channel(self.0) + 0.7152 * channel(self.1) + 0.0722 * channel(self.2)
    }
}

/// Contrast ratio between two colours, always >= 1.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let (la, lb) = (a.luminance(), b.luminance());
    let (light, dark) = if la >= lb { (la, lb) } else { (lb, la) };
    (light + 0.05) / (dark + 0.05)
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let expanded: String = match hex.len() {
        3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => hex.to_string(),
        _ => return None,
    };

    let byte = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    if expanded.len() == 8 && byte(6)? != 0xff {
        return None;
    }
    Some(Rgb(byte(0)?, byte(2)?, byte(4)?))
}

fn parse_rgb_args(args: &str) -> Option<Rgb> {
    // Both `rgb(1, 2, 3)` and `rgb(1 2 3 / 1)` syntaxes.
    let parts: Vec<&str> = args
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();

    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }
    if let Some(alpha) = parts.get(3) {
        let alpha = match alpha.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().ok()? / 100.0,
            None => alpha.parse::<f64>().ok()?,
        };
        if alpha < 1.0 {
            return None;
        }
    }

    let channel = |p: &str| -> Option<u8> {
        let v = match p.strip_suffix('%') {
            Some(pct) => pct.parse::<f64>().ok()? * 2.55,
            None => p.parse::<f64>().ok()?,
        };
        Some(v.round().clamp(0.0, 255.0) as u8)
    };

    Some(Rgb(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?))
}

fn named(name: &str) -> Option<Rgb> {
    let rgb = match name {
        "black" => Rgb(0, 0, 0),
        "white" => Rgb(255, 255, 255),
        "red" => Rgb(255, 0, 0),
        "green" => Rgb(0, 128, 0),
        "lime" => Rgb(0, 255, 0),
        "blue" => Rgb(0, 0, 255),
        "yellow" => Rgb(255, 255, 0),
        "cyan" | "aqua" => Rgb(0, 255, 255),
        "magenta" | "fuchsia" => Rgb(255, 0, 255),
        "gray" | "grey" => Rgb(128, 128, 128),
        "silver" => Rgb(192, 192, 192),
        "lightgray" | "lightgrey" => Rgb(211, 211, 211),
        "darkgray" | "darkgrey" => Rgb(169, 169, 169),
        "maroon" => Rgb(128, 0, 0),
        "olive" => Rgb(128, 128, 0),
        "navy" => Rgb(0, 0, 128),
        "purple" => Rgb(128, 0, 128),
        "teal" => Rgb(0, 128, 128),
        "orange" => Rgb(255, 165, 0),
        _ => return None,
    };
    Some(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Rgb::parse("#FFF"), Some(Rgb(255, 255, 255)));
        assert_eq!(Rgb::parse("#1a2b3c"), Some(Rgb(0x1a, 0x2b, 0x3c)));
        assert_eq!(Rgb::parse("#000f"), Some(Rgb(0, 0, 0)));
        assert_eq!(Rgb::parse("#00000080"), None);
        assert_eq!(Rgb::parse("#12345"), None);
        assert_eq!(Rgb::parse("#ggg"), None);
    }

    #[test]
    fn test_parse_functional_and_named() {
        assert_eq!(Rgb::parse("rgb(10, 20, 30)"), Some(Rgb(10, 20, 30)));
        assert_eq!(Rgb::parse("RGB(100% 0% 0%)"), Some(Rgb(255, 0, 0)));
        assert_eq!(Rgb::parse("rgba(0,0,0,1)"), Some(Rgb(0, 0, 0)));
        assert_eq!(Rgb::parse("rgba(0,0,0,0.5)"), None);
        assert_eq!(Rgb::parse("Navy !important"), Some(Rgb(0, 0, 128)));
        assert_eq!(Rgb::parse("transparent"), None);
        assert_eq!(Rgb::parse("inherit"), None);
    }

    #[test]
    fn test_contrast_extremes() {
        let ratio = contrast_ratio(Rgb(0, 0, 0), Rgb(255, 255, 255));
        assert!((ratio - 21.0).abs() < 1e-9);
        assert!((contrast_ratio(Rgb(9, 9, 9), Rgb(9, 9, 9)) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_contrast_is_symmetric() {
        let a = Rgb(0x77, 0x77, 0x77);
        let b = Rgb(0xdd, 0xdd, 0xdd);
        assert_eq!(contrast_ratio(a, b), contrast_ratio(b, a));
        assert!(contrast_ratio(a, b) < 4.5);
    }
}
