//! Structured builder for ffmpeg's `showwavespic` filter expression.
//!
//! Every value is validated when it is parsed, so the serialized expression can
//! only ever contain the `key=value` pairs built here. Values that would smuggle
//! filter syntax (`:`, `,`, `;`, `[`, `]`, `=`, whitespace) are rejected.

use super::error::{RenderError, RenderResult};
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Name of the ffmpeg filter that draws the waveform.
pub const FILTER_NAME: &str = "showwavespic";

pub const DEFAULT_RESOLUTION: &str = "1920x1080";
pub const DEFAULT_COLORS: &str = "blue";

fn resolution_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{1,5})x(\d{1,5})$").expect("valid regex"))
}

fn color_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:[A-Za-z]+|(?:#|0x)[0-9A-Fa-f]{6}(?:[0-9A-Fa-f]{2})?)(?:@\d+(?:\.\d+)?)?$")
            .expect("valid regex")
    })
}

/// ffmpeg's video size abbreviations, accepted wherever `WxH` is.
const NAMED_SIZES: &[(&str, u32, u32)] = &[
    ("ntsc", 720, 480),
    ("pal", 720, 576),
    ("qntsc", 352, 240),
    ("qpal", 352, 288),
    ("sntsc", 640, 480),
    ("spal", 768, 576),
    ("film", 352, 240),
    ("ntsc-film", 352, 240),
    ("sqcif", 128, 96),
    ("qcif", 176, 144),
    ("cif", 352, 288),
    ("4cif", 704, 576),
    ("16cif", 1408, 1152),
    ("qqvga", 160, 120),
    ("qvga", 320, 240),
    ("vga", 640, 480),
    ("svga", 800, 600),
    ("xga", 1024, 768),
    ("uxga", 1600, 1200),
    ("qxga", 2048, 1536),
    ("sxga", 1280, 1024),
    ("qsxga", 2560, 2048),
    ("hsxga", 5120, 4096),
    ("wvga", 852, 480),
    ("wxga", 1366, 768),
    ("wsxga", 1600, 1024),
    ("wuxga", 1920, 1200),
    ("woxga", 2560, 1600),
    ("wqsxga", 3200, 2048),
    ("wquxga", 3840, 2400),
    ("whsxga", 6400, 4096),
    ("whuxga", 7680, 4800),
    ("cga", 320, 200),
    ("ega", 640, 350),
    ("hd480", 852, 480),
    ("hd720", 1280, 720),
    ("hd1080", 1920, 1080),
    ("2k", 2048, 1080),
    ("2kflat", 1998, 1080),
    ("2kscope", 2048, 858),
    ("4k", 4096, 2160),
    ("4kflat", 3996, 2160),
    ("4kscope", 4096, 1716),
    ("nhd", 640, 360),
    ("hqvga", 240, 160),
    ("wqvga", 400, 240),
    ("fwqvga", 432, 240),
    ("hvga", 480, 320),
    ("qhd", 960, 540),
    ("2kdci", 2048, 1080),
    ("4kdci", 4096, 2160),
    ("uhd2160", 3840, 2160),
    ("uhd4320", 7680, 4320),
];

/// Output image size in pixels. Named sizes are expanded to their dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl FromStr for Resolution {
    type Err = RenderError;

    fn from_str(s: &str) -> RenderResult<Self> {
        let invalid = || RenderError::invalid_parameter("resolution", s);
        let trimmed = s.trim();
        if let Some(&(_, width, height)) = NAMED_SIZES.iter().find(|size| size.0 == trimmed) {
            return Ok(Resolution { width, height });
        }
        let caps = resolution_pattern().captures(trimmed).ok_or_else(invalid)?;
        let width: u32 = caps[1].parse().map_err(|_| invalid())?;
        let height: u32 = caps[2].parse().map_err(|_| invalid())?;
        if width == 0 || height == 0 {
            return Err(invalid());
        }
        Ok(Resolution { width, height })
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// One or more colours, separated by `|` (one per channel when split).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorList(Vec<String>);

impl FromStr for ColorList {
    type Err = RenderError;

    fn from_str(s: &str) -> RenderResult<Self> {
        let s = s.trim();
        let colors: Vec<String> = s.split('|').map(|c| c.trim().to_string()).collect();
        if colors.iter().any(|c| !color_pattern().is_match(c)) {
            return Err(RenderError::invalid_parameter("colors", s));
        }
        Ok(ColorList(colors))
    }
}

impl fmt::Display for ColorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("|"))
    }
}

/// Amplitude scale used when drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AmplitudeScale {
    #[default]
    Lin,
    Log,
    Sqrt,
    Cbrt,
}

impl fmt::Display for AmplitudeScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lin => write!(f, "lin"),
            Self::Log => write!(f, "log"),
            Self::Sqrt => write!(f, "sqrt"),
            Self::Cbrt => write!(f, "cbrt"),
        }
    }
}

/// How each sample is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    /// A point per sample
    #[default]
    Scale,
    /// A filled line per sample
    Full,
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scale => write!(f, "scale"),
            Self::Full => write!(f, "full"),
        }
    }
}

/// How samples are reduced to one column of pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PeakFilter {
    #[default]
    Average,
    Peak,
}

impl fmt::Display for PeakFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Average => write!(f, "average"),
            Self::Peak => write!(f, "peak"),
        }
    }
}

/// Parameters of a `showwavespic` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveformFilter {
    pub size: Resolution,
    pub colors: ColorList,
    pub split_channels: Option<bool>,
    pub scale: Option<AmplitudeScale>,
    pub draw: Option<DrawMode>,
    pub filter: Option<PeakFilter>,
}

impl WaveformFilter {
    pub fn new(size: Resolution, colors: ColorList) -> Self {
        Self {
            size,
            colors,
            split_channels: None,
            scale: None,
            draw: None,
            filter: None,
        }
    }

    /// Parses raw resolution and colour strings as typed by a user.
    pub fn parse(resolution: &str, colors: &str) -> RenderResult<Self> {
        Ok(Self::new(resolution.parse()?, colors.parse()?))
    }

    /// True when any parameter beyond size and colours was requested.
    pub fn has_extended_options(&self) -> bool {
        self.split_channels.is_some()
            || self.scale.is_some()
            || self.draw.is_some()
            || self.filter.is_some()
    }

    /// `showwavespic=size=WxH:colors=C`
    pub fn expression(&self) -> String {
        format!("{FILTER_NAME}=size={}:colors={}", self.size, self.colors)
    }

    /// Expression carrying every parameter, unset ones at ffmpeg's defaults.
    pub fn extended_expression(&self) -> String {
        let options = [
            format!("size={}", self.size),
            format!("split_channels={}", u8::from(self.split_channels.unwrap_or(false))),
            format!("colors={}", self.colors),
            format!("scale={}", self.scale.unwrap_or_default()),
            format!("draw={}", self.draw.unwrap_or_default()),
            format!("filter={}", self.filter.unwrap_or_default()),
        ];
        format!("{FILTER_NAME}={}", options.join(":"))
    }
}

impl Default for WaveformFilter {
    fn default() -> Self {
        Self::new(
            Resolution {
                width: 1920,
                height: 1080,
            },
            ColorList(vec![DEFAULT_COLORS.to_string()]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_expression_is_exact() {
        let filter = WaveformFilter::parse("1920x1080", "blue").unwrap();
        assert_eq!(filter.expression(), "showwavespic=size=1920x1080:colors=blue");
        assert!(!filter.has_extended_options());
    }

    #[test]
    fn test_default_matches_literal_defaults() {
        let filter = WaveformFilter::default();
        assert_eq!(
            filter,
            WaveformFilter::parse(DEFAULT_RESOLUTION, DEFAULT_COLORS).unwrap()
        );
    }

    #[test]
    fn test_extended_expression_order_and_defaults() {
        let filter = WaveformFilter::parse("600x240", "red|0x00ff00").unwrap();
        assert_eq!(
            filter.extended_expression(),
            "showwavespic=size=600x240:split_channels=0:colors=red|0x00ff00:scale=lin:draw=scale:filter=average"
        );
    }

    #[test]
    fn test_extended_expression_with_options() {
        let mut filter = WaveformFilter::parse("800x200", "white").unwrap();
        filter.split_channels = Some(true);
        filter.scale = Some(AmplitudeScale::Sqrt);
        filter.draw = Some(DrawMode::Full);
        filter.filter = Some(PeakFilter::Peak);
        assert!(filter.has_extended_options());
        assert_eq!(
            filter.extended_expression(),
            "showwavespic=size=800x200:split_channels=1:colors=white:scale=sqrt:draw=full:filter=peak"
        );
    }

    #[test]
    fn test_named_sizes_expand_to_dimensions() {
        assert_eq!("hd720".parse::<Resolution>().unwrap().to_string(), "1280x720");
        assert_eq!("vga".parse::<Resolution>().unwrap().to_string(), "640x480");
        let filter = WaveformFilter::parse("hd1080", "blue").unwrap();
        assert_eq!(filter.expression(), "showwavespic=size=1920x1080:colors=blue");
        assert!("HD720".parse::<Resolution>().is_err());
        assert!("hd720:draw=full".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_resolution_rejects_bad_values() {
        for bad in ["0x10", "10x0", "abc", "1920", "10x10:draw=full", "1920 x 1080", ""] {
            assert!(bad.parse::<Resolution>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_colors_accept_names_hex_and_alpha() {
        for good in ["blue", "#ff0000", "0xFF00FF80", "red@0.5", "red|blue", "Red | #00ff00"] {
            assert!(good.parse::<ColorList>().is_ok(), "rejected {good:?}");
        }
    }

    #[test]
    fn test_colors_reject_filter_metacharacters() {
        for bad in ["blue:scale=log", "blue,negate", "blue;x", "[a]", "", "red|", "#ff00"] {
            assert!(bad.parse::<ColorList>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_color_list_display_normalizes_spacing() {
        let colors: ColorList = "red | blue".parse().unwrap();
        assert_eq!(colors, "red|blue".parse::<ColorList>().unwrap());
        assert_eq!(colors.to_string(), "red|blue");
    }
}
