use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active palette.
///
/// The core never picks concrete colors; each presentation layer is handed
/// a palette explicitly and maps these tokens through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,

    TimelineLine,
    Marker,
    Connector,

    ActivityBoxBackground,
    ActivityBoxBorder,
    ActivityBoxText,

    TextPrimary,
    TextMuted,

    SelectionHighlight,
    ScrollIndicator,
}
