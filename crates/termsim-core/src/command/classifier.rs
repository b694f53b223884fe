use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Tool family a raw command belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ToolKind {
    Kubectl,
    Git,
    Unknown,
}

impl ToolKind {
    /// Whether the simulator can run commands of this kind.
    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Maps a raw command line to its tool family.
///
/// The input is trimmed and lower-cased; `kubectl` or the `k ` alias select
/// kubectl, a `git` prefix selects git, anything else is unknown.
pub fn classify(command: &str) -> ToolKind {
    let normalized = command.trim().to_lowercase();

    if normalized.starts_with("kubectl") || normalized.starts_with("k ") {
        ToolKind::Kubectl
    } else if normalized.starts_with("git") {
        ToolKind::Git
    } else {
        ToolKind::Unknown
    }
}
