//! GSI download recommendation by SDK level.

use tracing::debug;

/// Fallback for any SDK level without a pinned artifact.
pub const GSI_DOCS_URL: &str = "https://developer.android.com/topic/generic-system-image";

/// Release page of the DSU Sideloader app used to boot a downloaded GSI.
pub const DSU_SIDELOADER_URL: &str = "https://github.com/VegaBobo/DSU-Sideloader/releases";

/// Sorted by SDK level; looked up with a binary search.
const GSI_TABLE: &[(u32, &str)] = &[
    (
        35,
        "https://dl.google.com/developers/gsi/android15-release/gsi-gms-arm64-ab-android15-release-20251105.zip",
    ),
    (36, GSI_DOCS_URL),
];

pub fn recommend(sdk_level: u32) -> &'static str {
    let url = GSI_TABLE
        .binary_search_by_key(&sdk_level, |(sdk, _)| *sdk)
        .map(|idx| GSI_TABLE[idx].1)
        .unwrap_or(GSI_DOCS_URL);
    debug!(sdk_level, url, "recommended GSI");
    url
}
