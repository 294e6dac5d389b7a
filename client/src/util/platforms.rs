//! Platform categories that drive card fallbacks.

/// Platforms whose SDKs report sessions. Cards for these projects offer
/// release setup instead of a "not available" notice when no health data
/// exists yet.
pub const RELEASE_HEALTH_PLATFORMS: &[&str] = &[
    "javascript",
    "javascript-react",
    "javascript-angular",
    "javascript-angularjs",
    "javascript-backbone",
    "javascript-ember",
    "javascript-gatsby",
    "javascript-vue",
    "javascript-nextjs",
    "android",
    "apple-ios",
    "apple-macos",
    "cocoa",
    "cocoa-objc",
    "cocoa-swift",
    "native",
    "node",
    "node-express",
    "node-koa",
    "node-connect",
    "python",
    "python-django",
    "python-flask",
    "python-fastapi",
    "python-tornado",
    "rust",
    "flutter",
    "react-native",
    "electron",
];

#[must_use]
pub fn supports_release_health(platform: &str) -> bool {
    RELEASE_HEALTH_PLATFORMS.contains(&platform)
}
