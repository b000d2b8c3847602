use std::sync::LazyLock;

use crate::build_info::BUILD_INFO;

/// Defines the application version, e.g. `v0.3.1-1a2b3c4d` or `latest-unknown-dirty`.
pub static VERSION: LazyLock<String> = LazyLock::new(|| {
    let sha = BUILD_INFO.commit_sha1.unwrap_or("unknown");
    format!(
        "{}-{}{}",
        env!("IMAGE_VERSION"),
        &sha[..sha.len().min(8)],
        if BUILD_INFO.is_dirty() { "-dirty" } else { "" }
    )
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_starts_with_image_version() {
        assert!(
            VERSION.starts_with(env!("IMAGE_VERSION")),
            "version {} should start with the image version",
            &**VERSION
        );
    }

    #[test]
    fn dirty_suffix_follows_build_info() {
        assert_eq!(VERSION.ends_with("-dirty"), BUILD_INFO.is_dirty());
    }
}
