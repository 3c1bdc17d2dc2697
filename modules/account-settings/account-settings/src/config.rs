use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SettingsConfig {
    #[serde(default)]
    pub avatar: AvatarConfig,
    #[serde(default)]
    pub toast: ToastConfig,
    #[serde(default = "default_deletion_grace_hours")]
    pub deletion_grace_hours: i64,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            avatar: AvatarConfig::default(),
            toast: ToastConfig::default(),
            deletion_grace_hours: default_deletion_grace_hours(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvatarConfig {
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            max_upload_bytes: default_max_upload_bytes(),
            max_dimension: default_max_dimension(),
            jpeg_quality: default_jpeg_quality(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ToastConfig {
    #[serde(default = "default_toast_duration_ms")]
    pub default_duration_ms: u64,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: default_toast_duration_ms(),
        }
    }
}

fn default_bucket() -> String {
    "avatars".to_owned()
}

fn default_max_upload_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_max_dimension() -> u32 {
    400
}

fn default_jpeg_quality() -> u8 {
    80
}

fn default_toast_duration_ms() -> u64 {
    5000
}

fn default_deletion_grace_hours() -> i64 {
    24
}
