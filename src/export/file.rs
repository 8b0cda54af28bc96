//! Writing exported images to disk.

use super::types::{ExportError, ExportFormat};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

/// Where and under which name exports are saved.
#[derive(Debug, Clone)]
pub struct FileSaveConfig {
    pub save_directory: PathBuf,
    /// Filename template (chrono format specifiers, no extension).
    pub filename_template: String,
    pub format: ExportFormat,
}

impl Default for FileSaveConfig {
    fn default() -> Self {
        Self {
            save_directory: default_save_directory(),
            filename_template: DEFAULT_FILENAME_TEMPLATE.to_string(),
            format: ExportFormat::Png,
        }
    }
}

pub const DEFAULT_FILENAME_TEMPLATE: &str = "beautyshot_%Y-%m-%d_%H%M%S";

/// `<Pictures>/Beautyshot`, or `~/Beautyshot` without a pictures directory.
pub fn default_save_directory() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Beautyshot")
}

/// Expands the template with the current local time and appends the extension.
pub fn generate_filename(template: &str, format: ExportFormat) -> String {
    let now = Local::now();
    format!("{}.{}", now.format(template), format.extension())
}

/// Creates `directory` if needed and returns it canonicalized when possible.
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, ExportError> {
    if !directory.exists() {
        log::info!("Creating export directory: {}", directory.display());
        fs::create_dir_all(directory)?;
    }

    Ok(directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf()))
}

/// Saves `data` under a generated name in the configured directory.
pub fn save_export(data: &[u8], config: &FileSaveConfig) -> Result<PathBuf, ExportError> {
    let directory = ensure_directory_exists(&config.save_directory)?;
    let path = directory.join(generate_filename(&config.filename_template, config.format));
    write_export(data, &path)?;
    Ok(path)
}

/// Writes `data` to exactly `path`, readable by the owner only.
pub fn write_export(data: &[u8], path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_directory_exists(parent)?;
    }

    log::info!("Saving export to: {} ({} bytes)", path.display(), data.len());
    fs::write(path, data)?;

    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, Permissions::from_mode(0o600))?;
    }

    Ok(())
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_uses_template_and_extension() {
        let filename = generate_filename("shot_%Y", ExportFormat::Jpeg);
        assert!(filename.starts_with("shot_2"));
        assert!(filename.ends_with(".jpg"));
    }

    #[test]
    fn expand_tilde_only_touches_home_prefix() {
        assert!(!expand_tilde("~/Pictures").to_string_lossy().starts_with('~'));
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
    }

    #[test]
    fn default_directory_is_beautyshot() {
        assert!(FileSaveConfig::default().save_directory.ends_with("Beautyshot"));
    }

    #[test]
    fn save_creates_directory_and_restricts_permissions() {
        let dir = tempfile::tempdir().unwrap();
        let config = FileSaveConfig {
            save_directory: dir.path().join("nested/out"),
            filename_template: "fixed".into(),
            format: ExportFormat::Png,
        };
        let path = save_export(b"data", &config).unwrap();
        assert_eq!(path.file_name().unwrap(), "fixed.png");
        assert_eq!(fs::read(&path).unwrap(), b"data");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }
}
