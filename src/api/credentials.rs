use color_eyre::{eyre::eyre, Result};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the persisted token.
pub const TOKEN_ENV: &str = "MINDWELL_TOKEN";

/// Where the auth token lives.
#[derive(Debug, Clone)]
pub enum CredentialStore {
  /// Token persisted in a file by `mindwell login`
  File(PathBuf),
  /// Token held in memory only; `Fixed(None)` sends no token at all
  Fixed(Option<String>),
}

impl CredentialStore {
  /// Store at `<data_dir>/mindwell/token`.
  pub fn default_location() -> Result<Self> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(Self::File(data_dir.join("mindwell").join("token")))
  }

  /// Current token, if any.
  ///
  /// For the file store, `MINDWELL_TOKEN` wins over the file. A missing or
  /// empty file means no token; the server decides what to do about it.
  pub fn token(&self) -> Option<String> {
    match self {
      Self::Fixed(token) => token.clone(),
      Self::File(path) => std::env::var(TOKEN_ENV)
        .ok()
        .or_else(|| std::fs::read_to_string(path).ok())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty()),
    }
  }

  /// Persist a token.
  pub fn save(&mut self, token: &str) -> Result<()> {
    match self {
      Self::Fixed(slot) => {
        *slot = Some(token.to_string());
        Ok(())
      }
      Self::File(path) => write_token(path, token),
    }
  }

  /// Forget the token. Succeeds if there was nothing to forget.
  pub fn clear(&mut self) -> Result<()> {
    match self {
      Self::Fixed(slot) => {
        *slot = None;
        Ok(())
      }
      Self::File(path) => match std::fs::remove_file(path.as_path()) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(eyre!("Failed to remove token file {}: {}", path.display(), e)),
      },
    }
  }
}

fn write_token(path: &Path, token: &str) -> Result<()> {
  if let Some(parent) = path.parent() {
    std::fs::create_dir_all(parent)
      .map_err(|e| eyre!("Failed to create credentials directory: {}", e))?;
  }

  std::fs::write(path, token)
    .map_err(|e| eyre!("Failed to write token file {}: {}", path.display(), e))?;

  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
      .map_err(|e| eyre!("Failed to restrict token file permissions: {}", e))?;
  }

  Ok(())
}
