use {
    crate::KeystoreResult,
    std::{
        collections::BTreeSet,
        fs,
        io::ErrorKind,
        path::{Path, PathBuf},
    },
};

/// Origins the user has approved to connect without asking again, persisted
/// as a JSON array.
#[derive(Debug, Clone)]
pub struct TrustedOrigins {
    path: PathBuf,
    origins: BTreeSet<String>,
}

impl TrustedOrigins {
    /// Load the list at `path`. A missing file is an empty list.
    pub fn load<P>(path: P) -> KeystoreResult<Self>
    where
        P: Into<PathBuf>,
    {
        let path = path.into();

        let origins = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(err) if err.kind() == ErrorKind::NotFound => BTreeSet::new(),
            Err(err) => return Err(err.into()),
        };

        Ok(Self { path, origins })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, origin: &str) -> bool {
        self.origins.contains(origin)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.origins.iter().map(String::as_str)
    }

    /// Add `origin` and persist. Returns whether it was newly added.
    pub fn trust(&mut self, origin: &str) -> KeystoreResult<bool> {
        if !self.origins.insert(origin.to_string()) {
            return Ok(false);
        }

        self.save()?;

        Ok(true)
    }

    /// Remove `origin` and persist. Returns whether it was present.
    pub fn revoke(&mut self, origin: &str) -> KeystoreResult<bool> {
        if !self.origins.remove(origin) {
            return Ok(false);
        }

        self.save()?;

        Ok(true)
    }

    fn save(&self) -> KeystoreResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&self.path, serde_json::to_vec_pretty(&self.origins)?)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trust_persists_across_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wallet/trusted.json");

        let mut trusted = TrustedOrigins::load(&path).unwrap();
        assert!(!trusted.contains("ballot-cli"));

        assert!(trusted.trust("ballot-cli").unwrap());
        assert!(!trusted.trust("ballot-cli").unwrap());

        let reloaded = TrustedOrigins::load(&path).unwrap();
        assert!(reloaded.contains("ballot-cli"));
        assert_eq!(reloaded.iter().collect::<Vec<_>>(), vec!["ballot-cli"]);
    }

    #[test]
    fn revoke_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trusted.json");

        let mut trusted = TrustedOrigins::load(&path).unwrap();
        trusted.trust("a").unwrap();
        trusted.trust("b").unwrap();

        assert!(trusted.revoke("a").unwrap());
        assert!(!trusted.revoke("a").unwrap());

        let reloaded = TrustedOrigins::load(&path).unwrap();
        assert_eq!(reloaded.iter().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trusted.json");
        fs::write(&path, "not json").unwrap();

        assert!(TrustedOrigins::load(&path).is_err());
    }
}
