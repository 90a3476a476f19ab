use std::io::Read;

use twenty48_grid::DEFAULT_SIZE;

/// Driver settings, loaded from TOML. Every key is optional.
///
/// ```toml
/// size = 4
/// seed = 1234
/// initial_tiles = 2
/// spawn_on_unchanged = true
/// ```
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Config {
    /// Board side length.
    #[serde(default = "defaults::size")]
    pub size: usize,

    /// RNG seed; drawn from entropy (and reported) when absent.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Tiles placed before the first move.
    #[serde(default = "defaults::initial_tiles")]
    pub initial_tiles: usize,

    /// Spawn a tile even when a move changed nothing.
    #[serde(default = "defaults::spawn_on_unchanged")]
    pub spawn_on_unchanged: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: defaults::size(),
            seed: None,
            initial_tiles: defaults::initial_tiles(),
            spawn_on_unchanged: defaults::spawn_on_unchanged(),
        }
    }
}

impl Config {
    pub fn from_toml<P: AsRef<std::path::Path>>(
        path: P,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let mut file = std::fs::File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let cfg: Self = toml::from_str(&contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.size < 2 {
            return Err(format!("size must be at least 2, got {}", self.size));
        }
        let cells = self
            .size
            .checked_mul(self.size)
            .ok_or_else(|| format!("size {} is too large", self.size))?;
        if self.initial_tiles > cells {
            return Err(format!(
                "initial_tiles ({}) exceeds the {} cells of a {}x{} board",
                self.initial_tiles, cells, self.size, self.size
            ));
        }
        Ok(())
    }
}

mod defaults {
    pub fn size() -> usize { super::DEFAULT_SIZE }
    pub fn initial_tiles() -> usize { 2 }
    pub fn spawn_on_unchanged() -> bool { true }
}
